//! [`Occupancy`] report definition.

use std::collections::BTreeMap;

use common::{
    money::Currency,
    operations::{By, Select},
    Date, Days, Money, Percent,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Customer;
use crate::{
    domain::{reservation, MaintenanceIssue, Reservation, Room},
    infra::{database, Database},
    occupancy::CALENDAR_CHECK_TIME,
    query::calendar_view,
    read::{self, Period},
    Query, Service,
};

/// [`Query`] reporting revenue and occupancy of the hotel over a period of
/// days.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Occupancy {
    /// First day of the period.
    pub start: Date,

    /// Last day of the period (inclusive).
    pub end: Date,
}

/// Output of the [`Occupancy`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// [`Days`] the report covers.
    pub days: Days,

    /// Revenue of the completed stays per currency, ordered by currency.
    pub revenue: Vec<Money>,

    /// Number of [`Reservation`]s completed within the period.
    pub completed_stays: u32,

    /// Average rating the [`Customer`]s gave to the completed stays, rounded
    /// to two decimal places, if any of them was rated.
    pub average_rating: Option<Decimal>,

    /// Number of room-days a [`Room`] was taken by a guest.
    pub occupied_room_days: u64,

    /// Share of the room-days a [`Room`] was taken by a guest.
    pub occupancy_rate: Percent,
}

/// Compiles the [`Output`] of the [`Occupancy`] report.
///
/// Revenue is made by the [`reservation::Status::Completed`] [`Reservation`]s
/// ending within the [`Days`]. A room-day counts as occupied if any
/// non-cancelled [`Reservation`] of the [`Room`] covers the
/// [`CALENDAR_CHECK_TIME`] of that day, as the calendar shows it. So a
/// [`Room`] having an active [`MaintenanceIssue`] at that time is not
/// occupied.
///
/// # Errors
///
/// If the revenue in some [`Currency`] doesn't fit into [`Money`].
pub fn compile(
    days: Days,
    rooms: &[Room],
    completed: &[Reservation],
    overlapping: &[Reservation],
    issues: &[MaintenanceIssue],
) -> Result<Output, ExecutionError> {
    let completed = completed
        .iter()
        .filter(|r| r.status == reservation::Status::Completed)
        .collect::<Vec<_>>();

    let mut revenue = BTreeMap::<u8, Money>::new();
    for r in &completed {
        let currency = r.price.currency;
        let total = revenue
            .entry(currency.u8())
            .or_insert_with(|| Money::zero(currency));
        *total = total
            .checked_add(r.price)
            .ok_or(ExecutionError::RevenueOverflow(currency))?;
    }

    let ratings = completed
        .iter()
        .filter_map(|r| r.rating)
        .map(|r| Decimal::from(r.get()))
        .collect::<Vec<_>>();
    let average_rating = (!ratings.is_empty()).then(|| {
        (ratings.iter().sum::<Decimal>() / Decimal::from(ratings.len()))
            .round_dp(2)
    });

    let mut occupied_room_days = 0;
    for room in rooms {
        let taken = overlapping
            .iter()
            .filter(|r| {
                r.room_id == room.id
                    && r.status != reservation::Status::Cancelled
            })
            .collect::<Vec<_>>();
        let repaired = issues
            .iter()
            .filter(|i| i.room_id == room.id)
            .collect::<Vec<_>>();
        occupied_room_days += days
            .into_iter()
            .map(|d| d.at::<()>(CALENDAR_CHECK_TIME))
            .filter(|at| !repaired.iter().any(|i| i.is_active_at(*at)))
            .filter(|at| {
                taken.iter().any(|r| {
                    r.start.coerce::<()>() <= *at && *at < r.end.coerce()
                })
            })
            .count() as u64;
    }
    let total_room_days = rooms.len() as u64 * days.len() as u64;

    Ok(Output {
        days,
        revenue: revenue.into_values().collect(),
        completed_stays: u32::try_from(completed.len()).unwrap_or(u32::MAX),
        average_rating,
        occupied_room_days,
        occupancy_rate: Percent::ratio(occupied_room_days, total_room_days),
    })
}

impl<Db, Clk> Query<Occupancy> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Vec<Room>, read::room::list::Filter>>,
            Ok = Vec<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Reservation>, read::reservation::list::Filter>>,
            Ok = Vec<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    Vec<MaintenanceIssue>,
                    read::maintenance_issue::list::Filter,
                >,
            >,
            Ok = Vec<MaintenanceIssue>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Occupancy { start, end }: Occupancy,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let days = calendar_view::days(start, end)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let period = Period::of_days(days);

        let rooms = self
            .database()
            .execute(Select(By::<Vec<Room>, _>::new(
                read::room::list::Filter::default(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let completed = self
            .database()
            .execute(Select(By::<Vec<Reservation>, _>::new(
                read::reservation::list::Filter {
                    status: Some(reservation::Status::Completed),
                    ending_within: Some(period),
                    ..read::reservation::list::Filter::default()
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let overlapping = self
            .database()
            .execute(Select(By::<Vec<Reservation>, _>::new(
                read::reservation::list::Filter {
                    overlapping: Some(period),
                    ..read::reservation::list::Filter::default()
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let issues = self
            .database()
            .execute(Select(By::<Vec<MaintenanceIssue>, _>::new(
                read::maintenance_issue::list::Filter {
                    room_id: None,
                    overlapping: Some(period),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        compile(days, &rooms, &completed, &overlapping, &issues)
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`Occupancy`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Period ends before it starts.
    #[display("Period `{start}..={end}` ends before it starts")]
    InvalidRange {
        /// First day of the period.
        start: Date,

        /// Last day of the period.
        end: Date,
    },

    /// Period spans more than [`calendar_view::MAX_DAYS`].
    #[display("Period of {_0} days is too long")]
    RangeTooLong(#[error(not(source))] usize),

    /// Revenue in the [`Currency`] doesn't fit into [`Money`].
    #[display("Revenue in `{_0}` overflows")]
    RevenueOverflow(#[error(not(source))] Currency),
}

impl From<calendar_view::ExecutionError> for ExecutionError {
    fn from(e: calendar_view::ExecutionError) -> Self {
        use calendar_view::ExecutionError as E;

        match e {
            E::Db(e) => Self::Db(e),
            E::InvalidRange { start, end } => Self::InvalidRange { start, end },
            E::RangeTooLong(len) => Self::RangeTooLong(len),
        }
    }
}
