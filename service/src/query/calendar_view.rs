//! [`CalendarView`] [`Query`].

use common::{
    operations::{By, Select},
    Date, Days,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, MaintenanceIssue, Room},
    infra::{database, Database},
    occupancy::{self, RoomCalendar},
    read::{self, Period, Stay},
    Query, Service,
};

/// Maximum number of days a [`CalendarView`] may span.
pub const MAX_DAYS: usize = 366;

/// [`Query`] building a day-by-day [`occupancy::Status`] grid of [`Room`]s.
///
/// Every day is represented by its state at the
/// [`occupancy::CALENDAR_CHECK_TIME`].
#[derive(Clone, Debug)]
pub struct CalendarView {
    /// First day of the grid.
    pub start: Date,

    /// Last day of the grid (inclusive).
    pub end: Date,

    /// IDs of the [`Room`]s to build the grid for, or all of them.
    ///
    /// Unknown IDs are ignored.
    pub room_ids: Option<Vec<room::Id>>,
}

impl CalendarView {
    /// Returns the [`Days`] of this [`CalendarView`].
    ///
    /// # Errors
    ///
    /// If the range is reversed or longer than [`MAX_DAYS`].
    pub fn days(&self) -> Result<Days, ExecutionError> {
        days(self.start, self.end)
    }
}

/// Converts the inclusive `[start; end]` range into [`Days`].
///
/// # Errors
///
/// If the range is reversed or longer than [`MAX_DAYS`].
pub(crate) fn days(start: Date, end: Date) -> Result<Days, ExecutionError> {
    use ExecutionError as E;

    if end < start {
        return Err(E::InvalidRange { start, end });
    }
    let days =
        Days::inclusive(start, end).ok_or(E::InvalidRange { start, end })?;
    if days.len() > MAX_DAYS {
        return Err(E::RangeTooLong(days.len()));
    }
    Ok(days)
}

impl<Db, Clk> Query<CalendarView> for Service<Db, Clk>
where
    Db: Database<
            Select<By<Vec<Room>, read::room::list::Filter>>,
            Ok = Vec<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Stay>, read::reservation::stay::Filter>>,
            Ok = Vec<Stay>,
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
    type Ok = Vec<RoomCalendar>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        query: CalendarView,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let days = query.days().map_err(tracerr::wrap!())?;
        let period = Period::of_days(days);

        let mut rooms = self
            .database()
            .execute(Select(By::<Vec<Room>, _>::new(
                read::room::list::Filter::default(),
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(ids) = &query.room_ids {
            rooms.retain(|r| ids.contains(&r.id));
        }

        let stays = self
            .database()
            .execute(Select(By::<Vec<Stay>, _>::new(
                read::reservation::stay::Filter {
                    room_id: None,
                    overlapping: period,
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

        Ok(occupancy::calendar(
            &rooms,
            &stays,
            &issues,
            days,
            occupancy::CALENDAR_CHECK_TIME,
        ))
    }
}

/// Error of [`CalendarView`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Range ends before it starts.
    #[display("Range `{start}..={end}` ends before it starts")]
    InvalidRange {
        /// First day of the range.
        start: Date,

        /// Last day of the range.
        end: Date,
    },

    /// Range spans more than [`MAX_DAYS`].
    #[display("Range of {_0} days exceeds {MAX_DAYS} days")]
    RangeTooLong(#[error(not(source))] usize),
}

#[cfg(test)]
mod spec {
    use common::Date;

    use crate::{
        domain::reservation::{self, spec::reservation},
        infra::database::memory,
        occupancy::Status,
        Query as _,
    };

    use super::{CalendarView, ExecutionError as E};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn builds_grid_at_check_time() {
        let svc = memory::service("2025-06-01T09:00:00Z");
        let guest = svc.database().add_customer("Ann", "Lee");
        let first = svc.database().add_room("101", 2, "100USD");
        let second = svc.database().add_room("102", 2, "100USD");
        let mut stay = reservation(
            first.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Pending,
        );
        stay.customer_id = guest.id;
        svc.database().add_reservation(stay.clone());

        let grid = svc
            .execute(CalendarView {
                start: date("2025-06-01"),
                end: date("2025-06-03"),
                room_ids: Some(vec![first.id]),
            })
            .await
            .unwrap();

        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].room_id, first.id);
        let statuses = grid[0].days.iter().map(|d| d.status).collect::<Vec<_>>();
        assert_eq!(
            statuses,
            [Status::Occupied, Status::Occupied, Status::Available],
        );
        assert_eq!(grid[0].days[0].reservation_id, Some(stay.id));
        assert_eq!(
            grid[0].days[1].guest_name.as_ref().map(ToString::to_string),
            Some("Ann Lee".into()),
        );
        assert!(!grid.iter().any(|c| c.room_id == second.id));
    }

    #[tokio::test]
    async fn accepts_single_day() {
        let svc = memory::service("2025-06-01T09:00:00Z");
        _ = svc.database().add_room("101", 2, "100USD");

        let grid = svc
            .execute(CalendarView {
                start: date("2025-06-01"),
                end: date("2025-06-01"),
                room_ids: None,
            })
            .await
            .unwrap();

        assert_eq!(grid[0].days.len(), 1);
    }

    #[tokio::test]
    async fn rejects_invalid_ranges() {
        let svc = memory::service("2025-06-01T09:00:00Z");

        let err = svc
            .execute(CalendarView {
                start: date("2025-06-02"),
                end: date("2025-06-01"),
                room_ids: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::InvalidRange { .. }));

        let err = svc
            .execute(CalendarView {
                start: date("2025-01-01"),
                end: date("2026-01-02"),
                room_ids: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::RangeTooLong(367)));
    }
}
