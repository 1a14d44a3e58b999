//! GraphQL [`Query`]s definitions.

use common::{Date, DateTime};
use juniper::graphql_object;
use service::{domain, query, read, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the `Room` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "room",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn room(
        id: api::room::Id,
        ctx: &Context,
    ) -> Result<api::Room, Error> {
        ctx.service()
            .execute(query::room::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| RoomError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Room`s ordered by their numbers.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_CAPACITY` - the `minCapacity` is not within `1..=32`.
    #[tracing::instrument(
        skip_all,
        fields(
            floor = ?floor,
            gql.name = "rooms",
            kind = ?kind,
            min_capacity = ?min_capacity,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rooms(
        kind: Option<api::room::Kind>,
        floor: Option<i32>,
        min_capacity: Option<i32>,
        ctx: &Context,
    ) -> Result<Vec<api::Room>, Error> {
        let floor = floor
            .map(domain::room::Floor::try_from)
            .transpose()
            .map_err(|_| InputError::Floor.into())
            .map_err(ctx.error())?;
        let min_capacity = min_capacity
            .map(capacity)
            .transpose()
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::rooms::List::by(read::room::list::Filter {
                kind: kind.map(Into::into),
                floor,
                min_capacity,
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Total number of `Room`s in the hotel.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "roomsCount",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn rooms_count(ctx: &Context) -> Result<i32, Error> {
        ctx.service()
            .execute(query::rooms::TotalCount::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Resolves the current status of the `Room` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `ROOM_NOT_EXISTS` - the `Room` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "roomStatus",
            otel.name = Self::SPAN_NAME,
            room_id = %room_id,
        ),
    )]
    pub async fn room_status(
        room_id: api::room::Id,
        ctx: &Context,
    ) -> Result<api::room::status::Report, Error> {
        ctx.service()
            .execute(query::RoomStatus {
                room_id: room_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Customer` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CUSTOMER_NOT_EXISTS` - the `Customer` with the specified ID does
    ///                           not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "customer",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customer(
        id: api::customer::Id,
        ctx: &Context,
    ) -> Result<api::Customer, Error> {
        ctx.service()
            .execute(query::customer::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| CustomerError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Customer`s ordered by their names.
    ///
    /// Every word of the `name` must occur in the `Customer`'s full name,
    /// case-insensitively.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "customers",
            name = ?name.as_ref().map(ToString::to_string),
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn customers(
        name: Option<api::customer::Name>,
        ctx: &Context,
    ) -> Result<Vec<api::Customer>, Error> {
        ctx.service()
            .execute(query::customers::List::by(read::customer::list::Filter {
                name: name.map(Into::into),
            }))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Reservation` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `RESERVATION_NOT_EXISTS` - the `Reservation` with the specified ID
    ///                              does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "reservation",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn reservation(
        id: api::reservation::Id,
        ctx: &Context,
    ) -> Result<api::Reservation, Error> {
        ctx.service()
            .execute(query::reservation::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ReservationError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists `Reservation`s ordered by their start.
    ///
    /// If `from` and `to` are provided, only the `Reservation`s overlapping
    /// the `[from; to)` period are listed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INCOMPLETE_PERIOD` - only one of `from` and `to` is provided;
    /// - `INVALID_PERIOD` - `to` is not after `from`.
    #[tracing::instrument(
        skip_all,
        fields(
            customer_id = ?customer_id,
            from = ?from,
            gql.name = "reservations",
            otel.name = Self::SPAN_NAME,
            room_id = ?room_id,
            status = ?status,
            to = ?to,
        ),
    )]
    pub async fn reservations(
        room_id: Option<api::room::Id>,
        customer_id: Option<api::customer::Id>,
        status: Option<api::reservation::Status>,
        from: Option<DateTime>,
        to: Option<DateTime>,
        ctx: &Context,
    ) -> Result<Vec<api::Reservation>, Error> {
        let overlapping = period(from, to).map_err(ctx.error())?;

        ctx.service()
            .execute(query::reservations::List::by(
                read::reservation::list::Filter {
                    room_id: room_id.map(Into::into),
                    customer_id: customer_id.map(Into::into),
                    status: status.map(Into::into),
                    overlapping,
                    ..read::reservation::list::Filter::default()
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|rs| rs.into_iter().map(Into::into).collect())
    }

    /// Lists `MaintenanceIssue`s ordered by the moment they were reported.
    ///
    /// If `from` and `to` are provided, only the `MaintenanceIssue`s
    /// overlapping the `[from; to)` period are listed.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INCOMPLETE_PERIOD` - only one of `from` and `to` is provided;
    /// - `INVALID_PERIOD` - `to` is not after `from`.
    #[tracing::instrument(
        skip_all,
        fields(
            from = ?from,
            gql.name = "maintenanceIssues",
            otel.name = Self::SPAN_NAME,
            room_id = ?room_id,
            to = ?to,
        ),
    )]
    pub async fn maintenance_issues(
        room_id: Option<api::room::Id>,
        from: Option<DateTime>,
        to: Option<DateTime>,
        ctx: &Context,
    ) -> Result<Vec<api::MaintenanceIssue>, Error> {
        let overlapping = period(from, to).map_err(ctx.error())?;

        ctx.service()
            .execute(query::maintenance_issues::List::by(
                read::maintenance_issue::list::Filter {
                    room_id: room_id.map(Into::into),
                    overlapping,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|is| is.into_iter().map(Into::into).collect())
    }

    /// Builds a day-by-day calendar of `Room` statuses within the inclusive
    /// `[start; end]` range of days.
    ///
    /// Every day shows the `Room` status at 16:00 of that day.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_RANGE` - `end` is before `start`;
    /// - `RANGE_TOO_LONG` - the range spans more than 366 days.
    #[tracing::instrument(
        skip_all,
        fields(
            end = %end,
            gql.name = "calendar",
            otel.name = Self::SPAN_NAME,
            room_ids = ?room_ids,
            start = %start,
        ),
    )]
    pub async fn calendar(
        start: Date,
        end: Date,
        room_ids: Option<Vec<api::room::Id>>,
        ctx: &Context,
    ) -> Result<Vec<api::calendar::RoomCalendar>, Error> {
        ctx.service()
            .execute(query::CalendarView {
                start,
                end,
                room_ids: room_ids
                    .map(|ids| ids.into_iter().map(Into::into).collect()),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Counts `Room`s per status at the current moment.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "dashboard",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn dashboard(
        ctx: &Context,
    ) -> Result<api::dashboard::Dashboard, Error> {
        ctx.service()
            .execute(query::DashboardSummary)
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Calculates the `OccupancyReport` for the inclusive `[start; end]`
    /// range of days.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_RANGE` - `end` is before `start`;
    /// - `RANGE_TOO_LONG` - the range spans more than 366 days;
    /// - `REVENUE_OVERFLOW` - the revenue in some currency is too large.
    #[tracing::instrument(
        skip_all,
        fields(
            end = %end,
            gql.name = "occupancyReport",
            otel.name = Self::SPAN_NAME,
            start = %start,
        ),
    )]
    pub async fn occupancy_report(
        start: Date,
        end: Date,
        ctx: &Context,
    ) -> Result<api::report::Occupancy, Error> {
        ctx.service()
            .execute(query::report::Occupancy { start, end })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

/// Parses the provided `min_capacity` into a [`domain::room::Capacity`].
///
/// # Errors
///
/// If the provided number is not a valid [`domain::room::Capacity`].
pub(crate) fn capacity(guests: i32) -> Result<domain::room::Capacity, Error> {
    u8::try_from(guests)
        .ok()
        .and_then(domain::room::Capacity::new)
        .ok_or_else(|| InputError::Capacity.into())
}

/// Builds a [`read::Period`] out of the optional `from` and `to` bounds.
///
/// # Errors
///
/// If only one of the bounds is provided, or they're reversed.
fn period(
    from: Option<DateTime>,
    to: Option<DateTime>,
) -> Result<Option<read::Period>, Error> {
    match (from, to) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) if start < end => {
            Ok(Some(read::Period { start, end }))
        }
        (Some(_), Some(_)) => Err(api::PeriodError::Reversed.into()),
        (Some(_), None) | (None, Some(_)) => {
            Err(api::PeriodError::Incomplete.into())
        }
    }
}

impl AsError for query::room_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::RoomNotExists(_) => Some(RoomError::NotExists.into()),
        }
    }
}

impl AsError for query::calendar_view::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidRange { .. } => RangeError::Invalid.into(),
            Self::RangeTooLong(_) => RangeError::TooLong.into(),
        })
    }
}

impl AsError for query::report::occupancy::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "REVENUE_OVERFLOW"]
                #[status = UNPROCESSABLE_ENTITY]
                #[message = "Revenue over the period is too large"]
                RevenueOverflow,
            }
        }

        Some(match self {
            Self::Db(e) => return e.try_as_error(),
            Self::InvalidRange { .. } => RangeError::Invalid.into(),
            Self::RangeTooLong(_) => RangeError::TooLong.into(),
            Self::RevenueOverflow(_) => Error::RevenueOverflow.into(),
        })
    }
}

define_error! {
    enum RangeError {
        #[code = "INVALID_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "`end` must not be before `start`"]
        Invalid,

        #[code = "RANGE_TOO_LONG"]
        #[status = BAD_REQUEST]
        #[message = "Range must not span more than 366 days"]
        TooLong,
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Customer` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum InputError {
        #[code = "INVALID_CAPACITY"]
        #[status = BAD_REQUEST]
        #[message = "Number of guests must be within `1..=32`"]
        Capacity,

        #[code = "INVALID_FLOOR"]
        #[status = BAD_REQUEST]
        #[message = "Floor must be within `-32768..=32767`"]
        Floor,
    }
}

define_error! {
    enum ReservationError {
        #[code = "RESERVATION_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Reservation` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum RoomError {
        #[code = "ROOM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Room` with the specified ID does not exist"]
        NotExists,
    }
}
