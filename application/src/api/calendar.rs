//! [`RoomCalendar`]-related definitions.

use common::Date;
use juniper::graphql_object;
use service::occupancy;

use crate::{api, Context};

/// Day-by-day statuses of a single `Room`.
#[derive(Clone, Debug)]
pub struct RoomCalendar(occupancy::RoomCalendar);

impl From<occupancy::RoomCalendar> for RoomCalendar {
    fn from(calendar: occupancy::RoomCalendar) -> Self {
        Self(calendar)
    }
}

/// Day-by-day statuses of a single `Room`.
#[graphql_object(context = Context)]
impl RoomCalendar {
    /// `Room` this calendar is about.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "RoomCalendar.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`RoomCalendar` is built for existing `Room`s only"
        )]
        let room = unsafe { api::Room::new_unchecked(self.0.room_id) };
        room
    }

    /// Number of the `Room`.
    #[must_use]
    pub fn room_number(&self) -> api::room::Number {
        self.0.room_number.clone().into()
    }

    /// `CalendarDay`s in chronological order.
    #[must_use]
    pub fn days(&self) -> Vec<CalendarDay> {
        self.0.days.iter().cloned().map(CalendarDay).collect()
    }
}

/// Single day of a [`RoomCalendar`].
#[derive(Clone, Debug)]
pub struct CalendarDay(occupancy::CalendarDay);

/// Status of a `Room` on a single day, taken at 16:00 of that day.
#[graphql_object(context = Context)]
impl CalendarDay {
    /// `Date` of this day.
    #[must_use]
    pub fn date(&self) -> Date {
        self.0.date
    }

    /// `RoomStatus` on this day.
    #[must_use]
    pub fn status(&self) -> api::room::Status {
        self.0.status.into()
    }

    /// ID of the `Reservation` occupying the `Room` on this day, if any.
    #[must_use]
    pub fn reservation_id(&self) -> Option<api::reservation::Id> {
        self.0.reservation_id.map(Into::into)
    }

    /// Full name of the guest occupying the `Room` on this day, if any.
    #[must_use]
    pub fn guest_name(&self) -> Option<String> {
        self.0.guest_name.as_ref().map(ToString::to_string)
    }
}
