//! [`Occupancy`] report definition.

use common::{Date, Money, Percent};
use juniper::graphql_object;
use service::query;

use crate::{api, api::dashboard::saturating_i32, Context};

/// Report on revenue and occupancy of the hotel over a period of days.
#[derive(Clone, Debug)]
pub struct Occupancy(query::report::occupancy::Output);

impl From<query::report::occupancy::Output> for Occupancy {
    fn from(output: query::report::occupancy::Output) -> Self {
        Self(output)
    }
}

/// Report on revenue and occupancy of the hotel over a period of days.
#[graphql_object(name = "OccupancyReport", context = Context)]
impl Occupancy {
    /// First day of the report period.
    #[must_use]
    pub fn start(&self) -> Date {
        self.0.days.start
    }

    /// Number of days the report covers.
    #[must_use]
    pub fn days(&self) -> i32 {
        saturating_i32(self.0.days.len())
    }

    /// Revenue of the stays completed within the period, one amount per
    /// currency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "OccupancyReport.revenue",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn revenue(&self) -> &[Money] {
        &self.0.revenue
    }

    /// Number of stays completed within the period.
    #[must_use]
    pub fn completed_stays(&self) -> i32 {
        saturating_i32(self.0.completed_stays)
    }

    /// Average rating of the completed stays, if any of them was rated.
    #[must_use]
    pub fn average_rating(&self) -> Option<String> {
        self.0.average_rating.map(|r| r.to_string())
    }

    /// Number of room-days taken by guests.
    #[must_use]
    pub fn occupied_room_days(&self) -> i32 {
        saturating_i32(self.0.occupied_room_days)
    }

    /// Share of all the room-days taken by guests.
    #[must_use]
    pub fn occupancy_rate(&self) -> Percent {
        self.0.occupancy_rate
    }
}
