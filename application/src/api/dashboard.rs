//! [`Dashboard`] definitions.

use derive_more::From;
use juniper::graphql_object;
use service::occupancy;

use crate::Context;

/// Counts of `Room`s per status at the current moment.
#[derive(Clone, Copy, Debug, From)]
pub struct Dashboard(occupancy::Summary);

/// Counts of `Room`s per status at the current moment.
#[graphql_object(context = Context)]
impl Dashboard {
    /// Total number of `Room`s in the hotel.
    #[must_use]
    pub fn total_rooms(&self) -> i32 {
        saturating_i32(self.0.total_rooms)
    }

    /// Number of `AVAILABLE` `Room`s.
    #[must_use]
    pub fn available_rooms(&self) -> i32 {
        saturating_i32(self.0.available_rooms)
    }

    /// Number of `OCCUPIED` `Room`s.
    #[must_use]
    pub fn occupied_rooms(&self) -> i32 {
        saturating_i32(self.0.occupied_rooms)
    }

    /// Number of `Room`s under `MAINTENANCE`.
    #[must_use]
    pub fn rooms_under_maintenance(&self) -> i32 {
        saturating_i32(self.0.rooms_under_maintenance)
    }
}

/// Converts the provided count into [`i32`], saturating on overflow.
pub(crate) fn saturating_i32(count: impl TryInto<i32>) -> i32 {
    count.try_into().unwrap_or(i32::MAX)
}
