//! [`Room`]-related read definitions.
//!
//! [`Room`]: crate::domain::Room

pub mod list {
    //! [`Room`]s list definitions.

    use derive_more::{From, Into};

    use crate::domain::room;
    #[cfg(doc)]
    use crate::domain::Room;

    /// Filter of [`Room`]s to select.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// [`room::Kind`] the [`Room`]s must be of.
        pub kind: Option<room::Kind>,

        /// [`room::Floor`] the [`Room`]s must be located on.
        pub floor: Option<room::Floor>,

        /// [`room::Capacity`] the [`Room`]s must fit at least.
        pub min_capacity: Option<room::Capacity>,
    }

    impl Filter {
        /// Indicates whether the provided [`Room`] satisfies this [`Filter`].
        #[must_use]
        pub fn matches(&self, room: &room::Room) -> bool {
            self.kind.map_or(true, |k| room.kind == k)
                && self.floor.map_or(true, |f| room.floor == f)
                && self.min_capacity.map_or(true, |c| room.capacity >= c)
        }
    }

    /// Total count of [`Room`]s in the hotel.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(i32);
}
