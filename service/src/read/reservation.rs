//! [`Reservation`]-related read definitions.

use crate::domain::{customer, Reservation};
#[cfg(doc)]
use crate::domain::{Customer, Room};

/// [`Reservation`] holding its [`Room`] along with the display name of the
/// [`Customer`] staying.
#[derive(Clone, Debug)]
pub struct Stay {
    /// [`Reservation`] itself.
    pub reservation: Reservation,

    /// [`customer::FullName`] of the [`Customer`] who made the
    /// [`Reservation`].
    pub guest_name: customer::FullName,
}

pub mod list {
    //! [`Reservation`]s list definitions.

    use common::DateTime;

    use crate::{
        domain::{customer, reservation, room, Reservation},
        read::Period,
    };
    #[cfg(doc)]
    use crate::domain::{Customer, Room};

    /// Filter of [`Reservation`]s to select.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the reserved [`Room`].
        pub room_id: Option<room::Id>,

        /// ID of the [`Customer`] who made the [`Reservation`]s.
        pub customer_id: Option<customer::Id>,

        /// [`reservation::Status`] the [`Reservation`]s must have.
        pub status: Option<reservation::Status>,

        /// [`Period`] the [`Reservation`]s must overlap.
        pub overlapping: Option<Period>,

        /// [`Period`] the [`Reservation`]s must end within.
        pub ending_within: Option<Period>,

        /// [`DateTime`] the [`Reservation`]s must start before.
        pub starting_before: Option<DateTime>,
    }

    impl Filter {
        /// Indicates whether the provided [`Reservation`] satisfies this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, r: &Reservation) -> bool {
            self.room_id.map_or(true, |id| r.room_id == id)
                && self.customer_id.map_or(true, |id| r.customer_id == id)
                && self.status.map_or(true, |s| r.status == s)
                && self.overlapping.map_or(true, |p| r.overlaps(p.start, p.end))
                && self
                    .ending_within
                    .map_or(true, |p| p.contains(r.end.coerce()))
                && self
                    .starting_before
                    .map_or(true, |at| r.start.coerce() < at)
        }
    }
}

pub mod stay {
    //! [`Stay`]s selection definitions.

    use crate::{
        domain::{room, Reservation},
        read::Period,
    };
    #[cfg(doc)]
    use crate::{domain::Room, read::Stay};

    /// Filter of [`Stay`]s to select.
    ///
    /// Only occupying [`Reservation`]s become [`Stay`]s.
    #[derive(Clone, Copy, Debug)]
    pub struct Filter {
        /// ID of the [`Room`] to select [`Stay`]s in, or all of them.
        pub room_id: Option<room::Id>,

        /// [`Period`] the [`Stay`]s must overlap.
        pub overlapping: Period,
    }

    impl Filter {
        /// Indicates whether the provided [`Reservation`] makes a [`Stay`]
        /// satisfying this [`Filter`].
        #[must_use]
        pub fn matches(&self, r: &Reservation) -> bool {
            r.is_occupying()
                && self.room_id.map_or(true, |id| r.room_id == id)
                && r.overlaps(self.overlapping.start, self.overlapping.end)
        }
    }
}
