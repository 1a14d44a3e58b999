//! [`MaintenanceIssue`]-related read definitions.
//!
//! [`MaintenanceIssue`]: crate::domain::MaintenanceIssue

pub mod list {
    //! [`MaintenanceIssue`]s list definitions.

    use crate::{
        domain::{room, MaintenanceIssue},
        read::Period,
    };
    #[cfg(doc)]
    use crate::domain::Room;

    /// Filter of [`MaintenanceIssue`]s to select.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Room`] the [`MaintenanceIssue`]s are reported for.
        pub room_id: Option<room::Id>,

        /// [`Period`] the [`MaintenanceIssue`]s must overlap.
        pub overlapping: Option<Period>,
    }

    impl Filter {
        /// Indicates whether the provided [`MaintenanceIssue`] satisfies this
        /// [`Filter`].
        #[must_use]
        pub fn matches(&self, issue: &MaintenanceIssue) -> bool {
            self.room_id.map_or(true, |id| issue.room_id == id)
                && self
                    .overlapping
                    .map_or(true, |p| issue.overlaps(p.start, p.end))
        }
    }
}
