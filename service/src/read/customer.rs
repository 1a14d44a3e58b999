//! [`Customer`]-related read definitions.
//!
//! [`Customer`]: crate::domain::Customer

pub mod list {
    //! [`Customer`]s list definitions.

    use crate::domain::{customer, Customer};

    /// Filter of [`Customer`]s to select.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// Part of the first or last [`customer::Name`] to fuzzy search for.
        pub name: Option<customer::Name>,
    }

    impl Filter {
        /// Indicates whether the provided [`Customer`] satisfies this
        /// [`Filter`].
        ///
        /// Every word of the searched name must occur in the full name of the
        /// [`Customer`], case-insensitively.
        #[must_use]
        pub fn matches(&self, customer: &Customer) -> bool {
            let Some(name) = &self.name else {
                return true;
            };
            let full = customer.full_name().to_string().to_lowercase();
            AsRef::<str>::as_ref(name)
                .split_whitespace()
                .all(|word| full.contains(&word.to_lowercase()))
        }
    }
}
