//! [`Clock`] abstractions.

use crate::DateTime;

/// Source of the current [`DateTime`].
pub trait Clock {
    /// Returns the current [`DateTime`].
    fn now(&self) -> DateTime;
}

/// [`Clock`] reading the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct System;

impl Clock for System {
    fn now(&self) -> DateTime {
        time::OffsetDateTime::now_utc()
            .try_into()
            .expect("current time is always in range")
    }
}

/// [`Clock`] always returning the same [`DateTime`].
#[derive(Clone, Copy, Debug)]
pub struct Fixed(pub DateTime);

impl Clock for Fixed {
    fn now(&self) -> DateTime {
        self.0
    }
}
