//! Read models and selection filters.

pub mod customer;
pub mod maintenance_issue;
pub mod reservation;
pub mod room;

use std::time::Duration;

use common::{DateTime, Days};

pub use self::reservation::Stay;

/// Half-open `[start, end)` period of time to select entities overlapping
/// with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Period {
    /// Beginning of this [`Period`] (inclusive).
    pub start: DateTime,

    /// End of this [`Period`] (exclusive).
    pub end: DateTime,
}

impl Period {
    /// Creates a [`Period`] covering the single provided instant.
    ///
    /// Stored instants have microsecond precision, so anything overlapping
    /// `[at, at + 1µs)` contains `at`.
    #[must_use]
    pub fn at(at: DateTime) -> Self {
        Self {
            start: at,
            end: at + Duration::from_micros(1),
        }
    }

    /// Creates a [`Period`] covering the provided [`Days`] from the midnight
    /// of the first one until the midnight after the last one.
    #[must_use]
    pub fn of_days(days: Days) -> Self {
        Self {
            start: days.start.start(),
            end: days.end.start(),
        }
    }

    /// Indicates whether the provided instant lies within this [`Period`].
    #[must_use]
    pub fn contains(&self, at: DateTime) -> bool {
        self.start <= at && at < self.end
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Days};

    use super::Period;

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    #[test]
    fn covers_single_instant() {
        let p = Period::at(at("2025-06-01T16:00:00Z"));

        assert!(p.contains(at("2025-06-01T16:00:00Z")));
        assert!(!p.contains(at("2025-06-01T16:00:01Z")));
        assert!(!p.contains(at("2025-06-01T15:59:59Z")));
    }

    #[test]
    fn covers_whole_days() {
        let days = Days::new(
            "2025-06-01".parse().unwrap(),
            "2025-06-03".parse().unwrap(),
        );
        let p = Period::of_days(days);

        assert_eq!(p.start, at("2025-06-01T00:00:00Z"));
        assert_eq!(p.end, at("2025-06-03T00:00:00Z"));
        assert!(p.contains(at("2025-06-02T23:59:59Z")));
        assert!(!p.contains(at("2025-06-03T00:00:00Z")));
    }
}
