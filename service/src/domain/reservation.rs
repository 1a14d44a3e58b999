//! [`Reservation`] definitions.

use std::time::Duration;

use common::{define_kind, unit, DateTime, DateTimeOf, Money};
use derive_more::{Display, Error, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{customer, room};
#[cfg(doc)]
use crate::domain::{Customer, Room};

/// Booking of a [`Room`] by a [`Customer`] for the `[start, end)` period.
#[derive(Clone, Debug)]
pub struct Reservation {
    /// ID of this [`Reservation`].
    pub id: Id,

    /// ID of the reserved [`Room`].
    pub room_id: room::Id,

    /// ID of the [`Customer`] who made this [`Reservation`].
    pub customer_id: customer::Id,

    /// [`DateTime`] this [`Reservation`] starts at (inclusive).
    pub start: StartDateTime,

    /// [`DateTime`] this [`Reservation`] ends at (exclusive).
    pub end: EndDateTime,

    /// Number of guests staying.
    pub guests: Guests,

    /// Total price of this [`Reservation`].
    pub price: Money,

    /// [`Rating`] the [`Customer`] gave after the stay, if any.
    pub rating: Option<Rating>,

    /// Current [`Status`] of this [`Reservation`].
    pub status: Status,

    /// [`DateTime`] when this [`Reservation`] was created.
    pub created_at: CreationDateTime,
}

impl Reservation {
    /// Indicates whether this [`Reservation`] holds its [`Room`], so nobody
    /// else may occupy it during the period.
    #[must_use]
    pub fn is_occupying(&self) -> bool {
        self.status.is_occupying()
    }

    /// Indicates whether this [`Reservation`] occupies its [`Room`] at the
    /// provided instant.
    #[must_use]
    pub fn occupies(&self, at: DateTime) -> bool {
        self.is_occupying()
            && self.start.coerce() <= at
            && at < self.end.coerce()
    }

    /// Indicates whether this [`Reservation`] period intersects the provided
    /// `[start, end)` one.
    #[must_use]
    pub fn overlaps(&self, start: DateTime, end: DateTime) -> bool {
        self.start.coerce() < end && start < self.end.coerce()
    }

    /// Returns the number of nights in the `[start, end)` period, rounding
    /// partial days up.
    #[must_use]
    pub fn nights(&self) -> u32 {
        nights(self.start.coerce(), self.end.coerce())
    }

    /// Checks in the [`Customer`] of this [`Reservation`].
    ///
    /// # Errors
    ///
    /// If this [`Reservation`] is not [`Status::Pending`].
    pub fn check_in(&mut self) -> Result<(), TransitionError> {
        self.transit(Status::CheckedIn, |s| matches!(s, Status::Pending))
    }

    /// Checks out the [`Customer`] of this [`Reservation`].
    ///
    /// # Errors
    ///
    /// If this [`Reservation`] is not [`Status::CheckedIn`].
    pub fn check_out(&mut self) -> Result<(), TransitionError> {
        self.transit(Status::Completed, |s| matches!(s, Status::CheckedIn))
    }

    /// Cancels this [`Reservation`].
    ///
    /// # Errors
    ///
    /// If this [`Reservation`] is already [`Status::Completed`] or
    /// [`Status::Cancelled`].
    pub fn cancel(&mut self) -> Result<(), TransitionError> {
        self.transit(Status::Cancelled, Status::is_occupying)
    }

    /// Rates the stay of this [`Reservation`], replacing the previous
    /// [`Rating`], if any.
    ///
    /// # Errors
    ///
    /// If this [`Reservation`] is not [`Status::Completed`].
    pub fn rate(&mut self, rating: Rating) -> Result<(), TransitionError> {
        if self.status != Status::Completed {
            return Err(TransitionError {
                from: self.status,
                to: Status::Completed,
            });
        }
        self.rating = Some(rating);
        Ok(())
    }

    /// Moves this [`Reservation`] to the `to` [`Status`] if the current one
    /// satisfies the `allowed` predicate.
    fn transit(
        &mut self,
        to: Status,
        allowed: impl FnOnce(Status) -> bool,
    ) -> Result<(), TransitionError> {
        if !allowed(self.status) {
            return Err(TransitionError {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Returns the number of nights in the `[start, end)` period, rounding
/// partial days up, but never less than `1`.
#[must_use]
pub fn nights(start: DateTime, end: DateTime) -> u32 {
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    let nights = (end - start).as_nanos().div_ceil(DAY.as_nanos());
    u32::try_from(nights.max(1)).unwrap_or(u32::MAX)
}

/// Invalid [`Status`] transition of a [`Reservation`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Reservation` cannot move from `{from}` to `{to}` status")]
pub struct TransitionError {
    /// [`Status`] the [`Reservation`] has.
    pub from: Status,

    /// [`Status`] the [`Reservation`] was required to move to (or to be in).
    pub to: Status,
}

/// ID of a [`Reservation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Number of guests in a [`Reservation`], at least `1`.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Guests(u8);

impl Guests {
    /// Creates new [`Guests`] if the given `count` is positive.
    #[must_use]
    pub fn new(count: u8) -> Option<Self> {
        (count > 0).then_some(Self(count))
    }

    /// Returns the number of guests.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// Post-stay rating of a [`Reservation`], from `1` to `5`.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Rating(u8);

impl Rating {
    /// Creates a new [`Rating`] if the given `stars` are in `1..=5` range.
    #[must_use]
    pub fn new(stars: u8) -> Option<Self> {
        (1..=5).contains(&stars).then_some(Self(stars))
    }

    /// Returns the number of stars of this [`Rating`].
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

define_kind! {
    #[doc = "Status of a [`Reservation`]."]
    enum Status {
        #[doc = "Booked, but the guest hasn't arrived yet."]
        Pending = 1,

        #[doc = "Guest has arrived and stays in the room."]
        CheckedIn = 2,

        #[doc = "Guest has left."]
        Completed = 3,

        #[doc = "Cancelled before the guest left."]
        Cancelled = 4,
    }
}

impl Status {
    /// Indicates whether a [`Reservation`] in this [`Status`] holds its
    /// [`Room`].
    #[must_use]
    pub fn is_occupying(self) -> bool {
        matches!(self, Self::Pending | Self::CheckedIn)
    }
}

/// [`DateTime`] when a [`Reservation`] was created.
pub type CreationDateTime = DateTimeOf<(Reservation, unit::Creation)>;

/// [`DateTime`] when a [`Reservation`] starts.
pub type StartDateTime = DateTimeOf<(Reservation, unit::Start)>;

/// [`DateTime`] when a [`Reservation`] ends.
pub type EndDateTime = DateTimeOf<(Reservation, unit::End)>;

#[cfg(test)]
pub(crate) mod spec {
    use std::str::FromStr as _;

    use common::{DateTime, Money};

    use crate::domain::{customer, room};

    use super::{Guests, Rating, Reservation, Status};

    pub(crate) fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    pub(crate) fn reservation(
        room_id: room::Id,
        start: &str,
        end: &str,
        status: Status,
    ) -> Reservation {
        Reservation {
            id: super::Id::new(),
            room_id,
            customer_id: customer::Id::new(),
            start: at(start).coerce(),
            end: at(end).coerce(),
            guests: Guests::new(1).unwrap(),
            price: Money::from_str("100USD").unwrap(),
            rating: None,
            status,
            created_at: at(start).coerce(),
        }
    }

    fn pending() -> Reservation {
        reservation(
            room::Id::new(),
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            Status::Pending,
        )
    }

    #[test]
    fn occupies_half_open_period() {
        let r = pending();

        assert!(r.occupies(at("2025-06-01T14:00:00Z")));
        assert!(r.occupies(at("2025-06-02T00:00:00Z")));
        assert!(!r.occupies(at("2025-06-03T11:00:00Z")));
        assert!(!r.occupies(at("2025-06-01T13:59:59Z")));
    }

    #[test]
    fn only_pending_and_checked_in_occupy() {
        for (status, occupies) in [
            (Status::Pending, true),
            (Status::CheckedIn, true),
            (Status::Completed, false),
            (Status::Cancelled, false),
        ] {
            let mut r = pending();
            r.status = status;

            assert_eq!(r.occupies(at("2025-06-02T00:00:00Z")), occupies);
        }
    }

    #[test]
    fn overlaps_only_intersecting_periods() {
        let r = pending();

        assert!(r.overlaps(at("2025-06-02T00:00:00Z"), at("2025-06-05T00:00:00Z")));
        assert!(r.overlaps(at("2025-05-30T00:00:00Z"), at("2025-06-01T14:00:01Z")));
        assert!(!r.overlaps(at("2025-06-03T11:00:00Z"), at("2025-06-05T00:00:00Z")));
        assert!(!r.overlaps(at("2025-05-30T00:00:00Z"), at("2025-06-01T14:00:00Z")));
    }

    #[test]
    fn counts_nights_rounding_up() {
        assert_eq!(pending().nights(), 2);
        assert_eq!(
            super::nights(at("2025-06-01T00:00:00Z"), at("2025-06-04T00:00:00Z")),
            3,
        );
        assert_eq!(
            super::nights(at("2025-06-01T10:00:00Z"), at("2025-06-01T12:00:00Z")),
            1,
        );
    }

    #[test]
    fn follows_lifecycle() {
        let mut r = pending();
        r.check_in().unwrap();
        assert_eq!(r.status, Status::CheckedIn);
        r.check_out().unwrap();
        assert_eq!(r.status, Status::Completed);
        r.rate(Rating::new(5).unwrap()).unwrap();
        assert_eq!(r.rating.map(Rating::get), Some(5));

        assert!(r.cancel().is_err());
        assert!(r.check_in().is_err());
    }

    #[test]
    fn cancels_only_occupying() {
        let mut r = pending();
        r.cancel().unwrap();
        assert_eq!(r.status, Status::Cancelled);

        let err = r.check_in().unwrap_err();
        assert_eq!(err.from, Status::Cancelled);
        assert_eq!(err.to, Status::CheckedIn);
    }

    #[test]
    fn rates_only_completed() {
        let mut r = pending();

        assert!(r.rate(Rating::new(4).unwrap()).is_err());
        assert!(r.check_out().is_err());
        assert_eq!(r.rating, None);
    }

    #[test]
    fn validates_rating_and_guests() {
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
        assert!(Rating::new(1).is_some());
        assert!(Guests::new(0).is_none());
        assert_eq!(Guests::new(3).map(Guests::get), Some(3));
    }
}
