//! [`Customer`] definitions.

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hotel guest making reservations.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// First [`Name`] of this [`Customer`].
    pub first_name: Name,

    /// Last [`Name`] of this [`Customer`].
    pub last_name: Name,

    /// [`Email`] of this [`Customer`], if any.
    pub email: Option<Email>,

    /// [`Phone`] of this [`Customer`], if any.
    pub phone: Option<Phone>,

    /// [`DateTime`] when this [`Customer`] was created.
    pub created_at: CreationDateTime,
}

impl Customer {
    /// Returns the [`FullName`] of this [`Customer`].
    #[must_use]
    pub fn full_name(&self) -> FullName {
        FullName::new(&self.first_name, &self.last_name)
    }
}

/// ID of a [`Customer`].
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

/// First or last name of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Display name of a [`Customer`]: first and last [`Name`]s separated with a
/// space.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
pub struct FullName(String);

impl FullName {
    /// Composes a new [`FullName`] out of the provided [`Name`]s.
    #[must_use]
    pub fn new(first: &Name, last: &Name) -> Self {
        Self(format!("{first} {last}"))
    }
}

/// Email address of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `address` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Creates a new [`Email`] if the given `address` is valid.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        let address = address.into();
        Self::check(&address).then_some(Self(address))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Email`] format:
        /// - a local part without whitespace and `@`;
        /// - a domain with at least one dot.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid regex")
        });

        let address = address.as_ref();
        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`Customer`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Phone`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Phone`] format: an optional leading
        /// `+` followed by 7 to 15 digits, optionally grouped with single
        /// spaces or dashes.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?\d([\s-]?\d){6,14}$").expect("valid regex")
        });

        REGEX.is_match(number.as_ref())
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// [`DateTime`] when a [`Customer`] was created.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Email, FullName, Name, Phone};

    #[test]
    fn composes_full_name() {
        let first = Name::new("Ada").unwrap();
        let last = Name::new("Lovelace").unwrap();

        assert_eq!(FullName::new(&first, &last).to_string(), "Ada Lovelace");
    }

    #[test]
    fn validates_name() {
        assert!(Name::new("Ada").is_some());
        assert!(Name::new("").is_none());
        assert!(Name::new(" Ada").is_none());
    }

    #[test]
    fn validates_email() {
        assert!(Email::new("guest@example.com").is_some());
        assert!(Email::new("first.last@mail.example.org").is_some());

        assert!(Email::new("guest").is_none());
        assert!(Email::new("guest@example").is_none());
        assert!(Email::new("gu est@example.com").is_none());
        assert!(Email::new("guest@@example.com").is_none());
    }

    #[test]
    fn validates_phone() {
        assert!(Phone::new("+44 20 7946 0958").is_some());
        assert!(Phone::new("555-123-4567").is_some());
        assert!(Phone::new("5551234567").is_some());

        assert!(Phone::new("12345").is_none());
        assert!(Phone::new("+1 (555) 123").is_none());
        assert!(Phone::new("phone").is_none());
    }
}
