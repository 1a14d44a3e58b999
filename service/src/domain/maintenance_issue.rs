//! [`MaintenanceIssue`] definitions.

use common::{unit, DateTime, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::room;
#[cfg(doc)]
use crate::domain::Room;

/// Fault reported for a [`Room`], keeping it out of service during the
/// `[created_at, estimated_completion_at)` period.
///
/// Resolving an issue removes it completely.
#[derive(Clone, Debug)]
pub struct MaintenanceIssue {
    /// ID of this [`MaintenanceIssue`].
    pub id: Id,

    /// ID of the [`Room`] this [`MaintenanceIssue`] is reported for.
    pub room_id: room::Id,

    /// [`Description`] of this [`MaintenanceIssue`].
    pub description: Description,

    /// [`DateTime`] when this [`MaintenanceIssue`] was reported.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`MaintenanceIssue`] is expected to be fixed.
    pub estimated_completion_at: EstimatedCompletionDateTime,
}

impl MaintenanceIssue {
    /// Indicates whether this [`MaintenanceIssue`] keeps its [`Room`] out of
    /// service at the provided instant.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime) -> bool {
        self.created_at.coerce() <= at
            && at < self.estimated_completion_at.coerce()
    }

    /// Indicates whether this [`MaintenanceIssue`] period intersects the
    /// provided `[start, end)` one.
    #[must_use]
    pub fn overlaps(&self, start: DateTime, end: DateTime) -> bool {
        self.created_at.coerce() < end
            && start < self.estimated_completion_at.coerce()
    }
}

/// ID of a [`MaintenanceIssue`].
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

/// Description of a [`MaintenanceIssue`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `text` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        text.trim() == text && !text.is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// [`DateTime`] when a [`MaintenanceIssue`] was reported.
pub type CreationDateTime = DateTimeOf<(MaintenanceIssue, unit::Creation)>;

/// [`DateTime`] when a [`MaintenanceIssue`] is expected to be fixed.
pub type EstimatedCompletionDateTime =
    DateTimeOf<(MaintenanceIssue, unit::EstimatedCompletion)>;

#[cfg(test)]
pub(crate) mod spec {
    use common::DateTime;

    use crate::domain::room;

    use super::{Description, Id, MaintenanceIssue};

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    pub(crate) fn issue(
        room_id: room::Id,
        created: &str,
        estimated: &str,
    ) -> MaintenanceIssue {
        MaintenanceIssue {
            id: Id::new(),
            room_id,
            description: Description::new("Leaking tap").unwrap(),
            created_at: at(created).coerce(),
            estimated_completion_at: at(estimated).coerce(),
        }
    }

    #[test]
    fn active_within_half_open_period() {
        let i = issue(
            room::Id::new(),
            "2025-06-01T10:00:00Z",
            "2025-06-02T10:00:00Z",
        );

        assert!(i.is_active_at(at("2025-06-01T10:00:00Z")));
        assert!(i.is_active_at(at("2025-06-02T09:59:59Z")));
        assert!(!i.is_active_at(at("2025-06-02T10:00:00Z")));
        assert!(!i.is_active_at(at("2025-06-01T09:59:59Z")));
    }

    #[test]
    fn overlaps_only_intersecting_periods() {
        let i = issue(
            room::Id::new(),
            "2025-06-01T10:00:00Z",
            "2025-06-02T10:00:00Z",
        );

        assert!(i.overlaps(at("2025-05-31T00:00:00Z"), at("2025-06-01T10:00:01Z")));
        assert!(!i.overlaps(at("2025-06-02T10:00:00Z"), at("2025-06-03T00:00:00Z")));
    }
}
