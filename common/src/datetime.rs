//! Date and time utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{
    cmp::Ordering, fmt, marker::PhantomData, ops, str::FromStr, time::Duration,
};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{
    format_description::well_known::Rfc3339, macros::format_description,
    PrimitiveDateTime, UtcOffset,
};

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// UTC date and time.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// A [`DateTime`] representing the Unix epoch.
    pub const UNIX_EPOCH: Self = Self {
        inner: time::OffsetDateTime::UNIX_EPOCH,
        _of: PhantomData,
    };

    /// Creates a new [`DateTime`] from the provided [`UNIX_EPOCH`] timestamp.
    ///
    /// [`None`] is returned if the timestamp is invalid.
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn from_unix_timestamp(timestamp: i64) -> Option<Self> {
        Some(Self {
            inner: time::OffsetDateTime::from_unix_timestamp(timestamp).ok()?,
            _of: PhantomData,
        })
    }

    /// Returns the [`UNIX_EPOCH`] timestamp of this [`DateTime`].
    ///
    /// [`UNIX_EPOCH`]: Self::UNIX_EPOCH
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.inner.unix_timestamp()
    }

    /// Creates a new [`DateTime`] from the provided [RFC 3339] string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [RFC 3339] date and time.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        use ParseError as E;

        time::OffsetDateTime::parse(input, &Rfc3339)
            .map_err(E::Parse)?
            .try_into()
            .map_err(E::ComponentRange)
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Returns the UTC calendar [`Date`] of this [`DateTime`].
    #[must_use]
    pub fn date(&self) -> Date {
        Date(self.inner.date())
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing [`DateTime`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Failed to parse the string into an [`DateTime`].
    Parse(time::error::Parse),

    /// Parsed [`DateTime`] has an out of range component.
    ComponentRange(time::error::ComponentRange),
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> fmt::Display for DateTimeOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.format(&Rfc3339) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> TryFrom<time::OffsetDateTime> for DateTimeOf<Of> {
    type Error = time::error::ComponentRange;

    // Postgres keeps microseconds only, so the nanoseconds are cut off here to
    // make values survive a database round trip unchanged.
    fn try_from(dt: time::OffsetDateTime) -> Result<Self, Self::Error> {
        dt.to_offset(UtcOffset::UTC)
            .replace_microsecond(dt.microsecond())
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for time::OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.inner
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner + rhs,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> ops::Sub for DateTimeOf<Of> {
    type Output = Duration;

    /// Returns the [`Duration`] elapsed between `rhs` and `self`, saturating
    /// to zero if `rhs` is later.
    fn sub(self, rhs: Self) -> Self::Output {
        (self.inner - rhs.inner).try_into().unwrap_or(Duration::ZERO)
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self {
            inner: self.inner - rhs,
            _of: PhantomData,
        }
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::OffsetDateTime::from_sql(ty, raw)?
            .try_into()
            .map_err(Box::from)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

/// Calendar day in UTC.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Parses a [`Date`] from its `yyyy-MM-dd` representation.
    ///
    /// # Errors
    ///
    /// If the `input` is not a valid `yyyy-MM-dd` date.
    pub fn from_iso(input: &str) -> Result<Self, time::error::Parse> {
        time::Date::parse(input, format_description!("[year]-[month]-[day]"))
            .map(Self)
    }

    /// Returns the [`DateTime`] at the provided [`TimeOfDay`] of this
    /// [`Date`].
    #[must_use]
    pub fn at<Of: ?Sized>(self, time: TimeOfDay) -> DateTimeOf<Of> {
        DateTimeOf {
            inner: PrimitiveDateTime::new(self.0, time.0).assume_utc(),
            _of: PhantomData,
        }
    }

    /// Returns the [`DateTime`] of the midnight starting this [`Date`].
    #[must_use]
    pub fn start<Of: ?Sized>(self) -> DateTimeOf<Of> {
        self.at(TimeOfDay::MIDNIGHT)
    }

    /// Returns the [`Date`] following this one.
    ///
    /// [`None`] is returned on the calendar overflow.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// Returns the number of whole days from this [`Date`] to the `end` one.
    ///
    /// Negative if `end` precedes this [`Date`].
    #[must_use]
    pub fn days_until(self, end: Self) -> i64 {
        (end.0 - self.0).whole_days()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day(),
        )
    }
}

impl FromStr for Date {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso(s)
    }
}

/// Half-open range of [`Date`]s: `start` is included, `end` is not.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Days {
    /// First [`Date`] of this range.
    pub start: Date,

    /// [`Date`] right after the last one of this range.
    pub end: Date,
}

impl Days {
    /// Creates a new half-open [`Days`] range.
    #[must_use]
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Creates a new [`Days`] range including both `first` and `last` dates.
    ///
    /// [`None`] is returned on the calendar overflow.
    #[must_use]
    pub fn inclusive(first: Date, last: Date) -> Option<Self> {
        Some(Self {
            start: first,
            end: last.next()?,
        })
    }

    /// Returns the number of [`Date`]s in this range.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.start.days_until(self.end)).unwrap_or(0)
    }

    /// Indicates whether this range contains no [`Date`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for Days {
    type Item = Date;
    type IntoIter = DaysIter;

    fn into_iter(self) -> Self::IntoIter {
        DaysIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

/// Iterator over the [`Date`]s of a [`Days`] range.
#[derive(Clone, Debug)]
pub struct DaysIter {
    /// [`Date`] to be yielded next, if any.
    next: Option<Date>,

    /// Exclusive end of the iteration.
    end: Date,
}

impl Iterator for DaysIter {
    type Item = Date;

    fn next(&mut self) -> Option<Self::Item> {
        let day = self.next.filter(|d| *d < self.end)?;
        self.next = day.next();
        Some(day)
    }
}

/// Time of a day in UTC.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TimeOfDay(time::Time);

impl TimeOfDay {
    /// Midnight starting a day.
    pub const MIDNIGHT: Self = Self(time::Time::MIDNIGHT);

    /// Creates a new [`TimeOfDay`] out of the provided hour and minute.
    ///
    /// # Panics
    ///
    /// If `hour` or `minute` is out of range.
    #[must_use]
    pub const fn hm(hour: u8, minute: u8) -> Self {
        match time::Time::from_hms(hour, minute, 0) {
            Ok(t) => Self(t),
            Err(_) => panic!("invalid `TimeOfDay`"),
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Date and time in a [RFC 3339] format with a microsecond precision.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[graphql_scalar(with = Self, parse_token(String))]
    type DateTime = crate::DateTime;

    impl DateTime {
        fn to_output<S: ScalarValue>(dt: &DateTime) -> Value<S> {
            Value::scalar(dt.to_rfc3339())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `DateTime` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_rfc3339(s).map_err(|e| {
                        format!("Cannot parse `DateTime` input scalar: {e}")
                    })
                })
        }
    }

    /// Calendar date in a `yyyy-MM-dd` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = crate::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_iso(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::{Date, DateTime, Days, TimeOfDay};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats_iso_dates() {
        assert_eq!(date("2025-06-01").next(), Some(date("2025-06-02")));
        assert_eq!(date("2025-06-01").to_string(), "2025-06-01");
        assert_eq!(date("2024-02-29").to_string(), "2024-02-29");

        assert!(Date::from_iso("2025-02-30").is_err());
        assert!(Date::from_iso("2025/06/01").is_err());
        assert!(Date::from_iso("").is_err());
    }

    #[test]
    fn places_time_of_day_on_date() {
        let at: DateTime = date("2025-06-01").at(TimeOfDay::hm(16, 0));

        assert_eq!(at.to_rfc3339(), "2025-06-01T16:00:00Z");
        assert_eq!(at.date(), date("2025-06-01"));
        assert_eq!(TimeOfDay::hm(19, 0).to_string(), "19:00");
    }

    #[test]
    fn iterates_half_open_days() {
        let days = Days::new(date("2025-06-01"), date("2025-06-03"));

        assert_eq!(days.len(), 2);
        assert_eq!(
            days.into_iter().collect::<Vec<_>>(),
            [date("2025-06-01"), date("2025-06-02")],
        );
    }

    #[test]
    fn iterates_across_month_end() {
        let days =
            Days::inclusive(date("2025-01-30"), date("2025-02-01")).unwrap();

        assert_eq!(days.len(), 3);
        assert_eq!(
            days.into_iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            ["2025-01-30", "2025-01-31", "2025-02-01"],
        );
    }

    #[test]
    fn empty_when_end_precedes_start() {
        let days = Days::new(date("2025-06-03"), date("2025-06-01"));

        assert!(days.is_empty());
        assert_eq!(days.into_iter().count(), 0);
    }
}
