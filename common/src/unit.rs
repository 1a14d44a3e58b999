//! Marker types tagging [`DateTimeOf`] values.
//!
//! [`DateTimeOf`]: crate::DateTimeOf

/// Entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Beginning of a time window.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// End of a time window.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Estimated completion of some work.
#[derive(Clone, Copy, Debug)]
pub struct EstimatedCompletion;

/// Moment some computed state is reported for.
#[derive(Clone, Copy, Debug)]
pub struct AsOf;
