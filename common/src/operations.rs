//! Operations a [`Handler`] may be parametrized with.

use std::marker::PhantomData;

use crate::Handler;

/// Inserting a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Updating an existing value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Deleting a value.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Selecting a value.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Locking a value until the current transaction ends.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Starting a long-running value (a background task, for example).
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Performing a single iteration of a value.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Opening a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Result of a [`Transact`] operation.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Committing an opened transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Selector of `W` by `B`.
///
/// `W` only tags what is being selected, so `By<Room, room::Id>` and
/// `By<Option<Room>, room::Id>` are different operations.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the selected value.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selector.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the value this [`By`] selects by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
