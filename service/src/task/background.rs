//! [`Background`] environment running [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task::{JoinError, JoinHandle, LocalSet};

#[cfg(doc)]
use crate::Task;

/// Error a [`Background`] [`Task`] has failed with.
type TaskError = Box<dyn Error + 'static>;

/// Environment running long-living [`Task`]s on the current thread.
///
/// Resolves once all the spawned [`Task`]s complete, or as soon as any of them
/// fails.
#[derive(Debug, Default)]
pub struct Background {
    /// [`LocalSet`] the [`Task`]s are spawned onto.
    tasks: LocalSet,

    /// [`JoinHandle`]s of the spawned [`Task`]s.
    handles: Vec<JoinHandle<Result<(), TaskError>>>,
}

impl Background {
    /// Spawns the provided [`Task`] future in this [`Background`].
    pub fn spawn<F, E>(&mut self, task: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle = self
            .tasks
            .spawn_local(task.map_err(|e| TaskError::from(Box::new(e))));
        self.handles.push(handle);
    }
}

/// Flattens the outcome of a joined [`Task`].
fn flatten(
    joined: Result<Result<(), TaskError>, JoinError>,
) -> Result<(), TaskError> {
    joined.unwrap_or_else(|e| Err(TaskError::from(Box::new(e))))
}

impl IntoFuture for Background {
    type Output = Result<(), TaskError>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { tasks, handles } = self;

        let driver = tasks.map(Ok).boxed_local();
        let joins = handles.into_iter().map(|h| h.map(flatten).boxed_local());

        future::try_join_all(iter::once(driver).chain(joins))
            .map_ok(drop)
            .boxed_local()
    }
}
