//! [`CancelNoShows`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{
        By, Commit, Insert, Lock, Perform, Select, Start, Transact, Transacted,
    },
    Clock,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{reservation, room, Reservation, Room},
    infra::{database, Database},
    read::reservation::list::Filter,
    Service,
};

use super::Task;

/// Configuration of the [`CancelNoShows`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between runs.
    pub interval: time::Duration,

    /// Time after the [`Reservation`] start a guest must check in within.
    pub timeout: time::Duration,
}

/// [`Task`] cancelling [`reservation::Status::Pending`] [`Reservation`]s
/// whose guests haven't checked in on time, so their [`Room`]s are released.
#[derive(Clone, Copy, Debug)]
pub struct CancelNoShows<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Clk> Task<Start<By<CancelNoShows<Self>, Config>>>
    for Service<Db, Clk>
where
    CancelNoShows<Self>:
        Task<Perform<()>, Ok = usize, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CancelNoShows<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = CancelNoShows {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(n) => log::info!("cancelled {n} no-show `Reservation`s"),
                Err(e) => log::error!("`task::CancelNoShows` failed: {e}"),
            }
        }
    }
}

impl<Db, Clk> Task<Perform<()>> for CancelNoShows<Service<Db, Clk>>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<Reservation>, Filter>>,
            Ok = Vec<Reservation>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Reservation>, reservation::Id>>,
            Ok = Option<Reservation>,
            Err = Traced<database::Error>,
        > + Database<Insert<Reservation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = self.service.now() - self.config.timeout;
        let is_no_show = |r: &Reservation| {
            r.status == reservation::Status::Pending
                && r.start.coerce() < deadline
        };

        let candidates = self
            .service
            .database()
            .execute(Select(By::<Vec<Reservation>, _>::new(Filter {
                status: Some(reservation::Status::Pending),
                starting_before: Some(deadline),
                ..Filter::default()
            })))
            .await
            .map_err(tracerr::wrap!())?;

        let mut cancelled = 0;
        for candidate in candidates {
            let tx = self
                .service
                .database()
                .execute(Transact)
                .await
                .map_err(tracerr::wrap!())?;

            // Guest may be checking in right now.
            tx.execute(Lock(By::<Room, _>::new(candidate.room_id)))
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;

            let Some(mut reservation) = tx
                .execute(Select(By::<Option<Reservation>, _>::new(
                    candidate.id,
                )))
                .await
                .map_err(tracerr::wrap!())?
                .filter(is_no_show)
            else {
                continue;
            };

            if reservation.cancel().is_ok() {
                tx.execute(Insert(reservation))
                    .await
                    .map_err(tracerr::wrap!())
                    .map(drop)?;
                cancelled += 1;
            }
            tx.execute(Commit)
                .await
                .map_err(tracerr::wrap!())
                .map(drop)?;
        }

        Ok(cancelled)
    }
}

/// Error of [`CancelNoShows`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use common::operations::Perform;

    use crate::{
        domain::{
            reservation::{self, spec::reservation},
            room,
        },
        infra::database::memory,
        Task as _,
    };

    use super::CancelNoShows;

    #[tokio::test]
    async fn cancels_only_overdue_pending_reservations() {
        // Timeout is 6 hours, so anything starting before 04:00 is overdue.
        let svc = memory::service("2025-06-01T10:00:00Z");
        let overdue = reservation(
            room::Id::new(),
            "2025-06-01T03:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Pending,
        );
        let on_time = reservation(
            room::Id::new(),
            "2025-06-01T05:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Pending,
        );
        let checked_in = reservation(
            room::Id::new(),
            "2025-05-31T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::CheckedIn,
        );
        for r in [&overdue, &on_time, &checked_in] {
            svc.database().add_reservation(r.clone());
        }

        let task = CancelNoShows {
            config: svc.config().cancel_no_shows,
            service: svc.clone(),
        };
        let cancelled = task.execute(Perform(())).await.unwrap();

        assert_eq!(cancelled, 1);
        let statuses = svc
            .database()
            .store()
            .reservations
            .iter()
            .map(|r| (r.id, r.status))
            .collect::<Vec<_>>();
        assert_eq!(
            statuses,
            [
                (overdue.id, reservation::Status::Cancelled),
                (on_time.id, reservation::Status::Pending),
                (checked_in.id, reservation::Status::CheckedIn),
            ],
        );
    }
}
