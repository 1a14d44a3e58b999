//! [`Command`] for checking a guest in.

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Clock, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::reservation::Status;
use crate::{
    domain::{reservation, room, Reservation, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Reservation`] from [`Status::Pending`] to
/// [`Status::CheckedIn`].
///
/// Guests may check in from the first day of their stay until it ends.
#[derive(Clone, Copy, Debug)]
pub struct CheckInReservation {
    /// ID of the [`Reservation`] to check in.
    pub reservation_id: reservation::Id,
}

impl<Db, Clk> Command<CheckInReservation> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Reservation>, reservation::Id>>,
            Ok = Option<Reservation>,
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
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CheckInReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CheckInReservation { reservation_id } = cmd;

        let room_id = self
            .database()
            .execute(Select(By::<Option<Reservation>, _>::new(reservation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReservationNotExists(reservation_id))
            .map_err(tracerr::wrap!())?
            .room_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid racing with `task::CancelNoShows`.
        tx.execute(Lock(By::<Room, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut reservation = tx
            .execute(Select(By::<Option<Reservation>, _>::new(reservation_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ReservationNotExists(reservation_id))
            .map_err(tracerr::wrap!())?;

        reservation
            .check_in()
            .map_err(E::InvalidTransition)
            .map_err(tracerr::wrap!())?;

        let now = self.now();
        if now.date() < reservation.start.date() {
            return Err(tracerr::new!(E::TooEarly(reservation.start.coerce())));
        }
        if now >= reservation.end.coerce() {
            return Err(tracerr::new!(E::Expired(reservation.end.coerce())));
        }

        tx.execute(Insert(reservation.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(reservation)
    }
}

/// Error of [`CheckInReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Reservation`] has already ended.
    #[display("`Reservation` has ended at {_0}")]
    Expired(#[error(not(source))] DateTime),

    /// [`Reservation`] cannot be checked in from its current status.
    #[display("{_0}")]
    InvalidTransition(#[error(not(source))] reservation::TransitionError),

    /// [`Reservation`] with the provided ID does not exist.
    #[display("`Reservation(id: {_0})` does not exist")]
    ReservationNotExists(#[error(not(source))] reservation::Id),

    /// First day of the [`Reservation`] hasn't come yet.
    #[display("`Reservation` starts at {_0}")]
    TooEarly(#[error(not(source))] DateTime),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            reservation::{self, spec::reservation, Reservation},
            room,
        },
        infra::database::memory,
        Command as _,
    };

    use super::{CheckInReservation, ExecutionError as E};

    fn pending() -> Reservation {
        reservation(
            room::Id::new(),
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Pending,
        )
    }

    #[tokio::test]
    async fn checks_in_on_first_day() {
        let svc = memory::service("2025-06-01T08:00:00Z");
        let r = pending();
        svc.database().add_reservation(r.clone());

        let checked_in = svc
            .execute(CheckInReservation {
                reservation_id: r.id,
            })
            .await
            .unwrap();

        assert_eq!(checked_in.status, reservation::Status::CheckedIn);
        assert_eq!(
            svc.database().store().reservations[0].status,
            reservation::Status::CheckedIn,
        );
    }

    #[tokio::test]
    async fn rejects_too_early_and_expired() {
        let r = pending();

        let svc = memory::service("2025-05-31T23:59:00Z");
        svc.database().add_reservation(r.clone());
        let err = svc
            .execute(CheckInReservation {
                reservation_id: r.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::TooEarly(_)));

        let svc = memory::service("2025-06-03T11:00:00Z");
        svc.database().add_reservation(r.clone());
        let err = svc
            .execute(CheckInReservation {
                reservation_id: r.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::Expired(_)));
        assert_eq!(
            svc.database().store().reservations[0].status,
            reservation::Status::Pending,
        );
    }

    #[tokio::test]
    async fn rejects_invalid_transition() {
        let svc = memory::service("2025-06-02T08:00:00Z");
        let mut r = pending();
        r.status = reservation::Status::Cancelled;
        svc.database().add_reservation(r.clone());

        let err = svc
            .execute(CheckInReservation {
                reservation_id: r.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::InvalidTransition(_)));

        let err = svc
            .execute(CheckInReservation {
                reservation_id: reservation::Id::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::ReservationNotExists(_)));
    }
}
