//! [`Command`] for checking a guest out.

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted,
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

/// [`Command`] for moving a [`Reservation`] from [`Status::CheckedIn`] to
/// [`Status::Completed`].
#[derive(Clone, Copy, Debug)]
pub struct CheckOutReservation {
    /// ID of the [`Reservation`] to check out.
    pub reservation_id: reservation::Id,
}

impl<Db, Clk> Command<CheckOutReservation> for Service<Db, Clk>
where
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
        cmd: CheckOutReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CheckOutReservation { reservation_id } = cmd;

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

        // Keep the `Room` status consistent for concurrent bookings.
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
            .check_out()
            .map_err(E::InvalidTransition)
            .map_err(tracerr::wrap!())?;

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

/// Error of [`CheckOutReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Reservation`] cannot check out from its current status.
    #[display("{_0}")]
    InvalidTransition(#[error(not(source))] reservation::TransitionError),

    /// [`Reservation`] with the provided ID does not exist.
    #[display("`Reservation(id: {_0})` does not exist")]
    ReservationNotExists(#[error(not(source))] reservation::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            reservation::{self, spec::reservation},
            room,
        },
        infra::database::memory,
        occupancy,
        query::RoomStatus,
        Command as _, Query as _,
    };

    use super::{CheckOutReservation, ExecutionError as E};

    #[tokio::test]
    async fn frees_room_on_check_out() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        let guest = svc.database().add_customer("Ann", "Lee");
        let mut stay = reservation(
            room.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::CheckedIn,
        );
        stay.customer_id = guest.id;
        svc.database().add_reservation(stay.clone());

        let before =
            svc.execute(RoomStatus { room_id: room.id }).await.unwrap();
        assert_eq!(before.status, occupancy::Status::Occupied);

        let completed = svc
            .execute(CheckOutReservation {
                reservation_id: stay.id,
            })
            .await
            .unwrap();
        assert_eq!(completed.status, reservation::Status::Completed);
        assert_eq!(
            svc.database().store().reservations[0].status,
            reservation::Status::Completed,
        );

        let after =
            svc.execute(RoomStatus { room_id: room.id }).await.unwrap();
        assert_eq!(after.status, occupancy::Status::Available);
        assert!(after.stay.is_none());
    }

    #[tokio::test]
    async fn checks_out_only_checked_in() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        for status in [
            reservation::Status::Pending,
            reservation::Status::Completed,
            reservation::Status::Cancelled,
        ] {
            let r = reservation(
                room::Id::new(),
                "2025-06-01T14:00:00Z",
                "2025-06-03T11:00:00Z",
                status,
            );
            svc.database().add_reservation(r.clone());

            let err = svc
                .execute(CheckOutReservation {
                    reservation_id: r.id,
                })
                .await
                .unwrap_err();

            assert!(matches!(err.as_ref(), E::InvalidTransition(_)));
            let stored = svc
                .database()
                .store()
                .reservations
                .iter()
                .find(|s| s.id == r.id)
                .map(|s| s.status);
            assert_eq!(stored, Some(status));
        }
    }

    #[tokio::test]
    async fn fails_for_unknown_reservation() {
        let svc = memory::service("2025-06-02T09:00:00Z");

        let err = svc
            .execute(CheckOutReservation {
                reservation_id: reservation::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::ReservationNotExists(_)));
    }
}
