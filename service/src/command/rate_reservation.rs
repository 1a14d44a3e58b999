//! [`Command`] for rating a stay.

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

/// [`Command`] for rating a [`Status::Completed`] [`Reservation`].
#[derive(Clone, Copy, Debug)]
pub struct RateReservation {
    /// ID of the [`Reservation`] to rate.
    pub reservation_id: reservation::Id,

    /// [`reservation::Rating`] the guest gave to the stay.
    pub rating: reservation::Rating,
}

impl<Db, Clk> Command<RateReservation> for Service<Db, Clk>
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
        cmd: RateReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RateReservation { reservation_id, rating } = cmd;

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

        // Avoid concurrent updates of the same `Reservation`.
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
            .rate(rating)
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

/// Error of [`RateReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Reservation`] cannot rate from its current status.
    #[display("{_0}")]
    InvalidTransition(#[error(not(source))] reservation::TransitionError),

    /// [`Reservation`] with the provided ID does not exist.
    #[display("`Reservation(id: {_0})` does not exist")]
    ReservationNotExists(#[error(not(source))] reservation::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::CheckOutReservation,
        domain::{
            reservation::{self, spec::reservation, Rating},
            room,
        },
        infra::database::memory,
        Command as _,
    };

    use super::{ExecutionError as E, RateReservation};

    #[tokio::test]
    async fn rates_after_check_out() {
        let svc = memory::service("2025-06-03T10:00:00Z");
        let stay = reservation(
            room::Id::new(),
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::CheckedIn,
        );
        svc.database().add_reservation(stay.clone());

        let err = svc
            .execute(RateReservation {
                reservation_id: stay.id,
                rating: Rating::new(5).unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::InvalidTransition(_)));

        let completed = svc
            .execute(CheckOutReservation {
                reservation_id: stay.id,
            })
            .await
            .unwrap();
        assert_eq!(completed.status, reservation::Status::Completed);

        let rated = svc
            .execute(RateReservation {
                reservation_id: stay.id,
                rating: Rating::new(4).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(rated.rating, Rating::new(4));
        assert_eq!(
            svc.database().store().reservations[0].rating,
            Rating::new(4),
        );
    }
}
