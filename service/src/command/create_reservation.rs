//! [`Command`] for creating a new [`Reservation`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Clock, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        customer, reservation, room, Customer, MaintenanceIssue, Reservation,
        Room,
    },
    infra::{database, Database},
    read::{self, Period},
    Service,
};

use super::Command;

/// [`Command`] for reserving a [`Room`] for a [`Customer`].
#[derive(Clone, Copy, Debug)]
pub struct CreateReservation {
    /// ID of the [`Room`] to reserve.
    pub room_id: room::Id,

    /// ID of the [`Customer`] making the [`Reservation`].
    pub customer_id: customer::Id,

    /// [`DateTime`] when the stay starts.
    pub start: DateTime,

    /// [`DateTime`] when the stay ends.
    pub end: DateTime,

    /// Number of guests staying.
    pub guests: reservation::Guests,
}

impl<Db, Clk> Command<CreateReservation> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Reservation>, read::reservation::list::Filter>>,
            Ok = Vec<Reservation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    Vec<MaintenanceIssue>,
                    read::maintenance_issue::list::Filter,
                >,
            >,
            Ok = Vec<MaintenanceIssue>,
            Err = Traced<database::Error>,
        > + Database<Insert<Reservation>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Reservation;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateReservation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateReservation {
            room_id,
            customer_id,
            start,
            end,
            guests,
        } = cmd;

        if end <= start {
            return Err(tracerr::new!(E::InvalidPeriod { start, end }));
        }
        let period = Period { start, end };

        self.database()
            .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CustomerNotExists(customer_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid double booking of the same `Room`.
        tx.execute(Lock(By::<Room, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let room = tx
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

        if guests.get() > room.capacity.get() {
            return Err(tracerr::new!(E::CapacityExceeded {
                guests: guests.get(),
                capacity: room.capacity.get(),
            }));
        }

        let occupied = tx
            .execute(Select(By::<Vec<Reservation>, _>::new(
                read::reservation::list::Filter {
                    room_id: Some(room_id),
                    overlapping: Some(period),
                    ..read::reservation::list::Filter::default()
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .iter()
            .any(|r| r.is_occupying() && r.overlaps(start, end));
        if occupied {
            return Err(tracerr::new!(E::RoomOccupied(room_id)));
        }

        let under_maintenance = tx
            .execute(Select(By::<Vec<MaintenanceIssue>, _>::new(
                read::maintenance_issue::list::Filter {
                    room_id: Some(room_id),
                    overlapping: Some(period),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .iter()
            .any(|i| i.overlaps(start, end));
        if under_maintenance {
            return Err(tracerr::new!(E::RoomUnderMaintenance(room_id)));
        }

        let nights = reservation::nights(start, end);
        let price = room
            .price
            .times(nights)
            .ok_or(E::PriceOverflow(nights))
            .map_err(tracerr::wrap!())?;

        let reservation = Reservation {
            id: reservation::Id::new(),
            room_id,
            customer_id,
            start: start.coerce(),
            end: end.coerce(),
            guests,
            price,
            rating: None,
            status: reservation::Status::Pending,
            created_at: self.now().coerce(),
        };

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

/// Error of [`CreateReservation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// More guests than the [`Room`] fits.
    #[display("{guests} guests exceed `Room` capacity of {capacity}")]
    CapacityExceeded {
        /// Requested number of guests.
        guests: u8,

        /// Capacity of the [`Room`].
        capacity: u8,
    },

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Stay ends before or when it starts.
    #[display("Stay `{start}..{end}` ends before it starts")]
    InvalidPeriod {
        /// Requested start of the stay.
        start: DateTime,

        /// Requested end of the stay.
        end: DateTime,
    },

    /// Total price doesn't fit into the [`Money`] amount.
    ///
    /// [`Money`]: common::Money
    #[display("Price of {_0} nights overflows")]
    PriceOverflow(#[error(not(source))] u32),

    /// [`Room`] is occupied by another [`Reservation`] during the stay.
    #[display("`Room(id: {_0})` is occupied during the requested stay")]
    RoomOccupied(#[error(not(source))] room::Id),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// [`Room`] is under maintenance during the stay.
    #[display(
        "`Room(id: {_0})` is under maintenance during the requested stay"
    )]
    RoomUnderMaintenance(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money};

    use crate::{
        domain::{
            maintenance_issue::spec::issue,
            reservation::{self, spec::reservation, Guests},
            room,
        },
        infra::database::memory,
        query::reservations,
        read, Command as _, Query as _,
    };

    use super::{CreateReservation, ExecutionError as E};

    fn at(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn cmd(room_id: room::Id, start: &str, end: &str) -> CreateReservation {
        CreateReservation {
            room_id,
            customer_id: Default::default(),
            start: at(start),
            end: at(end),
            guests: Guests::new(2).unwrap(),
        }
    }

    #[tokio::test]
    async fn creates_pending_reservation_priced_per_night() {
        let svc = memory::service("2025-05-01T10:00:00Z");
        let room = svc.database().add_room("101", 2, "89.90EUR");
        let guest = svc.database().add_customer("Ann", "Lee");

        let created = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(room.id, "2025-06-01T14:00:00Z", "2025-06-04T11:00:00Z")
            })
            .await
            .unwrap();

        assert_eq!(created.status, reservation::Status::Pending);
        assert_eq!(created.price, "269.70EUR".parse::<Money>().unwrap());
        assert_eq!(
            created.created_at.coerce::<()>(),
            at("2025-05-01T10:00:00Z"),
        );

        let stored = svc
            .execute(reservations::List::by(
                read::reservation::list::Filter::default(),
            ))
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn rejects_overlapping_stay() {
        let svc = memory::service("2025-05-01T10:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        let guest = svc.database().add_customer("Ann", "Lee");
        svc.database().add_reservation(reservation(
            room.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::CheckedIn,
        ));

        let err = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(room.id, "2025-06-02T14:00:00Z", "2025-06-05T11:00:00Z")
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::RoomOccupied(id) if *id == room.id));
    }

    #[tokio::test]
    async fn allows_back_to_back_and_cancelled_overlaps() {
        let svc = memory::service("2025-05-01T10:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        let guest = svc.database().add_customer("Ann", "Lee");
        svc.database().add_reservation(reservation(
            room.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Pending,
        ));
        svc.database().add_reservation(reservation(
            room.id,
            "2025-06-03T11:00:00Z",
            "2025-06-06T11:00:00Z",
            reservation::Status::Cancelled,
        ));

        let created = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(room.id, "2025-06-03T11:00:00Z", "2025-06-05T11:00:00Z")
            })
            .await;

        assert!(created.is_ok());
    }

    #[tokio::test]
    async fn rejects_room_under_maintenance() {
        let svc = memory::service("2025-05-01T10:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        let guest = svc.database().add_customer("Ann", "Lee");
        svc.database().add_issue(issue(
            room.id,
            "2025-05-30T09:00:00Z",
            "2025-06-02T09:00:00Z",
        ));

        let err = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(room.id, "2025-06-01T14:00:00Z", "2025-06-03T11:00:00Z")
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::RoomUnderMaintenance(_)));
    }

    #[tokio::test]
    async fn validates_input() {
        let svc = memory::service("2025-05-01T10:00:00Z");
        let room = svc.database().add_room("101", 1, "100USD");
        let guest = svc.database().add_customer("Ann", "Lee");

        let err = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(room.id, "2025-06-03T11:00:00Z", "2025-06-03T11:00:00Z")
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::InvalidPeriod { .. }));

        let err = svc
            .execute(cmd(room.id, "2025-06-01T14:00:00Z", "2025-06-03T11:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::CustomerNotExists(_)));

        let err = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(
                    room::Id::new(),
                    "2025-06-01T14:00:00Z",
                    "2025-06-03T11:00:00Z",
                )
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::RoomNotExists(_)));

        let err = svc
            .execute(CreateReservation {
                customer_id: guest.id,
                ..cmd(room.id, "2025-06-01T14:00:00Z", "2025-06-03T11:00:00Z")
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            E::CapacityExceeded {
                guests: 2,
                capacity: 1,
            },
        ));

        assert!(svc.database().store().reservations.is_empty());
    }
}
