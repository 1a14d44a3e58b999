//! [`RoomStatus`] [`Query`].

use common::{
    operations::{By, Select},
    unit, Clock, DateTimeOf,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{room, MaintenanceIssue, Room},
    infra::{database, Database},
    occupancy,
    read::{self, Period, Stay},
    Query, Service,
};

/// [`Query`] resolving the current [`occupancy::Status`] of a single
/// [`Room`].
#[derive(Clone, Copy, Debug)]
pub struct RoomStatus {
    /// ID of the [`Room`] to resolve the status of.
    pub room_id: room::Id,
}

/// Output of the [`RoomStatus`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Room`] itself.
    pub room: Room,

    /// Current [`occupancy::Status`] of the [`Room`].
    pub status: occupancy::Status,

    /// [`Stay`] occupying the [`Room`], if it's
    /// [`occupancy::Status::Occupied`].
    pub stay: Option<Stay>,

    /// [`DateTimeOf`] the [`occupancy::Status`] is reported as of.
    pub as_of: DateTimeOf<unit::AsOf>,
}

impl<Db, Clk> Query<RoomStatus> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Stay>, read::reservation::stay::Filter>>,
            Ok = Vec<Stay>,
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
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RoomStatus { room_id }: RoomStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let now = self.now();

        let room = self
            .database()
            .execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;

        let stays = self
            .database()
            .execute(Select(By::<Vec<Stay>, _>::new(
                read::reservation::stay::Filter {
                    room_id: Some(room.id),
                    overlapping: Period::at(now),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let issues = self
            .database()
            .execute(Select(By::<Vec<MaintenanceIssue>, _>::new(
                read::maintenance_issue::list::Filter {
                    room_id: Some(room.id),
                    overlapping: Some(Period::at(now)),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let resolution = occupancy::resolve(&stays, &issues, now);
        Ok(Output {
            status: resolution.status(),
            stay: resolution.stay().cloned(),
            room,
            as_of: occupancy::status_as_of(now),
        })
    }
}

/// Error of [`RoomStatus`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            maintenance_issue::spec::issue,
            reservation::{self, spec::reservation},
            room,
        },
        infra::database::memory,
        occupancy, Query as _,
    };

    use super::{ExecutionError as E, RoomStatus};

    #[tokio::test]
    async fn reports_occupying_guest() {
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

        let out = svc.execute(RoomStatus { room_id: room.id }).await.unwrap();

        assert_eq!(out.status, occupancy::Status::Occupied);
        let occupying = out.stay.unwrap();
        assert_eq!(occupying.reservation.id, stay.id);
        assert_eq!(occupying.guest_name.to_string(), "Ann Lee");
        assert_eq!(out.as_of.to_string(), "2025-06-02T19:00:00Z");
    }

    #[tokio::test]
    async fn prefers_maintenance_over_stay() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        let guest = svc.database().add_customer("Ann", "Lee");
        let mut stay = reservation(
            room.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Pending,
        );
        stay.customer_id = guest.id;
        svc.database().add_reservation(stay);
        svc.database().add_issue(issue(
            room.id,
            "2025-06-02T08:00:00Z",
            "2025-06-02T12:00:00Z",
        ));

        let out = svc.execute(RoomStatus { room_id: room.id }).await.unwrap();

        assert_eq!(out.status, occupancy::Status::Maintenance);
        assert!(out.stay.is_none());
    }

    #[tokio::test]
    async fn ignores_finished_and_cancelled_reservations() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        svc.database().add_reservation(reservation(
            room.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::Cancelled,
        ));
        svc.database().add_reservation(reservation(
            room.id,
            "2025-05-30T14:00:00Z",
            "2025-06-02T09:00:00Z",
            reservation::Status::Completed,
        ));

        let out = svc.execute(RoomStatus { room_id: room.id }).await.unwrap();

        assert_eq!(out.status, occupancy::Status::Available);
    }

    #[tokio::test]
    async fn fails_for_unknown_room() {
        let svc = memory::service("2025-06-02T09:00:00Z");

        let err = svc
            .execute(RoomStatus {
                room_id: room::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::RoomNotExists(_)));
    }
}
