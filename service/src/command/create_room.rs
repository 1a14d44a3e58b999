//! [`Command`] for creating a new [`Room`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Clock, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::room::{Amenity, Capacity, Description, Floor, Kind, Number};
use crate::{
    domain::{room, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Room`].
#[derive(Clone, Debug)]
pub struct CreateRoom {
    /// [`Number`] of a new [`Room`].
    pub number: room::Number,

    /// [`Kind`] of a new [`Room`].
    pub kind: room::Kind,

    /// [`Floor`] of a new [`Room`].
    pub floor: room::Floor,

    /// [`Capacity`] of a new [`Room`].
    pub capacity: room::Capacity,

    /// Nightly price of a new [`Room`].
    pub price: Money,

    /// [`Description`] of a new [`Room`].
    pub description: Option<room::Description>,

    /// [`Amenity`]s of a new [`Room`].
    pub amenities: Vec<room::Amenity>,
}

impl<Db, Clk> Command<CreateRoom> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Room, room::Number>>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<Room>, &'l room::Number>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Insert<Room>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Room;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateRoom) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateRoom {
            number,
            kind,
            floor,
            capacity,
            price,
            description,
            mut amenities,
        } = cmd;

        if price.is_negative() {
            return Err(tracerr::new!(E::NegativePrice(price)));
        }
        amenities.sort();
        amenities.dedup();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent creation of `Room`s with the same `Number`.
        tx.execute(Lock(By::<Room, _>::new(number.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Room>, _>::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::RoomNumberOccupied(number)));
        }

        let room = Room {
            id: room::Id::new(),
            number,
            kind,
            floor,
            capacity,
            price,
            description,
            amenities,
            created_at: self.now().coerce(),
        };

        tx.execute(Insert(room.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(room)
    }
}

/// Error of [`CreateRoom`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Nightly price is negative.
    #[display("`Room` price cannot be negative: {_0}")]
    NegativePrice(#[error(not(source))] Money),

    /// [`Room`] with the provided [`room::Number`] already exists.
    #[display("`Room(number: {_0})` already exists")]
    RoomNumberOccupied(#[error(not(source))] room::Number),
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::{
        domain::room,
        infra::database::memory,
        query::rooms,
        read, Command as _, Query as _,
    };

    use super::{CreateRoom, ExecutionError as E};

    fn cmd(number: &str, price: &str) -> CreateRoom {
        CreateRoom {
            number: room::Number::new(number).unwrap(),
            kind: room::Kind::Suite,
            floor: 3,
            capacity: room::Capacity::new(4).unwrap(),
            price: price.parse::<Money>().unwrap(),
            description: None,
            amenities: ["wifi", "balcony", "wifi"]
                .into_iter()
                .map(|a| room::Amenity::new(a).unwrap())
                .collect(),
        }
    }

    #[tokio::test]
    async fn creates_room_with_unique_amenities() {
        let svc = memory::service("2025-06-01T08:00:00Z");

        let room = svc.execute(cmd("301", "250USD")).await.unwrap();

        assert_eq!(
            room.amenities,
            [
                room::Amenity::new("balcony").unwrap(),
                room::Amenity::new("wifi").unwrap(),
            ],
        );
        let listed = svc
            .execute(rooms::List::by(read::room::list::Filter {
                kind: Some(room::Kind::Suite),
                ..read::room::list::Filter::default()
            }))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn rejects_taken_number_and_negative_price() {
        let svc = memory::service("2025-06-01T08:00:00Z");
        _ = svc.execute(cmd("301", "250USD")).await.unwrap();

        let err = svc.execute(cmd("301", "100USD")).await.unwrap_err();
        assert!(matches!(err.as_ref(), E::RoomNumberOccupied(_)));

        let err = svc.execute(cmd("302", "-1USD")).await.unwrap_err();
        assert!(matches!(err.as_ref(), E::NegativePrice(_)));
    }
}
