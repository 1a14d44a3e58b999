//! [`Room`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Columns to select a [`Room`] by, aliasing the `rooms` table as `r`.
const COLUMNS: &str = "\
    r.id, r.number, r.kind, r.floor, r.capacity, \
    r.price_amount, r.price_currency, r.description, r.created_at, \
    ARRAY(SELECT a.amenity \
          FROM room_amenities AS a \
          WHERE a.room_id = r.id \
          ORDER BY a.amenity) AS amenities";

/// Reads a [`Room`] out of the provided [`Row`] selected with [`COLUMNS`].
fn from_row(row: &Row) -> Room {
    let capacity = u8::try_from(row.get::<_, i16>("capacity"))
        .ok()
        .and_then(room::Capacity::new)
        .expect("`capacity` out of range");
    Room {
        id: row.get("id"),
        number: row.get("number"),
        kind: row.get("kind"),
        floor: row.get("floor"),
        capacity,
        price: Money {
            amount: row.get("price_amount"),
            currency: row.get("price_currency"),
        },
        description: row.get("description"),
        amenities: row.get("amenities"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<room::Id, Room>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[room::Id]>,
{
    type Ok = HashMap<room::Id, Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<room::Id, Room>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let ids: &[room::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rooms AS r \
             WHERE r.id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .map(|room| (room.id, room))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Room>, room::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<room::Id, Room>, [room::Id; 1]>>,
        Ok = HashMap<room::Id, Room>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Room>, &room::Number>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, &room::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number: &room::Number = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rooms AS r \
             WHERE r.number = $1::VARCHAR \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[number])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Room>, read::room::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Room>, read::room::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::room::list::Filter {
            kind,
            floor,
            min_capacity,
        } = by.into_inner();
        let min_capacity = min_capacity.map(|c| i16::from(c.get()));

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let mut conditions = vec![];
        if let Some(kind) = &kind {
            ps.push(kind);
            conditions.push(format!("r.kind = ${}::INT2", ps.len()));
        }
        if let Some(floor) = &floor {
            ps.push(floor);
            conditions.push(format!("r.floor = ${}::INT2", ps.len()));
        }
        if let Some(capacity) = &min_capacity {
            ps.push(capacity);
            conditions.push(format!("r.capacity >= ${}::INT2", ps.len()));
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM rooms AS r \
             WHERE true {filtering} \
             ORDER BY r.number",
            filtering = conditions
                .iter()
                .format_with("", |c, f| f(&format_args!(" AND {c}"))),
        );
        Ok(self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::room::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::room::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::room::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM rooms";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}

impl<C> Database<Insert<Room>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        let Room {
            id,
            number,
            kind,
            floor,
            capacity,
            price,
            description,
            amenities,
            created_at,
        } = room;

        let capacity = i16::from(capacity.get());

        const SQL: &str = "\
            INSERT INTO rooms (\
                id, number, kind, floor, capacity, \
                price_amount, price_currency, \
                description, created_at \
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::INT2, $4::INT2, $5::INT2, \
                $6::NUMERIC, $7::INT2, \
                $8::TEXT, $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                kind = EXCLUDED.kind, \
                floor = EXCLUDED.floor, \
                capacity = EXCLUDED.capacity, \
                price_amount = EXCLUDED.price_amount, \
                price_currency = EXCLUDED.price_currency, \
                description = EXCLUDED.description";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &kind,
                &floor,
                &capacity,
                &price.amount,
                &price.currency,
                &description,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        const SQL_CLEAR_AMENITIES: &str = "\
            DELETE FROM room_amenities \
            WHERE room_id = $1::UUID";
        self.exec(SQL_CLEAR_AMENITIES, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        const SQL_AMENITIES: &str = "\
            INSERT INTO room_amenities (room_id, amenity) \
            SELECT $1::UUID, unnest($2::VARCHAR[])";
        self.exec(SQL_AMENITIES, &[&id, &amenities])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Room, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: room::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO rooms_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE \
            SET id = EXCLUDED.id";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Lock<By<Room, room::Number>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Room, room::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number: room::Number = by.into_inner();

        const SQL: &str = "\
            INSERT INTO room_numbers_lock \
            VALUES ($1::VARCHAR) \
            ON CONFLICT (number) DO UPDATE \
            SET number = EXCLUDED.number";
        self.exec(SQL, &[&number])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
