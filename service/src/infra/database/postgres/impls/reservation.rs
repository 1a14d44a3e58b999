//! [`Reservation`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Select},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{customer, reservation, Reservation},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{self, Stay},
};

/// Columns to select a [`Reservation`] by, aliasing the `reservations`
/// table as `r`.
const COLUMNS: &str = "\
    r.id, r.room_id, r.customer_id, r.start_at, r.end_at, r.guests, \
    r.price_amount, r.price_currency, r.rating, r.status, r.created_at";

/// Reads a [`Reservation`] out of the provided [`Row`] selected with
/// [`COLUMNS`].
fn from_row(row: &Row) -> Reservation {
    let guests = u8::try_from(row.get::<_, i16>("guests"))
        .ok()
        .and_then(reservation::Guests::new)
        .expect("`guests` out of range");
    let rating = row.get::<_, Option<i16>>("rating").map(|r| {
        u8::try_from(r)
            .ok()
            .and_then(reservation::Rating::new)
            .expect("`rating` out of range")
    });
    Reservation {
        id: row.get("id"),
        room_id: row.get("room_id"),
        customer_id: row.get("customer_id"),
        start: row.get("start_at"),
        end: row.get("end_at"),
        guests,
        price: Money {
            amount: row.get("price_amount"),
            currency: row.get("price_currency"),
        },
        rating,
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Reservation>, reservation::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Reservation>, reservation::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: reservation::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM reservations AS r \
             WHERE r.id = $1::UUID \
             LIMIT 1",
        );
        Ok(self
            .query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Reservation>, read::reservation::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Reservation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Reservation>, read::reservation::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::reservation::list::Filter {
            room_id,
            customer_id,
            status,
            overlapping,
            ending_within,
            starting_before,
        } = by.into_inner();

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let mut conditions = vec![];
        if let Some(id) = &room_id {
            ps.push(id);
            conditions.push(format!("r.room_id = ${}::UUID", ps.len()));
        }
        if let Some(id) = &customer_id {
            ps.push(id);
            conditions.push(format!("r.customer_id = ${}::UUID", ps.len()));
        }
        if let Some(status) = &status {
            ps.push(status);
            conditions.push(format!("r.status = ${}::INT2", ps.len()));
        }
        if let Some(period) = &overlapping {
            ps.push(&period.start);
            ps.push(&period.end);
            conditions.push(format!(
                "r.start_at < ${end}::TIMESTAMPTZ \
                 AND ${start}::TIMESTAMPTZ < r.end_at",
                start = ps.len() - 1,
                end = ps.len(),
            ));
        }
        if let Some(period) = &ending_within {
            ps.push(&period.start);
            ps.push(&period.end);
            conditions.push(format!(
                "${start}::TIMESTAMPTZ <= r.end_at \
                 AND r.end_at < ${end}::TIMESTAMPTZ",
                start = ps.len() - 1,
                end = ps.len(),
            ));
        }
        if let Some(at) = &starting_before {
            ps.push(at);
            conditions.push(format!("r.start_at < ${}::TIMESTAMPTZ", ps.len()));
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM reservations AS r \
             WHERE true {filtering} \
             ORDER BY r.start_at, r.id",
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

impl<C> Database<Select<By<Vec<Stay>, read::reservation::stay::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Stay>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Stay>, read::reservation::stay::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::reservation::stay::Filter {
            room_id,
            overlapping,
        } = by.into_inner();
        let occupying = reservation::Status::ALL
            .iter()
            .copied()
            .filter(|s| s.is_occupying())
            .collect::<Vec<_>>();

        let sql = format!(
            "SELECT {COLUMNS}, c.first_name, c.last_name \
             FROM reservations AS r \
             INNER JOIN customers AS c ON c.id = r.customer_id \
             WHERE r.status = ANY($1::INT2[]) \
               AND r.start_at < $3::TIMESTAMPTZ \
               AND $2::TIMESTAMPTZ < r.end_at \
               AND ($4::UUID IS NULL OR r.room_id = $4::UUID) \
             ORDER BY r.room_id, r.start_at",
        );
        Ok(self
            .query(
                &sql,
                &[&occupying, &overlapping.start, &overlapping.end, &room_id],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| Stay {
                reservation: from_row(row),
                guest_name: customer::FullName::new(
                    &row.get("first_name"),
                    &row.get("last_name"),
                ),
            })
            .collect())
    }
}

impl<C> Database<Insert<Reservation>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(reservation): Insert<Reservation>,
    ) -> Result<Self::Ok, Self::Err> {
        let Reservation {
            id,
            room_id,
            customer_id,
            start,
            end,
            guests,
            price,
            rating,
            status,
            created_at,
        } = reservation;

        let guests = i16::from(guests.get());
        let rating = rating.map(|r| i16::from(r.get()));

        const SQL: &str = "\
            INSERT INTO reservations (\
                id, room_id, customer_id, start_at, end_at, guests, \
                price_amount, price_currency, rating, status, created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::TIMESTAMPTZ, $5::TIMESTAMPTZ, $6::INT2, \
                $7::NUMERIC, $8::INT2, $9::INT2, $10::INT2, \
                $11::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET start_at = EXCLUDED.start_at, \
                end_at = EXCLUDED.end_at, \
                guests = EXCLUDED.guests, \
                price_amount = EXCLUDED.price_amount, \
                price_currency = EXCLUDED.price_currency, \
                rating = EXCLUDED.rating, \
                status = EXCLUDED.status";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &customer_id,
                &start,
                &end,
                &guests,
                &price.amount,
                &price.currency,
                &rating,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
