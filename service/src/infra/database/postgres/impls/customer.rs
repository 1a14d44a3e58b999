//! [`Customer`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{customer, Customer},
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Reads a [`Customer`] out of the provided `customers` table [`Row`].
fn from_row(row: &Row) -> Customer {
    Customer {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Customer>, customer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: customer::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, first_name, last_name, email, phone, created_at \
            FROM customers \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Customer>, read::customer::list::Filter>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Customer>, read::customer::list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::customer::list::Filter { name } = by.into_inner();
        let pattern = name
            .as_ref()
            .map(|n| FuzzPattern::new(n.as_ref()))
            .filter(|p| !p.is_empty());

        const SQL: &str = "\
            SELECT id, first_name, last_name, email, phone, created_at \
            FROM customers \
            WHERE $1::VARCHAR[] IS NULL \
               OR (first_name || ' ' || last_name) ILIKE ALL($1::VARCHAR[]) \
            ORDER BY last_name, first_name, id";
        Ok(self
            .query(SQL, &[&pattern])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Customer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Customer {
            id,
            first_name,
            last_name,
            email,
            phone,
            created_at,
        } = customer;

        const SQL: &str = "\
            INSERT INTO customers (\
                id, first_name, last_name, email, phone, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, \
                $4::VARCHAR, $5::VARCHAR, \
                $6::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET first_name = EXCLUDED.first_name, \
                last_name = EXCLUDED.last_name, \
                email = EXCLUDED.email, \
                phone = EXCLUDED.phone";
        self.exec(
            SQL,
            &[&id, &first_name, &last_name, &email, &phone, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
