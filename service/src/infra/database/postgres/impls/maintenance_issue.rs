//! [`MaintenanceIssue`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select};
use postgres_types::ToSql;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{maintenance_issue, MaintenanceIssue},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Reads a [`MaintenanceIssue`] out of the provided `maintenance_issues`
/// table [`Row`].
fn from_row(row: &Row) -> MaintenanceIssue {
    MaintenanceIssue {
        id: row.get("id"),
        room_id: row.get("room_id"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        estimated_completion_at: row.get("estimated_completion_at"),
    }
}

impl<C> Database<Select<By<Option<MaintenanceIssue>, maintenance_issue::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<MaintenanceIssue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<MaintenanceIssue>, maintenance_issue::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: maintenance_issue::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, room_id, description, \
                   created_at, estimated_completion_at \
            FROM maintenance_issues \
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

impl<C>
    Database<
        Select<
            By<Vec<MaintenanceIssue>, read::maintenance_issue::list::Filter>,
        >,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MaintenanceIssue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<MaintenanceIssue>, read::maintenance_issue::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::maintenance_issue::list::Filter {
            room_id,
            overlapping,
        } = by.into_inner();
        let start = overlapping.map(|p| p.start);
        let end = overlapping.map(|p| p.end);

        const SQL: &str = "\
            SELECT id, room_id, description, \
                   created_at, estimated_completion_at \
            FROM maintenance_issues \
            WHERE ($1::UUID IS NULL OR room_id = $1::UUID) \
              AND ($2::TIMESTAMPTZ IS NULL \
                   OR (created_at < $3::TIMESTAMPTZ \
                       AND $2::TIMESTAMPTZ < estimated_completion_at)) \
            ORDER BY created_at, id";
        let ps: [&(dyn ToSql + Sync); 3] = [&room_id, &start, &end];
        Ok(self
            .query(SQL, &ps)
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<MaintenanceIssue>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(issue): Insert<MaintenanceIssue>,
    ) -> Result<Self::Ok, Self::Err> {
        let MaintenanceIssue {
            id,
            room_id,
            description,
            created_at,
            estimated_completion_at,
        } = issue;

        const SQL: &str = "\
            INSERT INTO maintenance_issues (\
                id, room_id, description, \
                created_at, estimated_completion_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::TEXT, \
                $4::TIMESTAMPTZ, $5::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET description = EXCLUDED.description, \
                estimated_completion_at = EXCLUDED.estimated_completion_at";
        self.exec(
            SQL,
            &[
                &id,
                &room_id,
                &description,
                &created_at,
                &estimated_completion_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<MaintenanceIssue, maintenance_issue::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<MaintenanceIssue, maintenance_issue::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: maintenance_issue::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM maintenance_issues \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
