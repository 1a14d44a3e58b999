//! [`Command`] for resolving a [`MaintenanceIssue`].

use common::operations::{
    By, Commit, Delete, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{maintenance_issue, room, MaintenanceIssue, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for resolving a [`MaintenanceIssue`], returning its [`Room`]
/// into service.
///
/// Resolved [`MaintenanceIssue`]s are removed completely.
#[derive(Clone, Copy, Debug)]
pub struct ResolveMaintenanceIssue {
    /// ID of the [`MaintenanceIssue`] to resolve.
    pub issue_id: maintenance_issue::Id,
}

impl<Db, Clk> Command<ResolveMaintenanceIssue> for Service<Db, Clk>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<MaintenanceIssue>, maintenance_issue::Id>>,
            Ok = Option<MaintenanceIssue>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<MaintenanceIssue>, maintenance_issue::Id>>,
            Ok = Option<MaintenanceIssue>,
            Err = Traced<database::Error>,
        > + Database<
            Delete<By<MaintenanceIssue, maintenance_issue::Id>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MaintenanceIssue;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ResolveMaintenanceIssue,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResolveMaintenanceIssue { issue_id } = cmd;

        let room_id = self
            .database()
            .execute(Select(By::<Option<MaintenanceIssue>, _>::new(issue_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::IssueNotExists(issue_id))
            .map_err(tracerr::wrap!())?
            .room_id;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Lock(By::<Room, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let issue = tx
            .execute(Select(By::<Option<MaintenanceIssue>, _>::new(issue_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::IssueNotExists(issue_id))
            .map_err(tracerr::wrap!())?;

        tx.execute(Delete(By::<MaintenanceIssue, _>::new(issue_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(issue)
    }
}

/// Error of [`ResolveMaintenanceIssue`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`MaintenanceIssue`] with the provided ID does not exist.
    #[display("`MaintenanceIssue(id: {_0})` does not exist")]
    IssueNotExists(#[error(not(source))] maintenance_issue::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{maintenance_issue, maintenance_issue::spec::issue},
        infra::database::memory,
        occupancy,
        query::RoomStatus,
        Command as _, Query as _,
    };

    use super::{ExecutionError as E, ResolveMaintenanceIssue};

    #[tokio::test]
    async fn returns_room_into_service() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        let broken = issue(
            room.id,
            "2025-06-02T08:00:00Z",
            "2025-06-03T12:00:00Z",
        );
        svc.database().add_issue(broken.clone());

        let out = svc.execute(RoomStatus { room_id: room.id }).await.unwrap();
        assert_eq!(out.status, occupancy::Status::Maintenance);

        let resolved = svc
            .execute(ResolveMaintenanceIssue { issue_id: broken.id })
            .await
            .unwrap();
        assert_eq!(resolved.id, broken.id);
        assert!(svc.database().store().issues.is_empty());

        let out = svc.execute(RoomStatus { room_id: room.id }).await.unwrap();
        assert_eq!(out.status, occupancy::Status::Available);

        let err = svc
            .execute(ResolveMaintenanceIssue { issue_id: broken.id })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::IssueNotExists(_)));
    }

    #[tokio::test]
    async fn fails_for_unknown_issue() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");
        svc.database().add_issue(issue(
            room.id,
            "2025-06-02T08:00:00Z",
            "2025-06-03T12:00:00Z",
        ));

        let err = svc
            .execute(ResolveMaintenanceIssue {
                issue_id: maintenance_issue::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::IssueNotExists(_)));
        assert_eq!(svc.database().store().issues.len(), 1);
    }
}
