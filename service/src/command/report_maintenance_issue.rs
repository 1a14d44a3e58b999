//! [`Command`] for reporting a new [`MaintenanceIssue`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    Clock, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{maintenance_issue, room, MaintenanceIssue, Room},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for taking a [`Room`] out of service until the estimated
/// completion of its repair.
#[derive(Clone, Debug)]
pub struct ReportMaintenanceIssue {
    /// ID of the faulty [`Room`].
    pub room_id: room::Id,

    /// Description of the fault.
    pub description: maintenance_issue::Description,

    /// [`DateTime`] when the fault is expected to be fixed.
    pub estimated_completion_at: DateTime,
}

impl<Db, Clk> Command<ReportMaintenanceIssue> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Room>, room::Id>>,
            Ok = Option<Room>,
            Err = Traced<database::Error>,
        > + Database<Insert<MaintenanceIssue>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = MaintenanceIssue;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReportMaintenanceIssue,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReportMaintenanceIssue {
            room_id,
            description,
            estimated_completion_at,
        } = cmd;

        let now = self.now();
        if estimated_completion_at <= now {
            return Err(tracerr::new!(E::InvalidEstimate(
                estimated_completion_at
            )));
        }

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid booking the `Room` while it's being taken out of service.
        tx.execute(Lock(By::<Room, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Select(By::<Option<Room>, _>::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let issue = MaintenanceIssue {
            id: maintenance_issue::Id::new(),
            room_id,
            description,
            created_at: now.coerce(),
            estimated_completion_at: estimated_completion_at.coerce(),
        };

        tx.execute(Insert(issue.clone()))
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

/// Error of [`ReportMaintenanceIssue`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Estimated completion is not in the future.
    #[display("Estimated completion at {_0} is not in the future")]
    InvalidEstimate(#[error(not(source))] DateTime),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::{
        command::resolve_maintenance_issue::{
            self, ResolveMaintenanceIssue,
        },
        domain::{maintenance_issue, room},
        infra::database::memory,
        Command as _,
    };

    use super::{ExecutionError as E, ReportMaintenanceIssue};

    fn cmd(room_id: room::Id, estimate: &str) -> ReportMaintenanceIssue {
        ReportMaintenanceIssue {
            room_id,
            description: maintenance_issue::Description::new("No hot water")
                .unwrap(),
            estimated_completion_at: DateTime::from_rfc3339(estimate).unwrap(),
        }
    }

    #[tokio::test]
    async fn reports_and_resolves_issue() {
        let svc = memory::service("2025-06-01T08:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");

        let issue = svc
            .execute(cmd(room.id, "2025-06-01T18:00:00Z"))
            .await
            .unwrap();
        assert_eq!(
            issue.created_at.coerce::<()>(),
            DateTime::from_rfc3339("2025-06-01T08:00:00Z").unwrap(),
        );
        assert_eq!(svc.database().store().issues.len(), 1);

        let resolved = svc
            .execute(ResolveMaintenanceIssue { issue_id: issue.id })
            .await
            .unwrap();
        assert_eq!(resolved.id, issue.id);
        assert!(svc.database().store().issues.is_empty());

        let err = svc
            .execute(ResolveMaintenanceIssue { issue_id: issue.id })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            resolve_maintenance_issue::ExecutionError::IssueNotExists(_),
        ));
    }

    #[tokio::test]
    async fn rejects_past_estimate_and_unknown_room() {
        let svc = memory::service("2025-06-01T08:00:00Z");
        let room = svc.database().add_room("101", 2, "100USD");

        let err = svc
            .execute(cmd(room.id, "2025-06-01T08:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::InvalidEstimate(_)));

        let err = svc
            .execute(cmd(room::Id::new(), "2025-06-02T08:00:00Z"))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::RoomNotExists(_)));
    }
}
