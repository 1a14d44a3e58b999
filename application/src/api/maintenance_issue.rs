//! [`MaintenanceIssue`]-related definitions.

use common::DateTime;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, api::scalar, Context};

/// A problem putting a `Room` out of service until it's resolved.
#[derive(Clone, Debug, From)]
pub struct MaintenanceIssue(domain::MaintenanceIssue);

/// A problem putting a `Room` out of service until it's resolved.
#[graphql_object(context = Context)]
impl MaintenanceIssue {
    /// Unique identifier of this `MaintenanceIssue`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceIssue.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// `Room` this `MaintenanceIssue` is reported for.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceIssue.room",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn room(&self) -> api::Room {
        #[expect(
            unsafe_code,
            reason = "`MaintenanceIssue` references only existing `Room`s"
        )]
        let room = unsafe { api::Room::new_unchecked(self.0.room_id) };
        room
    }

    /// Description of the problem.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceIssue.description",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn description(&self) -> Description {
        self.0.description.clone().into()
    }

    /// `DateTime` when this `MaintenanceIssue` was reported.
    ///
    /// The `Room` is out of service since this moment.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceIssue.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }

    /// `DateTime` when the problem is expected to be fixed.
    ///
    /// The `Room` is back in service since this moment.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "MaintenanceIssue.estimatedCompletionAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    #[must_use]
    pub fn estimated_completion_at(&self) -> DateTime {
        self.0.estimated_completion_at.coerce()
    }
}

/// Unique identifier of a `MaintenanceIssue`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::maintenance_issue::Id)]
#[into(domain::maintenance_issue::Id)]
#[graphql(name = "MaintenanceIssueId", transparent)]
pub struct Id(Uuid);

/// Description of a `MaintenanceIssue`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "MaintenanceIssueDescription",
    with = scalar::Via::<domain::maintenance_issue::Description>,
)]
pub struct Description(domain::maintenance_issue::Description);
