//! [`Query`] collection related to multiple [`MaintenanceIssue`]s.

use common::operations::By;

use crate::{domain::MaintenanceIssue, read::maintenance_issue::list};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`MaintenanceIssue`]s ordered by their creation.
pub type List = DatabaseQuery<By<Vec<MaintenanceIssue>, list::Filter>>;
