//! [`Query`] collection related to multiple [`Customer`]s.

use common::operations::By;

use crate::{domain::Customer, read::customer::list};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Customer`]s, the best name matches first.
pub type List = DatabaseQuery<By<Vec<Customer>, list::Filter>>;
