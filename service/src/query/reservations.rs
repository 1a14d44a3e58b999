//! [`Query`] collection related to multiple [`Reservation`]s.

use common::operations::By;

use crate::{domain::Reservation, read::reservation::list};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Reservation`]s ordered by their start.
pub type List = DatabaseQuery<By<Vec<Reservation>, list::Filter>>;
