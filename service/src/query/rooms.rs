//! [`Query`] collection related to multiple [`Room`]s.

use common::operations::By;

use crate::{domain::Room, read::room::list};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a list of [`Room`]s ordered by their number.
pub type List = DatabaseQuery<By<Vec<Room>, list::Filter>>;

/// Queries total count of [`Room`]s.
pub type TotalCount = DatabaseQuery<By<list::TotalCount, ()>>;

#[cfg(test)]
mod spec {
    use crate::{
        domain::room, infra::database::memory, read::room::list, Query as _,
    };

    use super::{List, TotalCount};

    #[tokio::test]
    async fn lists_rooms_by_number() {
        let svc = memory::service("2025-06-01T08:00:00Z");
        for number in ["201", "101", "1A"] {
            _ = svc.database().add_room(number, 2, "100USD");
        }

        let rooms =
            svc.execute(List::by(list::Filter::default())).await.unwrap();

        assert_eq!(
            rooms.iter().map(|r| r.number.to_string()).collect::<Vec<_>>(),
            ["101", "1A", "201"],
        );
        assert_eq!(
            i32::from(svc.execute(TotalCount::by(())).await.unwrap()),
            3,
        );

        let suites = svc
            .execute(List::by(list::Filter {
                kind: Some(room::Kind::Suite),
                ..list::Filter::default()
            }))
            .await
            .unwrap();
        assert!(suites.is_empty());
        assert_eq!(room::Kind::Suite.to_string(), "SUITE");
    }
}
