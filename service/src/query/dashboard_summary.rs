//! [`DashboardSummary`] [`Query`].

use common::{
    operations::{By, Select},
    Clock,
};
use tracerr::Traced;

#[cfg(doc)]
use crate::occupancy::Status;
use crate::{
    domain::{MaintenanceIssue, Room},
    infra::{database, Database},
    occupancy::{self, Summary},
    read::{self, Period, Stay},
    Query, Service,
};

/// [`Query`] counting [`Room`]s per [`Status`] at the current instant.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashboardSummary;

impl<Db, Clk> Query<DashboardSummary> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<
            Select<By<Vec<Room>, read::room::list::Filter>>,
            Ok = Vec<Room>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Stay>, read::reservation::stay::Filter>>,
            Ok = Vec<Stay>,
            Err = Traced<database::Error>,
        > + Database<
            Select<
                By<
                    Vec<MaintenanceIssue>,
                    read::maintenance_issue::list::Filter,
                >,
            >,
            Ok = Vec<MaintenanceIssue>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Summary;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: DashboardSummary,
    ) -> Result<Self::Ok, Self::Err> {
        let now = self.now();

        let rooms = self
            .database()
            .execute(Select(By::<Vec<Room>, _>::new(
                read::room::list::Filter::default(),
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let stays = self
            .database()
            .execute(Select(By::<Vec<Stay>, _>::new(
                read::reservation::stay::Filter {
                    room_id: None,
                    overlapping: Period::at(now),
                },
            )))
            .await
            .map_err(tracerr::wrap!())?;
        let issues = self
            .database()
            .execute(Select(By::<Vec<MaintenanceIssue>, _>::new(
                read::maintenance_issue::list::Filter {
                    room_id: None,
                    overlapping: Some(Period::at(now)),
                },
            )))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(occupancy::summarize(&rooms, &stays, &issues, now))
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{
            maintenance_issue::spec::issue,
            reservation::{self, spec::reservation},
        },
        infra::database::memory,
        occupancy::Summary,
        Query as _,
    };

    use super::DashboardSummary;

    #[tokio::test]
    async fn counts_rooms_per_status() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let guest = svc.database().add_customer("Ann", "Lee");
        let occupied = svc.database().add_room("101", 2, "100USD");
        let broken = svc.database().add_room("102", 2, "100USD");
        _ = svc.database().add_room("103", 2, "100USD");
        _ = svc.database().add_room("104", 2, "100USD");

        let mut stay = reservation(
            occupied.id,
            "2025-06-01T14:00:00Z",
            "2025-06-03T11:00:00Z",
            reservation::Status::CheckedIn,
        );
        stay.customer_id = guest.id;
        svc.database().add_reservation(stay);
        svc.database().add_issue(issue(
            broken.id,
            "2025-06-01T08:00:00Z",
            "2025-06-05T08:00:00Z",
        ));

        let summary = svc.execute(DashboardSummary).await.unwrap();

        assert_eq!(
            summary,
            Summary {
                total_rooms: 4,
                available_rooms: 2,
                occupied_rooms: 1,
                rooms_under_maintenance: 1,
            },
        );
    }

    #[tokio::test]
    async fn empty_hotel_has_nothing() {
        let svc = memory::service("2025-06-02T09:00:00Z");

        let summary = svc.execute(DashboardSummary).await.unwrap();

        assert_eq!(summary, Summary::new(0, 0, 0));
    }
}
