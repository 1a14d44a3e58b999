//! [`Command`] for creating a new [`Customer`].

use common::{operations::Insert, Clock};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::customer::{Email, Name, Phone};
use crate::{
    domain::{customer, Customer},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Customer`].
#[derive(Clone, Debug)]
pub struct CreateCustomer {
    /// First [`Name`] of a new [`Customer`].
    pub first_name: customer::Name,

    /// Last [`Name`] of a new [`Customer`].
    pub last_name: customer::Name,

    /// [`Email`] of a new [`Customer`].
    pub email: Option<customer::Email>,

    /// [`Phone`] of a new [`Customer`].
    pub phone: Option<customer::Phone>,
}

impl<Db, Clk> Command<CreateCustomer> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<Insert<Customer>, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        let CreateCustomer {
            first_name,
            last_name,
            email,
            phone,
        } = cmd;

        let customer = Customer {
            id: customer::Id::new(),
            first_name,
            last_name,
            email,
            phone,
            created_at: self.now().coerce(),
        };

        self.database()
            .execute(Insert(customer.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(customer)
    }
}

/// Error of [`CreateCustomer`] [`Command`] execution.
pub type ExecutionError = database::Error;

#[cfg(test)]
mod spec {
    use crate::{
        domain::customer::{Email, Name, Phone},
        infra::database::memory,
        Command as _,
    };

    use super::CreateCustomer;

    #[tokio::test]
    async fn stores_new_customer() {
        let svc = memory::service("2025-06-02T09:00:00Z");

        let created = svc
            .execute(CreateCustomer {
                first_name: Name::new("Ann").unwrap(),
                last_name: Name::new("Lee").unwrap(),
                email: Email::new("ann.lee@example.com"),
                phone: Phone::new("+1 555 123 4567"),
            })
            .await
            .unwrap();

        assert_eq!(created.full_name().to_string(), "Ann Lee");
        assert_eq!(created.created_at.to_string(), "2025-06-02T09:00:00Z");

        let store = svc.database().store();
        assert_eq!(store.customers.len(), 1);
        let stored = &store.customers[0];
        assert_eq!(stored.id, created.id);
        assert_eq!(
            stored.email.as_ref().map(ToString::to_string).as_deref(),
            Some("ann.lee@example.com"),
        );
        assert!(stored.phone.is_some());
    }

    #[tokio::test]
    async fn gives_distinct_ids() {
        let svc = memory::service("2025-06-02T09:00:00Z");
        let cmd = CreateCustomer {
            first_name: Name::new("Ann").unwrap(),
            last_name: Name::new("Lee").unwrap(),
            email: None,
            phone: None,
        };

        let first = svc.execute(cmd.clone()).await.unwrap();
        let second = svc.execute(cmd).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(svc.database().store().customers.len(), 2);
    }
}
