//! In-memory [`Database`] for testing [`Command`]s, [`Query`]s and
//! [`Task`]s.
//!
//! [`Command`]: crate::Command
//! [`Query`]: crate::Query
//! [`Task`]: crate::Task

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use common::{
    clock,
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact},
    DateTime, Money,
};
use tracerr::Traced;

use crate::{
    domain::{
        customer, maintenance_issue, reservation, room, Customer,
        MaintenanceIssue, Reservation, Room,
    },
    infra::{database, Database},
    read::{self, Stay},
    task, Config, Service,
};

/// Stored entities.
#[derive(Debug, Default)]
pub(crate) struct Store {
    pub(crate) rooms: Vec<Room>,
    pub(crate) customers: Vec<Customer>,
    pub(crate) reservations: Vec<Reservation>,
    pub(crate) issues: Vec<MaintenanceIssue>,
}

/// [`Database`] keeping everything in memory.
///
/// Transactions share the same [`Store`] and apply immediately.
#[derive(Clone, Debug, Default)]
pub(crate) struct Memory(Arc<Mutex<Store>>);

impl Memory {
    /// Locks the [`Store`] of this [`Memory`].
    pub(crate) fn store(&self) -> MutexGuard<'_, Store> {
        self.0.lock().unwrap()
    }

    /// Stores a new [`Room`] with the provided number, capacity and nightly
    /// price.
    pub(crate) fn add_room(
        &self,
        number: &str,
        capacity: u8,
        price: &str,
    ) -> Room {
        let room = Room {
            id: room::Id::new(),
            number: room::Number::new(number).unwrap(),
            kind: room::Kind::Double,
            floor: 1,
            capacity: room::Capacity::new(capacity).unwrap(),
            price: price.parse::<Money>().unwrap(),
            description: None,
            amenities: vec![],
            created_at: DateTime::UNIX_EPOCH.coerce(),
        };
        self.store().rooms.push(room.clone());
        room
    }

    /// Stores a new [`Customer`] with the provided names.
    pub(crate) fn add_customer(&self, first: &str, last: &str) -> Customer {
        let customer = Customer {
            id: customer::Id::new(),
            first_name: customer::Name::new(first).unwrap(),
            last_name: customer::Name::new(last).unwrap(),
            email: None,
            phone: None,
            created_at: DateTime::UNIX_EPOCH.coerce(),
        };
        self.store().customers.push(customer.clone());
        customer
    }

    /// Stores the provided [`Reservation`].
    pub(crate) fn add_reservation(&self, reservation: Reservation) {
        self.store().reservations.push(reservation);
    }

    /// Stores the provided [`MaintenanceIssue`].
    pub(crate) fn add_issue(&self, issue: MaintenanceIssue) {
        self.store().issues.push(issue);
    }
}

/// Creates a [`Service`] over an empty [`Memory`] with its clock stopped at
/// the provided RFC 3339 instant.
pub(crate) fn service(now: &str) -> Service<Memory, clock::Fixed> {
    Service::without_tasks(
        Config {
            cancel_no_shows: task::cancel_no_shows::Config {
                interval: Duration::from_secs(60),
                timeout: Duration::from_secs(6 * 60 * 60),
            },
        },
        Memory::default(),
        clock::Fixed(DateTime::from_rfc3339(now).unwrap()),
    )
}

/// Replaces the entity with the same ID, or appends a new one.
fn upsert<T, Id: PartialEq>(all: &mut Vec<T>, new: T, id: impl Fn(&T) -> Id) {
    if let Some(old) = all.iter_mut().find(|old| id(old) == id(&new)) {
        *old = new;
    } else {
        all.push(new);
    }
}

/// Implements a [`Database`] operation for [`Memory`] with the provided
/// function of the [`Store`] and the operation argument.
macro_rules! impl_memory {
    ($op:ty => $ok:ty, |$store:ident, $arg:pat_param| $body:expr) => {
        impl Database<$op> for Memory {
            type Ok = $ok;
            type Err = Traced<database::Error>;

            async fn execute(&self, $arg: $op) -> Result<Self::Ok, Self::Err> {
                let mut guard = self.store();
                let $store = &mut *guard;
                Ok($body)
            }
        }
    };
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl_memory!(Commit => (), |_s, _| ());
impl_memory!(Lock<By<Room, room::Id>> => (), |_s, _| ());
impl_memory!(Lock<By<Room, room::Number>> => (), |_s, _| ());

impl_memory!(
    Select<By<Option<Room>, room::Id>> => Option<Room>,
    |s, Select(by)| {
        let id = by.into_inner();
        s.rooms.iter().find(|r| r.id == id).cloned()
    }
);
impl<'l> Database<Select<By<Option<Room>, &'l room::Number>>> for Memory {
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, &'l room::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();
        Ok(self.store().rooms.iter().find(|r| &r.number == number).cloned())
    }
}
impl_memory!(
    Select<By<Vec<Room>, read::room::list::Filter>> => Vec<Room>,
    |s, Select(by)| {
        let filter = by.into_inner();
        let mut rooms = s
            .rooms
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect::<Vec<_>>();
        rooms.sort_by(|a, b| {
            AsRef::<str>::as_ref(&a.number)
                .cmp(AsRef::<str>::as_ref(&b.number))
        });
        rooms
    }
);
impl_memory!(
    Select<By<read::room::list::TotalCount, ()>> => read::room::list::TotalCount,
    |s, _| i32::try_from(s.rooms.len()).unwrap().into()
);
impl_memory!(Insert<Room> => (), |s, Insert(room)| {
    upsert(&mut s.rooms, room, |r| r.id);
});

impl_memory!(
    Select<By<Option<Customer>, customer::Id>> => Option<Customer>,
    |s, Select(by)| {
        let id = by.into_inner();
        s.customers.iter().find(|c| c.id == id).cloned()
    }
);
impl_memory!(
    Select<By<Vec<Customer>, read::customer::list::Filter>> => Vec<Customer>,
    |s, Select(by)| {
        let filter = by.into_inner();
        s.customers.iter().filter(|c| filter.matches(c)).cloned().collect()
    }
);
impl_memory!(Insert<Customer> => (), |s, Insert(customer)| {
    upsert(&mut s.customers, customer, |c| c.id);
});

impl_memory!(
    Select<By<Option<Reservation>, reservation::Id>> => Option<Reservation>,
    |s, Select(by)| {
        let id = by.into_inner();
        s.reservations.iter().find(|r| r.id == id).cloned()
    }
);
impl_memory!(
    Select<By<Vec<Reservation>, read::reservation::list::Filter>>
        => Vec<Reservation>,
    |s, Select(by)| {
        let filter = by.into_inner();
        s.reservations
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }
);
impl_memory!(
    Select<By<Vec<Stay>, read::reservation::stay::Filter>> => Vec<Stay>,
    |s, Select(by)| {
        let filter = by.into_inner();
        s.reservations
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| Stay {
                reservation: r.clone(),
                guest_name: s
                    .customers
                    .iter()
                    .find(|c| c.id == r.customer_id)
                    .unwrap()
                    .full_name(),
            })
            .collect()
    }
);
impl_memory!(Insert<Reservation> => (), |s, Insert(reservation)| {
    upsert(&mut s.reservations, reservation, |r| r.id);
});

impl_memory!(
    Select<By<Option<MaintenanceIssue>, maintenance_issue::Id>>
        => Option<MaintenanceIssue>,
    |s, Select(by)| {
        let id = by.into_inner();
        s.issues.iter().find(|i| i.id == id).cloned()
    }
);
impl_memory!(
    Select<By<Vec<MaintenanceIssue>, read::maintenance_issue::list::Filter>>
        => Vec<MaintenanceIssue>,
    |s, Select(by)| {
        let filter = by.into_inner();
        s.issues.iter().filter(|i| filter.matches(i)).cloned().collect()
    }
);
impl_memory!(Insert<MaintenanceIssue> => (), |s, Insert(issue)| {
    upsert(&mut s.issues, issue, |i| i.id);
});
impl_memory!(
    Delete<By<MaintenanceIssue, maintenance_issue::Id>> => (),
    |s, Delete(by)| {
        let id = by.into_inner();
        s.issues.retain(|i| i.id != id);
    }
);
