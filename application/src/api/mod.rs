//! GraphQL API definitions.

pub mod calendar;
pub mod customer;
pub mod dashboard;
pub mod maintenance_issue;
mod mutation;
mod query;
pub mod report;
pub mod reservation;
pub mod room;
pub mod scalar;

use crate::{define_error, Context};

pub use self::{
    customer::Customer, maintenance_issue::MaintenanceIssue,
    mutation::Mutation, query::Query, reservation::Reservation, room::Room,
};

/// Root of all GraphQL subscriptions.
///
/// Hotel back office exposes none.
pub type Subscription = juniper::EmptySubscription<Context>;

/// GraphQL schema.
pub type Schema = juniper::RootNode<'static, Query, Mutation, Subscription>;

define_error! {
    enum PeriodError {
        #[code = "INCOMPLETE_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "Both `from` and `to` must be provided, or none of them"]
        Incomplete,

        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "`to` must be after `from`"]
        Reversed,
    }
}
