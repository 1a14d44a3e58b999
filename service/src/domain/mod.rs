//! Domain definitions.

pub mod customer;
pub mod maintenance_issue;
pub mod reservation;
pub mod room;

pub use self::{
    customer::Customer, maintenance_issue::MaintenanceIssue,
    reservation::Reservation, room::Room,
};
