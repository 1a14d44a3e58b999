//! [`Command`] definition.

pub mod cancel_reservation;
pub mod check_in_reservation;
pub mod check_out_reservation;
pub mod create_customer;
pub mod create_reservation;
pub mod create_room;
pub mod rate_reservation;
pub mod report_maintenance_issue;
pub mod resolve_maintenance_issue;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    cancel_reservation::CancelReservation,
    check_in_reservation::CheckInReservation,
    check_out_reservation::CheckOutReservation,
    create_customer::CreateCustomer, create_reservation::CreateReservation,
    create_room::CreateRoom, rate_reservation::RateReservation,
    report_maintenance_issue::ReportMaintenanceIssue,
    resolve_maintenance_issue::ResolveMaintenanceIssue,
};
