//! Background [`Task`]s definitions.

mod background;
pub mod cancel_no_shows;

pub use common::Handler as Task;

pub use self::{background::Background, cancel_no_shows::CancelNoShows};
