//! Business logic of the hotel back office: rooms, customers, reservations,
//! maintenance issues and the occupancy derived from them.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod occupancy;
pub mod query;
pub mod read;
pub mod task;

use std::error::Error;

use common::{
    clock,
    operations::{By, Start},
    Clock, DateTime,
};

#[cfg(doc)]
use infra::Database;

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// [`task::CancelNoShows`] configuration.
    pub cancel_no_shows: task::cancel_no_shows::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Clk = clock::System> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`Clock`] telling the current time to this [`Service`].
    clock: Clk,
}

impl<Db, Clk> Service<Db, Clk> {
    /// Creates a new [`Service`] with the provided parameters, along with the
    /// [`task::Background`] running its [`Task`]s.
    pub fn new(
        config: Config,
        database: Db,
        clock: Clk,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::CancelNoShows<Self>,
                        task::cancel_no_shows::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Self::without_tasks(config, database, clock);

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().cancel_no_shows)))
                .await
        });

        (this, bg)
    }

    /// Creates a new [`Service`] without starting any [`Task`]s.
    #[must_use]
    pub fn without_tasks(config: Config, database: Db, clock: Clk) -> Self {
        Self {
            config,
            database,
            clock,
        }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the current [`DateTime`] according to the [`Clock`] of this
    /// [`Service`].
    #[must_use]
    pub fn now(&self) -> DateTime
    where
        Clk: Clock,
    {
        self.clock.now()
    }
}
