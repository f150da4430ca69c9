//! Service layer: business logic orchestration.
//!
//! [`AuthService`] backs the session endpoints of the HTTP server and
//! [`Updater`] drives the batch snapshot job. Both talk to the Threads API
//! through [`crate::threads::ThreadsClient`] and write to the optional
//! [`crate::persistence::PostgresStore`].

pub mod auth_service;
pub mod updater;

pub use auth_service::AuthService;
pub use updater::{RunOutcome, RunSummary, Updater};
