//! # threadgems
//!
//! Threads OAuth session service and curated-thread snapshot updater.
//!
//! The crate backs two binaries. `threadgems` is an HTTP service that
//! exchanges OAuth codes for Threads access tokens, keeps them in an
//! HTTP-only cookie and answers session queries. `threadgems-update` is a
//! one-shot batch job that pulls posts from a fixed set of public accounts,
//! keeps the design-related ones, and writes static JSON snapshots for the
//! front end, logging any posts that disappeared since the previous run.
//!
//! ## Architecture
//!
//! ```text
//! Browser                         cron / CI
//!     │                               │
//!     ├── REST Handlers (api/)        ├── Updater (service/)
//!     │                               │     ├── KeywordFilter (domain/)
//!     ├── AuthService (service/)      │     ├── deletion tracking (snapshot/)
//!     │                               │     └── SnapshotWriter (snapshot/)
//!     │                               │
//!     ├── ThreadsClient (threads/) ◄──┤
//!     └── PostgresStore (persistence/) ◄──┘
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod snapshot;
pub mod telemetry;
pub mod threads;
