//! Snapshot output: static JSON files for the front end and deletion
//! tracking between generations.

pub mod tracking;
pub mod writer;

pub use tracking::{TrackingOutcome, track_deletions};
pub use writer::{SnapshotSet, SnapshotWriter};
