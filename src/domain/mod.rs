//! Domain layer: thread records, keyword filtering, manifests, deletion
//! diffing and stored tokens.
//!
//! Everything here is pure data and pure functions; I/O lives in
//! `snapshot`, `persistence` and `threads`.

pub mod deletion;
pub mod filter;
pub mod manifest;
pub mod thread;
pub mod token;

pub use deletion::{DeletionLog, find_deleted};
pub use filter::{DESIGN_KEYWORDS, KeywordFilter, TARGET_ACCOUNTS};
pub use manifest::{Manifest, TypeCounts};
pub use thread::{ThreadRecord, ThreadType, sort_newest_first};
pub use token::TokenRecord;
