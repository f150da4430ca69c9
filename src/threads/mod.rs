//! Threads Graph API client: OAuth code exchange, profile lookup and
//! profile post listing.

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientCredentials, ThreadsClient};
pub use error::ThreadsError;
pub use types::{PostsPage, ThreadsPost, TokenResponse, UserProfile};
