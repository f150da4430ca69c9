//! Data Transfer Objects for REST request/response serialization.

pub mod auth_dto;
pub mod threads_dto;

pub use auth_dto::*;
pub use threads_dto::*;
