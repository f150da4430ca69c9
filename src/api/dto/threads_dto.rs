//! DTOs for the `/api/threads` endpoints.

use serde::Deserialize;
use utoipa::IntoParams;

/// Default page size for the profile posts proxy.
pub const DEFAULT_PROFILE_LIMIT: u32 = 25;

/// Query for `GET /api/threads/profile/{username}`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfilePostsParams {
    /// Maximum posts to return. Defaults to 25.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PROFILE_LIMIT
}
