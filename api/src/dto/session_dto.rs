use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StoreRefreshRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RevokeSessionRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RevokeUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupRequest {
    pub days: Option<i64>,
}
