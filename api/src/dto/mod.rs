//! Request and response DTOs for the session API.

pub mod session_dto;

pub use session_dto::{
    CleanupRequest, RevokeSessionRequest, RevokeUserRequest, StoreRefreshRequest,
};
