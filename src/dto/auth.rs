//! Registration and login payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::user::UserProfile;

#[derive(Deserialize, Validate)]
/// Body of `POST /api/v1/auth/register`.
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Optional display name.
    pub name: Option<String>,
}

#[derive(Deserialize, Validate)]
/// Body of `POST /api/v1/auth/login`.
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Account plus a fresh bearer token, returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}
