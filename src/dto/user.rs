//! Profile payloads. Responses never carry the password hash.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::user::{UpdateProfile, User};

/// Account data as returned to its owner.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfile {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub language: String,
    pub telegram_chat_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            language: user.language,
            telegram_chat_id: user.telegram_chat_id,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize, Validate)]
/// Profile changes; omitted fields keep their current value.
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// Interface language code, checked against the supported set.
    pub language: Option<String>,
    /// Telegram chat that receives apartment notifications.
    pub telegram_chat_id: Option<i64>,
}

impl From<&UpdateProfileRequest> for UpdateProfile {
    fn from(req: &UpdateProfileRequest) -> Self {
        UpdateProfile::new(
            req.name.clone(),
            req.language.clone(),
            req.telegram_chat_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn profile_omits_password_hash() {
        let now = Utc::now().naive_utc();
        let user = User {
            id: 7,
            email: "tenant@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: Some("Mia".to_string()),
            language: "de".to_string(),
            telegram_chat_id: Some(42),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&UserProfile::from(user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("tenant@example.com"));
    }
}
