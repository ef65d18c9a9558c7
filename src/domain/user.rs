use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Languages a profile may select. Stored verbatim; no translation tables.
pub const SUPPORTED_LANGUAGES: [&str; 3] = ["de", "ru", "uk"];

pub const DEFAULT_LANGUAGE: &str = "de";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub language: String,
    /// Telegram chat to deliver notifications to. Users without one are
    /// skipped by the notifier.
    pub telegram_chat_id: Option<i64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub language: String,
}

impl NewUser {
    #[must_use]
    pub fn new(email: String, password_hash: String, name: Option<String>) -> Self {
        Self {
            email: email.to_lowercase().trim().to_string(),
            password_hash,
            name: name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Profile changes; `None` fields keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub language: Option<String>,
    pub telegram_chat_id: Option<i64>,
}

impl UpdateProfile {
    #[must_use]
    pub fn new(
        name: Option<String>,
        language: Option<String>,
        telegram_chat_id: Option<i64>,
    ) -> Self {
        Self {
            name: name.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            language: language
                .map(|s| s.to_lowercase().trim().to_string())
                .filter(|s| !s.is_empty()),
            telegram_chat_id,
        }
    }
}
