use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Record of one listing delivered to one user, written before dispatch.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub apartment_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewNotification {
    pub user_id: i32,
    pub apartment_id: i32,
}

impl NewNotification {
    #[must_use]
    pub fn new(user_id: i32, apartment_id: i32) -> Self {
        Self {
            user_id,
            apartment_id,
        }
    }
}
