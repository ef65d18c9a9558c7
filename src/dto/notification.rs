//! Notification history payloads.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::listing::Listing;
use crate::domain::notification::Notification;

/// Query parameters accepted by `GET /api/v1/notifications`.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationsQueryParams {
    pub limit: Option<i64>,
}

/// One delivered notification together with the apartment it announced.
#[derive(Debug, Serialize)]
pub struct NotificationEntry {
    pub id: i32,
    pub sent_at: NaiveDateTime,
    pub apartment: Listing,
}

impl From<(Notification, Listing)> for NotificationEntry {
    fn from((notification, listing): (Notification, Listing)) -> Self {
        Self {
            id: notification.id,
            sent_at: notification.created_at,
            apartment: listing,
        }
    }
}
