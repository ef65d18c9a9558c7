//! Read access to delivered notifications.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::listing::Listing;
use crate::domain::notification::Notification;
use crate::repository::{NotificationListQuery, NotificationReader};
use crate::services::{ServiceError, ServiceResult};

const DEFAULT_NOTIFICATION_LIMIT: i64 = 10;

/// Recent notifications for the caller, newest first, with their listings.
pub fn list_notifications<R>(
    repo: &R,
    user: &AuthenticatedUser,
    limit: Option<i64>,
) -> ServiceResult<Vec<(Notification, Listing)>>
where
    R: NotificationReader + ?Sized,
{
    let limit = limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_NOTIFICATION_LIMIT);

    let query = NotificationListQuery::new(user.sub).limit(limit);

    repo.list_notifications_for_user(query)
        .map_err(ServiceError::from)
}
