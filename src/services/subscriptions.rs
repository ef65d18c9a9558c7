//! Subscription activation and entitlement checks.

use chrono::Utc;

use crate::domain::subscription::{NewSubscription, Subscription};
use crate::models::config::ServerConfig;
use crate::repository::{SubscriptionReader, SubscriptionWriter};
use crate::services::{ServiceError, ServiceResult};

/// Records a paid period for the user, priced and time-boxed from config.
pub fn activate_subscription<R>(
    repo: &R,
    config: &ServerConfig,
    user_id: i32,
) -> ServiceResult<Subscription>
where
    R: SubscriptionWriter + ?Sized,
{
    let new_subscription = NewSubscription::new(
        user_id,
        config.subscription_price,
        config.subscription_duration,
        Utc::now().naive_utc(),
    );

    repo.create_subscription(&new_subscription)
        .map_err(ServiceError::from)
}

/// Latest subscription record for the user, active or not.
pub fn get_current_subscription<R>(repo: &R, user_id: i32) -> ServiceResult<Option<Subscription>>
where
    R: SubscriptionReader + ?Sized,
{
    repo.get_current_subscription(user_id)
        .map_err(ServiceError::from)
}

pub fn has_active_subscription<R>(repo: &R, user_id: i32) -> ServiceResult<bool>
where
    R: SubscriptionReader + ?Sized,
{
    repo.user_has_active_subscription(user_id)
        .map_err(ServiceError::from)
}
