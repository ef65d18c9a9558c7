use std::fmt::Display;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub status: SubscriptionStatus,
    pub price_eur: f64,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
    Other(String),
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSubscription {
    pub user_id: i32,
    pub status: SubscriptionStatus,
    pub price_eur: f64,
    pub expires_at: NaiveDateTime,
}

impl Subscription {
    /// A subscription entitles its user while it is marked active and has
    /// not yet expired.
    #[must_use]
    pub fn entitles_at(&self, now: NaiveDateTime) -> bool {
        self.status == SubscriptionStatus::Active && self.expires_at > now
    }
}

impl NewSubscription {
    #[must_use]
    pub fn new(user_id: i32, price_eur: f64, duration_days: i64, now: NaiveDateTime) -> Self {
        Self {
            user_id,
            status: SubscriptionStatus::Active,
            price_eur,
            expires_at: now + Duration::days(duration_days),
        }
    }
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Expired => write!(f, "expired"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(s: &str) -> Self {
        match s {
            "active" => SubscriptionStatus::Active,
            "expired" => SubscriptionStatus::Expired,
            "cancelled" => SubscriptionStatus::Cancelled,
            _ => SubscriptionStatus::Other(s.to_string()),
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
