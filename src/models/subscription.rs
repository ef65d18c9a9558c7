use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::subscription::{
    NewSubscription as DomainNewSubscription, Subscription as DomainSubscription,
};
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub status: String,
    pub price_eur: f64,
    pub expires_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub user_id: i32,
    pub status: String,
    pub price_eur: f64,
    pub expires_at: NaiveDateTime,
}

impl From<Subscription> for DomainSubscription {
    fn from(sub: Subscription) -> Self {
        Self {
            id: sub.id,
            user_id: sub.user_id,
            status: sub.status.into(),
            price_eur: sub.price_eur,
            expires_at: sub.expires_at,
            created_at: sub.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewSubscription> for NewSubscription {
    fn from(sub: &'a DomainNewSubscription) -> Self {
        Self {
            user_id: sub.user_id,
            status: sub.status.to_string(),
            price_eur: sub.price_eur,
            expires_at: sub.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::SubscriptionStatus;
    use chrono::Utc;

    #[test]
    fn from_domain_new_serializes_status() {
        let now = Utc::now().naive_utc();
        let domain = DomainNewSubscription::new(3, 9.99, 30, now);
        let new: NewSubscription = (&domain).into();
        assert_eq!(new.user_id, 3);
        assert_eq!(new.status, "active");
        assert_eq!(new.expires_at, now + chrono::Duration::days(30));
    }

    #[test]
    fn subscription_into_domain_parses_status() {
        let now = Utc::now().naive_utc();
        let db_sub = Subscription {
            id: 1,
            user_id: 3,
            status: "expired".to_string(),
            price_eur: 9.99,
            expires_at: now,
            created_at: now,
        };
        let domain: DomainSubscription = db_sub.into();
        assert_eq!(domain.status, SubscriptionStatus::Expired);
        assert!(!domain.entitles_at(now));
    }
}
