use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::notification::{
    NewNotification as DomainNewNotification, Notification as DomainNotification,
};
use crate::models::listing::Apartment;
use crate::models::user::User;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(belongs_to(Apartment, foreign_key = apartment_id))]
#[diesel(table_name = crate::schema::notifications)]
pub struct Notification {
    pub id: i32,
    pub user_id: i32,
    pub apartment_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotification {
    pub user_id: i32,
    pub apartment_id: i32,
}

impl From<Notification> for DomainNotification {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            apartment_id: notification.apartment_id,
            created_at: notification.created_at,
        }
    }
}

impl<'a> From<&'a DomainNewNotification> for NewNotification {
    fn from(notification: &'a DomainNewNotification) -> Self {
        Self {
            user_id: notification.user_id,
            apartment_id: notification.apartment_id,
        }
    }
}
