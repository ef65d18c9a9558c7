//! Repository implementation for delivered-notification records.

use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;

use crate::domain::listing::Listing;
use crate::domain::notification::{NewNotification, Notification};
use crate::models::listing::Apartment as DbApartment;
use crate::models::notification::{
    NewNotification as DbNewNotification, Notification as DbNotification,
};
use crate::repository::{
    DieselRepository, NotificationListQuery, NotificationReader, NotificationWriter,
    errors::RepositoryResult,
};

impl NotificationReader for DieselRepository {
    fn list_notifications_for_user(
        &self,
        query: NotificationListQuery,
    ) -> RepositoryResult<Vec<(Notification, Listing)>> {
        use crate::schema::{apartments, notifications};

        let mut conn = self.conn()?;

        let mut items = notifications::table
            .inner_join(apartments::table)
            .filter(notifications::user_id.eq(query.user_id))
            .order(notifications::created_at.desc())
            .select((notifications::all_columns, apartments::all_columns))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(limit) = query.limit {
            items = items.limit(limit);
        }

        let rows = items.load::<(DbNotification, DbApartment)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(notification, apartment)| (notification.into(), apartment.into()))
            .collect())
    }

    fn notification_exists(&self, user_id: i32, apartment_id: i32) -> RepositoryResult<bool> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;

        let found = select(exists(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::apartment_id.eq(apartment_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }
}

impl NotificationWriter for DieselRepository {
    fn create_notification(
        &self,
        new_notification: &NewNotification,
    ) -> RepositoryResult<Notification> {
        use crate::schema::notifications;

        let mut conn = self.conn()?;

        let db_new_notification: DbNewNotification = new_notification.into();

        let db_notification = diesel::insert_into(notifications::table)
            .values(&db_new_notification)
            .get_result::<DbNotification>(&mut conn)?;

        Ok(db_notification.into())
    }
}
