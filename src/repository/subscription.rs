//! Repository implementation for subscription records.

use chrono::Utc;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::select;

use crate::domain::subscription::{NewSubscription, Subscription};
use crate::models::subscription::{
    NewSubscription as DbNewSubscription, Subscription as DbSubscription,
};
use crate::repository::{
    DieselRepository, SubscriptionReader, SubscriptionWriter, errors::RepositoryResult,
};

impl SubscriptionReader for DieselRepository {
    fn get_current_subscription(&self, user_id: i32) -> RepositoryResult<Option<Subscription>> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let db_subscription = subscriptions::table
            .filter(subscriptions::user_id.eq(user_id))
            .order(subscriptions::expires_at.desc())
            .first::<DbSubscription>(&mut conn)
            .optional()?;

        Ok(db_subscription.map(Into::into))
    }

    fn user_has_active_subscription(&self, user_id: i32) -> RepositoryResult<bool> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let active = select(exists(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::status.eq("active"))
                .filter(subscriptions::expires_at.gt(now)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(active)
    }
}

impl SubscriptionWriter for DieselRepository {
    fn create_subscription(
        &self,
        new_subscription: &NewSubscription,
    ) -> RepositoryResult<Subscription> {
        use crate::schema::subscriptions;

        let mut conn = self.conn()?;

        let db_new_subscription: DbNewSubscription = new_subscription.into();

        let db_subscription = diesel::insert_into(subscriptions::table)
            .values(&db_new_subscription)
            .get_result::<DbSubscription>(&mut conn)?;

        Ok(db_subscription.into())
    }
}
