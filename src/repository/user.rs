//! Repository implementation for user accounts.

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::user::{NewUser, UpdateProfile, User};
use crate::models::user::{NewUser as DbNewUser, UpdateUser as DbUpdateUser, User as DbUser};
use crate::repository::{DieselRepository, UserReader, UserWriter, errors::RepositoryResult};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::id.eq(id))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(db_user.map(Into::into))
    }

    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user = users::table
            .filter(users::email.eq(email.to_lowercase()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(db_user.map(Into::into))
    }

    fn list_users_with_active_subscription(&self) -> RepositoryResult<Vec<User>> {
        use crate::schema::{subscriptions, users};

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let db_users = users::table
            .inner_join(subscriptions::table)
            .filter(subscriptions::status.eq("active"))
            .filter(subscriptions::expires_at.gt(now))
            .select(users::all_columns)
            .distinct()
            .load::<DbUser>(&mut conn)?;

        Ok(db_users.into_iter().map(Into::into).collect())
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let db_new_user: DbNewUser = new_user.into();

        let db_user = diesel::insert_into(users::table)
            .values(&db_new_user)
            .get_result::<DbUser>(&mut conn)?;

        Ok(db_user.into())
    }

    fn update_user(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let db_updates: DbUpdateUser = updates.into();

        let db_user = diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(&db_updates)
            .get_result::<DbUser>(&mut conn)?;

        Ok(db_user.into())
    }
}
