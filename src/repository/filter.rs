//! Repository implementation for saved search filters.

use diesel::prelude::*;

use crate::domain::filter::{NewSearchFilter, SearchFilter, UpdateSearchFilter};
use crate::models::filter::{
    NewUserFilter as DbNewUserFilter, UpdateUserFilter as DbUpdateUserFilter,
    UserFilter as DbUserFilter,
};
use crate::repository::{DieselRepository, FilterReader, FilterWriter, errors::RepositoryResult};

impl FilterReader for DieselRepository {
    fn get_filter_by_id(&self, id: i32) -> RepositoryResult<Option<SearchFilter>> {
        use crate::schema::user_filters;

        let mut conn = self.conn()?;
        let db_filter = user_filters::table
            .filter(user_filters::id.eq(id))
            .first::<DbUserFilter>(&mut conn)
            .optional()?;

        Ok(db_filter.map(Into::into))
    }

    fn list_filters_for_user(&self, user_id: i32) -> RepositoryResult<Vec<SearchFilter>> {
        use crate::schema::user_filters;

        let mut conn = self.conn()?;
        let db_filters = user_filters::table
            .filter(user_filters::user_id.eq(user_id))
            .order(user_filters::created_at.asc())
            .load::<DbUserFilter>(&mut conn)?;

        Ok(db_filters.into_iter().map(Into::into).collect())
    }

    fn list_active_filters_for_user(&self, user_id: i32) -> RepositoryResult<Vec<SearchFilter>> {
        use crate::schema::user_filters;

        let mut conn = self.conn()?;
        let db_filters = user_filters::table
            .filter(user_filters::user_id.eq(user_id))
            .filter(user_filters::is_active.eq(true))
            .order(user_filters::created_at.asc())
            .load::<DbUserFilter>(&mut conn)?;

        Ok(db_filters.into_iter().map(Into::into).collect())
    }
}

impl FilterWriter for DieselRepository {
    fn create_filter(&self, new_filter: &NewSearchFilter) -> RepositoryResult<SearchFilter> {
        use crate::schema::user_filters;

        let mut conn = self.conn()?;

        let db_new_filter: DbNewUserFilter = new_filter.into();

        let db_filter = diesel::insert_into(user_filters::table)
            .values(&db_new_filter)
            .get_result::<DbUserFilter>(&mut conn)?;

        Ok(db_filter.into())
    }

    fn update_filter(
        &self,
        filter_id: i32,
        updates: &UpdateSearchFilter,
    ) -> RepositoryResult<SearchFilter> {
        use crate::schema::user_filters;

        let mut conn = self.conn()?;

        let db_updates: DbUpdateUserFilter = updates.into();

        let db_filter = diesel::update(user_filters::table.filter(user_filters::id.eq(filter_id)))
            .set(&db_updates)
            .get_result::<DbUserFilter>(&mut conn)?;

        Ok(db_filter.into())
    }
}
