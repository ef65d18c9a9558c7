use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::filter::{
    NewSearchFilter as DomainNewSearchFilter, SearchFilter as DomainSearchFilter,
    UpdateSearchFilter as DomainUpdateSearchFilter,
};
use crate::models::user::User;

/// Diesel model for [`crate::domain::filter::SearchFilter`].
#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::schema::user_filters)]
pub struct UserFilter {
    pub id: i32,
    pub user_id: i32,
    pub city: String,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub keywords: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_filters)]
pub struct NewUserFilter<'a> {
    pub user_id: i32,
    pub city: &'a str,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub keywords: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::user_filters)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateUserFilter<'a> {
    pub city: &'a str,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub keywords: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<UserFilter> for DomainSearchFilter {
    fn from(filter: UserFilter) -> Self {
        Self {
            id: filter.id,
            user_id: filter.user_id,
            city: filter.city,
            min_price: filter.min_price,
            max_price: filter.max_price,
            min_rooms: filter.min_rooms,
            max_rooms: filter.max_rooms,
            min_area: filter.min_area,
            max_area: filter.max_area,
            keywords: filter.keywords,
            is_active: filter.is_active,
            created_at: filter.created_at,
            updated_at: filter.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewSearchFilter> for NewUserFilter<'a> {
    fn from(filter: &'a DomainNewSearchFilter) -> Self {
        Self {
            user_id: filter.user_id,
            city: filter.city.as_str(),
            min_price: filter.min_price,
            max_price: filter.max_price,
            min_rooms: filter.min_rooms,
            max_rooms: filter.max_rooms,
            min_area: filter.min_area,
            max_area: filter.max_area,
            keywords: filter.keywords.as_deref(),
        }
    }
}

impl<'a> From<&'a DomainUpdateSearchFilter> for UpdateUserFilter<'a> {
    fn from(filter: &'a DomainUpdateSearchFilter) -> Self {
        Self {
            city: filter.city.as_str(),
            min_price: filter.min_price,
            max_price: filter.max_price,
            min_rooms: filter.min_rooms,
            max_rooms: filter.max_rooms,
            min_area: filter.min_area,
            max_area: filter.max_area,
            keywords: filter.keywords.as_deref(),
            is_active: filter.is_active,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn from_domain_new_creates_newfilter() {
        let domain = DomainNewSearchFilter::new(
            5,
            " Berlin ".to_string(),
            Some(500),
            Some(1500),
            Some(1.0),
            Some(4.0),
            None,
            None,
            Some(" balkon, garten ".to_string()),
        );
        let new: NewUserFilter = (&domain).into();
        assert_eq!(new.user_id, 5);
        assert_eq!(new.city, "Berlin");
        assert_eq!(new.min_price, Some(500));
        assert_eq!(new.keywords, Some("balkon, garten"));
    }

    #[test]
    fn filter_into_domain() {
        let now: NaiveDateTime = Utc::now().naive_utc();
        let db_filter = UserFilter {
            id: 1,
            user_id: 5,
            city: "Hamburg".to_string(),
            min_price: None,
            max_price: Some(1200),
            min_rooms: Some(2.0),
            max_rooms: None,
            min_area: None,
            max_area: None,
            keywords: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let domain: DomainSearchFilter = db_filter.into();
        assert_eq!(domain.city, "Hamburg");
        assert_eq!(domain.max_price, Some(1200));
        assert!(domain.is_active);
    }
}
