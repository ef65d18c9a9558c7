use std::collections::HashSet;

use crate::{
    db::{DbConnection, DbPool},
    domain::{
        filter::{NewSearchFilter, SearchFilter, UpdateSearchFilter},
        listing::{Listing, ListingSource, NewListing},
        notification::{NewNotification, Notification},
        subscription::{NewSubscription, Subscription},
        user::{NewUser, UpdateProfile, User},
    },
    repository::errors::{RepositoryError, RepositoryResult},
};

pub mod errors;
pub mod filter;
pub mod listing;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod notification;
pub mod subscription;
pub mod user;

/// Diesel-backed repository implementing every reader/writer trait below.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn conn(&self) -> Result<DbConnection, RepositoryError> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone)]
pub struct ListingListQuery {
    pub city: Option<String>,
    pub source: Option<ListingSource>,
    pub pagination: Option<Pagination>,
}

impl ListingListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self {
            city: None,
            source: None,
            pagination: None,
        }
    }

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn source(mut self, source: ListingSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

impl Default for ListingListQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Criteria for searching stored listings. Bounds are applied as given;
/// callers clamp `max_price` to the configured cap before building one.
#[derive(Debug, Clone, Default)]
pub struct ListingSearchQuery {
    pub city: Option<String>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub pagination: Option<Pagination>,
}

impl ListingSearchQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn price_range(mut self, min: Option<i32>, max: Option<i32>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    #[must_use]
    pub fn rooms_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_rooms = min;
        self.max_rooms = max;
        self
    }

    #[must_use]
    pub fn area_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_area = min;
        self.max_area = max;
        self
    }

    #[must_use]
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct NotificationListQuery {
    pub user_id: i32,
    pub limit: Option<i64>,
}

impl NotificationListQuery {
    #[must_use]
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            limit: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    /// Users entitled to notifications right now.
    fn list_users_with_active_subscription(&self) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn update_user(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User>;
}

pub trait SubscriptionReader {
    fn get_current_subscription(&self, user_id: i32) -> RepositoryResult<Option<Subscription>>;
    fn user_has_active_subscription(&self, user_id: i32) -> RepositoryResult<bool>;
}

pub trait SubscriptionWriter {
    fn create_subscription(
        &self,
        new_subscription: &NewSubscription,
    ) -> RepositoryResult<Subscription>;
}

pub trait FilterReader {
    fn get_filter_by_id(&self, id: i32) -> RepositoryResult<Option<SearchFilter>>;
    fn list_filters_for_user(&self, user_id: i32) -> RepositoryResult<Vec<SearchFilter>>;
    fn list_active_filters_for_user(&self, user_id: i32) -> RepositoryResult<Vec<SearchFilter>>;
}

pub trait FilterWriter {
    fn create_filter(&self, new_filter: &NewSearchFilter) -> RepositoryResult<SearchFilter>;
    fn update_filter(
        &self,
        filter_id: i32,
        updates: &UpdateSearchFilter,
    ) -> RepositoryResult<SearchFilter>;
}

pub trait ListingReader {
    fn get_listing_by_id(&self, id: i32) -> RepositoryResult<Option<Listing>>;
    fn get_listing_by_key(
        &self,
        source: &ListingSource,
        external_id: &str,
    ) -> RepositoryResult<Option<Listing>>;
    fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)>;
    fn search_listings(&self, query: ListingSearchQuery)
    -> RepositoryResult<(usize, Vec<Listing>)>;
    /// Keys of every stored listing, shaped `{source}_{external_id}`.
    fn list_known_listing_keys(&self) -> RepositoryResult<HashSet<String>>;
}

pub trait ListingWriter {
    /// Insert the listing or refresh the existing `(external_id, source)`
    /// row, returning the stored form.
    fn upsert_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing>;
    fn delete_listings_older_than(&self, days: i64) -> RepositoryResult<usize>;
}

pub trait NotificationReader {
    fn list_notifications_for_user(
        &self,
        query: NotificationListQuery,
    ) -> RepositoryResult<Vec<(Notification, Listing)>>;
    fn notification_exists(&self, user_id: i32, apartment_id: i32) -> RepositoryResult<bool>;
}

pub trait NotificationWriter {
    fn create_notification(
        &self,
        new_notification: &NewNotification,
    ) -> RepositoryResult<Notification>;
}
