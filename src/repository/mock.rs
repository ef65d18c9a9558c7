//! Mock repository implementations for isolating services in tests.

use std::collections::HashSet;

use mockall::mock;

use crate::domain::filter::{NewSearchFilter, SearchFilter, UpdateSearchFilter};
use crate::domain::listing::{Listing, ListingSource, NewListing};
use crate::domain::notification::{NewNotification, Notification};
use crate::domain::subscription::{NewSubscription, Subscription};
use crate::domain::user::{NewUser, UpdateProfile, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    FilterReader, FilterWriter, ListingListQuery, ListingReader, ListingSearchQuery,
    ListingWriter, NotificationListQuery, NotificationReader, NotificationWriter,
    SubscriptionReader, SubscriptionWriter, UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: i32) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
        fn list_users_with_active_subscription(&self) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn update_user(&self, user_id: i32, updates: &UpdateProfile) -> RepositoryResult<User>;
    }

    impl SubscriptionReader for Repository {
        fn get_current_subscription(&self, user_id: i32) -> RepositoryResult<Option<Subscription>>;
        fn user_has_active_subscription(&self, user_id: i32) -> RepositoryResult<bool>;
    }

    impl SubscriptionWriter for Repository {
        fn create_subscription(
            &self,
            new_subscription: &NewSubscription,
        ) -> RepositoryResult<Subscription>;
    }

    impl FilterReader for Repository {
        fn get_filter_by_id(&self, id: i32) -> RepositoryResult<Option<SearchFilter>>;
        fn list_filters_for_user(&self, user_id: i32) -> RepositoryResult<Vec<SearchFilter>>;
        fn list_active_filters_for_user(&self, user_id: i32) -> RepositoryResult<Vec<SearchFilter>>;
    }

    impl FilterWriter for Repository {
        fn create_filter(&self, new_filter: &NewSearchFilter) -> RepositoryResult<SearchFilter>;
        fn update_filter(
            &self,
            filter_id: i32,
            updates: &UpdateSearchFilter,
        ) -> RepositoryResult<SearchFilter>;
    }

    impl ListingReader for Repository {
        fn get_listing_by_id(&self, id: i32) -> RepositoryResult<Option<Listing>>;
        fn get_listing_by_key(
            &self,
            source: &ListingSource,
            external_id: &str,
        ) -> RepositoryResult<Option<Listing>>;
        fn list_listings(&self, query: ListingListQuery) -> RepositoryResult<(usize, Vec<Listing>)>;
        fn search_listings(
            &self,
            query: ListingSearchQuery,
        ) -> RepositoryResult<(usize, Vec<Listing>)>;
        fn list_known_listing_keys(&self) -> RepositoryResult<HashSet<String>>;
    }

    impl ListingWriter for Repository {
        fn upsert_listing(&self, new_listing: &NewListing) -> RepositoryResult<Listing>;
        fn delete_listings_older_than(&self, days: i64) -> RepositoryResult<usize>;
    }

    impl NotificationReader for Repository {
        fn list_notifications_for_user(
            &self,
            query: NotificationListQuery,
        ) -> RepositoryResult<Vec<(Notification, Listing)>>;
        fn notification_exists(&self, user_id: i32, apartment_id: i32) -> RepositoryResult<bool>;
    }

    impl NotificationWriter for Repository {
        fn create_notification(
            &self,
            new_notification: &NewNotification,
        ) -> RepositoryResult<Notification>;
    }
}
