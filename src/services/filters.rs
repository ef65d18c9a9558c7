//! Saved-search management.

use crate::domain::auth::AuthenticatedUser;
use crate::domain::filter::{NewSearchFilter, SearchFilter, UpdateSearchFilter};
use crate::repository::{FilterReader, FilterWriter};
use crate::services::{ServiceError, ServiceResult};

fn check_ranges(
    min_price: Option<i32>,
    max_price: Option<i32>,
    min_rooms: Option<f64>,
    max_rooms: Option<f64>,
    min_area: Option<f64>,
    max_area: Option<f64>,
) -> ServiceResult<()> {
    if let (Some(min), Some(max)) = (min_price, max_price) {
        if min > max {
            return Err(ServiceError::Validation("inverted price range".into()));
        }
    }
    if let (Some(min), Some(max)) = (min_rooms, max_rooms) {
        if min > max {
            return Err(ServiceError::Validation("inverted rooms range".into()));
        }
    }
    if let (Some(min), Some(max)) = (min_area, max_area) {
        if min > max {
            return Err(ServiceError::Validation("inverted area range".into()));
        }
    }
    Ok(())
}

pub fn list_filters<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<SearchFilter>>
where
    R: FilterReader + ?Sized,
{
    repo.list_filters_for_user(user.sub)
        .map_err(ServiceError::from)
}

/// Stores a new saved search owned by the caller.
pub fn create_filter<R>(
    repo: &R,
    user: &AuthenticatedUser,
    new_filter: NewSearchFilter,
) -> ServiceResult<SearchFilter>
where
    R: FilterWriter + ?Sized,
{
    if new_filter.city.trim().is_empty() {
        return Err(ServiceError::Validation("city must not be empty".into()));
    }
    check_ranges(
        new_filter.min_price,
        new_filter.max_price,
        new_filter.min_rooms,
        new_filter.max_rooms,
        new_filter.min_area,
        new_filter.max_area,
    )?;

    let new_filter = NewSearchFilter {
        user_id: user.sub,
        ..new_filter
    };

    repo.create_filter(&new_filter).map_err(ServiceError::from)
}

/// Updates a saved search; callers can only touch their own.
pub fn update_filter<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filter_id: i32,
    updates: UpdateSearchFilter,
) -> ServiceResult<SearchFilter>
where
    R: FilterReader + FilterWriter + ?Sized,
{
    let existing = repo
        .get_filter_by_id(filter_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if existing.user_id != user.sub {
        return Err(ServiceError::NotFound);
    }

    if updates.city.trim().is_empty() {
        return Err(ServiceError::Validation("city must not be empty".into()));
    }
    check_ranges(
        updates.min_price,
        updates.max_price,
        updates.min_rooms,
        updates.max_rooms,
        updates.min_area,
        updates.max_area,
    )?;

    repo.update_filter(filter_id, &updates)
        .map_err(ServiceError::from)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use chrono::Utc;

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser::new(7, "user@example.com")
    }

    fn stored_filter(id: i32, user_id: i32) -> SearchFilter {
        let now = Utc::now().naive_utc();
        SearchFilter {
            id,
            user_id,
            city: "Berlin".to_string(),
            min_price: Some(500),
            max_price: Some(1500),
            min_rooms: None,
            max_rooms: None,
            min_area: None,
            max_area: None,
            keywords: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn create_filter_binds_owner_and_validates_ranges() {
        let mut repo = MockRepository::new();
        repo.expect_create_filter()
            .times(1)
            .withf(|new_filter| new_filter.user_id == 7 && new_filter.city == "Berlin")
            .returning(|_| Ok(stored_filter(1, 7)));

        let payload = NewSearchFilter::new(
            0, // overridden with the caller id
            "Berlin".to_string(),
            Some(500),
            Some(1500),
            None,
            None,
            None,
            None,
            None,
        );
        let created = create_filter(&repo, &caller(), payload).unwrap();
        assert_eq!(created.user_id, 7);
    }

    #[test]
    fn create_filter_rejects_inverted_price_range() {
        let repo = MockRepository::new();
        let payload = NewSearchFilter::new(
            0,
            "Berlin".to_string(),
            Some(1500),
            Some(500),
            None,
            None,
            None,
            None,
            None,
        );

        let result = create_filter(&repo, &caller(), payload);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn update_filter_hides_foreign_filters() {
        let mut repo = MockRepository::new();
        repo.expect_get_filter_by_id()
            .times(1)
            .returning(|id| Ok(Some(stored_filter(id, 99))));

        let updates = UpdateSearchFilter::new(
            "Berlin".to_string(),
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            true,
        );
        let result = update_filter(&repo, &caller(), 3, updates);

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
