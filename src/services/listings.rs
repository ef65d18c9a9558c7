//! Read access to stored listings.

use crate::domain::listing::{Listing, ListingSource};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ListingListQuery, ListingReader, ListingSearchQuery};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the listings index.
#[derive(Debug, Default)]
pub struct ListingsQuery {
    pub city: Option<String>,
    pub source: Option<String>,
    pub page: Option<usize>,
}

/// Search criteria posted by a caller; `max_price` is clamped to the cap.
#[derive(Debug, Default)]
pub struct ListingSearchParams {
    pub city: Option<String>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub page: Option<usize>,
}

/// Returns the newest listings first, one page at a time.
pub fn list_listings<R>(repo: &R, params: ListingsQuery) -> ServiceResult<Paginated<Listing>>
where
    R: ListingReader + ?Sized,
{
    let page = params.page.unwrap_or(1).max(1);
    let mut query = ListingListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(city) = params.city.filter(|c| !c.trim().is_empty()) {
        query = query.city(city.trim());
    }
    if let Some(source) = params.source.filter(|s| !s.trim().is_empty()) {
        query = query.source(ListingSource::from(source.trim()));
    }

    let (total, listings) = repo.list_listings(query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(listings, page, total_pages))
}

pub fn get_listing<R>(repo: &R, listing_id: i32) -> ServiceResult<Option<Listing>>
where
    R: ListingReader + ?Sized,
{
    repo.get_listing_by_id(listing_id)
        .map_err(ServiceError::from)
}

/// Searches stored listings with the caller's criteria, capping `max_price`
/// at `max_price_cap` so overly broad price filters stay bounded.
pub fn search_listings<R>(
    repo: &R,
    max_price_cap: i32,
    params: ListingSearchParams,
) -> ServiceResult<Paginated<Listing>>
where
    R: ListingReader + ?Sized,
{
    let page = params.page.unwrap_or(1).max(1);

    let mut query = ListingSearchQuery::new()
        .price_range(
            params.min_price,
            params.max_price.map(|p| p.min(max_price_cap)),
        )
        .rooms_range(params.min_rooms, params.max_rooms)
        .area_range(params.min_area, params.max_area)
        .paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(city) = params.city.filter(|c| !c.trim().is_empty()) {
        query = query.city(city.trim());
    }

    let (total, listings) = repo.search_listings(query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(listings, page, total_pages))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    #[test]
    fn search_listings_caps_max_price() {
        let mut repo = MockRepository::new();
        repo.expect_search_listings()
            .times(1)
            .withf(|query| query.max_price == Some(5000) && query.min_price == Some(500))
            .returning(|_| Ok((0, vec![])));

        let params = ListingSearchParams {
            min_price: Some(500),
            max_price: Some(999_999),
            ..Default::default()
        };

        let page = search_listings(&repo, 5000, params).unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn list_listings_passes_city_filter() {
        let mut repo = MockRepository::new();
        repo.expect_list_listings()
            .times(1)
            .withf(|query| query.city.as_deref() == Some("Hamburg"))
            .returning(|_| Ok((0, vec![])));

        let params = ListingsQuery {
            city: Some(" Hamburg ".to_string()),
            ..Default::default()
        };

        list_listings(&repo, params).unwrap();
    }
}
