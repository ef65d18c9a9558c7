//! Listing index and search payloads.

use serde::Deserialize;
use validator::Validate;

use crate::services::listings::{ListingSearchParams, ListingsQuery};

/// Query parameters accepted by `GET /api/v1/apartments`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingsQueryParams {
    pub city: Option<String>,
    pub source: Option<String>,
    pub page: Option<usize>,
}

impl From<ListingsQueryParams> for ListingsQuery {
    fn from(params: ListingsQueryParams) -> Self {
        ListingsQuery {
            city: params.city,
            source: params.source,
            page: params.page,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
/// Body of `POST /api/v1/apartments/search`.
pub struct SearchRequest {
    pub city: Option<String>,
    #[validate(range(min = 0))]
    pub min_price: Option<i32>,
    #[validate(range(min = 0))]
    pub max_price: Option<i32>,
    #[validate(range(min = 0.0))]
    pub min_rooms: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_rooms: Option<f64>,
    #[validate(range(min = 0.0))]
    pub min_area: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_area: Option<f64>,
    pub page: Option<usize>,
}

impl From<&SearchRequest> for ListingSearchParams {
    fn from(req: &SearchRequest) -> Self {
        ListingSearchParams {
            city: req.city.clone(),
            min_price: req.min_price,
            max_price: req.max_price,
            min_rooms: req.min_rooms,
            max_rooms: req.max_rooms,
            min_area: req.min_area,
            max_area: req.max_area,
            page: req.page,
        }
    }
}
