//! Saved-search payloads.

use serde::Deserialize;
use validator::Validate;

use crate::domain::filter::{NewSearchFilter, UpdateSearchFilter};

#[derive(Deserialize, Validate)]
/// Body of `POST /api/v1/filters`.
pub struct CreateFilterRequest {
    #[validate(length(min = 1, max = 120))]
    pub city: String,
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
    /// Comma separated keywords, matched softly against listing text.
    pub keywords: Option<String>,
}

impl From<&CreateFilterRequest> for NewSearchFilter {
    /// Owner id is bound by the service from the authenticated caller.
    fn from(req: &CreateFilterRequest) -> Self {
        NewSearchFilter::new(
            0,
            req.city.clone(),
            req.min_price,
            req.max_price,
            req.min_rooms,
            req.max_rooms,
            req.min_area,
            req.max_area,
            req.keywords.clone(),
        )
    }
}

#[derive(Deserialize, Validate)]
/// Body of `PUT /api/v1/filters/{id}`.
pub struct UpdateFilterRequest {
    #[validate(length(min = 1, max = 120))]
    pub city: String,
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
    pub keywords: Option<String>,
    /// Inactive filters are kept but ignored by the monitor.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl From<&UpdateFilterRequest> for UpdateSearchFilter {
    fn from(req: &UpdateFilterRequest) -> Self {
        UpdateSearchFilter::new(
            req.city.clone(),
            req.min_price,
            req.max_price,
            req.min_rooms,
            req.max_rooms,
            req.min_area,
            req.max_area,
            req.keywords.clone(),
            req.is_active,
        )
    }
}
