//! Clients for the external listing APIs and the manager that blends them.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::listing::NewListing;

pub mod estatesync;
pub mod immoscout;
pub mod immowelt;
pub mod manager;
pub(crate) mod parse;

pub use manager::ProviderManager;

/// Criteria forwarded to the provider APIs. Unset bounds are left out of
/// the requests. Field order is fixed, so the serialized form is a stable
/// cache key.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct SearchParams {
    pub city: String,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
}

impl SearchParams {
    /// Baseline search for one city with the stock rental ranges the
    /// worker polls with.
    #[must_use]
    pub fn for_city(city: &str) -> Self {
        Self {
            city: city.trim().to_string(),
            min_price: Some(500),
            max_price: Some(1500),
            min_rooms: Some(1.0),
            max_rooms: Some(4.0),
            min_area: Some(30.0),
            max_area: Some(120.0),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} returned {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("unexpected payload from {provider}: {detail}")]
    Decode {
        provider: &'static str,
        detail: String,
    },
}

/// One listing source. Implementations normalize their payloads into
/// [`NewListing`] values; the manager drops empty or off-city items
/// before blending.
#[cfg_attr(feature = "test-mocks", mockall::automock)]
#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Stable name used for cooldown bookkeeping and logs.
    fn name(&self) -> &'static str;

    async fn search(&self, params: &SearchParams) -> Result<Vec<NewListing>, ProviderError>;
}
