use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub id: i32,
    pub external_id: String,
    pub source: ListingSource,
    pub title: String,
    pub description: Option<String>,
    /// EUR per month; `0` means "price on request".
    pub price: i32,
    pub price_type: String,
    pub city: String,
    pub district: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    /// `0.0` means unknown.
    pub rooms: f64,
    /// Square meters; `0.0` means unknown.
    pub area: f64,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub property_type: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub contact_info: Value,
    pub original_url: String,
    pub application_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum ListingSource {
    EstateSync,
    ImmoScout24,
    Immowelt,
    Other(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewListing {
    pub external_id: String,
    pub source: ListingSource,
    pub title: String,
    pub description: Option<String>,
    pub price: i32,
    pub price_type: String,
    pub city: String,
    pub district: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub rooms: f64,
    pub area: f64,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub property_type: String,
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub contact_info: Value,
    pub original_url: String,
    pub application_url: Option<String>,
}

impl Listing {
    /// Key used to recognize a listing across polling cycles.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}_{}", self.source, self.external_id)
    }

    /// Link a user should follow to apply, preferring the dedicated
    /// application URL over the listing page.
    #[must_use]
    pub fn apply_url(&self) -> Option<&str> {
        self.application_url
            .as_deref()
            .filter(|u| u.starts_with("http"))
            .or_else(|| Some(self.original_url.as_str()).filter(|u| u.starts_with("http")))
    }
}

impl NewListing {
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}_{}", self.source, self.external_id)
    }

    /// A listing is worth keeping when it carries at least one usable signal.
    #[must_use]
    pub fn has_substance(&self) -> bool {
        self.price > 0
            || self.rooms > 0.0
            || self.area > 0.0
            || self.title.trim().len() > 10
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.trim().len() > 20)
            || !self.original_url.is_empty()
    }

    /// Strips markup from the free-text fields before they are stored or
    /// forwarded to users.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.title = ammonia::clean(&self.title);
        self.description = self
            .description
            .map(|d| ammonia::clean(&d))
            .filter(|d| !d.trim().is_empty());
        self
    }
}

impl Display for ListingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingSource::EstateSync => write!(f, "estatesync"),
            ListingSource::ImmoScout24 => write!(f, "immobilienscout24"),
            ListingSource::Immowelt => write!(f, "immowelt"),
            ListingSource::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for ListingSource {
    fn from(s: &str) -> Self {
        match s {
            "estatesync" => ListingSource::EstateSync,
            "immobilienscout24" => ListingSource::ImmoScout24,
            "immowelt" => ListingSource::Immowelt,
            _ => ListingSource::Other(s.to_string()),
        }
    }
}

impl From<String> for ListingSource {
    fn from(s: String) -> Self {
        s.as_str().into()
    }
}
