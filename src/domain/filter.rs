use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A saved apartment search owned by one user. Users may keep several;
/// inactive ones are ignored by the monitor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchFilter {
    pub id: i32,
    pub user_id: i32,
    pub city: String,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    /// Comma separated, soft criterion: never rejects a listing on its own.
    pub keywords: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewSearchFilter {
    pub user_id: i32,
    pub city: String,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub keywords: Option<String>,
}

impl NewSearchFilter {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: i32,
        city: String,
        min_price: Option<i32>,
        max_price: Option<i32>,
        min_rooms: Option<f64>,
        max_rooms: Option<f64>,
        min_area: Option<f64>,
        max_area: Option<f64>,
        keywords: Option<String>,
    ) -> Self {
        Self {
            user_id,
            city: city.trim().to_string(),
            min_price,
            max_price,
            min_rooms,
            max_rooms,
            min_area,
            max_area,
            keywords: keywords
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct UpdateSearchFilter {
    pub city: String,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    pub min_rooms: Option<f64>,
    pub max_rooms: Option<f64>,
    pub min_area: Option<f64>,
    pub max_area: Option<f64>,
    pub keywords: Option<String>,
    pub is_active: bool,
}

impl UpdateSearchFilter {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        city: String,
        min_price: Option<i32>,
        max_price: Option<i32>,
        min_rooms: Option<f64>,
        max_rooms: Option<f64>,
        min_area: Option<f64>,
        max_area: Option<f64>,
        keywords: Option<String>,
        is_active: bool,
    ) -> Self {
        Self {
            city: city.trim().to_string(),
            min_price,
            max_price,
            min_rooms,
            max_rooms,
            min_area,
            max_area,
            keywords: keywords
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            is_active,
        }
    }
}
