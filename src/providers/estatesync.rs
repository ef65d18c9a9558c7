//! EstateSync client.
//!
//! The API is reachable under several path variants depending on the
//! account plan, so the search walks a fallback list until one answers.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::domain::listing::{ListingSource, NewListing};
use crate::providers::{parse, ListingProvider, ProviderError, SearchParams};

const ENDPOINTS: &[&str] = &[
    "https://api.estatesync.io/properties",
    "https://api.estatesync.io/listings",
    "https://api.estatesync.io/search",
];

pub struct EstateSyncProvider {
    client: Client,
    api_key: String,
}

impl EstateSyncProvider {
    #[must_use]
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ListingProvider for EstateSyncProvider {
    fn name(&self) -> &'static str {
        "estatesync"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<NewListing>, ProviderError> {
        let mut query = vec![
            ("city".to_string(), params.city.clone()),
            ("type".to_string(), "apartment".to_string()),
            ("purpose".to_string(), "rent".to_string()),
        ];
        if let Some(max_price) = params.max_price {
            query.push(("price_max".to_string(), max_price.to_string()));
        }
        if let Some(max_rooms) = params.max_rooms {
            query.push(("rooms_max".to_string(), max_rooms.to_string()));
        }

        let mut answered = false;
        let mut failure = None;

        for endpoint in ENDPOINTS {
            let response = self
                .client
                .get(*endpoint)
                .bearer_auth(&self.api_key)
                .query(&query)
                .send()
                .await?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                continue;
            }
            if !status.is_success() {
                log::warn!("estatesync endpoint {endpoint} returned {status}");
                failure = Some(ProviderError::Status {
                    provider: "estatesync",
                    status,
                });
                continue;
            }

            answered = true;
            let payload: Value = response.json().await?;
            let listings = parse_payload(&payload, &params.city);
            if !listings.is_empty() {
                return Ok(listings);
            }
        }

        match failure {
            Some(err) if !answered => Err(err),
            _ => Ok(vec![]),
        }
    }
}

fn parse_payload(payload: &Value, fallback_city: &str) -> Vec<NewListing> {
    let properties: &[Value] = match payload {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => ["data", "properties", "listings", "results"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map_or(&[], Vec::as_slice),
        _ => &[],
    };

    properties
        .iter()
        .map(|prop| convert(prop, fallback_city))
        .collect()
}

fn convert(prop: &Value, fallback_city: &str) -> NewListing {
    let title = parse::string_field(prop, &["title"])
        .map_or_else(|| format!("Wohnung in {fallback_city}"), str::to_string);
    let description = parse::string_field(prop, &["description"]).map(str::to_string);

    // "rent" outranks the generic "price"; some accounts nest both under
    // a "fields" object.
    let price = parse::field_number(prop, &["rent", "price"])
        .or_else(|| {
            prop.get("fields")
                .and_then(|fields| parse::field_number(fields, &["rent", "price"]))
        })
        .unwrap_or(0.0);
    let rooms = parse::field_number(prop, &["rooms"])
        .or_else(|| {
            prop.get("fields")
                .and_then(|fields| parse::field_number(fields, &["rooms"]))
        })
        .unwrap_or(0.0);
    let area = parse::field_number(prop, &["area"])
        .or_else(|| {
            prop.get("fields")
                .and_then(|fields| parse::field_number(fields, &["area"]))
        })
        .unwrap_or(0.0);

    let address = prop.get("address");
    let city = address
        .and_then(|a| parse::string_field(a, &["city"]))
        .map_or_else(|| fallback_city.to_string(), str::to_string);
    let street = address
        .and_then(|a| parse::string_field(a, &["street"]))
        .map(str::to_string);
    let postal_code = address
        .and_then(|a| parse::string_field(a, &["postalCode"]))
        .map(str::to_string);

    let raw_id = parse::string_field(prop, &["id"]);
    let original_url = parse::string_field(prop, &["url"])
        .map(str::to_string)
        .or_else(|| raw_id.map(|id| format!("https://estatesync.io/property/{id}")))
        .unwrap_or_default();

    let external_id = match raw_id {
        Some(id) => id.to_string(),
        None => parse::stable_external_id("estatesync", &original_url, ""),
    };

    NewListing {
        external_id,
        source: ListingSource::EstateSync,
        title,
        description,
        price: price.max(0.0).round() as i32,
        price_type: "rent".to_string(),
        city,
        district: None,
        street,
        postal_code,
        rooms,
        area,
        floor: None,
        total_floors: None,
        property_type: "apartment".to_string(),
        features: vec![],
        images: parse::collect_images(prop, &original_url),
        contact_info: Value::Null,
        original_url: original_url.clone(),
        application_url: Some(original_url).filter(|u| !u.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_payload_under_container_keys() {
        let payload = json!({
            "data": [{
                "id": "p-77",
                "title": "Altbauwohnung am Kanal",
                "rent": "1.150",
                "rooms": 3,
                "area": 72.5,
                "address": {"city": "Berlin", "street": "Maybachufer 5", "postalCode": "12047"},
                "url": "https://estatesync.io/property/p-77",
                "images": ["https://cdn.estatesync.io/p-77.jpg"]
            }]
        });

        let listings = parse_payload(&payload, "Berlin");
        assert_eq!(listings.len(), 1);

        let listing = &listings[0];
        assert_eq!(listing.external_id, "p-77");
        assert_eq!(listing.price, 1150);
        assert_eq!(listing.rooms, 3.0);
        assert_eq!(listing.city, "Berlin");
        assert_eq!(listing.street.as_deref(), Some("Maybachufer 5"));
        assert_eq!(listing.dedup_key(), "estatesync_p-77");
    }

    #[test]
    fn bare_array_and_missing_fields() {
        let payload = json!([{"fields": {"rent": 890, "rooms": "2"}}]);

        let listings = parse_payload(&payload, "Hamburg");
        assert_eq!(listings.len(), 1);

        let listing = &listings[0];
        assert_eq!(listing.title, "Wohnung in Hamburg");
        assert_eq!(listing.price, 890);
        assert_eq!(listing.rooms, 2.0);
        assert_eq!(listing.area, 0.0);
        // No provider id and no URL: the id falls back to the stable hash.
        assert_eq!(listing.external_id.len(), 20);
    }

    #[test]
    fn unknown_payload_shape_yields_nothing() {
        assert!(parse_payload(&json!("oops"), "Berlin").is_empty());
        assert!(parse_payload(&json!({"unexpected": 1}), "Berlin").is_empty());
    }
}
