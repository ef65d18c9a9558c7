//! ImmoScout24 search client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::domain::listing::{ListingSource, NewListing};
use crate::providers::{parse, ListingProvider, ProviderError, SearchParams};

const SEARCH_URL: &str =
    "https://rest.immobilienscout24.de/restapi/api/search/v1.0/search/region";

/// Geocode ids for the cities users actually ask for. Unknown cities are
/// passed through verbatim and left to the API to resolve.
const GEOCODES: &[(&str, &str)] = &[
    ("berlin", "AD08DE6681"),
    ("hamburg", "AD08DE6683"),
    ("münchen", "AD08DE6679"),
    ("muenchen", "AD08DE6679"),
    ("munich", "AD08DE6679"),
    ("köln", "AD08DE6748"),
    ("koeln", "AD08DE6748"),
    ("cologne", "AD08DE6748"),
    ("frankfurt am main", "AD08DE6678"),
    ("frankfurt", "AD08DE6678"),
    ("stuttgart", "AD08DE6691"),
    ("düsseldorf", "AD08DE6698"),
    ("duesseldorf", "AD08DE6698"),
    ("dusseldorf", "AD08DE6698"),
    ("leipzig", "AD08DE6707"),
    ("dortmund", "AD08DE6696"),
    ("essen", "AD08DE6700"),
    ("bremen", "AD08DE6685"),
    ("dresden", "AD08DE6695"),
];

pub struct ImmoScoutProvider {
    client: Client,
    api_key: String,
}

impl ImmoScoutProvider {
    #[must_use]
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ListingProvider for ImmoScoutProvider {
    fn name(&self) -> &'static str {
        "immobilienscout24"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<NewListing>, ProviderError> {
        let response = self
            .client
            .post(SEARCH_URL)
            .bearer_auth(&self.api_key)
            .json(&build_body(params))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: "immobilienscout24",
                status,
            });
        }

        let payload: Value = response.json().await?;
        Ok(parse_payload(&payload, &params.city))
    }
}

fn geocode_for(city: &str) -> Option<&'static str> {
    let key = city.trim().to_lowercase();
    GEOCODES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, id)| *id)
}

fn build_body(params: &SearchParams) -> Value {
    let mut body = serde_json::json!({
        "realEstateType": "APARTMENT_RENT",
        "publishChannel": "RENT",
        "sorting": "RELEVANCE",
    });

    if !params.city.trim().is_empty() {
        let geocode =
            geocode_for(&params.city).map_or_else(|| params.city.trim().to_string(), str::to_string);
        body["geocodes"] = serde_json::json!([{"geocodeId": geocode, "type": "CITY"}]);
    }

    if params.min_price.is_some() || params.max_price.is_some() {
        let mut price = Map::new();
        if let Some(min) = params.min_price {
            price.insert("min".to_string(), min.into());
        }
        if let Some(max) = params.max_price {
            price.insert("max".to_string(), max.into());
        }
        body["price"] = Value::Object(price);
    }

    if params.min_rooms.is_some() || params.max_rooms.is_some() {
        let mut rooms = Map::new();
        if let Some(min) = params.min_rooms {
            rooms.insert("min".to_string(), min.into());
        }
        if let Some(max) = params.max_rooms {
            rooms.insert("max".to_string(), max.into());
        }
        body["numberOfRooms"] = Value::Object(rooms);
    }

    body
}

fn parse_payload(payload: &Value, fallback_city: &str) -> Vec<NewListing> {
    payload
        .get("resultlist.resultlist")
        .and_then(|list| list.get("resultlistEntries"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| convert(entry, fallback_city))
                .collect()
        })
        .unwrap_or_default()
}

fn raw_id(prop: &Value) -> Option<String> {
    match prop.get("@id") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn convert(prop: &Value, fallback_city: &str) -> NewListing {
    let title = parse::string_field(prop, &["title"])
        .map_or_else(|| format!("Wohnung in {fallback_city}"), str::to_string);
    let description = parse::string_field(prop, &["description"]).map(str::to_string);

    let price = parse::field_number(prop, &["price"]).unwrap_or(0.0);
    let rooms = parse::field_number(prop, &["numberOfRooms"]).unwrap_or(0.0);
    let area = parse::field_number(prop, &["livingSpace"]).unwrap_or(0.0);

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

    let id = raw_id(prop);
    let original_url = id
        .as_deref()
        .map(|id| format!("https://www.immobilienscout24.de/expose/{id}"))
        .unwrap_or_default();

    let external_id = match &id {
        Some(id) => format!("is24_api_{id}"),
        None => format!(
            "is24_api_{}",
            parse::stable_external_id("immobilienscout24", &original_url, "")
        ),
    };

    let images = prop
        .get("galleryAttachments")
        .and_then(Value::as_array)
        .map(|attachments| {
            attachments
                .iter()
                .filter_map(|a| a.get("href").and_then(Value::as_str))
                .filter_map(|href| parse::resolve_url(href, &original_url))
                .take(10)
                .collect()
        })
        .unwrap_or_default();

    NewListing {
        external_id,
        source: ListingSource::ImmoScout24,
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
        images,
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
    fn body_carries_geocode_and_ranges() {
        let params = SearchParams {
            city: "Berlin".to_string(),
            min_price: Some(500),
            max_price: Some(1500),
            min_rooms: Some(1.0),
            max_rooms: None,
            ..Default::default()
        };

        let body = build_body(&params);
        assert_eq!(body["realEstateType"], "APARTMENT_RENT");
        assert_eq!(body["geocodes"][0]["geocodeId"], "AD08DE6681");
        assert_eq!(body["price"]["min"], 500);
        assert_eq!(body["price"]["max"], 1500);
        assert_eq!(body["numberOfRooms"]["min"], 1.0);
        assert!(body["numberOfRooms"].get("max").is_none());
    }

    #[test]
    fn unknown_city_is_passed_verbatim() {
        let params = SearchParams {
            city: "Wiesbaden".to_string(),
            ..Default::default()
        };

        let body = build_body(&params);
        assert_eq!(body["geocodes"][0]["geocodeId"], "Wiesbaden");
        assert!(body.get("price").is_none());
    }

    #[test]
    fn entries_become_listings_with_expose_urls() {
        let payload = json!({
            "resultlist.resultlist": {
                "resultlistEntries": [{
                    "@id": 120_444_555,
                    "title": "2-Zimmer-Wohnung in Friedrichshain",
                    "price": {"value": 980, "currency": "EUR"},
                    "numberOfRooms": 2,
                    "livingSpace": 58.3,
                    "address": {"city": "Berlin", "postalCode": "10245"},
                    "galleryAttachments": [
                        {"href": "//pictures.is24.de/a.jpg"},
                        {"title": "no href"}
                    ]
                }]
            }
        });

        let listings = parse_payload(&payload, "Berlin");
        assert_eq!(listings.len(), 1);

        let listing = &listings[0];
        assert_eq!(listing.external_id, "is24_api_120444555");
        assert_eq!(
            listing.original_url,
            "https://www.immobilienscout24.de/expose/120444555"
        );
        assert_eq!(listing.price, 980);
        assert_eq!(listing.area, 58.3);
        assert_eq!(listing.images, vec!["https://pictures.is24.de/a.jpg"]);
    }

    #[test]
    fn empty_payload_yields_nothing() {
        assert!(parse_payload(&json!({}), "Berlin").is_empty());
    }
}
