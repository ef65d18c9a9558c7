//! Immowelt search client.
//!
//! Result items arrive in two shapes: the documented flat form
//! (`price`/`rooms`/`area` at the top level) and a newer one that buries
//! the numbers in `hardFacts`, `keyfacts` strings and `rawData`. The
//! converter walks both, most specific first, before falling back to
//! free-text extraction.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::domain::listing::{ListingSource, NewListing};
use crate::providers::{parse, ListingProvider, ProviderError, SearchParams};

const SEARCH_URL: &str = "https://api.immowelt.de/v1/search";

pub struct ImmoweltProvider {
    client: Client,
    api_key: String,
}

impl ImmoweltProvider {
    #[must_use]
    pub fn new(client: Client, api_key: String) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ListingProvider for ImmoweltProvider {
    fn name(&self) -> &'static str {
        "immowelt"
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<NewListing>, ProviderError> {
        let mut body = Map::new();
        body.insert("propertyType".to_string(), "apartment".into());
        body.insert("purpose".to_string(), "rent".into());
        body.insert("location".to_string(), params.city.clone().into());
        if let Some(max_price) = params.max_price {
            body.insert("maxPrice".to_string(), max_price.into());
        }
        if let Some(max_rooms) = params.max_rooms {
            body.insert("maxRooms".to_string(), max_rooms.into());
        }

        let response = self
            .client
            .post(SEARCH_URL)
            .bearer_auth(&self.api_key)
            .json(&Value::Object(body))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: "immowelt",
                status,
            });
        }

        let payload: Value = response.json().await?;
        Ok(parse_payload(&payload, &params.city))
    }
}

fn parse_payload(payload: &Value, fallback_city: &str) -> Vec<NewListing> {
    payload
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .map(|result| convert(result, fallback_city))
                .collect()
        })
        .unwrap_or_default()
}

fn hard_fact(prop: &Value, fact_type: &str) -> Option<f64> {
    let facts = prop.get("hardFacts")?.get("facts")?.as_array()?;
    facts.iter().find_map(|fact| {
        if fact.get("type").and_then(Value::as_str) != Some(fact_type) {
            return None;
        }
        fact.get("splitValue")
            .and_then(parse::number_from)
            .filter(|n| *n > 0.0)
    })
}

fn hard_facts_price(prop: &Value) -> Option<f64> {
    let price = prop.get("hardFacts")?.get("price")?;
    parse::number_from(price)
        .or_else(|| price.get("value").and_then(parse::number_from))
        .or_else(|| price.get("formatted").and_then(parse::number_from))
        .filter(|n| *n > 0.0)
}

/// `keyfacts` is a list of display strings like `"2,5 Zimmer"`; the marker
/// picks the string, the German number parser pulls the value.
fn keyfacts_number(prop: &Value, markers: &[&str]) -> Option<f64> {
    let facts = prop.get("hardFacts")?.get("keyfacts")?.as_array()?;
    facts.iter().find_map(|fact| {
        let text = fact.as_str()?;
        if markers.iter().any(|marker| text.contains(marker)) {
            parse::german_number(text).filter(|n| *n > 0.0)
        } else {
            None
        }
    })
}

fn raw_data_number(prop: &Value, key: &str) -> Option<f64> {
    let raw = prop.get("rawData")?;
    let value = if key == "surface" {
        raw.get("surface")?.get("main")
    } else {
        raw.get(key)
    };
    value.and_then(parse::number_from).filter(|n| *n > 0.0)
}

fn raw_id(prop: &Value) -> Option<String> {
    for key in ["id", "listingId", "adId"] {
        match prop.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.trim().to_string()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn gallery_images(prop: &Value) -> Vec<String> {
    prop.get("gallery")
        .and_then(|gallery| gallery.get("images"))
        .and_then(Value::as_array)
        .map(|images| {
            images
                .iter()
                .filter_map(|img| img.get("url").and_then(Value::as_str))
                .filter(|url| url.starts_with("http"))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn convert(prop: &Value, fallback_city: &str) -> NewListing {
    let title = parse::string_field(prop, &["title", "name"])
        .map_or_else(|| format!("Wohnung in {fallback_city}"), str::to_string);

    let mut description = parse::string_field(prop, &["description", "text"]).map(str::to_string);
    if let Some(main) = prop.get("mainDescription") {
        if let Some(text) = parse::string_field(main, &["description", "headline"]) {
            if text.len() > description.as_deref().map_or(0, str::len) {
                description = Some(text.to_string());
            }
        }
    }

    let free_text = format!("{title} {}", description.as_deref().unwrap_or_default());

    let price = hard_facts_price(prop)
        .or_else(|| keyfacts_number(prop, &["€"]))
        .or_else(|| raw_data_number(prop, "price"))
        .or_else(|| parse::field_number(prop, parse::PRICE_FIELDS))
        .or_else(|| parse::attribute_number(prop, &["price", "miete", "kaltmiete", "warmmiete"]))
        .or_else(|| parse::price_from_text(&free_text))
        .unwrap_or(0.0);

    let rooms = hard_fact(prop, "numberOfRooms")
        .or_else(|| keyfacts_number(prop, &["Zimmer", "Zi."]))
        .or_else(|| raw_data_number(prop, "nbroom"))
        .or_else(|| parse::field_number(prop, parse::ROOM_FIELDS))
        .or_else(|| parse::attribute_number(prop, &["zimmer", "rooms"]))
        .or_else(|| parse::rooms_from_text(&free_text))
        .unwrap_or(0.0);

    let area = hard_fact(prop, "livingSpace")
        .or_else(|| keyfacts_number(prop, &["m²", "qm"]))
        .or_else(|| raw_data_number(prop, "surface"))
        .or_else(|| parse::field_number(prop, parse::AREA_FIELDS))
        .or_else(|| parse::attribute_number(prop, &["wohnfläche", "wohnflaeche", "qm", "m²"]))
        .or_else(|| parse::area_from_text(&free_text))
        .unwrap_or(0.0);

    let address = prop.get("address");
    let location_city = prop
        .get("location")
        .and_then(|location| location.get("address"))
        .and_then(|a| parse::string_field(a, &["city"]));
    let city = address
        .and_then(|a| parse::string_field(a, &["city"]))
        .or_else(|| parse::string_field(prop, &["city"]))
        .or(location_city)
        .map_or_else(|| fallback_city.to_string(), str::to_string);

    let district = parse::string_field(prop, &["district", "neighborhood", "quarter"])
        .or_else(|| address.and_then(|a| parse::string_field(a, &["district", "suburb"])))
        .map(str::to_string);
    let street = address
        .and_then(|a| parse::string_field(a, &["street"]))
        .map(str::to_string);
    let postal_code = address
        .and_then(|a| parse::string_field(a, &["postalCode", "zip"]))
        .map(str::to_string);

    let original_url = parse::string_field(prop, parse::URL_FIELDS)
        .map(str::to_string)
        .or_else(|| {
            parse::pick_nested(prop, parse::URL_FIELDS)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default();

    let external_id = match raw_id(prop) {
        Some(id) => format!("immowelt_api_{id}"),
        None => format!(
            "immowelt_api_{}",
            parse::stable_external_id("immowelt", &original_url, "")
        ),
    };

    let mut images = gallery_images(prop);
    images.extend(parse::collect_images(prop, &original_url));
    let mut seen = HashSet::new();
    images.retain(|url| seen.insert(url.clone()));
    images.truncate(10);

    NewListing {
        external_id,
        source: ListingSource::Immowelt,
        title,
        description,
        price: price.max(0.0).round() as i32,
        price_type: "rent".to_string(),
        city,
        district,
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
