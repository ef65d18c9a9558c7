//! Payload normalization shared by the provider clients.
//!
//! Provider responses are inconsistent even within one API, so extraction
//! works through prioritized field lists with free-text fallbacks. Numbers
//! follow German conventions: dots separate thousands, the comma is the
//! decimal separator.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub(crate) const PRICE_FIELDS: &[&str] = &[
    "price",
    "rent",
    "priceValue",
    "totalPrice",
    "coldRent",
    "totalRent",
    "rentPerMonth",
    "priceMonthly",
    "baseRent",
    "netRent",
    "grossRent",
    "warmRent",
    "rentPrice",
    "monthlyRent",
    "rentalPrice",
    "miete",
    "kaltmiete",
    "warmmiete",
    "gesamtmiete",
];

pub(crate) const ROOM_FIELDS: &[&str] = &[
    "rooms",
    "numRooms",
    "numberOfRooms",
    "roomCount",
    "bedrooms",
    "totalRooms",
    "zimmer",
    "anzahlZimmer",
];

pub(crate) const AREA_FIELDS: &[&str] = &[
    "area",
    "livingSpace",
    "livingArea",
    "size",
    "squareMeters",
    "floorArea",
    "totalArea",
    "usableArea",
    "wohnflaeche",
    "wohnfläche",
    "qm",
];

pub(crate) const URL_FIELDS: &[&str] = &[
    "applicationUrl",
    "adUrl",
    "detailUrl",
    "url",
    "link",
    "shareLink",
];

const IMAGE_FIELDS: &[&str] = &[
    "images",
    "imageUrls",
    "photos",
    "gallery",
    "pictures",
    "media",
    "attachments",
    "imageList",
    "photoUrls",
];

const MAX_IMAGES: usize = 10;

/// City names that providers spell differently than users do.
const CITY_ALIASES: &[&[&str]] = &[
    &["köln", "koeln", "cologne"],
    &["münchen", "muenchen", "munich"],
];

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9][0-9\.,\s]*").expect("valid pattern")
});

static PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d{1,3}(?:[\.,]\d{3})*(?:[\.,]\d+)?)\s*€",
        r"€\s*(\d{1,3}(?:[\.,]\d{3})*(?:[\.,]\d+)?)",
        r"(?i)(\d+(?:[\.,]\d+)?)\s*(?:eur|euro)",
        r"(?i)kaltmiete:?\s*(\d+(?:[\.,]\d+)?)",
        r"(?i)warmmiete:?\s*(\d+(?:[\.,]\d+)?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid pattern"))
    .collect()
});

static ROOMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[\.,]\d+)?)\s*(?:zimmer|zi\.?)").expect("valid pattern")
});

static AREA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+(?:[\.,]\d+)?)\s*(?:m²|qm|m\^2)",
        r"(?i)wohnfl(?:ä|ae)che:?\s*(\d+(?:[\.,]\d+)?)",
        r"(?i)fl(?:ä|ae)che:?\s*(\d+(?:[\.,]\d+)?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid pattern"))
    .collect()
});

static URL_ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?:)//([^/]+)").expect("valid pattern")
});

/// Parses the first number in `text` using German separators:
/// `"1.500,50 €"` → `1500.5`.
pub(crate) fn german_number(text: &str) -> Option<f64> {
    let matched = NUMBER.find(text)?;
    let cleaned = matched.as_str().replace(['.', ' '], "").replace(',', ".");
    cleaned.parse().ok()
}

/// Parses a plain decimal where the comma may stand in for the dot:
/// `"1,5"` → `1.5`. Used for regex captures that never carry thousands
/// separators.
fn comma_decimal(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse().ok()
}

pub(crate) fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => german_number(s),
        _ => None,
    }
}

/// Depth-first search for the first non-empty value under any of `keys`.
pub(crate) fn pick_nested<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    match value {
        Value::Object(map) => {
            for key in keys {
                if let Some(found) = map.get(*key) {
                    if !found.is_null() && found.as_str() != Some("") {
                        return Some(found);
                    }
                }
            }
            map.values().find_map(|v| pick_nested(v, keys))
        }
        Value::Array(items) => items.iter().find_map(|v| pick_nested(v, keys)),
        _ => None,
    }
}

/// First positive number found under any of `fields`. Direct keys win; a
/// direct hit that is itself an object is probed for `value`/`amount`/`text`
/// before the nested fallback scan.
pub(crate) fn field_number(item: &Value, fields: &[&str]) -> Option<f64> {
    if let Some(obj) = item.as_object() {
        for field in fields {
            if let Some(value) = obj.get(*field) {
                let direct = number_from(value).or_else(|| {
                    pick_nested(value, &["value", "amount", "text"]).and_then(number_from)
                });
                if let Some(n) = direct.filter(|n| *n > 0.0) {
                    return Some(n);
                }
            }
        }
    }

    pick_nested(item, fields)
        .and_then(number_from)
        .filter(|n| *n > 0.0)
}

/// Scans a generic `attributes` array of `{key/name, value/text}` objects
/// for a positive number whose key contains one of `key_fragments`.
pub(crate) fn attribute_number(item: &Value, key_fragments: &[&str]) -> Option<f64> {
    let attrs = item.get("attributes")?.as_array()?;

    for attr in attrs {
        let Some(obj) = attr.as_object() else {
            continue;
        };
        let key = obj
            .get("key")
            .or_else(|| obj.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();
        if !key_fragments.iter().any(|frag| key.contains(frag)) {
            continue;
        }
        let found = obj
            .get("value")
            .or_else(|| obj.get("text"))
            .and_then(number_from)
            .filter(|n| *n > 0.0);
        if found.is_some() {
            return found;
        }
    }

    None
}

pub(crate) fn price_from_text(text: &str) -> Option<f64> {
    for pattern in PRICE_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(price) = german_number(&captures[1]).filter(|p| *p > 0.0) {
                return Some(price);
            }
        }
    }
    None
}

pub(crate) fn rooms_from_text(text: &str) -> Option<f64> {
    ROOMS_PATTERN
        .captures(text)
        .and_then(|captures| comma_decimal(&captures[1]))
        .filter(|r| *r > 0.0)
}

pub(crate) fn area_from_text(text: &str) -> Option<f64> {
    for pattern in AREA_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(area) = comma_decimal(&captures[1]).filter(|a| *a > 0.0) {
                return Some(area);
            }
        }
    }
    None
}

/// First non-blank string under any of `keys`, direct members only.
pub(crate) fn string_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    let obj = item.as_object()?;
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Whether a listing city satisfies the requested one. Comparison is
/// case-insensitive, substring in either direction, with alias sets for
/// cities commonly transliterated.
pub(crate) fn city_matches(wanted: &str, actual: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    let actual = actual.trim().to_lowercase();

    if wanted.contains(&actual) || actual.contains(&wanted) {
        return true;
    }

    CITY_ALIASES.iter().any(|aliases| {
        aliases.contains(&wanted.as_str()) && aliases.contains(&actual.as_str())
    })
}

/// Resolves protocol-relative (`//host/x`) and host-relative (`/x`) URLs
/// against the listing page URL. Anything that does not come out as
/// http(s) is dropped.
pub(crate) fn resolve_url(raw: &str, base: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (scheme, host) = URL_ORIGIN
        .captures(base)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .unwrap_or_else(|| ("https:".to_string(), String::new()));

    let resolved = if let Some(rest) = raw.strip_prefix("//") {
        format!("{scheme}//{rest}")
    } else if raw.starts_with('/') && !host.is_empty() {
        format!("{scheme}//{host}{raw}")
    } else {
        raw.to_string()
    };

    (resolved.starts_with("http://") || resolved.starts_with("https://")).then_some(resolved)
}

/// Gathers image URLs from the usual fields, resolves them against the
/// listing URL, drops non-http entries and duplicates, and keeps at most
/// [`MAX_IMAGES`] in order.
pub(crate) fn collect_images(item: &Value, base_url: &str) -> Vec<String> {
    let mut found = Vec::new();

    if let Some(obj) = item.as_object() {
        for field in IMAGE_FIELDS {
            if let Some(value) = obj.get(*field) {
                push_image_urls(value, &mut found);
            }
        }
    }
    if found.is_empty() {
        if let Some(nested) = pick_nested(item, IMAGE_FIELDS) {
            push_image_urls(nested, &mut found);
        }
    }

    let mut seen = HashSet::new();
    found
        .iter()
        .filter_map(|raw| resolve_url(raw, base_url))
        .filter(|url| seen.insert(url.clone()))
        .take(MAX_IMAGES)
        .collect()
}

fn push_image_urls(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => {
            for item in items {
                push_image_urls(item, out);
            }
        }
        Value::Object(map) => {
            for key in ["url", "src", "href", "link"] {
                if let Some(Value::String(s)) = map.get(key) {
                    out.push(s.clone());
                    break;
                }
            }
        }
        _ => {}
    }
}

/// Deterministic 20-hex-char id for items whose provider id is missing,
/// derived from the source name, listing URL and raw id.
pub(crate) fn stable_external_id(source: &str, url: &str, listing_id: &str) -> String {
    let digest = Sha256::digest(format!("{source}|{url}|{listing_id}").as_bytes());
    let mut hex = String::with_capacity(20);
    for byte in &digest[..10] {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn german_number_handles_separators() {
        assert_eq!(german_number("1.500,50 €"), Some(1500.5));
        assert_eq!(german_number("ab 950€ warm"), Some(950.0));
        assert_eq!(german_number("2,5"), Some(2.5));
        assert_eq!(german_number("keine Angabe"), None);
    }

    #[test]
    fn text_extraction_covers_common_phrasings() {
        assert_eq!(price_from_text("Kaltmiete: 1.200 € zzgl. NK"), Some(1200.0));
        assert_eq!(price_from_text("nur 850€ monatlich"), Some(850.0));
        assert_eq!(rooms_from_text("Helle 2,5 Zimmer Wohnung"), Some(2.5));
        assert_eq!(rooms_from_text("3 Zi. Altbau"), Some(3.0));
        assert_eq!(area_from_text("ca. 54,5 m² Wohnfläche"), Some(54.5));
        assert_eq!(area_from_text("Wohnfläche: 80"), Some(80.0));
        assert_eq!(area_from_text("schöne Lage"), None);
    }

    #[test]
    fn field_number_prefers_direct_keys() {
        let item = json!({
            "price": {"value": "1.100"},
            "details": {"rent": 900}
        });
        assert_eq!(field_number(&item, PRICE_FIELDS), Some(1100.0));

        let nested_only = json!({"details": {"kaltmiete": "750 €"}});
        assert_eq!(field_number(&nested_only, PRICE_FIELDS), Some(750.0));
    }

    #[test]
    fn attribute_number_scans_key_value_pairs() {
        let item = json!({
            "attributes": [
                {"name": "Etage", "value": 3},
                {"key": "Zimmer", "text": "2,5"}
            ]
        });
        assert_eq!(attribute_number(&item, &["zimmer", "rooms"]), Some(2.5));
        assert_eq!(attribute_number(&item, &["preis"]), None);
    }

    #[test]
    fn city_matching_is_fuzzy() {
        assert!(city_matches("Berlin", "Berlin-Mitte"));
        assert!(city_matches("berlin", "BERLIN"));
        assert!(city_matches("Köln", "cologne"));
        assert!(city_matches("muenchen", "München"));
        assert!(!city_matches("Berlin", "Hamburg"));
        // An item without a city is not rejected here.
        assert!(city_matches("Berlin", ""));
    }

    #[test]
    fn resolve_url_handles_relative_forms() {
        let base = "https://www.immowelt.de/expose/abc";
        assert_eq!(
            resolve_url("//cdn.immowelt.de/img.jpg", base),
            Some("https://cdn.immowelt.de/img.jpg".to_string())
        );
        assert_eq!(
            resolve_url("/img/1.jpg", base),
            Some("https://www.immowelt.de/img/1.jpg".to_string())
        );
        assert_eq!(
            resolve_url("http://other.example/x.png", base),
            Some("http://other.example/x.png".to_string())
        );
        assert_eq!(resolve_url("data:image/png;base64,xyz", base), None);
    }

    #[test]
    fn collect_images_dedups_and_caps() {
        let urls: Vec<Value> = (0..15)
            .map(|i| Value::String(format!("https://img.example/{}.jpg", i % 12)))
            .collect();
        let item = json!({"images": urls});

        let images = collect_images(&item, "https://www.example.com/a");
        assert_eq!(images.len(), MAX_IMAGES);
        assert_eq!(images[0], "https://img.example/0.jpg");
    }

    #[test]
    fn collect_images_reads_object_entries() {
        let item = json!({
            "images": [{"url": "//cdn.example/1.jpg"}, {"src": "not-a-url"}]
        });
        let images = collect_images(&item, "https://www.example.com/a");
        assert_eq!(images, vec!["https://cdn.example/1.jpg".to_string()]);
    }

    #[test]
    fn stable_external_id_is_deterministic() {
        let a = stable_external_id("immowelt", "https://x.de/1", "99");
        let b = stable_external_id("immowelt", "https://x.de/1", "99");
        let c = stable_external_id("immowelt", "https://x.de/2", "99");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 20);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }
}
