//! Telegram delivery of matched listings.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::listing::Listing;

const API_BASE: &str = "https://api.telegram.org";
/// Caption length Telegram tolerates comfortably; longer descriptions are cut.
const PREVIEW_CHARS: usize = 900;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("telegram request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("telegram rejected the message: {0}")]
    Rejected(String),
}

/// Outbound notification channel. The worker talks to this trait so tests can
/// swap in a mock instead of the Telegram Bot API.
#[cfg_attr(feature = "test-mocks", mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_listing(&self, chat_id: i64, listing: &Listing) -> Result<(), NotifierError>;
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifierError>;
}

pub struct TelegramNotifier {
    client: Client,
    token: String,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(client: Client, token: String) -> Self {
        Self { client, token }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{API_BASE}/bot{token}/{method}", token = self.token)
    }

    async fn call(&self, method: &str, payload: &Value) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or_default();
        let accepted = status.is_success()
            && body.get("ok").and_then(Value::as_bool).unwrap_or(false);
        if !accepted {
            let detail = body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or(status.as_str())
                .to_string();
            return Err(NotifierError::Rejected(detail));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send_listing(&self, chat_id: i64, listing: &Listing) -> Result<(), NotifierError> {
        let caption = caption(listing);
        let markup = reply_markup(listing);

        if let Some(photo) = listing.images.iter().find(|u| u.starts_with("http")) {
            let mut payload = json!({
                "chat_id": chat_id,
                "photo": photo,
                "caption": caption,
            });
            if let Some(markup) = &markup {
                payload["reply_markup"] = markup.clone();
            }
            match self.call("sendPhoto", &payload).await {
                Ok(()) => return Ok(()),
                Err(err) => log::warn!("sendPhoto failed, falling back to text: {err}"),
            }
        }

        let mut payload = json!({ "chat_id": chat_id, "text": caption });
        if let Some(markup) = markup {
            payload["reply_markup"] = markup;
        }
        self.call("sendMessage", &payload).await
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), NotifierError> {
        let payload = json!({ "chat_id": chat_id, "text": text });
        self.call("sendMessage", &payload).await
    }
}

/// German caption shown under the photo or as the message body.
fn caption(listing: &Listing) -> String {
    let city = listing.city.trim();
    let header = if city.is_empty() {
        format!("🏠 {}", listing.title)
    } else {
        format!("🏠 Wohnung in {city}")
    };

    let price = if listing.price > 0 {
        format!("{} €", listing.price)
    } else {
        "keine Angabe".to_string()
    };
    let rooms = if listing.rooms > 0.0 {
        format_count(listing.rooms)
    } else {
        "keine Angabe".to_string()
    };
    let area = if listing.area > 0.0 {
        format!("{} m²", format_count(listing.area))
    } else {
        "keine Angabe".to_string()
    };
    let location = listing
        .district
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(if city.is_empty() { "keine Angabe" } else { city });

    let mut text = format!(
        "{header}\n\n💰 Preis: {price}\n🏠 Zimmer: {rooms}\n📐 Fläche: {area}\n📍 Lage: {location}"
    );
    if let Some(preview) = description_preview(listing.description.as_deref()) {
        text.push_str("\n\n");
        text.push_str(&preview);
    }
    text
}

fn format_count(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn description_preview(description: Option<&str>) -> Option<String> {
    let text = description?.trim();
    if text.is_empty() {
        return None;
    }
    let total = text.chars().count();
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if total > PREVIEW_CHARS {
        preview.push_str("...");
    }
    Some(preview)
}

/// Inline keyboard with the apply button, omitted when the listing has no
/// usable link.
fn reply_markup(listing: &Listing) -> Option<Value> {
    listing.apply_url().map(|url| {
        json!({
            "inline_keyboard": [[{ "text": "Jetzt bewerben", "url": url }]],
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingSource;
    use chrono::Utc;

    fn test_listing() -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: 7,
            external_id: "w42".to_string(),
            source: ListingSource::Immowelt,
            title: "Helle Altbauwohnung".to_string(),
            description: Some("Schöne Wohnung mit Balkon.".to_string()),
            price: 1250,
            price_type: "rent".to_string(),
            city: "Berlin".to_string(),
            district: Some("Kreuzberg".to_string()),
            street: None,
            postal_code: None,
            rooms: 2.5,
            area: 68.0,
            floor: None,
            total_floors: None,
            property_type: "apartment".to_string(),
            features: vec![],
            images: vec!["https://cdn.example.com/1.jpg".to_string()],
            contact_info: serde_json::Value::Null,
            original_url: "https://example.com/expose/w42".to_string(),
            application_url: Some("https://example.com/apply/w42".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn caption_lists_the_key_facts() {
        let text = caption(&test_listing());

        assert!(text.starts_with("🏠 Wohnung in Berlin\n\n"));
        assert!(text.contains("💰 Preis: 1250 €"));
        assert!(text.contains("🏠 Zimmer: 2.5"));
        assert!(text.contains("📐 Fläche: 68 m²"));
        assert!(text.contains("📍 Lage: Kreuzberg"));
        assert!(text.ends_with("Schöne Wohnung mit Balkon."));
    }

    #[test]
    fn caption_marks_missing_values() {
        let mut listing = test_listing();
        listing.price = 0;
        listing.rooms = 0.0;
        listing.area = 0.0;
        listing.district = None;
        listing.description = None;

        let text = caption(&listing);

        assert!(text.contains("💰 Preis: keine Angabe"));
        assert!(text.contains("🏠 Zimmer: keine Angabe"));
        assert!(text.contains("📐 Fläche: keine Angabe"));
        assert!(text.contains("📍 Lage: Berlin"));
        assert!(!text.contains("\n\n\n"));
    }

    #[test]
    fn caption_without_city_uses_the_title() {
        let mut listing = test_listing();
        listing.city = "  ".to_string();
        listing.district = None;

        let text = caption(&listing);
        assert!(text.starts_with("🏠 Helle Altbauwohnung"));
        assert!(text.contains("📍 Lage: keine Angabe"));
    }

    #[test]
    fn long_descriptions_are_previewed() {
        let mut listing = test_listing();
        listing.description = Some("a".repeat(1200));

        let text = caption(&listing);
        assert!(text.ends_with("..."));

        let preview = text.split("\n\n").last().unwrap();
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn markup_prefers_the_application_url() {
        let listing = test_listing();
        let markup = reply_markup(&listing).unwrap();
        assert_eq!(
            markup["inline_keyboard"][0][0]["url"],
            "https://example.com/apply/w42"
        );
        assert_eq!(markup["inline_keyboard"][0][0]["text"], "Jetzt bewerben");
    }

    #[test]
    fn markup_is_omitted_without_a_usable_link() {
        let mut listing = test_listing();
        listing.application_url = None;
        listing.original_url = "ftp://example.com/w42".to_string();

        assert!(reply_markup(&listing).is_none());
    }

    #[test]
    fn whole_counts_drop_the_decimal() {
        assert_eq!(format_count(3.0), "3");
        assert_eq!(format_count(2.5), "2.5");
    }
}
