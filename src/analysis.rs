//! Rule-based apartment assessment with an optional LLM narrative.

use reqwest::Client;
use serde_json::{json, Value};

use crate::domain::listing::Listing;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Description characters handed to the narrative prompt.
const PROMPT_DESCRIPTION_CHARS: usize = 1200;

/// €/m² thresholds per city: very good / good / fair, with the upper band
/// edge used for display.
const CITY_BANDS: [(&str, [f64; 4]); 10] = [
    ("berlin", [18.0, 22.0, 28.0, 35.0]),
    ("münchen", [22.0, 28.0, 35.0, 45.0]),
    ("hamburg", [20.0, 25.0, 32.0, 40.0]),
    ("köln", [16.0, 20.0, 26.0, 32.0]),
    ("frankfurt", [18.0, 23.0, 30.0, 38.0]),
    ("stuttgart", [17.0, 22.0, 28.0, 35.0]),
    ("düsseldorf", [19.0, 24.0, 30.0, 38.0]),
    ("leipzig", [12.0, 16.0, 20.0, 25.0]),
    ("dortmund", [11.0, 15.0, 19.0, 24.0]),
    ("essen", [10.0, 14.0, 18.0, 23.0]),
];
const DEFAULT_BANDS: [f64; 4] = [15.0, 20.0, 25.0, 30.0];

const POPULAR_CITIES: [&str; 5] = ["berlin", "münchen", "hamburg", "köln", "frankfurt"];
const PREMIUM_DISTRICTS: [&str; 5] = [
    "mitte",
    "kreuzberg",
    "neukölln",
    "charlottenburg",
    "prenzlauer berg",
];

/// Canonical feature names and the German/English keywords that reveal them
/// in free text.
const FEATURE_KEYWORDS: [(&str, &[&str]); 16] = [
    ("balcony", &["balkon", "balcony", "terrasse", "terrace"]),
    ("garden", &["garten", "garden", "hof", "courtyard"]),
    ("parking", &["parkplatz", "parking", "garage", "stellplatz"]),
    ("elevator", &["aufzug", "elevator", "lift", "fahrstuhl"]),
    (
        "modern_kitchen",
        &["einbauküche", "modern kitchen", "neue küche", "vollausgestattete küche"],
    ),
    ("heating", &["heizung", "heating", "zentralheizung", "gasheizung"]),
    ("internet", &["internet", "wlan", "wifi", "dsl", "glasfaser"]),
    ("washing_machine", &["waschmaschine", "washing machine", "waschkeller"]),
    ("dishwasher", &["geschirrspüler", "dishwasher", "spülmaschine"]),
    ("furnished", &["möbliert", "furnished", "vollmöbliert", "eingerichtet"]),
    ("unfurnished", &["unmöbliert", "unfurnished", "leer"]),
    ("pets_allowed", &["haustiere", "pets", "hund", "katze"]),
    ("smoking", &["rauchen", "smoking", "nichtraucher"]),
    ("floor", &["etage", "stockwerk", "ebene"]),
    ("basement", &["keller", "basement", "kellerraum"]),
    ("attic", &["dachgeschoss", "attic", "dachboden"]),
];

const PREMIUM_FEATURES: [&str; 6] = [
    "balcony",
    "garden",
    "parking",
    "elevator",
    "modern_kitchen",
    "furnished",
];
const BASIC_FEATURES: [&str; 5] = [
    "heating",
    "internet",
    "washing_machine",
    "dishwasher",
    "basement",
];

#[derive(Clone, Debug, PartialEq)]
pub struct ListingAnalysis {
    pub score: u8,
    pub price: PriceAssessment,
    pub location: LocationStatus,
    pub features: FeatureAssessment,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceAssessment {
    pub status: PriceStatus,
    /// Rounded to two decimals; `None` when the price is unknown.
    pub price_per_sqm: Option<f64>,
    /// The area was derived from the room count instead of the listing.
    pub estimated_area: bool,
    /// Market band for the city, for display.
    pub market_range: Option<(f64, f64)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceStatus {
    VeryGood,
    Good,
    Fair,
    Expensive,
    Unknown,
}

impl PriceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PriceStatus::VeryGood => "very_good",
            PriceStatus::Good => "good",
            PriceStatus::Fair => "fair",
            PriceStatus::Expensive => "expensive",
            PriceStatus::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationStatus {
    PremiumLocation,
    PopularCity,
    Unknown,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureAssessment {
    pub detected: Vec<&'static str>,
    pub premium: Vec<&'static str>,
    pub missing_basics: Vec<&'static str>,
}

/// Scores a listing from its stored fields alone. Deterministic, so repeated
/// runs over the same listing agree.
#[must_use]
pub fn analyze(listing: &Listing) -> ListingAnalysis {
    let price = assess_price(listing);
    let location = assess_location(listing);
    let features = assess_features(listing);
    let pros = collect_pros(listing, &price, location, &features);
    let cons = collect_cons(listing, &price, &features);
    let score = score(&price, location, &features, &pros, &cons);
    let recommendations = recommend(score, &price, &features);

    ListingAnalysis {
        score,
        price,
        location,
        features,
        pros,
        cons,
        recommendations,
    }
}

fn city_bands(city: &str) -> [f64; 4] {
    CITY_BANDS
        .iter()
        .find(|(name, _)| *name == city)
        .map_or(DEFAULT_BANDS, |(_, bands)| *bands)
}

fn assess_price(listing: &Listing) -> PriceAssessment {
    if listing.price <= 0 {
        return PriceAssessment {
            status: PriceStatus::Unknown,
            price_per_sqm: None,
            estimated_area: false,
            market_range: None,
        };
    }

    let estimated_area = listing.area <= 0.0;
    let area = if estimated_area {
        if listing.rooms > 0.0 {
            listing.rooms * 25.0
        } else {
            50.0
        }
    } else {
        listing.area
    };

    let per_sqm = (f64::from(listing.price) / area * 100.0).round() / 100.0;
    let bands = city_bands(&listing.city.trim().to_lowercase());
    let status = if per_sqm <= bands[0] {
        PriceStatus::VeryGood
    } else if per_sqm <= bands[1] {
        PriceStatus::Good
    } else if per_sqm <= bands[2] {
        PriceStatus::Fair
    } else {
        PriceStatus::Expensive
    };

    PriceAssessment {
        status,
        price_per_sqm: Some(per_sqm),
        estimated_area,
        market_range: Some((bands[0], bands[3])),
    }
}

fn assess_location(listing: &Listing) -> LocationStatus {
    let city = listing.city.trim().to_lowercase();
    if !POPULAR_CITIES.contains(&city.as_str()) {
        return LocationStatus::Unknown;
    }

    let district = listing
        .district
        .as_deref()
        .map(|d| d.trim().to_lowercase())
        .unwrap_or_default();
    if PREMIUM_DISTRICTS.contains(&district.as_str()) {
        LocationStatus::PremiumLocation
    } else {
        LocationStatus::PopularCity
    }
}

fn assess_features(listing: &Listing) -> FeatureAssessment {
    let haystack = format!(
        "{} {} {}",
        listing.title,
        listing.description.as_deref().unwrap_or(""),
        listing.features.join(" ")
    )
    .to_lowercase();

    let detected: Vec<&'static str> = FEATURE_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| haystack.contains(k)))
        .map(|(name, _)| *name)
        .collect();

    let premium = detected
        .iter()
        .copied()
        .filter(|name| PREMIUM_FEATURES.contains(name))
        .collect();
    let missing_basics = BASIC_FEATURES
        .iter()
        .copied()
        .filter(|name| !detected.contains(name))
        .collect();

    FeatureAssessment {
        detected,
        premium,
        missing_basics,
    }
}

fn german_feature(name: &str) -> &'static str {
    match name {
        "balcony" => "Balkon",
        "garden" => "Garten",
        "parking" => "Parkplatz",
        "elevator" => "Aufzug",
        "modern_kitchen" => "Einbauküche",
        "heating" => "Heizung",
        "internet" => "Internet",
        "washing_machine" => "Waschmaschine",
        "dishwasher" => "Geschirrspüler",
        "furnished" => "möbliert",
        "unfurnished" => "unmöbliert",
        "pets_allowed" => "Haustiere erlaubt",
        "smoking" => "Rauchen",
        "floor" => "Etage",
        "basement" => "Keller",
        "attic" => "Dachgeschoss",
        _ => "Merkmal",
    }
}

fn feature_list(names: &[&'static str], limit: usize) -> String {
    names
        .iter()
        .take(limit)
        .map(|n| german_feature(n))
        .collect::<Vec<_>>()
        .join(", ")
}

fn collect_pros(
    listing: &Listing,
    price: &PriceAssessment,
    location: LocationStatus,
    features: &FeatureAssessment,
) -> Vec<String> {
    let mut pros = Vec::new();

    if matches!(price.status, PriceStatus::VeryGood | PriceStatus::Good) {
        pros.push("💰 Wettbewerbsfähiger Preis für die Lage".to_string());
    }
    if matches!(
        location,
        LocationStatus::PremiumLocation | LocationStatus::PopularCity
    ) {
        pros.push("📍 Hervorragende Lage in einem beliebten Gebiet".to_string());
    }
    if !features.premium.is_empty() {
        pros.push(format!(
            "✨ Premium-Ausstattung: {}",
            feature_list(&features.premium, 3)
        ));
    }

    if listing.area > 80.0 && listing.rooms >= 3.0 {
        pros.push("🏠 Geräumige Wohnung mit guter Raumaufteilung".to_string());
    } else if listing.area > 50.0 {
        pros.push("📐 Gute Größe für die Zimmeranzahl".to_string());
    }

    if features.detected.contains(&"furnished") {
        pros.push("🪑 Vollständig möblierte Wohnung".to_string());
    }
    if features.detected.contains(&"balcony") {
        pros.push("🌿 Balkon oder Terrasse vorhanden".to_string());
    }

    if pros.is_empty() {
        pros.push("✅ Erfüllt grundlegende Anforderungen".to_string());
    }
    pros
}

fn collect_cons(
    listing: &Listing,
    price: &PriceAssessment,
    features: &FeatureAssessment,
) -> Vec<String> {
    let mut cons = Vec::new();

    if price.status == PriceStatus::Expensive {
        cons.push("💸 Preis liegt über dem Marktdurchschnitt".to_string());
    }
    if !features.missing_basics.is_empty() {
        cons.push(format!(
            "❌ Fehlende Basismerkmale: {}",
            feature_list(&features.missing_basics, 3)
        ));
    }

    if listing.area < 30.0 && listing.rooms > 1.0 {
        cons.push("📏 Kleine Fläche für die Zimmeranzahl".to_string());
    } else if listing.area < 20.0 {
        cons.push("📏 Sehr kleine Wohnung".to_string());
    }

    if listing.city.trim().is_empty() {
        cons.push("📍 Unvollständige Standortinformationen".to_string());
    }

    if cons.is_empty() {
        cons.push("⚠️ Begrenzte Informationen verfügbar".to_string());
    }
    cons
}

fn score(
    price: &PriceAssessment,
    location: LocationStatus,
    features: &FeatureAssessment,
    pros: &[String],
    cons: &[String],
) -> u8 {
    let mut score: i32 = 50;

    score += match price.status {
        PriceStatus::VeryGood => 20,
        PriceStatus::Good => 10,
        PriceStatus::Expensive => -15,
        PriceStatus::Fair | PriceStatus::Unknown => 0,
    };
    score += match location {
        LocationStatus::PremiumLocation => 15,
        LocationStatus::PopularCity => 10,
        LocationStatus::Unknown => 0,
    };

    if !features.premium.is_empty() {
        score += i32::min(features.premium.len() as i32 * 2, 10);
    }
    if !features.missing_basics.is_empty() {
        score -= i32::min(features.missing_basics.len() as i32 * 3, 15);
    }

    score += (pros.len() as i32 - cons.len() as i32) * 2;
    score.clamp(0, 100) as u8
}

fn recommend(score: u8, price: &PriceAssessment, features: &FeatureAssessment) -> Vec<String> {
    let mut recommendations: Vec<String> = match score {
        80..=100 => vec![
            "🚀 Sehr empfehlenswert, schnell handeln!".to_string(),
            "💡 Diese Wohnung bietet ein hervorragendes Preis-Leistungs-Verhältnis".to_string(),
        ],
        60..=79 => vec![
            "✅ Gute Option, einen Blick wert".to_string(),
            "📋 Prüfen Sie alle Details vor der Entscheidung".to_string(),
        ],
        40..=59 => vec![
            "⚠️ Überlegen Sie sorgfältig, es gibt einige Punkte".to_string(),
            "🔍 Vergleichen Sie mit anderen Optionen".to_string(),
        ],
        _ => vec![
            "❌ Nicht empfohlen, beachten Sie andere Optionen".to_string(),
            "💡 Wahrscheinlich gibt es bessere Angebote".to_string(),
        ],
    };

    if price.status == PriceStatus::Expensive {
        recommendations.push("💰 Ziehen Sie eine Preisverhandlung in Betracht".to_string());
    }
    if !features.missing_basics.is_empty() {
        recommendations.push("🔧 Prüfen Sie, ob die fehlenden Merkmale kritisch sind".to_string());
    }

    recommendations
}

/// Message body the worker sends after the listing notification.
#[must_use]
pub fn summary_text(listing: &Listing, analysis: &ListingAnalysis, narrative: Option<&str>) -> String {
    let mut text = format!(
        "🤖 KI-Analyse\n\n🏠 {title}\n\n📊 Gesamtbewertung: {score}/100\n",
        title = listing.title,
        score = analysis.score
    );

    text.push_str("\n✅ Vorteile:\n");
    for pro in &analysis.pros {
        text.push_str(&format!("• {pro}\n"));
    }
    text.push_str("\n❌ Nachteile:\n");
    for con in &analysis.cons {
        text.push_str(&format!("• {con}\n"));
    }
    text.push_str("\n💡 Empfehlungen:\n");
    for rec in &analysis.recommendations {
        text.push_str(&format!("• {rec}\n"));
    }

    text.push_str("\n📈 Marktanalyse:\n");
    match (analysis.price.price_per_sqm, analysis.price.market_range) {
        (Some(per_sqm), Some((low, high))) => {
            text.push_str(&format!(
                "💰 Preis: {per_sqm:.2} €/m² (Spanne {low:.0}-{high:.0} €/m²)"
            ));
            if analysis.price.estimated_area {
                text.push_str(" (geschätzte Fläche)");
            }
            text.push('\n');
        }
        _ => text.push_str("💰 Preis: keine Angabe\n"),
    }
    let location = match analysis.location {
        LocationStatus::PremiumLocation => "Premium-Lage in beliebter Stadt",
        LocationStatus::PopularCity => "beliebte Stadt",
        LocationStatus::Unknown => "keine Einordnung",
    };
    text.push_str(&format!("📍 Lage: {location}\n"));
    text.push_str(&format!(
        "✨ Ausstattung: {} Merkmale erkannt\n",
        analysis.features.detected.len()
    ));

    if let Some(narrative) = narrative {
        text.push_str(&format!("\n🧠 Ausführliche Analyse:\n{narrative}"));
    }
    text
}

/// Chat-completion client for the optional free-text assessment. Failures
/// only cost the narrative, never the rule-based analysis.
pub struct OpenAiNarrator {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiNarrator {
    #[must_use]
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    pub async fn narrate(&self, listing: &Listing, analysis: &ListingAnalysis) -> Option<String> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "You are a helpful real estate analyst." },
                { "role": "user", "content": prompt(listing, analysis) },
            ],
            "temperature": 0.5,
            "max_tokens": 700,
        });

        let response = match self
            .client
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                log::warn!("narrative request failed: {err}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!("narrative request rejected: {}", response.status());
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                log::warn!("narrative response unreadable: {err}");
                return None;
            }
        };
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    }
}

fn prompt(listing: &Listing, analysis: &ListingAnalysis) -> String {
    let description: String = listing
        .description
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(PROMPT_DESCRIPTION_CHARS)
        .collect();

    format!(
        "Du bist ein Immobilien-Assistent. Erstelle eine ausführliche Analyse der Wohnung auf Deutsch.\n\
         Antworte strukturiert mit den Abschnitten:\n\
         1) Kurzes Fazit (2-3 Sätze)\n\
         2) Vorteile (Aufzählung)\n\
         3) Nachteile (Aufzählung)\n\
         4) Preisanalyse (nenne den Preis pro m² und den Status: {status})\n\
         5) Empfehlungen (konkrete Schritte)\n\
         6) Risiken, worauf zu achten ist\n\n\
         Daten: Titel={title}, Stadt={city}, Bezirk={district}, Preis={price}€, Fläche={area}m², Zimmer={rooms}.\n\
         Beschreibung: {description}",
        status = analysis.price.status.as_str(),
        title = listing.title,
        city = listing.city,
        district = listing.district.as_deref().unwrap_or(""),
        price = listing.price,
        area = listing.area,
        rooms = listing.rooms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingSource;
    use chrono::Utc;

    fn test_listing() -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: 1,
            external_id: "a1".to_string(),
            source: ListingSource::Immowelt,
            title: "Objekt 12".to_string(),
            description: None,
            price: 1000,
            price_type: "rent".to_string(),
            city: "Berlin".to_string(),
            district: None,
            street: None,
            postal_code: None,
            rooms: 2.0,
            area: 60.0,
            floor: None,
            total_floors: None,
            property_type: "apartment".to_string(),
            features: vec![],
            images: vec![],
            contact_info: serde_json::Value::Null,
            original_url: "https://example.com/a1".to_string(),
            application_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn price_bands_are_city_specific() {
        let mut listing = test_listing();
        listing.price = 1200;
        listing.area = 60.0;

        // 20 €/m² sits differently depending on the market.
        let berlin = assess_price(&listing);
        assert_eq!(berlin.status, PriceStatus::Good);
        assert_eq!(berlin.price_per_sqm, Some(20.0));

        listing.city = "München".to_string();
        assert_eq!(assess_price(&listing).status, PriceStatus::VeryGood);

        listing.city = "Potsdam".to_string();
        let default_band = assess_price(&listing);
        assert_eq!(default_band.status, PriceStatus::Good);
        assert_eq!(default_band.market_range, Some((15.0, 30.0)));
    }

    #[test]
    fn unknown_price_short_circuits() {
        let mut listing = test_listing();
        listing.price = 0;

        let price = assess_price(&listing);
        assert_eq!(price.status, PriceStatus::Unknown);
        assert!(price.price_per_sqm.is_none());
        assert!(!price.estimated_area);
    }

    #[test]
    fn missing_area_is_estimated_from_rooms() {
        let mut listing = test_listing();
        listing.area = 0.0;
        listing.rooms = 2.0;
        listing.price = 1000;

        let price = assess_price(&listing);
        assert!(price.estimated_area);
        // 1000 € over an estimated 50 m².
        assert_eq!(price.price_per_sqm, Some(20.0));

        listing.rooms = 0.0;
        assert_eq!(assess_price(&listing).price_per_sqm, Some(20.0));
    }

    #[test]
    fn location_tiers() {
        let mut listing = test_listing();
        assert_eq!(assess_location(&listing), LocationStatus::PopularCity);

        listing.district = Some("Kreuzberg".to_string());
        assert_eq!(assess_location(&listing), LocationStatus::PremiumLocation);

        listing.city = "Dresden".to_string();
        assert_eq!(assess_location(&listing), LocationStatus::Unknown);
    }

    #[test]
    fn features_are_detected_from_text() {
        let mut listing = test_listing();
        listing.description =
            Some("Balkon, Einbauküche und Keller vorhanden.".to_string());

        let features = assess_features(&listing);
        assert_eq!(features.detected, vec!["balcony", "modern_kitchen", "basement"]);
        assert_eq!(features.premium, vec!["balcony", "modern_kitchen"]);
        assert_eq!(
            features.missing_basics,
            vec!["heating", "internet", "washing_machine", "dishwasher"]
        );
    }

    #[test]
    fn explicit_features_count_too() {
        let mut listing = test_listing();
        listing.features = vec!["Stellplatz".to_string()];

        let features = assess_features(&listing);
        assert!(features.detected.contains(&"parking"));
    }

    #[test]
    fn well_rounded_listing_scores_high() {
        let mut listing = test_listing();
        listing.district = Some("Mitte".to_string());
        listing.description = Some(
            "Balkon, Einbauküche, Heizung, Internet, Waschmaschine, Geschirrspüler, Keller"
                .to_string(),
        );

        let analysis = analyze(&listing);

        // 50 + 20 (price) + 15 (location) + 4 (two premium features)
        // + (5 pros - 1 con) * 2
        assert_eq!(analysis.score, 97);
        assert_eq!(analysis.price.status, PriceStatus::VeryGood);
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("Sehr empfehlenswert")));
        assert_eq!(analysis.cons, vec!["⚠️ Begrenzte Informationen verfügbar"]);
    }

    #[test]
    fn sparse_overpriced_listing_scores_low() {
        let mut listing = test_listing();
        listing.city = String::new();
        listing.price = 5000;
        listing.area = 18.0;
        listing.rooms = 3.0;

        let analysis = analyze(&listing);

        // 50 - 15 (expensive) - 15 (all basics missing) + (1 pro - 4 cons) * 2
        assert_eq!(analysis.score, 14);
        assert_eq!(analysis.price.status, PriceStatus::Expensive);
        assert!(analysis
            .cons
            .iter()
            .any(|c| c.contains("Unvollständige Standortinformationen")));
        assert!(analysis
            .recommendations
            .iter()
            .any(|r| r.contains("Preisverhandlung")));
    }

    #[test]
    fn summary_carries_all_sections() {
        let listing = test_listing();
        let analysis = analyze(&listing);
        let text = summary_text(&listing, &analysis, Some("Solide Wahl."));

        assert!(text.starts_with("🤖 KI-Analyse"));
        assert!(text.contains(&format!("📊 Gesamtbewertung: {}/100", analysis.score)));
        assert!(text.contains("✅ Vorteile:\n• "));
        assert!(text.contains("❌ Nachteile:\n• "));
        assert!(text.contains("📈 Marktanalyse:"));
        assert!(text.contains("Spanne 18-35 €/m²"));
        assert!(text.ends_with("🧠 Ausführliche Analyse:\nSolide Wahl."));
    }

    #[test]
    fn prompt_names_the_price_status() {
        let listing = test_listing();
        let analysis = analyze(&listing);
        let prompt = prompt(&listing, &analysis);

        assert!(prompt.contains("Status: very_good"));
        assert!(prompt.contains("Stadt=Berlin"));
    }

    #[test]
    fn score_clamps_to_the_bounds() {
        let mut listing = test_listing();
        listing.city = "München".to_string();
        listing.district = Some("Mitte".to_string());
        listing.area = 90.0;
        listing.rooms = 3.0;
        listing.description = Some(
            "Möbliert, mit Balkon, Garten, Stellplatz, Aufzug, Einbauküche, Heizung, \
             Internet, Waschmaschine, Geschirrspüler und Keller."
                .to_string(),
        );

        // 105 before the clamp.
        assert_eq!(analyze(&listing).score, 100);

        let price = PriceAssessment {
            status: PriceStatus::Expensive,
            price_per_sqm: Some(60.0),
            estimated_area: false,
            market_range: Some((15.0, 30.0)),
        };
        let features = FeatureAssessment {
            detected: vec![],
            premium: vec![],
            missing_basics: BASIC_FEATURES.to_vec(),
        };
        let cons: Vec<String> = (0..12).map(|i| format!("con {i}")).collect();

        // 50 - 15 - 15 - 24 lands below zero.
        assert_eq!(
            score(&price, LocationStatus::Unknown, &features, &[], &cons),
            0
        );
    }
}
