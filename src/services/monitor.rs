//! Pure scheduling and matching rules used by the monitoring worker.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::domain::filter::SearchFilter;
use crate::domain::listing::Listing;
use crate::models::config::ServerConfig;

/// During business hours the poll interval never exceeds this many seconds,
/// quiet or not.
const BUSINESS_HOURS_INTERVAL_CAP: u64 = 30;

const BUSINESS_HOURS: std::ops::RangeInclusive<u32> = 9..=18;

/// Whether `hour` falls into the quiet window `[start, end)`, which may
/// cross midnight. An empty window (`start == end`) is never quiet.
#[must_use]
pub fn is_quiet_hours(hour: u32, start: u32, end: u32) -> bool {
    if start == end {
        false
    } else if start < end {
        start <= hour && hour < end
    } else {
        hour >= start || hour < end
    }
}

/// Seconds to sleep between polling cycles at the given hour of day.
#[must_use]
pub fn effective_check_interval(hour: u32, config: &ServerConfig) -> u64 {
    let mut interval = if is_quiet_hours(hour, config.quiet_hours_start, config.quiet_hours_end) {
        config.check_interval_quiet
    } else {
        config.check_interval
    };

    if BUSINESS_HOURS.contains(&hour) {
        interval = interval.min(BUSINESS_HOURS_INTERVAL_CAP);
    }

    interval
}

/// Whether a listing satisfies one saved search.
///
/// Criteria are checked in priority order: city containment first, then the
/// price, rooms and area ranges. A range is only applied when the listing
/// actually carries that value; zero means "unknown" and passes. Keywords
/// never reject on their own, see [`matched_keywords`].
#[must_use]
pub fn listing_matches_filter(listing: &Listing, filter: &SearchFilter) -> bool {
    let filter_city = filter.city.trim().to_lowercase();
    if !filter_city.is_empty() && !listing.city.to_lowercase().contains(&filter_city) {
        return false;
    }

    if listing.price > 0 {
        if let Some(min_price) = filter.min_price {
            if listing.price < min_price {
                return false;
            }
        }
        if let Some(max_price) = filter.max_price {
            if listing.price > max_price {
                return false;
            }
        }
    }

    if listing.rooms > 0.0 {
        if let Some(min_rooms) = filter.min_rooms {
            if listing.rooms < min_rooms {
                return false;
            }
        }
        if let Some(max_rooms) = filter.max_rooms {
            if listing.rooms > max_rooms {
                return false;
            }
        }
    }

    if listing.area > 0.0 {
        if let Some(min_area) = filter.min_area {
            if listing.area < min_area {
                return false;
            }
        }
        if let Some(max_area) = filter.max_area {
            if listing.area > max_area {
                return false;
            }
        }
    }

    true
}

/// Whether a listing satisfies any of the user's saved searches. A user
/// without active filters accepts everything.
#[must_use]
pub fn listing_matches_any(listing: &Listing, filters: &[SearchFilter]) -> bool {
    if filters.is_empty() {
        return true;
    }
    filters
        .iter()
        .any(|filter| listing_matches_filter(listing, filter))
}

/// Filter keywords found in the listing text. Informational only.
#[must_use]
pub fn matched_keywords(listing: &Listing, filter: &SearchFilter) -> Vec<String> {
    let Some(keywords) = &filter.keywords else {
        return vec![];
    };

    let haystack = format!(
        "{} {}",
        listing.title,
        listing.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    keywords
        .split(',')
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty() && haystack.contains(kw.as_str()))
        .collect()
}

/// Outcome of asking the planner for one more delivery.
#[derive(Debug, PartialEq)]
pub enum PlannerDecision {
    /// Deliver after waiting this long (zero when no throttle applies).
    Send { wait: Duration },
    /// The user hit the per-cycle cap.
    Skip,
}

/// Tracks per-user delivery pacing: a minimum spacing between messages to
/// the same user and a cap per polling cycle.
pub struct NotificationPlanner {
    throttle: Duration,
    max_per_cycle: usize,
    last_sent: HashMap<i32, Instant>,
    sent_this_cycle: HashMap<i32, usize>,
}

impl NotificationPlanner {
    #[must_use]
    pub fn new(throttle: Duration, max_per_cycle: usize) -> Self {
        Self {
            throttle,
            max_per_cycle,
            last_sent: HashMap::new(),
            sent_this_cycle: HashMap::new(),
        }
    }

    /// Forget per-cycle counters at the start of a polling cycle.
    pub fn begin_cycle(&mut self) {
        self.sent_this_cycle.clear();
    }

    /// Decide whether `user_id` may receive one more notification at `now`.
    /// A `Send` decision commits the planner state, so callers must deliver
    /// (after the indicated wait) when they get one.
    pub fn plan(&mut self, user_id: i32, now: Instant) -> PlannerDecision {
        let sent = self.sent_this_cycle.get(&user_id).copied().unwrap_or(0);
        if sent >= self.max_per_cycle {
            return PlannerDecision::Skip;
        }

        let wait = match self.last_sent.get(&user_id) {
            Some(last) => {
                let elapsed = now.saturating_duration_since(*last);
                self.throttle.saturating_sub(elapsed)
            }
            None => Duration::ZERO,
        };

        self.last_sent.insert(user_id, now + wait);
        self.sent_this_cycle.insert(user_id, sent + 1);

        PlannerDecision::Send { wait }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingSource;
    use chrono::Utc;

    fn test_listing(city: &str, price: i32, rooms: f64, area: f64) -> Listing {
        let now = Utc::now().naive_utc();
        Listing {
            id: 1,
            external_id: "x".to_string(),
            source: ListingSource::EstateSync,
            title: "Wohnung mit Balkon".to_string(),
            description: Some("Schöne Wohnung, ruhige Lage".to_string()),
            price,
            price_type: "rent".to_string(),
            city: city.to_string(),
            district: None,
            street: None,
            postal_code: None,
            rooms,
            area,
            floor: None,
            total_floors: None,
            property_type: "apartment".to_string(),
            features: vec![],
            images: vec![],
            contact_info: serde_json::Value::Null,
            original_url: "https://example.com".to_string(),
            application_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_filter(city: &str) -> SearchFilter {
        let now = Utc::now().naive_utc();
        SearchFilter {
            id: 1,
            user_id: 1,
            city: city.to_string(),
            min_price: None,
            max_price: None,
            min_rooms: None,
            max_rooms: None,
            min_area: None,
            max_area: None,
            keywords: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn quiet_hours_plain_window() {
        assert!(is_quiet_hours(10, 9, 12));
        assert!(!is_quiet_hours(12, 9, 12));
        assert!(!is_quiet_hours(8, 9, 12));
    }

    #[test]
    fn quiet_hours_across_midnight() {
        assert!(is_quiet_hours(23, 23, 7));
        assert!(is_quiet_hours(2, 23, 7));
        assert!(!is_quiet_hours(7, 23, 7));
        assert!(!is_quiet_hours(12, 23, 7));
    }

    #[test]
    fn quiet_hours_empty_window_is_never_quiet() {
        for hour in 0..24 {
            assert!(!is_quiet_hours(hour, 5, 5));
        }
    }

    #[test]
    fn interval_capped_during_business_hours() {
        let mut config = crate::test_support::test_config();
        config.check_interval = 120;
        config.check_interval_quiet = 300;
        config.quiet_hours_start = 23;
        config.quiet_hours_end = 7;

        assert_eq!(effective_check_interval(10, &config), 30);
        assert_eq!(effective_check_interval(20, &config), 120);
        assert_eq!(effective_check_interval(2, &config), 300);
    }

    #[test]
    fn city_mismatch_rejects_before_ranges() {
        let listing = test_listing("München", 800, 2.0, 50.0);
        let filter = test_filter("Berlin");
        assert!(!listing_matches_filter(&listing, &filter));
    }

    #[test]
    fn city_match_is_substring_and_case_insensitive() {
        let listing = test_listing("Berlin-Mitte", 800, 2.0, 50.0);
        let filter = test_filter("berlin");
        assert!(listing_matches_filter(&listing, &filter));
    }

    #[test]
    fn price_range_applies_only_when_price_known() {
        let mut filter = test_filter("Berlin");
        filter.min_price = Some(500);
        filter.max_price = Some(1000);

        let priced = test_listing("Berlin", 1200, 2.0, 50.0);
        assert!(!listing_matches_filter(&priced, &filter));

        let unknown_price = test_listing("Berlin", 0, 2.0, 50.0);
        assert!(listing_matches_filter(&unknown_price, &filter));
    }

    #[test]
    fn rooms_and_area_ranges() {
        let mut filter = test_filter("Berlin");
        filter.min_rooms = Some(2.0);
        filter.max_area = Some(60.0);

        assert!(listing_matches_filter(
            &test_listing("Berlin", 900, 2.5, 55.0),
            &filter
        ));
        assert!(!listing_matches_filter(
            &test_listing("Berlin", 900, 1.0, 55.0),
            &filter
        ));
        assert!(!listing_matches_filter(
            &test_listing("Berlin", 900, 2.5, 80.0),
            &filter
        ));
    }

    #[test]
    fn keywords_never_reject() {
        let mut filter = test_filter("Berlin");
        filter.keywords = Some("aufzug, tiefgarage".to_string());

        let listing = test_listing("Berlin", 900, 2.0, 50.0);
        assert!(listing_matches_filter(&listing, &filter));
        assert!(matched_keywords(&listing, &filter).is_empty());

        filter.keywords = Some("balkon".to_string());
        assert_eq!(matched_keywords(&listing, &filter), vec!["balkon"]);
    }

    #[test]
    fn no_filters_accepts_everything() {
        let listing = test_listing("Leipzig", 500, 1.0, 30.0);
        assert!(listing_matches_any(&listing, &[]));
    }

    #[test]
    fn planner_throttles_repeat_deliveries() {
        let mut planner = NotificationPlanner::new(Duration::from_secs(2), 8);
        let t0 = Instant::now();

        assert_eq!(
            planner.plan(1, t0),
            PlannerDecision::Send {
                wait: Duration::ZERO
            }
        );

        // Half a second later the remaining throttle window applies.
        let t1 = t0 + Duration::from_millis(500);
        assert_eq!(
            planner.plan(1, t1),
            PlannerDecision::Send {
                wait: Duration::from_millis(1500)
            }
        );

        // A different user is not throttled.
        assert_eq!(
            planner.plan(2, t1),
            PlannerDecision::Send {
                wait: Duration::ZERO
            }
        );
    }

    #[test]
    fn planner_caps_per_cycle_and_resets() {
        let mut planner = NotificationPlanner::new(Duration::ZERO, 2);
        let t0 = Instant::now();

        assert!(matches!(planner.plan(1, t0), PlannerDecision::Send { .. }));
        assert!(matches!(planner.plan(1, t0), PlannerDecision::Send { .. }));
        assert_eq!(planner.plan(1, t0), PlannerDecision::Skip);

        planner.begin_cycle();
        assert!(matches!(planner.plan(1, t0), PlannerDecision::Send { .. }));
    }
}
