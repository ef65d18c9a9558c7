//! In-memory TTL cache for provider search results.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::domain::listing::NewListing;
use crate::providers::SearchParams;

/// Caches blended search results per parameter set so repeated polls within
/// the TTL window do not hit the provider APIs again. Shared across worker
/// tasks behind an `Arc`.
pub struct SearchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
    stored_at: Instant,
    listings: Vec<NewListing>,
}

impl SearchCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Canonical key for one parameter set. [`SearchParams`] serializes its
    /// fields in a fixed order, so equal searches hash equally.
    fn key(params: &SearchParams) -> String {
        let serialized = serde_json::to_string(params).unwrap_or_default();
        let digest = Sha256::digest(serialized.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest.iter() {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Cached listings for `params`, if stored within the TTL window.
    /// Expired entries are removed on access.
    pub fn get(&self, params: &SearchParams) -> Option<Vec<NewListing>> {
        let key = Self::key(params);
        let mut entries = self.lock();

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.listings.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, params: &SearchParams, listings: Vec<NewListing>) {
        let entry = CacheEntry {
            stored_at: Instant::now(),
            listings,
        };
        self.lock().insert(Self::key(params), entry);
    }

    /// Drops all entries older than the TTL and returns how many went.
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingSource;

    fn sample_listing() -> NewListing {
        NewListing {
            external_id: "x1".to_string(),
            source: ListingSource::Immowelt,
            title: "Wohnung".to_string(),
            description: None,
            price: 700,
            price_type: "rent".to_string(),
            city: "Berlin".to_string(),
            district: None,
            street: None,
            postal_code: None,
            rooms: 2.0,
            area: 50.0,
            floor: None,
            total_floors: None,
            property_type: "apartment".to_string(),
            features: vec![],
            images: vec![],
            contact_info: serde_json::Value::Null,
            original_url: "https://example.com/x1".to_string(),
            application_url: None,
        }
    }

    #[test]
    fn fresh_entries_hit() {
        let cache = SearchCache::new(Duration::from_secs(300));
        let params = SearchParams::for_city("Berlin");

        assert!(cache.get(&params).is_none());
        cache.set(&params, vec![sample_listing()]);

        let hit = cache.get(&params).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].external_id, "x1");
    }

    #[test]
    fn different_params_use_different_keys() {
        let cache = SearchCache::new(Duration::from_secs(300));
        cache.set(&SearchParams::for_city("Berlin"), vec![sample_listing()]);

        assert!(cache.get(&SearchParams::for_city("Hamburg")).is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = SearchCache::new(Duration::ZERO);
        let params = SearchParams::for_city("Berlin");
        cache.set(&params, vec![sample_listing()]);

        assert!(cache.get(&params).is_none());
        // The expired entry was dropped on access.
        assert_eq!(cache.cleanup_expired(), 0);
    }

    #[test]
    fn cleanup_counts_removed_entries() {
        let cache = SearchCache::new(Duration::ZERO);
        cache.set(&SearchParams::for_city("Berlin"), vec![]);
        cache.set(&SearchParams::for_city("Hamburg"), vec![]);

        assert_eq!(cache.cleanup_expired(), 2);
        cache.clear();
    }
}
