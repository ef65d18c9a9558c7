//! Fans a search out to every configured provider and blends the results.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rand::RngExt;
use tokio::task::JoinSet;

use crate::cache::SearchCache;
use crate::domain::listing::{ListingSource, NewListing};
use crate::models::config::ServerConfig;

use super::estatesync::EstateSyncProvider;
use super::immoscout::ImmoScoutProvider;
use super::immowelt::ImmoweltProvider;
use super::{parse, ListingProvider, ProviderError, SearchParams};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const RETRY_BACKOFFS: [Duration; 3] = [
    Duration::from_millis(500),
    Duration::from_millis(1500),
    Duration::from_millis(3000),
];
const MAX_JITTER_MS: u64 = 250;
/// Per-source quota when blending results from multiple providers.
const BLEND_PER_SOURCE: usize = 2;
const BLEND_FILLER: usize = 2;

/// Coordinates the provider clients behind a shared result cache and
/// per-provider cooldowns. One instance is shared across worker tasks.
pub struct ProviderManager {
    providers: Vec<Arc<dyn ListingProvider>>,
    cache: Arc<SearchCache>,
    cooldown: Duration,
    quiet_scaling: f64,
    max_retries: u32,
    last_run: Mutex<HashMap<&'static str, Instant>>,
}

impl ProviderManager {
    #[must_use]
    pub fn new(
        providers: Vec<Arc<dyn ListingProvider>>,
        cache: Arc<SearchCache>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            providers,
            cache,
            cooldown: Duration::from_secs(config.provider_cooldown_seconds),
            quiet_scaling: config.quiet_cooldown_scaling,
            max_retries: config.max_retries,
            last_run: Mutex::new(HashMap::new()),
        }
    }

    /// Builds a manager with one client per configured API key. Providers
    /// without credentials are left out rather than registered as failing.
    pub fn from_config(config: &ServerConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let mut providers: Vec<Arc<dyn ListingProvider>> = Vec::new();
        if let Some(key) = configured(config.immowelt_api_key.as_deref()) {
            providers.push(Arc::new(ImmoweltProvider::new(client.clone(), key)));
        }
        if let Some(key) = configured(config.immoscout24_api_key.as_deref()) {
            providers.push(Arc::new(ImmoScoutProvider::new(client.clone(), key)));
        }
        if let Some(key) = configured(config.estatesync_api_key.as_deref()) {
            providers.push(Arc::new(EstateSyncProvider::new(client, key)));
        }
        if providers.is_empty() {
            log::warn!("no provider API keys configured, searches will return nothing");
        }

        let cache = Arc::new(SearchCache::new(Duration::from_secs(
            config.cache_ttl_seconds,
        )));
        Ok(Self::new(providers, cache, config))
    }

    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Runs the search against every provider that is not cooling down and
    /// blends the answers. Results are cached per parameter set, so repeated
    /// calls inside the TTL window are free.
    pub async fn search_all(&self, params: &SearchParams, quiet: bool) -> Vec<NewListing> {
        if let Some(cached) = self.cache.get(params) {
            log::debug!("serving \"{city}\" from cache", city = params.city);
            return cached;
        }

        let mut tasks = JoinSet::new();
        {
            let now = Instant::now();
            let cooldown = self.cooldown.mul_f64(if quiet {
                self.quiet_scaling.max(0.0)
            } else {
                1.0
            });
            let mut last_run = self.lock_last_run();
            for provider in &self.providers {
                let name = provider.name();
                if let Some(last) = last_run.get(name) {
                    if now.duration_since(*last) < cooldown {
                        log::debug!("{name} is cooling down, skipped");
                        continue;
                    }
                }
                last_run.insert(name, now);
                tasks.spawn(fetch_with_retries(
                    Arc::clone(provider),
                    params.clone(),
                    self.max_retries,
                ));
            }
        }

        let mut collected = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((name, Ok(listings))) => {
                    log::info!("{name} returned {count} listings", count = listings.len());
                    collected.extend(listings);
                }
                Ok((name, Err(err))) => log::error!("{name} search failed: {err}"),
                Err(err) => log::error!("provider task panicked: {err}"),
            }
        }

        collected.retain(|listing| {
            listing.has_substance() && parse::city_matches(&listing.city, &params.city)
        });
        let blended = blend_by_source(collected);
        self.cache.set(params, blended.clone());
        blended
    }

    /// Like [`search_all`](Self::search_all) but drops listings already seen
    /// in earlier cycles and truncates to `limit` (0 means unlimited).
    pub async fn new_listings(
        &self,
        params: &SearchParams,
        known: &HashSet<String>,
        limit: usize,
        quiet: bool,
    ) -> Vec<NewListing> {
        let mut listings = self.search_all(params, quiet).await;
        listings
            .retain(|listing| !listing.external_id.is_empty() && !known.contains(&listing.dedup_key()));
        if limit > 0 {
            listings.truncate(limit);
        }
        listings
    }

    fn lock_last_run(&self) -> MutexGuard<'_, HashMap<&'static str, Instant>> {
        match self.last_run.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn configured(key: Option<&str>) -> Option<String> {
    key.map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

async fn fetch_with_retries(
    provider: Arc<dyn ListingProvider>,
    params: SearchParams,
    max_retries: u32,
) -> (&'static str, Result<Vec<NewListing>, ProviderError>) {
    let name = provider.name();
    let attempts = max_retries.max(1);
    let mut attempt = 0;

    loop {
        match provider.search(&params).await {
            Ok(listings) => return (name, Ok(listings)),
            Err(err) => {
                attempt += 1;
                if attempt >= attempts {
                    return (name, Err(err));
                }
                let backoff =
                    RETRY_BACKOFFS[usize::min(attempt as usize - 1, RETRY_BACKOFFS.len() - 1)];
                let jitter = Duration::from_millis(rand::rng().random_range(0..MAX_JITTER_MS));
                log::warn!("{name} attempt {attempt} failed: {err}, retrying in {backoff:?}");
                tokio::time::sleep(backoff + jitter).await;
            }
        }
    }
}

/// Interleaves sources so a single provider cannot dominate one cycle:
/// up to two Immowelt, up to two ImmoScout24, then two more from whatever
/// is left, never repeating a dedup key.
fn blend_by_source(items: Vec<NewListing>) -> Vec<NewListing> {
    let mut used: HashSet<String> = HashSet::new();
    let mut blended: Vec<NewListing> = Vec::new();

    for source in [ListingSource::Immowelt, ListingSource::ImmoScout24] {
        let mut taken = 0;
        for item in &items {
            if taken >= BLEND_PER_SOURCE {
                break;
            }
            if item.source == source && used.insert(item.dedup_key()) {
                blended.push(item.clone());
                taken += 1;
            }
        }
    }

    let mut filler = 0;
    for item in items {
        if filler >= BLEND_FILLER {
            break;
        }
        if used.insert(item.dedup_key()) {
            blended.push(item);
            filler += 1;
        }
    }

    blended
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(source: ListingSource, external_id: &str, city: &str) -> NewListing {
        NewListing {
            external_id: external_id.to_string(),
            source,
            title: format!("Wohnung {external_id}"),
            description: None,
            price: 900,
            price_type: "rent".to_string(),
            city: city.to_string(),
            district: None,
            street: None,
            postal_code: None,
            rooms: 2.0,
            area: 55.0,
            floor: None,
            total_floors: None,
            property_type: "apartment".to_string(),
            features: vec![],
            images: vec![],
            contact_info: serde_json::Value::Null,
            original_url: format!("https://example.com/{external_id}"),
            application_url: None,
        }
    }

    #[test]
    fn blend_respects_per_source_quotas() {
        let items = vec![
            listing(ListingSource::Immowelt, "w1", "Berlin"),
            listing(ListingSource::Immowelt, "w2", "Berlin"),
            listing(ListingSource::Immowelt, "w3", "Berlin"),
            listing(ListingSource::ImmoScout24, "s1", "Berlin"),
            listing(ListingSource::ImmoScout24, "s2", "Berlin"),
            listing(ListingSource::EstateSync, "e1", "Berlin"),
            listing(ListingSource::EstateSync, "e2", "Berlin"),
        ];

        let blended = blend_by_source(items);
        let ids: Vec<&str> = blended.iter().map(|l| l.external_id.as_str()).collect();

        // Quotas first, then the earliest unused items as filler.
        assert_eq!(ids, vec!["w1", "w2", "s1", "s2", "w3", "e1"]);
    }

    #[test]
    fn blend_never_repeats_a_key() {
        let items = vec![
            listing(ListingSource::Immowelt, "w1", "Berlin"),
            listing(ListingSource::Immowelt, "w1", "Berlin"),
            listing(ListingSource::ImmoScout24, "s1", "Berlin"),
        ];

        let blended = blend_by_source(items);
        let ids: Vec<&str> = blended.iter().map(|l| l.external_id.as_str()).collect();

        assert_eq!(ids, vec!["w1", "s1"]);
    }

    #[test]
    fn blend_survives_a_missing_source() {
        let items = vec![
            listing(ListingSource::EstateSync, "e1", "Berlin"),
            listing(ListingSource::EstateSync, "e2", "Berlin"),
            listing(ListingSource::EstateSync, "e3", "Berlin"),
        ];

        let blended = blend_by_source(items);
        assert_eq!(blended.len(), 2);
    }
}

#[cfg(all(test, feature = "test-mocks"))]
mod service_tests {
    use super::*;
    use crate::providers::MockListingProvider;
    use crate::test_support::test_config;

    fn mock_listing(external_id: &str, city: &str) -> NewListing {
        NewListing {
            external_id: external_id.to_string(),
            source: ListingSource::Immowelt,
            title: format!("Wohnung {external_id}"),
            description: None,
            price: 850,
            price_type: "rent".to_string(),
            city: city.to_string(),
            district: None,
            street: None,
            postal_code: None,
            rooms: 2.0,
            area: 52.0,
            floor: None,
            total_floors: None,
            property_type: "apartment".to_string(),
            features: vec![],
            images: vec![],
            contact_info: serde_json::Value::Null,
            original_url: format!("https://example.com/{external_id}"),
            application_url: None,
        }
    }

    fn manager_with(
        providers: Vec<Arc<dyn ListingProvider>>,
        cache: Arc<SearchCache>,
    ) -> ProviderManager {
        let mut config = test_config();
        config.max_retries = 1;
        config.provider_cooldown_seconds = 3600;
        ProviderManager::new(providers, cache, &config)
    }

    #[tokio::test]
    async fn second_search_is_served_from_cache() {
        let mut provider = MockListingProvider::new();
        provider.expect_name().return_const("immowelt");
        provider
            .expect_search()
            .times(1)
            .returning(|_| Ok(vec![mock_listing("w1", "Berlin")]));

        let cache = Arc::new(SearchCache::new(Duration::from_secs(300)));
        let manager = manager_with(vec![Arc::new(provider)], cache);
        let params = SearchParams::for_city("Berlin");

        let first = manager.search_all(&params, false).await;
        let second = manager.search_all(&params, false).await;

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn cooldown_skips_a_recently_queried_provider() {
        let mut provider = MockListingProvider::new();
        provider.expect_name().return_const("immowelt");
        provider
            .expect_search()
            .times(1)
            .returning(|_| Ok(vec![mock_listing("w1", "Berlin")]));

        let cache = Arc::new(SearchCache::new(Duration::from_secs(300)));
        let manager = manager_with(vec![Arc::new(provider)], Arc::clone(&cache));
        let params = SearchParams::for_city("Berlin");

        assert_eq!(manager.search_all(&params, false).await.len(), 1);

        // Force a real second round, the provider must still be skipped.
        cache.clear();
        assert!(manager.search_all(&params, false).await.is_empty());
    }

    #[tokio::test]
    async fn one_failing_provider_does_not_sink_the_rest() {
        let mut broken = MockListingProvider::new();
        broken.expect_name().return_const("immobilienscout24");
        broken.expect_search().times(1).returning(|_| {
            Err(ProviderError::Decode {
                provider: "immobilienscout24",
                detail: "malformed payload".to_string(),
            })
        });

        let mut healthy = MockListingProvider::new();
        healthy.expect_name().return_const("immowelt");
        healthy
            .expect_search()
            .times(1)
            .returning(|_| Ok(vec![mock_listing("w1", "Berlin")]));

        let cache = Arc::new(SearchCache::new(Duration::from_secs(300)));
        let manager = manager_with(vec![Arc::new(broken), Arc::new(healthy)], cache);

        let found = manager.search_all(&SearchParams::for_city("Berlin"), false).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].external_id, "w1");
    }

    #[tokio::test]
    async fn off_city_and_empty_listings_are_dropped() {
        let mut provider = MockListingProvider::new();
        provider.expect_name().return_const("immowelt");
        provider.expect_search().times(1).returning(|_| {
            let mut husk = mock_listing("w3", "Berlin");
            husk.price = 0;
            husk.rooms = 0.0;
            husk.area = 0.0;
            husk.title = "Wohnung".to_string();
            husk.original_url = String::new();
            Ok(vec![
                mock_listing("w1", "Berlin-Mitte"),
                mock_listing("w2", "Hamburg"),
                husk,
            ])
        });

        let cache = Arc::new(SearchCache::new(Duration::from_secs(300)));
        let manager = manager_with(vec![Arc::new(provider)], cache);

        let found = manager.search_all(&SearchParams::for_city("Berlin"), false).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].external_id, "w1");
    }

    #[tokio::test]
    async fn new_listings_filters_known_keys_and_truncates() {
        let mut provider = MockListingProvider::new();
        provider.expect_name().return_const("immowelt");
        provider.expect_search().times(1).returning(|_| {
            Ok(vec![
                mock_listing("w1", "Berlin"),
                mock_listing("w2", "Berlin"),
            ])
        });

        let cache = Arc::new(SearchCache::new(Duration::from_secs(300)));
        let manager = manager_with(vec![Arc::new(provider)], cache);
        let params = SearchParams::for_city("Berlin");

        let known: HashSet<String> = HashSet::from(["immowelt_w1".to_string()]);
        let fresh = manager.new_listings(&params, &known, 5, false).await;
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].external_id, "w2");

        let none_limit = manager.new_listings(&params, &HashSet::new(), 1, false).await;
        assert_eq!(none_limit.len(), 1);
    }

    #[test]
    fn from_config_registers_only_configured_providers() {
        let mut config = test_config();
        config.immowelt_api_key = Some("key-a".to_string());
        config.immoscout24_api_key = Some("  ".to_string());

        let manager = ProviderManager::from_config(&config).unwrap();
        assert_eq!(manager.provider_count(), 1);
    }
}
