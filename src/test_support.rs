//! Shared fixtures for unit and integration tests.

use crate::models::config::ServerConfig;

/// A [`ServerConfig`] mirroring `config/default.yaml`, for tests that need
/// one without going through the config loader.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig {
        web_host: "127.0.0.1".to_string(),
        web_port: 8080,
        debug: false,
        database_url: ":memory:".to_string(),
        secret_key: "test-secret".to_string(),
        jwt_secret_key: None,
        bot_token: None,
        estatesync_api_key: None,
        immoscout24_api_key: None,
        immowelt_api_key: None,
        openai_api_key: None,
        openai_model: "gpt-3.5-turbo".to_string(),
        enable_ai_analysis: false,
        subscription_price: 9.99,
        subscription_duration: 30,
        default_city: "Berlin".to_string(),
        check_interval: 30,
        check_interval_quiet: 300,
        quiet_hours_start: 23,
        quiet_hours_end: 7,
        max_retries: 3,
        max_price_cap: 5000,
        max_workers: 6,
        cache_ttl_seconds: 300,
        provider_cooldown_seconds: 300,
        quiet_cooldown_scaling: 2.0,
        max_notify_per_cycle: 8,
        max_apartments_per_job: 15,
        notification_throttle_seconds: 2,
        cleanup_after_days: 30,
    }
}
