//! Configuration model loaded from external sources.

use serde::Deserialize;

/// Basic configuration shared across handlers and the monitoring worker.
///
/// Defaults come from `config/default.yaml`; any field can be overridden
/// through an `APP_ENV` profile file or an environment variable of the same
/// name (upper-cased, e.g. `DATABASE_URL`, `BOT_TOKEN`).
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    pub web_host: String,
    pub web_port: u16,
    pub debug: bool,
    pub database_url: String,
    pub secret_key: String,
    pub jwt_secret_key: Option<String>,
    /// Telegram bot token; notifications are disabled when unset.
    pub bot_token: Option<String>,
    pub estatesync_api_key: Option<String>,
    pub immoscout24_api_key: Option<String>,
    pub immowelt_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub enable_ai_analysis: bool,
    pub subscription_price: f64,
    /// Days of entitlement per activation.
    pub subscription_duration: i64,
    pub default_city: String,
    /// Seconds between polling cycles outside quiet hours.
    pub check_interval: u64,
    pub check_interval_quiet: u64,
    pub quiet_hours_start: u32,
    pub quiet_hours_end: u32,
    pub max_retries: u32,
    /// Upper bound applied to price filters in apartment searches.
    pub max_price_cap: i32,
    pub max_workers: usize,
    pub cache_ttl_seconds: u64,
    pub provider_cooldown_seconds: u64,
    pub quiet_cooldown_scaling: f64,
    pub max_notify_per_cycle: usize,
    pub max_apartments_per_job: usize,
    pub notification_throttle_seconds: u64,
    pub cleanup_after_days: i64,
}

impl ServerConfig {
    /// Key used to sign bearer tokens, falling back to the general secret.
    #[must_use]
    pub fn jwt_secret(&self) -> &str {
        self.jwt_secret_key.as_deref().unwrap_or(&self.secret_key)
    }
}
