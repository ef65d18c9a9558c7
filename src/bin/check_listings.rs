//! Background worker polling the listing providers and notifying subscribers.

use std::collections::HashSet;
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::{Local, Timelike};
use config::Config;
use dotenvy::dotenv;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use flatwatch::analysis::{self, OpenAiNarrator};
use flatwatch::db::establish_connection_pool;
use flatwatch::domain::listing::Listing;
use flatwatch::domain::notification::NewNotification;
use flatwatch::domain::user::User;
use flatwatch::models::config::ServerConfig;
use flatwatch::notifier::{Notifier, TelegramNotifier};
use flatwatch::providers::{ProviderManager, SearchParams};
use flatwatch::repository::errors::RepositoryResult;
use flatwatch::repository::{
    DieselRepository, FilterReader, ListingReader, ListingWriter, NotificationReader,
    NotificationWriter, UserReader,
};
use flatwatch::services::monitor::{self, NotificationPlanner, PlannerDecision};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const CYCLE_ERROR_BACKOFF: Duration = Duration::from_secs(60);
const CLEANUP_EVERY: Duration = Duration::from_secs(24 * 60 * 60);

/// Shared state of the worker, one instance for the process lifetime.
struct WorkerContext {
    repo: DieselRepository,
    config: ServerConfig,
    manager: ProviderManager,
    notifier: Option<Arc<dyn Notifier>>,
    narrator: Option<OpenAiNarrator>,
    planner: Mutex<NotificationPlanner>,
    known: Mutex<HashSet<String>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Cities to poll this cycle: the distinct cities over the active filters of
/// the subscribed users. Subscribers without filters fall back to the default
/// city, as does an empty subscriber list.
fn cities_to_poll<R>(repo: &R, users: &[User], default_city: &str) -> RepositoryResult<Vec<String>>
where
    R: FilterReader,
{
    let mut cities: Vec<String> = Vec::new();

    for user in users {
        let filters = repo.list_active_filters_for_user(user.id)?;
        if filters.is_empty() {
            cities.push(default_city.to_string());
        } else {
            cities.extend(filters.into_iter().map(|filter| filter.city));
        }
    }

    if cities.is_empty() {
        cities.push(default_city.to_string());
    }

    let mut seen = HashSet::new();
    cities.retain(|city| {
        let key = city.trim().to_lowercase();
        !key.is_empty() && seen.insert(key)
    });

    Ok(cities)
}

/// Subscribers owed a delivery for `listing`: reachable over Telegram, active
/// filters accept it, not notified about it before. The notification row is
/// written before the recipient is returned; a filter that fails to load
/// counts as a match rather than costing the user the listing.
fn record_matches<R>(repo: &R, listing: &Listing, users: &[User]) -> Vec<(User, i64)>
where
    R: FilterReader + NotificationReader + NotificationWriter,
{
    let mut recipients = Vec::new();

    for user in users {
        let Some(chat_id) = user.telegram_chat_id else {
            log::debug!("user {} has no Telegram chat linked, skipped", user.id);
            continue;
        };

        let accepted = match repo.list_active_filters_for_user(user.id) {
            Ok(filters) => monitor::listing_matches_any(listing, &filters),
            Err(err) => {
                log::error!("loading filters for user {} failed: {err}", user.id);
                true
            }
        };
        if !accepted {
            continue;
        }

        match repo.notification_exists(user.id, listing.id) {
            Ok(true) => continue,
            Ok(false) => {}
            Err(err) => {
                log::error!("notification lookup for user {} failed: {err}", user.id);
                continue;
            }
        }

        match repo.create_notification(&NewNotification::new(user.id, listing.id)) {
            Ok(_) => recipients.push((user.clone(), chat_id)),
            Err(err) => {
                log::error!("recording notification for user {} failed: {err}", user.id);
            }
        }
    }

    recipients
}

async fn send_analysis(ctx: &WorkerContext, notifier: &dyn Notifier, chat_id: i64, listing: &Listing) {
    let report = analysis::analyze(listing);
    let narrative = match &ctx.narrator {
        Some(narrator) => narrator.narrate(listing, &report).await,
        None => None,
    };
    let summary = analysis::summary_text(listing, &report, narrative.as_deref());
    if let Err(err) = notifier.send_text(chat_id, &summary).await {
        log::warn!("sending analysis for listing {} to chat {chat_id} failed: {err}", listing.id);
    }
}

async fn dispatch_listing(
    ctx: &WorkerContext,
    notifier: &dyn Notifier,
    listing: &Listing,
    recipients: Vec<(User, i64)>,
) {
    for (user, chat_id) in recipients {
        let decision = lock(&ctx.planner).plan(user.id, Instant::now());
        match decision {
            PlannerDecision::Skip => {
                log::debug!("user {} reached the per-cycle notification cap", user.id);
            }
            PlannerDecision::Send { wait } => {
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
                if let Err(err) = notifier.send_listing(chat_id, listing).await {
                    log::error!(
                        "delivering listing {} to chat {chat_id} failed: {err}",
                        listing.id
                    );
                    continue;
                }
                log::info!("notified user {} about listing {}", user.id, listing.id);
                if ctx.config.enable_ai_analysis {
                    send_analysis(ctx, notifier, chat_id, listing).await;
                }
            }
        }
    }
}

async fn poll_city(ctx: Arc<WorkerContext>, users: Arc<Vec<User>>, city: String, quiet: bool) {
    let params = SearchParams::for_city(&city);
    let known_snapshot = lock(&ctx.known).clone();
    let listings = ctx
        .manager
        .new_listings(
            &params,
            &known_snapshot,
            ctx.config.max_apartments_per_job,
            quiet,
        )
        .await;
    if listings.is_empty() {
        return;
    }
    log::info!("{city}: {count} new listings", count = listings.len());

    for new_listing in listings {
        let stored = match ctx.repo.upsert_listing(&new_listing.sanitized()) {
            Ok(listing) => listing,
            Err(err) => {
                log::error!("storing a listing for {city} failed: {err}");
                continue;
            }
        };
        lock(&ctx.known).insert(stored.dedup_key());

        let Some(notifier) = &ctx.notifier else {
            continue;
        };
        let recipients = record_matches(&ctx.repo, &stored, &users);
        dispatch_listing(&ctx, notifier.as_ref(), &stored, recipients).await;
    }
}

async fn run_cycle(ctx: &Arc<WorkerContext>) -> RepositoryResult<()> {
    lock(&ctx.planner).begin_cycle();

    let users = Arc::new(ctx.repo.list_users_with_active_subscription()?);
    let cities = cities_to_poll(&ctx.repo, &users, &ctx.config.default_city)?;
    let quiet = monitor::is_quiet_hours(
        Local::now().hour(),
        ctx.config.quiet_hours_start,
        ctx.config.quiet_hours_end,
    );
    log::info!(
        "cycle start: {subscribers} subscribers, {count} cities{note}",
        subscribers = users.len(),
        count = cities.len(),
        note = if quiet { " (quiet hours)" } else { "" },
    );

    let semaphore = Arc::new(Semaphore::new(ctx.config.max_workers.max(1)));
    let mut jobs = JoinSet::new();
    for city in cities {
        let semaphore = Arc::clone(&semaphore);
        let ctx = Arc::clone(ctx);
        let users = Arc::clone(&users);
        jobs.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            poll_city(ctx, users, city, quiet).await;
        });
    }
    while let Some(joined) = jobs.join_next().await {
        if let Err(err) = joined {
            log::error!("city job panicked: {err}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment
        .add_source(config::Environment::default())
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            std::process::exit(1);
        }
    };

    let server_config = match settings.try_deserialize::<ServerConfig>() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {}", err);
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let manager = match ProviderManager::from_config(&server_config) {
        Ok(manager) => manager,
        Err(err) => {
            log::error!("Failed to build the provider clients: {err}");
            std::process::exit(1);
        }
    };

    let http = match reqwest::Client::builder().timeout(HTTP_TIMEOUT).build() {
        Ok(client) => client,
        Err(err) => {
            log::error!("Failed to build the HTTP client: {err}");
            std::process::exit(1);
        }
    };

    let notifier: Option<Arc<dyn Notifier>> = match &server_config.bot_token {
        Some(token) if !token.trim().is_empty() => Some(Arc::new(TelegramNotifier::new(
            http.clone(),
            token.trim().to_string(),
        ))),
        _ => {
            log::warn!("BOT_TOKEN is not set, Telegram delivery is disabled");
            None
        }
    };

    let narrator = match (
        server_config.enable_ai_analysis,
        server_config.openai_api_key.as_deref(),
    ) {
        (true, Some(key)) if !key.trim().is_empty() => Some(OpenAiNarrator::new(
            http,
            key.trim().to_string(),
            server_config.openai_model.clone(),
        )),
        (true, _) => {
            log::warn!("ENABLE_AI_ANALYSIS is set but OPENAI_API_KEY is missing, summaries stay rule-based");
            None
        }
        _ => None,
    };

    let known = match repo.list_known_listing_keys() {
        Ok(keys) => keys,
        Err(err) => {
            log::error!("Failed to load known listing keys: {err}");
            std::process::exit(1);
        }
    };

    log::info!(
        "Starting listing worker: {providers} providers, {known_count} known listings",
        providers = manager.provider_count(),
        known_count = known.len(),
    );

    let planner = NotificationPlanner::new(
        Duration::from_secs(server_config.notification_throttle_seconds),
        server_config.max_notify_per_cycle,
    );

    let ctx = Arc::new(WorkerContext {
        repo,
        manager,
        notifier,
        narrator,
        planner: Mutex::new(planner),
        known: Mutex::new(known),
        config: server_config,
    });

    let mut last_cleanup: Option<Instant> = None;
    loop {
        if last_cleanup.is_none_or(|at| at.elapsed() >= CLEANUP_EVERY) {
            match ctx.repo.delete_listings_older_than(ctx.config.cleanup_after_days) {
                Ok(removed) => log::info!("cleanup removed {removed} stale listings"),
                Err(err) => log::error!("cleanup failed: {err}"),
            }
            last_cleanup = Some(Instant::now());
        }

        let sleep_for = match run_cycle(&ctx).await {
            Ok(()) => Duration::from_secs(monitor::effective_check_interval(
                Local::now().hour(),
                &ctx.config,
            )),
            Err(err) => {
                log::error!("polling cycle failed: {err}");
                CYCLE_ERROR_BACKOFF
            }
        };
        tokio::time::sleep(sleep_for).await;
    }
}
