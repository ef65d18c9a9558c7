//! Apartment hunting service for the German rental market: polls listing
//! providers, stores offers, matches them against saved searches and tells
//! subscribers over Telegram.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;

#[cfg(feature = "server")]
pub mod analysis;
#[cfg(feature = "server")]
pub mod cache;
#[cfg(feature = "data")]
pub mod db;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "server")]
pub mod notifier;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "server")]
pub mod providers;
#[cfg(feature = "data")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "data")]
pub mod schema;
#[cfg(feature = "server")]
pub mod services;
#[cfg(any(test, feature = "test-mocks"))]
pub mod test_support;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish the Diesel connection pool for the SQLite database.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let bind_address = (server_config.web_host.clone(), server_config.web_port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api/v1")
                    .service(routes::auth::register)
                    .service(routes::auth::login)
                    .service(routes::auth::me)
                    .service(routes::users::get_profile)
                    .service(routes::users::update_profile)
                    .service(routes::listings::list_apartments)
                    .service(routes::listings::get_apartment)
                    .service(routes::listings::search_apartments)
                    .service(routes::filters::list_filters)
                    .service(routes::filters::create_filter)
                    .service(routes::filters::update_filter)
                    .service(routes::subscriptions::current_subscription)
                    .service(routes::subscriptions::activate_subscription)
                    .service(routes::notifications::list_notifications),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
