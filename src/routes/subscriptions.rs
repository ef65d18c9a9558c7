use actix_web::{HttpResponse, Responder, get, post, web};

use crate::domain::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::service_error;
use crate::services::subscriptions;

#[get("/subscriptions")]
pub async fn current_subscription(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match subscriptions::get_current_subscription(repo.get_ref(), user.sub) {
        Ok(Some(subscription)) => HttpResponse::Ok().json(subscription),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => service_error("Failed to load subscription", e),
    }
}

#[post("/subscriptions")]
pub async fn activate_subscription(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    match subscriptions::activate_subscription(repo.get_ref(), &config, user.sub) {
        Ok(subscription) => HttpResponse::Created().json(subscription),
        Err(e) => service_error("Failed to activate subscription", e),
    }
}
