use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::dto::user::UserProfile;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{service_error, validation_failed};
use crate::services::auth;

#[post("/auth/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return validation_failed(&errors);
    }

    match auth::register_user(
        repo.get_ref(),
        &config,
        &payload.email,
        &payload.password,
        payload.name.clone(),
    ) {
        Ok((user, token)) => HttpResponse::Created().json(AuthResponse {
            user: UserProfile::from(user),
            token,
        }),
        Err(e) => service_error("Failed to register user", e),
    }
}

#[post("/auth/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return validation_failed(&errors);
    }

    match auth::login_user(repo.get_ref(), &config, &payload.email, &payload.password) {
        Ok((user, token)) => HttpResponse::Ok().json(AuthResponse {
            user: UserProfile::from(user),
            token,
        }),
        Err(e) => service_error("Failed to log in", e),
    }
}

#[get("/auth/me")]
pub async fn me(user: AuthenticatedUser, repo: web::Data<DieselRepository>) -> impl Responder {
    match auth::current_user(repo.get_ref(), &user) {
        Ok(account) => HttpResponse::Ok().json(UserProfile::from(account)),
        Err(e) => service_error("Failed to load account", e),
    }
}
