use actix_web::{HttpResponse, Responder, get, post, web};
use validator::Validate;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::listing::{ListingsQueryParams, SearchRequest};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{service_error, validation_failed};
use crate::services::listings;

#[get("/apartments")]
pub async fn list_apartments(
    _user: AuthenticatedUser,
    params: web::Query<ListingsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match listings::list_listings(repo.get_ref(), params.into_inner().into()) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => service_error("Failed to list apartments", e),
    }
}

#[get("/apartments/{id}")]
pub async fn get_apartment(
    _user: AuthenticatedUser,
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match listings::get_listing(repo.get_ref(), path.into_inner()) {
        Ok(Some(listing)) => HttpResponse::Ok().json(listing),
        Ok(None) => HttpResponse::NotFound().finish(),
        Err(e) => service_error("Failed to load apartment", e),
    }
}

#[post("/apartments/search")]
pub async fn search_apartments(
    _user: AuthenticatedUser,
    payload: web::Json<SearchRequest>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return validation_failed(&errors);
    }

    let params = (&*payload).into();
    match listings::search_listings(repo.get_ref(), config.max_price_cap, params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => service_error("Failed to search apartments", e),
    }
}
