use actix_web::{HttpResponse, Responder, get, post, put, web};
use validator::Validate;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::filter::{NewSearchFilter, UpdateSearchFilter};
use crate::dto::filter::{CreateFilterRequest, UpdateFilterRequest};
use crate::repository::DieselRepository;
use crate::routes::{service_error, validation_failed};
use crate::services::filters;

#[get("/filters")]
pub async fn list_filters(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match filters::list_filters(repo.get_ref(), &user) {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(e) => service_error("Failed to list filters", e),
    }
}

#[post("/filters")]
pub async fn create_filter(
    user: AuthenticatedUser,
    payload: web::Json<CreateFilterRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return validation_failed(&errors);
    }

    let new_filter = NewSearchFilter::from(&*payload);
    match filters::create_filter(repo.get_ref(), &user, new_filter) {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => service_error("Failed to create filter", e),
    }
}

#[put("/filters/{id}")]
pub async fn update_filter(
    user: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<UpdateFilterRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return validation_failed(&errors);
    }

    let updates = UpdateSearchFilter::from(&*payload);
    match filters::update_filter(repo.get_ref(), &user, path.into_inner(), updates) {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => service_error("Failed to update filter", e),
    }
}
