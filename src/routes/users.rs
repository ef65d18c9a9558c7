use actix_web::{HttpResponse, Responder, get, put, web};
use validator::Validate;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::UpdateProfile;
use crate::dto::user::{UpdateProfileRequest, UserProfile};
use crate::repository::DieselRepository;
use crate::routes::{service_error, validation_failed};
use crate::services::users;

#[get("/users/profile")]
pub async fn get_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match users::get_profile(repo.get_ref(), user.sub) {
        Ok(account) => HttpResponse::Ok().json(UserProfile::from(account)),
        Err(e) => service_error("Failed to load profile", e),
    }
}

#[put("/users/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return validation_failed(&errors);
    }

    let updates = UpdateProfile::from(&*payload);
    match users::update_profile(repo.get_ref(), user.sub, updates) {
        Ok(account) => HttpResponse::Ok().json(UserProfile::from(account)),
        Err(e) => service_error("Failed to update profile", e),
    }
}
