use actix_web::HttpResponse;
use serde::Serialize;
use validator::ValidationErrors;

use crate::services::ServiceError;

pub mod auth;
pub mod filters;
pub mod listings;
pub mod notifications;
pub mod subscriptions;
pub mod users;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps a service failure onto the HTTP surface. Internal details are logged
/// under `context` and never leak to the caller.
pub(crate) fn service_error(context: &str, err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Conflict(detail) => HttpResponse::Conflict().json(ErrorBody { error: detail }),
        ServiceError::Validation(detail) => {
            HttpResponse::BadRequest().json(ErrorBody { error: detail })
        }
        ServiceError::Internal(detail) => {
            log::error!("{context}: {detail}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub(crate) fn validation_failed(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: errors.to_string(),
    })
}
