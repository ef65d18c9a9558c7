use actix_web::{HttpResponse, Responder, get, web};

use crate::domain::auth::AuthenticatedUser;
use crate::dto::notification::{NotificationEntry, NotificationsQueryParams};
use crate::repository::DieselRepository;
use crate::routes::service_error;
use crate::services::notifications;

#[get("/notifications")]
pub async fn list_notifications(
    user: AuthenticatedUser,
    params: web::Query<NotificationsQueryParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match notifications::list_notifications(repo.get_ref(), &user, params.limit) {
        Ok(delivered) => {
            let entries: Vec<NotificationEntry> =
                delivered.into_iter().map(NotificationEntry::from).collect();
            HttpResponse::Ok().json(entries)
        }
        Err(e) => service_error("Failed to list notifications", e),
    }
}
