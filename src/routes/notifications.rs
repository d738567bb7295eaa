use actix_web::web;

use crate::database::store::Store;
use crate::handlers::notifications;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::get_notifications::<S>))
            .route("/stream", web::get().to(notifications::stream_notifications::<S>))
            .route(
                "/{id}/read",
                web::patch().to(notifications::mark_notification_read::<S>),
            ),
    );
}
