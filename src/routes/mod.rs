use actix_web::web;

use crate::database::store::Store;
use crate::error::AppError;

pub mod audit;
pub mod notifications;
pub mod shifts;
pub mod templates;

/// Mounts the API under `/api/v1` for a given store backend.
pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api/v1")
            .configure(shifts::configure::<S>)
            .configure(templates::configure::<S>)
            .configure(notifications::configure::<S>)
            .configure(audit::configure::<S>),
    );
}
