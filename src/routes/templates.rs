use actix_web::web;

use crate::database::store::Store;
use crate::handlers::templates;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shift-templates")
            .route("", web::post().to(templates::create_template::<S>))
            .route("", web::get().to(templates::get_templates::<S>))
            .route("/{id}", web::delete().to(templates::delete_template::<S>))
            .route("/{id}/generate", web::post().to(templates::generate_shift::<S>)),
    );
}
