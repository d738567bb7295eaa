use actix_web::web;

use crate::database::store::Store;
use crate::handlers::shifts;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/shifts")
            .route("", web::post().to(shifts::create_shift::<S>))
            .route("", web::get().to(shifts::get_shifts::<S>))
            .route("/availability", web::get().to(shifts::check_availability::<S>))
            .route("/staff/{staff_id}", web::get().to(shifts::get_staff_shifts::<S>))
            .route("/{id}", web::get().to(shifts::get_shift::<S>))
            .route("/{id}", web::put().to(shifts::update_shift::<S>))
            .route("/{id}", web::delete().to(shifts::delete_shift::<S>))
            .route("/{id}/assign", web::post().to(shifts::assign_shift::<S>))
            .route("/{id}/unassign", web::post().to(shifts::unassign_shift::<S>))
            .route("/{id}/cancel", web::post().to(shifts::cancel_shift::<S>))
            .route("/{id}/complete", web::post().to(shifts::complete_shift::<S>)),
    );
}
