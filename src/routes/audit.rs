use actix_web::web;

use crate::database::store::Store;
use crate::handlers::audit;

pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.route("/audit-logs", web::get().to(audit::get_audit_logs::<S>));
}
