use actix_web::{HttpResponse, web};

use crate::AppState;
use crate::auth::Claims;
use crate::database::models::AuditFilter;
use crate::database::store::Store;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

pub async fn get_audit_logs<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    query: web::Query<AuditFilter>,
) -> Result<HttpResponse, AppError> {
    claims.requires_audit_reader()?;

    let page = state.audit.query(&query).await?;
    Ok(ApiResponse::success(page))
}
