use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::auth::Claims;
use crate::database::models::{GenerateShiftInput, ShiftTemplateInput};
use crate::database::store::Store;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, actor};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    pub client_id: Option<Uuid>,
}

pub async fn create_template<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    input: web::Json<ShiftTemplateInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let template = state
        .templates
        .create(&actor(&claims, &req), input.into_inner())
        .await?;

    Ok(ApiResponse::created(template, "Shift template created successfully"))
}

pub async fn get_templates<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    query: web::Query<TemplateQuery>,
) -> Result<HttpResponse, AppError> {
    claims.requires_admin()?;

    let templates = state.templates.list(query.client_id).await?;
    Ok(ApiResponse::success(templates))
}

pub async fn delete_template<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    state
        .templates
        .delete(&actor(&claims, &req), path.into_inner())
        .await?;

    Ok(ApiResponse::success_message("Shift template deleted successfully"))
}

pub async fn generate_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<GenerateShiftInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .templates
        .generate(&actor(&claims, &req), path.into_inner(), input.date)
        .await?;

    Ok(ApiResponse::created(shift, "Shift generated from template"))
}
