use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::auth::Claims;
use crate::database::models::{
    AvailabilityQuery, CreateShiftInput, ShiftFilter, UpdateShiftInput,
};
use crate::database::store::Store;
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, actor};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignShiftRequest {
    pub staff_id: Uuid,
}

pub async fn create_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    input: web::Json<CreateShiftInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .shifts
        .create(&actor(&claims, &req), input.into_inner())
        .await?;

    Ok(ApiResponse::created(shift, "Shift created successfully"))
}

/// Staff only ever see their own shifts, whatever filter they send.
pub async fn get_shifts<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    query: web::Query<ShiftFilter>,
) -> Result<HttpResponse, AppError> {
    let mut filter = query.into_inner();
    if !claims.role.is_admin() {
        filter.staff_id = Some(claims.user_id());
    }

    let shifts = state.shifts.list(&filter).await?;
    Ok(ApiResponse::success(shifts))
}

pub async fn get_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let shift = state.shifts.get(path.into_inner()).await?;

    if !claims.role.is_admin() && shift.staff_id != Some(claims.user_id()) {
        return Err(AppError::Forbidden(
            "You can only view your own shifts".to_string(),
        ));
    }

    Ok(ApiResponse::success(shift))
}

pub async fn get_staff_shifts<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let staff_id = path.into_inner();
    if staff_id != claims.user_id() {
        claims.requires_admin()?;
    }

    let shifts = state.shifts.staff_history(staff_id).await?;
    Ok(ApiResponse::success(shifts))
}

pub async fn check_availability<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let report = state.shifts.availability(&query).await?;
    Ok(ApiResponse::success(report))
}

pub async fn update_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<UpdateShiftInput>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .shifts
        .edit(&actor(&claims, &req), path.into_inner(), input.into_inner())
        .await?;

    Ok(ApiResponse::success_with_message(shift, "Shift updated successfully"))
}

pub async fn delete_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    state
        .shifts
        .delete(&actor(&claims, &req), path.into_inner())
        .await?;

    Ok(ApiResponse::success_message("Shift deleted successfully"))
}

pub async fn assign_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<AssignShiftRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .shifts
        .assign(&actor(&claims, &req), path.into_inner(), input.staff_id)
        .await?;

    Ok(ApiResponse::success_with_message(shift, "Staff assigned to shift"))
}

pub async fn unassign_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .shifts
        .unassign(&actor(&claims, &req), path.into_inner())
        .await?;

    Ok(ApiResponse::success_with_message(shift, "Staff removed from shift"))
}

pub async fn cancel_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .shifts
        .cancel(&actor(&claims, &req), path.into_inner())
        .await?;

    Ok(ApiResponse::success_with_message(shift, "Shift cancelled"))
}

pub async fn complete_shift<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    claims.requires_shift_manager()?;

    let shift = state
        .shifts
        .complete(&actor(&claims, &req), path.into_inner())
        .await?;

    Ok(ApiResponse::success_with_message(shift, "Shift completed"))
}
