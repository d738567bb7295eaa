use actix_web::{HttpResponse, web};
use futures_util::{StreamExt, stream};
use uuid::Uuid;

use crate::AppState;
use crate::auth::Claims;
use crate::database::models::NotificationQuery;
use crate::database::store::Store;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::RealtimeEvent;

/// Admins may read any recipient's notifications; everyone else reads
/// their own.
pub async fn get_notifications<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    query: web::Query<NotificationQuery>,
) -> Result<HttpResponse, AppError> {
    let recipient_id = match query.recipient_id {
        Some(id) if id != claims.user_id() => {
            claims.requires_admin()?;
            id
        }
        _ => claims.user_id(),
    };

    let notifications = state
        .notifications
        .list_for_recipient(recipient_id, query.unread_only)
        .await?;

    Ok(ApiResponse::success(notifications))
}

pub async fn mark_notification_read<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let notification = state
        .notifications
        .mark_read(id, claims.user_id())
        .await?
        .ok_or_else(|| AppError::not_found("Notification", id))?;

    Ok(ApiResponse::success(notification))
}

fn sse_frame(event: &RealtimeEvent) -> web::Bytes {
    let data = serde_json::to_string(&event.payload).unwrap_or_else(|_| "null".to_string());
    web::Bytes::from(format!("event: {}\ndata: {}\n\n", event.event, data))
}

/// Server-sent event stream of the caller's real-time shift events.
pub async fn stream_notifications<S: Store>(
    state: web::Data<AppState<S>>,
    claims: Claims,
) -> HttpResponse {
    let rx = state.realtime.subscribe(claims.user_id()).await;

    let hello = stream::once(async {
        Ok::<_, actix_web::Error>(web::Bytes::from_static(b": connected\n\n"))
    });
    let events = stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Ok(sse_frame(&event)), rx))
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(hello.chain(events))
}
