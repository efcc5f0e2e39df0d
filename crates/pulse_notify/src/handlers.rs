use axum::{
    extract::{Path, State},
    Json,
};
use pulse_common::{PulseError, SuccessResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{Notification, NotificationKind};
use crate::notifier::NotificationService;

#[derive(Clone)]
pub struct NotifyState {
    pub notifier: NotificationService,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NudgeRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub sender_id: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MoodUpdateRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub intensity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdateRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DoodleUpdateRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub doodle: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationResponse {
    pub success: bool,
    pub notification: Notification,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NotificationListResponse {
    pub notifications: Vec<Notification>,
}

async fn send(
    state: &NotifyState,
    kind: NotificationKind,
    couple_id: &str,
    sender_id: &str,
) -> Result<Json<NotificationResponse>, PulseError> {
    let notification = state.notifier.notify(kind, couple_id, sender_id).await?;
    Ok(Json(NotificationResponse {
        success: true,
        notification,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/notifications/nudge",
    request_body = NudgeRequest,
    responses(
        (status = 200, description = "Nudge stored and pushed", body = NotificationResponse),
        (status = 404, description = "Couple not found")
    ),
    tag = "Notifications"
))]
pub async fn nudge_handler(
    State(state): State<Arc<NotifyState>>,
    Json(payload): Json<NudgeRequest>,
) -> Result<Json<NotificationResponse>, PulseError> {
    send(&state, NotificationKind::Nudge, &payload.couple_id, &payload.sender_id).await
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/notifications/mood-update",
    request_body = MoodUpdateRequest,
    responses((status = 200, description = "Mood update stored and pushed", body = NotificationResponse)),
    tag = "Notifications"
))]
pub async fn mood_update_handler(
    State(state): State<Arc<NotifyState>>,
    Json(payload): Json<MoodUpdateRequest>,
) -> Result<Json<NotificationResponse>, PulseError> {
    let kind = NotificationKind::MoodUpdate {
        mood: payload.mood,
        intensity: payload.intensity,
    };
    send(&state, kind, &payload.couple_id, &payload.sender_id).await
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/notifications/message-update",
    request_body = MessageUpdateRequest,
    responses((status = 200, description = "Message update stored and pushed", body = NotificationResponse)),
    tag = "Notifications"
))]
pub async fn message_update_handler(
    State(state): State<Arc<NotifyState>>,
    Json(payload): Json<MessageUpdateRequest>,
) -> Result<Json<NotificationResponse>, PulseError> {
    let kind = NotificationKind::MessageUpdate {
        message: payload.message,
    };
    send(&state, kind, &payload.couple_id, &payload.sender_id).await
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/notifications/doodle-update",
    request_body = DoodleUpdateRequest,
    responses((status = 200, description = "Doodle update stored and pushed", body = NotificationResponse)),
    tag = "Notifications"
))]
pub async fn doodle_update_handler(
    State(state): State<Arc<NotifyState>>,
    Json(payload): Json<DoodleUpdateRequest>,
) -> Result<Json<NotificationResponse>, PulseError> {
    let kind = NotificationKind::DoodleUpdate {
        doodle: payload.doodle,
    };
    send(&state, kind, &payload.couple_id, &payload.sender_id).await
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/notifications/{id}",
    params(("id" = String, Path, description = "Receiver user id")),
    responses((status = 200, description = "All notifications, newest first", body = NotificationListResponse)),
    tag = "Notifications"
))]
pub async fn list_handler(
    State(state): State<Arc<NotifyState>>,
    Path(user_id): Path<String>,
) -> Result<Json<NotificationListResponse>, PulseError> {
    let notifications = state.notifier.list_for(&user_id).await?;
    Ok(Json(NotificationListResponse { notifications }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = SuccessResponse),
        (status = 404, description = "Notification not found")
    ),
    tag = "Notifications"
))]
pub async fn mark_read_handler(
    State(state): State<Arc<NotifyState>>,
    Path(notification_id): Path<String>,
) -> Result<Json<SuccessResponse>, PulseError> {
    state.notifier.mark_read(&notification_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
