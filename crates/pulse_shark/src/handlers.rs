use axum::{
    extract::{Path, State},
    Json,
};
use pulse_common::{validation_error, PulseError, SuccessResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::SharkMode;
use crate::service::SharkModeService;

#[derive(Clone)]
pub struct SharkState {
    pub shark: SharkModeService,
}

fn require_ids(couple_id: &str, user_id: &str) -> Result<(), PulseError> {
    if couple_id.is_empty() || user_id.is_empty() {
        return Err(validation_error("Couple ID and user ID are required"));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ActivateRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub duration_days: i64,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExtendRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub additional_days: i64,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeactivateRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReassuranceRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub reassurance: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SharkModeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub shark_mode: Option<SharkMode>,
}

impl SharkModeResponse {
    fn changed(record: SharkMode) -> Self {
        Self {
            success: Some(true),
            shark_mode: Some(record),
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SharkHistoryResponse {
    pub history: Vec<SharkMode>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/shark-mode/activate",
    request_body = ActivateRequest,
    responses(
        (status = 200, description = "Shark mode activated", body = SharkModeResponse),
        (status = 400, description = "Duration out of range"),
        (status = 409, description = "Already active")
    ),
    tag = "Shark Mode"
))]
pub async fn activate_handler(
    State(state): State<Arc<SharkState>>,
    Json(payload): Json<ActivateRequest>,
) -> Result<Json<SharkModeResponse>, PulseError> {
    require_ids(&payload.couple_id, &payload.user_id)?;
    let record = state
        .shark
        .activate(
            &payload.couple_id,
            &payload.user_id,
            payload.duration_days,
            payload.note,
        )
        .await?;
    Ok(Json(SharkModeResponse::changed(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/shark-mode/extend",
    request_body = ExtendRequest,
    responses(
        (status = 200, description = "Window extended", body = SharkModeResponse),
        (status = 403, description = "Caller did not activate shark mode")
    ),
    tag = "Shark Mode"
))]
pub async fn extend_handler(
    State(state): State<Arc<SharkState>>,
    Json(payload): Json<ExtendRequest>,
) -> Result<Json<SharkModeResponse>, PulseError> {
    require_ids(&payload.couple_id, &payload.user_id)?;
    let record = state
        .shark
        .extend(&payload.couple_id, &payload.user_id, payload.additional_days)
        .await?;
    Ok(Json(SharkModeResponse::changed(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/shark-mode/deactivate",
    request_body = DeactivateRequest,
    responses((status = 200, description = "Shark mode ended", body = SuccessResponse)),
    tag = "Shark Mode"
))]
pub async fn deactivate_handler(
    State(state): State<Arc<SharkState>>,
    Json(payload): Json<DeactivateRequest>,
) -> Result<Json<SuccessResponse>, PulseError> {
    require_ids(&payload.couple_id, &payload.user_id)?;
    state
        .shark
        .deactivate(&payload.couple_id, &payload.user_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/shark-mode/update-note",
    request_body = UpdateNoteRequest,
    responses((status = 200, description = "Note updated", body = SharkModeResponse)),
    tag = "Shark Mode"
))]
pub async fn update_note_handler(
    State(state): State<Arc<SharkState>>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Result<Json<SharkModeResponse>, PulseError> {
    require_ids(&payload.couple_id, &payload.user_id)?;
    let record = state
        .shark
        .update_note(&payload.couple_id, &payload.user_id, &payload.note)
        .await?;
    Ok(Json(SharkModeResponse::changed(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/shark-mode/reassurance",
    request_body = ReassuranceRequest,
    responses(
        (status = 200, description = "Reassurance stored", body = SharkModeResponse),
        (status = 403, description = "Activator cannot reassure themselves")
    ),
    tag = "Shark Mode"
))]
pub async fn reassurance_handler(
    State(state): State<Arc<SharkState>>,
    Json(payload): Json<ReassuranceRequest>,
) -> Result<Json<SharkModeResponse>, PulseError> {
    require_ids(&payload.couple_id, &payload.user_id)?;
    let record = state
        .shark
        .send_reassurance(&payload.couple_id, &payload.user_id, &payload.reassurance)
        .await?;
    Ok(Json(SharkModeResponse::changed(record)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/shark-mode/status/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses((status = 200, description = "Active shark mode or null", body = SharkModeResponse)),
    tag = "Shark Mode"
))]
pub async fn status_handler(
    State(state): State<Arc<SharkState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<SharkModeResponse>, PulseError> {
    let shark_mode = state.shark.get_status(&couple_id).await?;
    Ok(Json(SharkModeResponse {
        success: None,
        shark_mode,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/shark-mode/history/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses((status = 200, description = "All activations, newest first", body = SharkHistoryResponse)),
    tag = "Shark Mode"
))]
pub async fn history_handler(
    State(state): State<Arc<SharkState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<SharkHistoryResponse>, PulseError> {
    let history = state.shark.get_history(&couple_id).await?;
    Ok(Json(SharkHistoryResponse { history }))
}
