use axum::{extract::State, Json};
use pulse_common::{PulseError, SuccessResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::DeviceRegistration;
use crate::repository::DeviceRegistry;

#[derive(Clone)]
pub struct PushState {
    pub devices: DeviceRegistry,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub registration_token: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UnregisterDeviceRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub device_id: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterDeviceResponse {
    pub success: bool,
    pub device: DeviceRegistration,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/push/register-device",
    request_body = RegisterDeviceRequest,
    responses(
        (status = 200, description = "Device registered", body = RegisterDeviceResponse),
        (status = 400, description = "Missing fields")
    ),
    tag = "Push"
))]
pub async fn register_device_handler(
    State(state): State<Arc<PushState>>,
    Json(payload): Json<RegisterDeviceRequest>,
) -> Result<Json<RegisterDeviceResponse>, PulseError> {
    let device = state
        .devices
        .register(
            &payload.user_id,
            &payload.device_id,
            &payload.registration_token,
        )
        .await?;
    Ok(Json(RegisterDeviceResponse {
        success: true,
        device,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/push/unregister-device",
    request_body = UnregisterDeviceRequest,
    responses((status = 200, description = "Device removed (idempotent)", body = SuccessResponse)),
    tag = "Push"
))]
pub async fn unregister_device_handler(
    State(state): State<Arc<PushState>>,
    Json(payload): Json<UnregisterDeviceRequest>,
) -> Result<Json<SuccessResponse>, PulseError> {
    state
        .devices
        .unregister(&payload.user_id, &payload.device_id)
        .await?;
    Ok(Json(SuccessResponse::ok()))
}
