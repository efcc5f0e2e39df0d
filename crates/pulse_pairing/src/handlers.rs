//! HTTP handlers for users, pairing codes and couples.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use pulse_common::{PulseError, SuccessResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use crate::couples::CoupleDirectory;
use crate::identity::IdentityService;
use crate::models::PublicUser;
use crate::pairing::PairingService;

/// Shared state for identity and pairing handlers
#[derive(Clone)]
pub struct PairingState {
    pub identity: IdentityService,
    pub pairing: PairingService,
    pub couples: CoupleDirectory,
}

// Fields default to empty so missing input surfaces as a validation error, not a 422.

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeRequest {
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeResponse {
    pub success: bool,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub success: bool,
    pub couple_id: String,
    pub partner: PublicUser,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/create",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Missing fields or password too short"),
        (status = 409, description = "Username already taken")
    ),
    tag = "Users"
))]
pub async fn create_user_handler(
    State(state): State<Arc<PairingState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, PulseError> {
    debug!("Creating user: {}", payload.username);
    let user = state
        .identity
        .create_user(&payload.username, &payload.password, &payload.display_name)
        .await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Users"
))]
pub async fn login_handler(
    State(state): State<Arc<PairingState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<UserResponse>, PulseError> {
    let user = state
        .identity
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = SuccessResponse),
        (status = 404, description = "Unknown username")
    ),
    tag = "Users"
))]
pub async fn reset_password_handler(
    State(state): State<Arc<PairingState>>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<SuccessResponse>, PulseError> {
    state
        .identity
        .reset_password(&payload.username, &payload.new_password)
        .await?;
    Ok(Json(SuccessResponse::with_message(
        "Password updated successfully",
    )))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Public profile", body = PublicUser),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
))]
pub async fn get_user_handler(
    State(state): State<Arc<PairingState>>,
    Path(user_id): Path<String>,
) -> Result<Json<PublicUser>, PulseError> {
    let user = state.identity.get_user(&user_id).await?;
    Ok(Json(PublicUser::from(&user)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/pairing/generate",
    request_body = GenerateCodeRequest,
    responses(
        (status = 200, description = "Code issued", body = GenerateCodeResponse),
        (status = 404, description = "User not found")
    ),
    tag = "Pairing"
))]
pub async fn generate_code_handler(
    State(state): State<Arc<PairingState>>,
    Json(payload): Json<GenerateCodeRequest>,
) -> Result<Json<GenerateCodeResponse>, PulseError> {
    let code = state.pairing.generate_code(&payload.user_id).await?;
    Ok(Json(GenerateCodeResponse {
        success: true,
        code: code.code,
        expires_at: code.expires_at,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/pairing/join",
    request_body = JoinRequest,
    responses(
        (status = 200, description = "Couple formed", body = JoinResponse),
        (status = 400, description = "Invalid, expired, used or own code"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Already paired")
    ),
    tag = "Pairing"
))]
pub async fn join_handler(
    State(state): State<Arc<PairingState>>,
    Json(payload): Json<JoinRequest>,
) -> Result<Json<JoinResponse>, PulseError> {
    let outcome = state
        .pairing
        .join_with_code(&payload.user_id, &payload.code)
        .await?;
    Ok(Json(JoinResponse {
        success: true,
        couple_id: outcome.couple_id,
        partner: outcome.partner,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/pairing/{user_id}",
    params(("user_id" = String, Path, description = "Issuer id")),
    responses((status = 200, description = "Current code or {code: null}")),
    tag = "Pairing"
))]
pub async fn current_code_handler(
    State(state): State<Arc<PairingState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, PulseError> {
    match state.pairing.current_code(&user_id).await? {
        Some(code) => Ok(Json(serde_json::to_value(code)?)),
        None => Ok(Json(json!({ "code": null }))),
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/couples/{user_id}",
    params(("user_id" = String, Path, description = "Member id")),
    responses((status = 200, description = "Couple with partner or {couple: null}")),
    tag = "Couples"
))]
pub async fn get_couple_handler(
    State(state): State<Arc<PairingState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, PulseError> {
    match state.couples.view_for(&user_id).await? {
        Some(view) => Ok(Json(serde_json::to_value(view)?)),
        None => Ok(Json(json!({ "couple": null }))),
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/couples/{user_id}",
    params(("user_id" = String, Path, description = "Member id")),
    responses(
        (status = 200, description = "Unpaired", body = SuccessResponse),
        (status = 404, description = "No couple found")
    ),
    tag = "Couples"
))]
pub async fn unpair_handler(
    State(state): State<Arc<PairingState>>,
    Path(user_id): Path<String>,
) -> Result<Json<SuccessResponse>, PulseError> {
    state.couples.unpair(&user_id).await?;
    Ok(Json(SuccessResponse::ok()))
}
