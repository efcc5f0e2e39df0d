use axum::{
    extract::{Path, State},
    Json,
};
use pulse_common::PulseError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::daily::{self, DailyScheduler};
use crate::models::{ChallengeStats, DailyChallenge, DailyStats, WeeklyChallenge};
use crate::weekly::{self, WeeklyScheduler};

#[derive(Clone)]
pub struct ChallengeState {
    pub weekly: WeeklyScheduler,
    pub daily: DailyScheduler,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompleteChallengeRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    #[serde(default)]
    pub couple_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WeeklyChallengeResponse {
    pub challenge: WeeklyChallenge,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CompleteChallengeResponse {
    pub success: bool,
    pub challenge: WeeklyChallenge,
    pub just_completed: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChallengeHistoryResponse {
    pub history: Vec<WeeklyChallenge>,
    pub stats: ChallengeStats,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DailyChallengeResponse {
    pub challenge: DailyChallenge,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub success: bool,
    pub challenge: DailyChallenge,
    pub just_completed: bool,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DailyArchiveResponse {
    pub archive: Vec<DailyChallenge>,
    pub stats: DailyStats,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/challenges/current/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses(
        (status = 200, description = "This week's challenge", body = WeeklyChallengeResponse),
        (status = 404, description = "Couple not found")
    ),
    tag = "Challenges"
))]
pub async fn current_challenge_handler(
    State(state): State<Arc<ChallengeState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<WeeklyChallengeResponse>, PulseError> {
    let challenge = state.weekly.get_current(&couple_id).await?;
    Ok(Json(WeeklyChallengeResponse { challenge }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/challenges/complete",
    request_body = CompleteChallengeRequest,
    responses(
        (status = 200, description = "Completion recorded", body = CompleteChallengeResponse),
        (status = 403, description = "Not a member of the couple")
    ),
    tag = "Challenges"
))]
pub async fn complete_challenge_handler(
    State(state): State<Arc<ChallengeState>>,
    Json(payload): Json<CompleteChallengeRequest>,
) -> Result<Json<CompleteChallengeResponse>, PulseError> {
    if payload.couple_id.is_empty() || payload.user_id.is_empty() {
        return Err(pulse_common::validation_error(
            "Couple ID and user ID are required",
        ));
    }
    let completion = state
        .weekly
        .complete(&payload.couple_id, &payload.user_id, payload.response)
        .await?;
    Ok(Json(CompleteChallengeResponse {
        success: true,
        challenge: completion.challenge,
        just_completed: completion.just_completed,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/challenges/history/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses((status = 200, description = "Completed challenges and stats", body = ChallengeHistoryResponse)),
    tag = "Challenges"
))]
pub async fn challenge_history_handler(
    State(state): State<Arc<ChallengeState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<ChallengeHistoryResponse>, PulseError> {
    let history = state.weekly.history(&couple_id).await?;
    let stats = weekly::stats(&history);
    Ok(Json(ChallengeHistoryResponse { history, stats }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/daily-challenge/current/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses(
        (status = 200, description = "Today's question", body = DailyChallengeResponse),
        (status = 404, description = "Couple not found")
    ),
    tag = "Challenges"
))]
pub async fn current_daily_handler(
    State(state): State<Arc<ChallengeState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<DailyChallengeResponse>, PulseError> {
    let challenge = state.daily.get_current(&couple_id).await?;
    Ok(Json(DailyChallengeResponse { challenge }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/daily-challenge/answer",
    request_body = AnswerRequest,
    responses((status = 200, description = "Answer recorded", body = AnswerResponse)),
    tag = "Challenges"
))]
pub async fn answer_daily_handler(
    State(state): State<Arc<ChallengeState>>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, PulseError> {
    if payload.couple_id.is_empty() || payload.user_id.is_empty() {
        return Err(pulse_common::validation_error(
            "Couple ID, user ID, and answer are required",
        ));
    }
    let completion = state
        .daily
        .answer(&payload.couple_id, &payload.user_id, &payload.answer)
        .await?;
    Ok(Json(AnswerResponse {
        success: true,
        challenge: completion.challenge,
        just_completed: completion.just_completed,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/daily-challenge/archive/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses((status = 200, description = "Answered questions and stats", body = DailyArchiveResponse)),
    tag = "Challenges"
))]
pub async fn daily_archive_handler(
    State(state): State<Arc<ChallengeState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<DailyArchiveResponse>, PulseError> {
    let archive = state.daily.archive(&couple_id).await?;
    let stats = daily::stats(&archive);
    Ok(Json(DailyArchiveResponse { archive, stats }))
}
