use axum::{
    extract::{Path, State},
    Json,
};
use pulse_common::PulseError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ledger::PulseLedger;
use crate::models::{PulseUpdate, TodayCard};

#[derive(Clone)]
pub struct TodayState {
    pub ledger: PulseLedger,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodayRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(flatten)]
    pub update: PulseUpdate,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReactRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub emoji: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TodayCardResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub today_card: Option<TodayCard>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HistoryResponse {
    pub history: Vec<TodayCard>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/today/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses((status = 200, description = "Today's card, null when nothing was shared yet", body = TodayCardResponse)),
    tag = "Today"
))]
pub async fn get_today_handler(
    State(state): State<Arc<TodayState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<TodayCardResponse>, PulseError> {
    let card = state.ledger.get_today(&couple_id).await?;
    Ok(Json(TodayCardResponse {
        success: None,
        today_card: card,
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/today/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    request_body = UpdateTodayRequest,
    responses(
        (status = 200, description = "Updated card", body = TodayCardResponse),
        (status = 400, description = "Nothing to update"),
        (status = 403, description = "Not a member of the couple"),
        (status = 404, description = "Couple not found")
    ),
    tag = "Today"
))]
pub async fn update_today_handler(
    State(state): State<Arc<TodayState>>,
    Path(couple_id): Path<String>,
    Json(payload): Json<UpdateTodayRequest>,
) -> Result<Json<TodayCardResponse>, PulseError> {
    let card = state
        .ledger
        .update_today(&couple_id, &payload.user_id, payload.update)
        .await?;
    Ok(Json(TodayCardResponse {
        success: Some(true),
        today_card: Some(card),
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/today/{couple_id}/react",
    params(("couple_id" = String, Path, description = "Couple id")),
    request_body = ReactRequest,
    responses(
        (status = 200, description = "Card with the new reaction", body = TodayCardResponse),
        (status = 404, description = "No today card found")
    ),
    tag = "Today"
))]
pub async fn react_handler(
    State(state): State<Arc<TodayState>>,
    Path(couple_id): Path<String>,
    Json(payload): Json<ReactRequest>,
) -> Result<Json<TodayCardResponse>, PulseError> {
    let card = state
        .ledger
        .add_reaction(&couple_id, &payload.user_id, &payload.emoji)
        .await?;
    Ok(Json(TodayCardResponse {
        success: Some(true),
        today_card: Some(card),
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/history/{couple_id}",
    params(("couple_id" = String, Path, description = "Couple id")),
    responses((status = 200, description = "All cards, newest first", body = HistoryResponse)),
    tag = "Today"
))]
pub async fn history_handler(
    State(state): State<Arc<TodayState>>,
    Path(couple_id): Path<String>,
) -> Result<Json<HistoryResponse>, PulseError> {
    let history = state.ledger.get_history(&couple_id).await?;
    Ok(Json(HistoryResponse { history }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/history/{couple_id}/{date}",
    params(
        ("couple_id" = String, Path, description = "Couple id"),
        ("date" = String, Path, description = "UTC date, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "The card of that day or null", body = TodayCardResponse),
        (status = 400, description = "Malformed date")
    ),
    tag = "Today"
))]
pub async fn history_day_handler(
    State(state): State<Arc<TodayState>>,
    Path((couple_id, date)): Path<(String, String)>,
) -> Result<Json<TodayCardResponse>, PulseError> {
    let card = state.ledger.get_for_date(&couple_id, &date).await?;
    Ok(Json(TodayCardResponse {
        success: None,
        today_card: card,
    }))
}
