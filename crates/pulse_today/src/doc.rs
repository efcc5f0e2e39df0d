use utoipa::OpenApi;

use crate::handlers::{HistoryResponse, ReactRequest, TodayCardResponse, UpdateTodayRequest};
use crate::models::{GalleryEntry, PulseUpdate, Reaction, SlotState, TodayCard};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::get_today_handler,
        crate::handlers::update_today_handler,
        crate::handlers::react_handler,
        crate::handlers::history_handler,
        crate::handlers::history_day_handler,
    ),
    components(schemas(
        UpdateTodayRequest,
        ReactRequest,
        TodayCardResponse,
        HistoryResponse,
        TodayCard,
        SlotState,
        GalleryEntry,
        Reaction,
        PulseUpdate,
    )),
    tags((name = "Today", description = "The shared daily card and its history"))
)]
pub struct TodayApiDoc;
