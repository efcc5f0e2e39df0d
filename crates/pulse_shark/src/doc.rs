use utoipa::OpenApi;

use crate::handlers::{
    ActivateRequest, DeactivateRequest, ExtendRequest, ReassuranceRequest, SharkHistoryResponse,
    SharkModeResponse, UpdateNoteRequest,
};
use crate::models::{SharkMode, SharkStatus};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::activate_handler,
        crate::handlers::extend_handler,
        crate::handlers::deactivate_handler,
        crate::handlers::update_note_handler,
        crate::handlers::reassurance_handler,
        crate::handlers::status_handler,
        crate::handlers::history_handler,
    ),
    components(schemas(
        ActivateRequest,
        ExtendRequest,
        DeactivateRequest,
        UpdateNoteRequest,
        ReassuranceRequest,
        SharkModeResponse,
        SharkHistoryResponse,
        SharkMode,
        SharkStatus,
    )),
    tags((name = "Shark Mode", description = "Time-boxed extra-care status"))
)]
pub struct SharkApiDoc;
