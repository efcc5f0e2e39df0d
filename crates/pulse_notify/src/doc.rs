use utoipa::OpenApi;

use crate::handlers::{
    DoodleUpdateRequest, MessageUpdateRequest, MoodUpdateRequest, NotificationListResponse,
    NotificationResponse, NudgeRequest,
};
use crate::models::{Notification, NotificationKind};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::nudge_handler,
        crate::handlers::mood_update_handler,
        crate::handlers::message_update_handler,
        crate::handlers::doodle_update_handler,
        crate::handlers::list_handler,
        crate::handlers::mark_read_handler,
    ),
    components(schemas(
        NudgeRequest,
        MoodUpdateRequest,
        MessageUpdateRequest,
        DoodleUpdateRequest,
        NotificationResponse,
        NotificationListResponse,
        Notification,
        NotificationKind,
    )),
    tags((name = "Notifications", description = "Partner-directed notifications"))
)]
pub struct NotifyApiDoc;
