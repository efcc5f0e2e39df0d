use utoipa::OpenApi;

use crate::handlers::{RegisterDeviceRequest, RegisterDeviceResponse, UnregisterDeviceRequest};
use crate::models::DeviceRegistration;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::register_device_handler,
        crate::handlers::unregister_device_handler,
    ),
    components(schemas(
        RegisterDeviceRequest,
        UnregisterDeviceRequest,
        RegisterDeviceResponse,
        DeviceRegistration,
    )),
    tags((name = "Push", description = "Device registration for push delivery"))
)]
pub struct PushApiDoc;
