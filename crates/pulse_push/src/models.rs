use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An FCM registration token stored for one of a user's devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    pub user_id: String,
    pub device_id: String,
    pub registration_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set once FCM reports the token as unregistered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl DeviceRegistration {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }
}
