//! Device registrations kept in the key-value store.

use pulse_common::{validation_error, PulseError, SharedClock};
use pulse_store::{get_json, put_json, scan_json, KvStore, SharedStore};
use tracing::{debug, info};

use crate::keys;
use crate::models::DeviceRegistration;

#[derive(Clone)]
pub struct DeviceRegistry {
    store: SharedStore,
    clock: SharedClock,
}

impl DeviceRegistry {
    pub fn new(store: SharedStore, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Stores or refreshes a device token. Re-registering clears a previous revocation.
    pub async fn register(
        &self,
        user_id: &str,
        device_id: &str,
        registration_token: &str,
    ) -> Result<DeviceRegistration, PulseError> {
        if user_id.is_empty() || device_id.is_empty() || registration_token.is_empty() {
            return Err(validation_error(
                "User ID, device ID, and registration token are required",
            ));
        }

        let key = keys::device(user_id, device_id);
        let now = self.clock.now();
        let existing: Option<DeviceRegistration> = get_json(self.store.as_ref(), &key).await?;

        let registration = DeviceRegistration {
            user_id: user_id.to_string(),
            device_id: device_id.to_string(),
            registration_token: registration_token.to_string(),
            created_at: existing.map(|d| d.created_at).unwrap_or(now),
            updated_at: now,
            revoked_at: None,
        };
        put_json(self.store.as_ref(), &key, &registration).await?;

        info!("Registered device {} for user {}", device_id, user_id);
        Ok(registration)
    }

    /// Returns whether a registration existed.
    pub async fn unregister(&self, user_id: &str, device_id: &str) -> Result<bool, PulseError> {
        if user_id.is_empty() || device_id.is_empty() {
            return Err(validation_error("User ID and device ID are required"));
        }
        let removed = self
            .store
            .delete(&keys::device(user_id, device_id))
            .await?;
        debug!(
            "Unregister device {} for user {}: removed={}",
            device_id, user_id, removed
        );
        Ok(removed)
    }

    pub async fn active_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<DeviceRegistration>, PulseError> {
        let devices: Vec<DeviceRegistration> =
            scan_json(self.store.as_ref(), &keys::devices_prefix(user_id)).await?;
        Ok(devices.into_iter().filter(|d| d.is_active()).collect())
    }

    pub async fn revoke(&self, user_id: &str, device_id: &str) -> Result<(), PulseError> {
        let key = keys::device(user_id, device_id);
        if let Some(mut device) =
            get_json::<DeviceRegistration>(self.store.as_ref(), &key).await?
        {
            let now = self.clock.now();
            device.revoked_at = Some(now);
            device.updated_at = now;
            put_json(self.store.as_ref(), &key, &device).await?;
            info!("Revoked device {} for user {}", device_id, user_id);
        }
        Ok(())
    }
}
