//! `PushService` backed by FCM.

use pulse_common::services::{BoxFuture, PushPayload, PushReport, PushService};
use pulse_common::PulseError;
use tracing::{debug, warn};

use crate::client::{FcmClient, FcmMessage};
use crate::repository::DeviceRegistry;

#[derive(Clone)]
pub struct FcmPushService {
    client: FcmClient,
    devices: DeviceRegistry,
}

impl FcmPushService {
    pub fn new(client: FcmClient, devices: DeviceRegistry) -> Self {
        Self { client, devices }
    }

    async fn deliver(
        &self,
        user_id: &str,
        payload: &PushPayload,
    ) -> Result<PushReport, PulseError> {
        let mut report = PushReport::default();

        for device in self.devices.active_for_user(user_id).await? {
            let message = FcmMessage::for_device(&device.registration_token, payload);
            match self.client.send(&message).await {
                Ok(name) => {
                    debug!("Delivered {} to device {}", name, device.device_id);
                    report.delivered += 1;
                }
                Err(e) if e.is_unregistered() => {
                    warn!(
                        "Device {} of user {} is no longer registered",
                        device.device_id, user_id
                    );
                    match self.devices.revoke(user_id, &device.device_id).await {
                        Ok(()) => report.revoked += 1,
                        Err(e) => {
                            warn!("Could not revoke device {}: {}", device.device_id, e);
                            report.failed += 1;
                        }
                    }
                }
                Err(e) => {
                    warn!("Push to device {} failed: {}", device.device_id, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

impl PushService for FcmPushService {
    fn send_to_user<'a>(
        &'a self,
        user_id: &'a str,
        payload: PushPayload,
    ) -> BoxFuture<'a, PushReport, PulseError> {
        Box::pin(async move { self.deliver(user_id, &payload).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenSource;
    use chrono::{TimeZone, Utc};
    use pulse_common::ManualClock;
    use pulse_store::{KvStore, MemoryKvStore, SharedStore, StoreError};
    use serde_json::Value;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Memory store whose writes can be switched off.
    #[derive(Default)]
    struct SealableStore {
        inner: MemoryKvStore,
        sealed: AtomicBool,
    }

    impl KvStore for SealableStore {
        fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Option<Value>, StoreError> {
            self.inner.get(key)
        }

        fn set<'a>(&'a self, key: &'a str, value: Value) -> BoxFuture<'a, (), StoreError> {
            if self.sealed.load(Ordering::SeqCst) {
                return Box::pin(async { Err(StoreError::Query("store is sealed".into())) });
            }
            self.inner.set(key, value)
        }

        fn delete<'a>(&'a self, key: &'a str) -> BoxFuture<'a, bool, StoreError> {
            self.inner.delete(key)
        }

        fn scan_prefix<'a>(
            &'a self,
            prefix: &'a str,
        ) -> BoxFuture<'a, Vec<(String, Value)>, StoreError> {
            self.inner.scan_prefix(prefix)
        }
    }

    fn payload() -> PushPayload {
        PushPayload {
            title: "😊 Alex shared their mood".to_string(),
            body: "Feeling happy".to_string(),
            tag: "aimo-pulse-mood".to_string(),
            data: BTreeMap::new(),
        }
    }

    async fn service(server: &MockServer) -> (FcmPushService, DeviceRegistry) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        ));
        let devices = DeviceRegistry::new(Arc::new(MemoryKvStore::new()), clock);
        let client = FcmClient::new("pulse-test", Arc::new(StaticTokenSource("t".into())))
            .with_base_url(server.uri());
        (FcmPushService::new(client, devices.clone()), devices)
    }

    #[tokio::test]
    async fn test_user_without_devices_gets_empty_report() {
        let server = MockServer::start().await;
        let (service, _) = service(&server).await;
        let report = service.send_to_user("u2", payload()).await.unwrap();
        assert_eq!(report, PushReport::default());
    }

    #[tokio::test]
    async fn test_fans_out_and_revokes_stale_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"message": {"token": "good"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/pulse-test/messages/1"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"message": {"token": "stale"}})))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"message": {"token": "flaky"}})))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let (service, devices) = service(&server).await;
        devices.register("u2", "phone", "good").await.unwrap();
        devices.register("u2", "old-tablet", "stale").await.unwrap();
        devices.register("u2", "laptop", "flaky").await.unwrap();

        let report = service.send_to_user("u2", payload()).await.unwrap();
        assert_eq!(
            report,
            PushReport {
                delivered: 1,
                failed: 1,
                revoked: 1,
            }
        );

        let remaining: Vec<String> = devices
            .active_for_user("u2")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.device_id)
            .collect();
        assert_eq!(remaining, vec!["laptop".to_string(), "phone".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_revoke_does_not_stop_fan_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"message": {"token": "stale"}})))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({"message": {"token": "good"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/pulse-test/messages/2"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(SealableStore::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        ));
        let devices = DeviceRegistry::new(store.clone() as SharedStore, clock);
        // Keys sort "old-tablet" before "phone", so the failing revoke comes first.
        devices.register("u2", "old-tablet", "stale").await.unwrap();
        devices.register("u2", "phone", "good").await.unwrap();
        store.sealed.store(true, Ordering::SeqCst);

        let client = FcmClient::new("pulse-test", Arc::new(StaticTokenSource("t".into())))
            .with_base_url(server.uri());
        let service = FcmPushService::new(client, devices.clone());

        let report = service.send_to_user("u2", payload()).await.unwrap();
        assert_eq!(
            report,
            PushReport {
                delivered: 1,
                failed: 1,
                revoked: 0,
            }
        );
        assert_eq!(devices.active_for_user("u2").await.unwrap().len(), 2);
    }
}
