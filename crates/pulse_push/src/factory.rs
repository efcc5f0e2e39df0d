use pulse_common::services::{NoopPushService, SharedPushService};
use pulse_common::SharedClock;
use pulse_config::AppConfig;
use pulse_store::SharedStore;
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::ServiceAccountTokenSource;
use crate::client::FcmClient;
use crate::repository::DeviceRegistry;
use crate::service::FcmPushService;

/// Picks FCM when push is enabled and fully configured, the no-op service otherwise.
pub fn push_service_from_config(
    config: &AppConfig,
    store: SharedStore,
    clock: SharedClock,
) -> SharedPushService {
    if !config.use_push {
        info!("Push delivery disabled");
        return Arc::new(NoopPushService);
    }

    let settings = config.push.as_ref();
    let project_id = settings.and_then(|p| p.project_id.clone());
    let key_path = settings.and_then(|p| p.key_path.clone());

    match (project_id, key_path) {
        (Some(project_id), Some(key_path)) => {
            info!("Push delivery via FCM project {}", project_id);
            let client = FcmClient::new(
                project_id,
                Arc::new(ServiceAccountTokenSource::new(key_path)),
            );
            Arc::new(FcmPushService::new(
                client,
                DeviceRegistry::new(store, clock),
            ))
        }
        _ => {
            warn!("use_push is set but push.project_id or push.key_path is missing; push disabled");
            Arc::new(NoopPushService)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_common::services::PushPayload;
    use pulse_common::SystemClock;
    use pulse_store::MemoryKvStore;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_incomplete_push_config_falls_back_to_noop() {
        let config = AppConfig {
            use_push: true,
            ..AppConfig::default()
        };
        let push = push_service_from_config(
            &config,
            Arc::new(MemoryKvStore::new()),
            Arc::new(SystemClock),
        );
        let report = push
            .send_to_user(
                "u1",
                PushPayload {
                    title: "t".into(),
                    body: "b".into(),
                    tag: "x".into(),
                    data: BTreeMap::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(report.delivered, 0);
    }
}
