//! Wires the domain services from configuration.

use pulse_challenges::{DailyScheduler, WeeklyScheduler};
use pulse_common::services::SharedPushService;
use pulse_common::{PulseError, SharedClock, SystemClock};
use pulse_config::AppConfig;
use pulse_notify::NotificationService;
use pulse_pairing::{CoupleDirectory, IdentityService, PairingService};
use pulse_push::{push_service_from_config, DeviceRegistry};
use pulse_shark::SharkModeService;
use pulse_store::{SharedStore, StoreFactory};
use pulse_today::PulseLedger;
use std::sync::Arc;

/// Shared collaborators every service is built from.
#[derive(Clone)]
pub struct PulseServiceFactory {
    config: Arc<AppConfig>,
    store: SharedStore,
    clock: SharedClock,
    push: SharedPushService,
}

impl PulseServiceFactory {
    /// Store from `database`, system clock, and FCM or no-op push from `use_push`.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, PulseError> {
        let store = StoreFactory::new().from_app_config(&config).await?;
        let clock: SharedClock = Arc::new(SystemClock);
        let push = push_service_from_config(&config, store.clone(), clock.clone());
        Ok(Self::with_parts(config, store, clock, push))
    }

    /// Explicit collaborators, as used by tests.
    pub fn with_parts(
        config: Arc<AppConfig>,
        store: SharedStore,
        clock: SharedClock,
        push: SharedPushService,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            push,
        }
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    pub fn identity(&self) -> IdentityService {
        IdentityService::new(self.store.clone(), self.clock.clone())
    }

    pub fn couples(&self) -> CoupleDirectory {
        CoupleDirectory::new(self.store.clone())
    }

    pub fn pairing(&self) -> PairingService {
        PairingService::new(
            self.store.clone(),
            self.clock.clone(),
            self.identity(),
            self.couples(),
            self.config.pairing.code_ttl_minutes,
        )
    }

    pub fn ledger(&self) -> PulseLedger {
        PulseLedger::new(self.store.clone(), self.clock.clone(), self.couples())
    }

    pub fn notifier(&self) -> NotificationService {
        NotificationService::new(
            self.store.clone(),
            self.clock.clone(),
            self.couples(),
            self.identity(),
            self.push.clone(),
        )
    }

    pub fn weekly(&self) -> WeeklyScheduler {
        WeeklyScheduler::new(self.store.clone(), self.clock.clone(), self.couples())
    }

    pub fn daily(&self) -> DailyScheduler {
        DailyScheduler::new(self.store.clone(), self.clock.clone(), self.couples())
    }

    pub fn shark(&self) -> SharkModeService {
        SharkModeService::new(
            self.store.clone(),
            self.clock.clone(),
            self.couples(),
            self.config.shark_mode.max_days,
        )
    }

    pub fn devices(&self) -> DeviceRegistry {
        DeviceRegistry::new(self.store.clone(), self.clock.clone())
    }
}
