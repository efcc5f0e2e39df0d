use pulse_challenges::ChallengeState;
use pulse_config::AppConfig;
use pulse_notify::NotifyState;
use pulse_pairing::PairingState;
use pulse_push::PushState;
use pulse_shark::SharkState;
use pulse_today::TodayState;
use std::sync::Arc;

use crate::service_factory::PulseServiceFactory;

/// Per-feature router states, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pairing: Arc<PairingState>,
    pub today: Arc<TodayState>,
    pub notify: Arc<NotifyState>,
    pub challenges: Arc<ChallengeState>,
    pub shark: Arc<SharkState>,
    pub push: Arc<PushState>,
}

impl AppState {
    pub fn new(factory: &PulseServiceFactory) -> Self {
        Self {
            config: factory.config().clone(),
            pairing: Arc::new(PairingState {
                identity: factory.identity(),
                pairing: factory.pairing(),
                couples: factory.couples(),
            }),
            today: Arc::new(TodayState {
                ledger: factory.ledger(),
            }),
            notify: Arc::new(NotifyState {
                notifier: factory.notifier(),
            }),
            challenges: Arc::new(ChallengeState {
                weekly: factory.weekly(),
                daily: factory.daily(),
            }),
            shark: Arc::new(SharkState {
                shark: factory.shark(),
            }),
            push: Arc::new(PushState {
                devices: factory.devices(),
            }),
        }
    }
}
