//! Notification fan-out.
//!
//! A notification is stored under its id and under a per-receiver index, then handed to the
//! push service. Push problems are logged and never reach the caller.

use pulse_common::services::SharedPushService;
use pulse_common::{new_id, not_found, validation_error, PulseError, SharedClock};
use pulse_pairing::{CoupleDirectory, IdentityService};
use pulse_store::{get_json, put_json, KvStore, SharedStore};
use tracing::{debug, info, warn};

use crate::keys;
use crate::models::{Notification, NotificationKind};
use crate::push::push_payload;

#[derive(Clone)]
pub struct NotificationService {
    store: SharedStore,
    clock: SharedClock,
    couples: CoupleDirectory,
    identity: IdentityService,
    push: SharedPushService,
}

fn validate(kind: &NotificationKind) -> Result<(), PulseError> {
    match kind {
        NotificationKind::MoodUpdate { mood, .. } if mood.is_empty() => {
            Err(validation_error("Couple ID, sender ID, and mood are required"))
        }
        NotificationKind::MessageUpdate { message } if message.is_empty() => {
            Err(validation_error("Couple ID, sender ID, and message are required"))
        }
        _ => Ok(()),
    }
}

impl NotificationService {
    pub fn new(
        store: SharedStore,
        clock: SharedClock,
        couples: CoupleDirectory,
        identity: IdentityService,
        push: SharedPushService,
    ) -> Self {
        Self {
            store,
            clock,
            couples,
            identity,
            push,
        }
    }

    /// Records a notification from `sender_id` to their partner and pushes it best-effort.
    ///
    /// # Errors
    ///
    /// * `Validation` for missing ids or a payload the kind requires but is blank
    /// * `NotFound` if the couple does not exist
    /// * `Forbidden` if the sender is not a member
    ///
    /// Push delivery failures are logged and never returned.
    pub async fn notify(
        &self,
        kind: NotificationKind,
        couple_id: &str,
        sender_id: &str,
    ) -> Result<Notification, PulseError> {
        if couple_id.is_empty() || sender_id.is_empty() {
            return Err(validation_error("Couple ID and sender ID are required"));
        }
        validate(&kind)?;

        let (couple, slot) = self.couples.require_member(couple_id, sender_id).await?;
        let receiver_id = couple.user_in(slot.other()).to_string();
        let sender_name = self.identity.display_name(sender_id).await?;

        let notification = Notification {
            id: new_id(),
            kind,
            couple_id: couple_id.to_string(),
            sender_id: sender_id.to_string(),
            sender_name,
            receiver_id,
            timestamp: self.clock.now(),
            read: false,
        };

        put_json(
            self.store.as_ref(),
            &keys::notification(&notification.id),
            &notification,
        )
        .await?;
        put_json(
            self.store.as_ref(),
            &keys::receiver_index(&notification.receiver_id, &notification.id),
            &notification.id,
        )
        .await?;
        info!(
            "{} notification {} from {} to {}",
            notification.kind.type_name(),
            notification.id,
            notification.sender_id,
            notification.receiver_id
        );

        self.push_best_effort(&notification).await;
        Ok(notification)
    }

    async fn push_best_effort(&self, notification: &Notification) {
        let payload = push_payload(notification);
        match self
            .push
            .send_to_user(&notification.receiver_id, payload)
            .await
        {
            Ok(report) => debug!(
                "Push for {}: {} delivered, {} failed, {} revoked",
                notification.id, report.delivered, report.failed, report.revoked
            ),
            Err(e) => warn!("Push for notification {} failed: {}", notification.id, e),
        }
    }

    /// Every notification addressed to `user_id`, read or not, newest first.
    pub async fn list_for(&self, user_id: &str) -> Result<Vec<Notification>, PulseError> {
        let index = self
            .store
            .scan_prefix(&keys::receiver_prefix(user_id))
            .await?;

        let mut notifications = Vec::with_capacity(index.len());
        for (key, value) in index {
            let Some(id) = value.as_str() else {
                warn!("Malformed notification index entry {}", key);
                continue;
            };
            match get_json::<Notification>(self.store.as_ref(), &keys::notification(id)).await? {
                Some(n) => notifications.push(n),
                None => warn!("Notification {} listed for {} is missing", id, user_id),
            }
        }

        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        Ok(notifications)
    }

    /// Idempotent: marking an already-read notification changes nothing.
    pub async fn mark_read(&self, notification_id: &str) -> Result<Notification, PulseError> {
        let key = keys::notification(notification_id);
        let mut notification: Notification = get_json(self.store.as_ref(), &key)
            .await?
            .ok_or_else(|| not_found("Notification not found"))?;

        if !notification.read {
            notification.read = true;
            put_json(self.store.as_ref(), &key, &notification).await?;
            debug!("Notification {} marked read", notification_id);
        }
        Ok(notification)
    }
}
