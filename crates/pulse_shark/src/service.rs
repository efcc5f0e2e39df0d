//! Shark Mode: a time-boxed "handle with care" flag one partner raises for the other.
//!
//! The couple has at most one live record; every activation is also copied into history
//! and the copy follows every later change. Expiry is derived on read and only written
//! back when a mutation touches the record.

use chrono::Duration;
use pulse_common::{
    conflict, forbidden, new_id, not_found, validation_error, PulseError, SharedClock,
};
use pulse_pairing::CoupleDirectory;
use pulse_store::{get_json, put_json, scan_json, SharedStore};
use tracing::{debug, info};

use crate::keys;
use crate::models::{effective_status, SharkMode, SharkStatus};

#[derive(Clone)]
pub struct SharkModeService {
    store: SharedStore,
    clock: SharedClock,
    couples: CoupleDirectory,
    max_days: i64,
}

impl SharkModeService {
    pub fn new(
        store: SharedStore,
        clock: SharedClock,
        couples: CoupleDirectory,
        max_days: i64,
    ) -> Self {
        Self {
            store,
            clock,
            couples,
            max_days,
        }
    }

    /// Start a Shark Mode window for the couple
    ///
    /// An expired record still stored as live is settled to `expired` first.
    ///
    /// # Arguments
    ///
    /// * `couple_id` - The couple
    /// * `user_id` - The activating partner
    /// * `duration_days` - Window length, between 1 and the configured maximum
    /// * `note` - Optional note for the partner
    ///
    /// # Errors
    ///
    /// * `Validation` if the duration is out of range
    /// * `NotFound` if the couple does not exist
    /// * `Forbidden` if `user_id` is not a member
    /// * `Conflict` if a window is already active
    pub async fn activate(
        &self,
        couple_id: &str,
        user_id: &str,
        duration_days: i64,
        note: Option<String>,
    ) -> Result<SharkMode, PulseError> {
        if !(1..=self.max_days).contains(&duration_days) {
            return Err(validation_error(format!(
                "Duration must be between 1 and {} days",
                self.max_days
            )));
        }
        self.couples.require_member(couple_id, user_id).await?;

        let now = self.clock.now();
        if let Some(live) = self.load_live(couple_id).await? {
            if live.is_active_at(now) {
                return Err(conflict("Shark mode is already active"));
            }
            self.settle(live).await?;
        }

        let record = SharkMode {
            id: new_id(),
            couple_id: couple_id.to_string(),
            activated_by: user_id.to_string(),
            activated_at: now,
            ends_at: now + Duration::days(duration_days),
            duration_days,
            note: note.unwrap_or_default(),
            reassurance: None,
            reassurance_by: None,
            reassurance_at: None,
            status: SharkStatus::Active,
            active: true,
            deactivated_at: None,
        };
        self.save(&record).await?;

        info!(
            "Shark mode {} activated for {} by {} ({} days)",
            record.id, couple_id, user_id, duration_days
        );
        Ok(record)
    }

    /// Adds days to the active window. The total may not exceed the maximum counted from
    /// the original activation.
    pub async fn extend(
        &self,
        couple_id: &str,
        user_id: &str,
        additional_days: i64,
    ) -> Result<SharkMode, PulseError> {
        if additional_days < 1 {
            return Err(validation_error("Additional days must be at least 1"));
        }
        let mut record = self.require_active(couple_id, user_id).await?;
        if record.activated_by != user_id {
            return Err(forbidden("Only the person who activated shark mode can extend it"));
        }

        let total = record.duration_days + additional_days;
        if total > self.max_days {
            return Err(validation_error(format!(
                "Shark mode cannot last more than {} days",
                self.max_days
            )));
        }
        record.duration_days = total;
        record.ends_at = record.activated_at + Duration::days(total);
        self.save(&record).await?;

        info!("Shark mode {} extended to {} days", record.id, total);
        Ok(record)
    }

    /// Ends the live record. Calling it again, or with nothing live, succeeds.
    pub async fn deactivate(&self, couple_id: &str, user_id: &str) -> Result<(), PulseError> {
        self.couples.require_member(couple_id, user_id).await?;
        let Some(live) = self.load_live(couple_id).await? else {
            return Ok(());
        };

        let now = self.clock.now();
        if !live.is_active_at(now) {
            return self.settle(live).await;
        }
        if live.activated_by != user_id {
            return Err(forbidden(
                "Only the person who activated shark mode can deactivate it",
            ));
        }

        let mut record = live.with_status(SharkStatus::Deactivated);
        record.deactivated_at = Some(now);
        self.save(&record).await?;

        info!("Shark mode {} deactivated by {}", record.id, user_id);
        Ok(())
    }

    pub async fn update_note(
        &self,
        couple_id: &str,
        user_id: &str,
        note: &str,
    ) -> Result<SharkMode, PulseError> {
        let mut record = self.require_active(couple_id, user_id).await?;
        if record.activated_by != user_id {
            return Err(forbidden("Only the person who activated shark mode can edit the note"));
        }
        record.note = note.to_string();
        self.save(&record).await?;

        debug!("Shark mode {} note updated", record.id);
        Ok(record)
    }

    /// The partner's answer to an active Shark Mode.
    pub async fn send_reassurance(
        &self,
        couple_id: &str,
        user_id: &str,
        reassurance: &str,
    ) -> Result<SharkMode, PulseError> {
        if reassurance.trim().is_empty() {
            return Err(validation_error("Reassurance message is required"));
        }
        let mut record = self.require_active(couple_id, user_id).await?;
        if record.activated_by == user_id {
            return Err(forbidden("You cannot send reassurance to yourself"));
        }

        record.reassurance = Some(reassurance.to_string());
        record.reassurance_by = Some(user_id.to_string());
        record.reassurance_at = Some(self.clock.now());
        self.save(&record).await?;

        info!("Reassurance sent for shark mode {} by {}", record.id, user_id);
        Ok(record)
    }

    /// The active record, or `None` when nothing is live at this moment. Never writes.
    pub async fn get_status(&self, couple_id: &str) -> Result<Option<SharkMode>, PulseError> {
        let now = self.clock.now();
        Ok(self
            .load_live(couple_id)
            .await?
            .filter(|record| record.is_active_at(now)))
    }

    /// Every activation with its effective status, newest first.
    pub async fn get_history(&self, couple_id: &str) -> Result<Vec<SharkMode>, PulseError> {
        let now = self.clock.now();
        let records: Vec<SharkMode> =
            scan_json(self.store.as_ref(), &keys::history_prefix(couple_id)).await?;
        let mut history: Vec<SharkMode> =
            records.into_iter().map(|r| r.effective(now)).collect();
        history.sort_by(|a, b| b.activated_at.cmp(&a.activated_at));
        Ok(history)
    }

    async fn require_active(
        &self,
        couple_id: &str,
        user_id: &str,
    ) -> Result<SharkMode, PulseError> {
        self.couples.require_member(couple_id, user_id).await?;
        let live = self
            .load_live(couple_id)
            .await?
            .ok_or_else(|| not_found("No active shark mode"))?;

        if live.is_active_at(self.clock.now()) {
            Ok(live)
        } else {
            self.settle(live).await?;
            Err(not_found("No active shark mode"))
        }
    }

    /// Persists a lazily derived expiry.
    async fn settle(&self, live: SharkMode) -> Result<(), PulseError> {
        let status = effective_status(&live, self.clock.now());
        if status != live.status {
            debug!("Shark mode {} is now {:?}", live.id, status);
            self.save(&live.with_status(status)).await?;
        }
        Ok(())
    }

    async fn load_live(&self, couple_id: &str) -> Result<Option<SharkMode>, PulseError> {
        Ok(get_json(self.store.as_ref(), &keys::active(couple_id)).await?)
    }

    async fn save(&self, record: &SharkMode) -> Result<(), PulseError> {
        put_json(self.store.as_ref(), &keys::active(&record.couple_id), record).await?;
        put_json(
            self.store.as_ref(),
            &keys::history(&record.couple_id, &record.id),
            record,
        )
        .await?;
        Ok(())
    }
}
