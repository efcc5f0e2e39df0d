//! The Daily Pulse Ledger: one Today Card per couple per UTC day.
//!
//! A card appears on its first write and is never deleted. Each partner only ever touches
//! their own slot, so partner updates cannot overwrite each other; top-level metadata and
//! reactions are read-modify-write with last writer winning.

use chrono::{DateTime, NaiveDate, Utc};
use pulse_common::{not_found, validation_error, PulseError, SharedClock};
use pulse_pairing::{CoupleDirectory, Slot};
use pulse_store::{get_json, put_json, scan_json, SharedStore};
use tracing::{debug, info};

use crate::keys;
use crate::models::{GalleryEntry, PulseUpdate, Reaction, TodayCard};

pub fn date_key(at: DateTime<Utc>) -> String {
    at.date_naive().format("%Y-%m-%d").to_string()
}

/// Applies `update` to `slot` of `card`: every supplied field overwrites its latest value
/// and appends one gallery entry. The other slot is not touched.
pub fn apply_update(
    card: &mut TodayCard,
    slot: Slot,
    user_id: &str,
    update: &PulseUpdate,
    now: DateTime<Utc>,
) {
    let state = card.slot_mut(slot);
    let entry = |value: &str, intensity: Option<String>| GalleryEntry {
        value: value.to_string(),
        intensity,
        timestamp: now,
        user_id: user_id.to_string(),
    };

    if let Some(mood) = &update.mood {
        // A mood carries its own intensity; a mood without one clears the old intensity.
        state.mood = Some(mood.clone());
        state.intensity = update.intensity.clone();
        state.mood_gallery.push(entry(mood, update.intensity.clone()));
    } else if let Some(intensity) = &update.intensity {
        state.intensity = Some(intensity.clone());
    }
    if let Some(message) = &update.message {
        state.message = Some(message.clone());
        state.message_gallery.push(entry(message, None));
    }
    if let Some(doodle) = &update.doodle {
        state.doodle = Some(doodle.clone());
        state.doodle_gallery.push(entry(doodle, None));
    }
    state.updated_at = Some(now);

    card.updated_by = Some(user_id.to_string());
    card.updated_at = Some(now);
    card.version += 1;
}

#[derive(Clone)]
pub struct PulseLedger {
    store: SharedStore,
    clock: SharedClock,
    couples: CoupleDirectory,
}

impl PulseLedger {
    pub fn new(store: SharedStore, clock: SharedClock, couples: CoupleDirectory) -> Self {
        Self {
            store,
            clock,
            couples,
        }
    }

    pub fn today(&self) -> String {
        date_key(self.clock.now())
    }

    /// Today's card, or `None` when nobody has written yet.
    pub async fn get_today(&self, couple_id: &str) -> Result<Option<TodayCard>, PulseError> {
        let date = self.today();
        self.load(couple_id, &date).await
    }

    pub async fn get_for_date(
        &self,
        couple_id: &str,
        date: &str,
    ) -> Result<Option<TodayCard>, PulseError> {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(validation_error("Date must be formatted as YYYY-MM-DD"));
        }
        self.load(couple_id, date).await
    }

    /// Apply a partner's update to today's card, creating the card on first write.
    ///
    /// Only the caller's slot changes. Latest values are overwritten, each supplied value is
    /// appended to its gallery, and `version` increases by one.
    ///
    /// # Arguments
    ///
    /// * `couple_id` - The couple whose card is updated
    /// * `user_id` - The writing partner; decides the slot
    /// * `update` - Any non-empty combination of mood, intensity, message and doodle
    ///
    /// # Errors
    ///
    /// * `Validation` if the update carries no field
    /// * `NotFound` if the couple does not exist
    /// * `Forbidden` if `user_id` is not a member of the couple
    pub async fn update_today(
        &self,
        couple_id: &str,
        user_id: &str,
        update: PulseUpdate,
    ) -> Result<TodayCard, PulseError> {
        if update.is_empty() {
            return Err(validation_error(
                "At least one of mood, intensity, message or doodle is required",
            ));
        }
        let (_, slot) = self.couples.require_member(couple_id, user_id).await?;

        let now = self.clock.now();
        let date = date_key(now);
        let mut card = self
            .load(couple_id, &date)
            .await?
            .unwrap_or_else(|| TodayCard::empty(couple_id, &date));

        apply_update(&mut card, slot, user_id, &update, now);
        put_json(self.store.as_ref(), &keys::today(couple_id, &date), &card).await?;

        debug!(
            "Today card {} {} updated by {} (version {})",
            couple_id, date, user_id, card.version
        );
        Ok(card)
    }

    /// Append a reaction to today's card.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty emoji, `NotFound` when the couple or today's card is
    /// missing, `Forbidden` for a non-member.
    pub async fn add_reaction(
        &self,
        couple_id: &str,
        user_id: &str,
        emoji: &str,
    ) -> Result<TodayCard, PulseError> {
        if emoji.is_empty() {
            return Err(validation_error("Emoji is required"));
        }
        self.couples.require_member(couple_id, user_id).await?;

        let now = self.clock.now();
        let date = date_key(now);
        let mut card = self
            .load(couple_id, &date)
            .await?
            .ok_or_else(|| not_found("No today card found"))?;

        card.reactions.push(Reaction {
            user_id: user_id.to_string(),
            emoji: emoji.to_string(),
            timestamp: now,
        });
        card.version += 1;
        put_json(self.store.as_ref(), &keys::today(couple_id, &date), &card).await?;

        info!("Reaction {} added to {} {} by {}", emoji, couple_id, date, user_id);
        Ok(card)
    }

    /// Every card of the couple, newest date first.
    pub async fn get_history(&self, couple_id: &str) -> Result<Vec<TodayCard>, PulseError> {
        let mut cards: Vec<TodayCard> =
            scan_json(self.store.as_ref(), &keys::today_prefix(couple_id)).await?;
        cards.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(cards)
    }

    async fn load(&self, couple_id: &str, date: &str) -> Result<Option<TodayCard>, PulseError> {
        Ok(get_json(self.store.as_ref(), &keys::today(couple_id, date)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pulse_common::ManualClock;
    use pulse_pairing::{Couple, PairingService};
    use pulse_pairing::IdentityService;
    use pulse_store::MemoryKvStore;
    use std::sync::Arc;

    struct Fixture {
        clock: Arc<ManualClock>,
        ledger: PulseLedger,
        couple: Couple,
    }

    async fn fixture() -> Fixture {
        let store: SharedStore = Arc::new(MemoryKvStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        ));
        let identity = IdentityService::new(store.clone(), clock.clone());
        let couples = CoupleDirectory::new(store.clone());
        let pairing = PairingService::new(
            store.clone(),
            clock.clone(),
            identity.clone(),
            couples.clone(),
            15,
        );

        let a = identity.create_user("alex", "secret1", "Alex").await.unwrap();
        let b = identity.create_user("blair", "secret2", "Blair").await.unwrap();
        let code = pairing.generate_code(&a.user_id).await.unwrap();
        let joined = pairing.join_with_code(&b.user_id, &code.code).await.unwrap();
        let couple = couples.require(&joined.couple_id).await.unwrap();

        Fixture {
            clock: clock.clone(),
            ledger: PulseLedger::new(store, clock, couples),
            couple,
        }
    }

    fn mood(m: &str) -> PulseUpdate {
        PulseUpdate {
            mood: Some(m.to_string()),
            ..PulseUpdate::default()
        }
    }

    #[tokio::test]
    async fn test_no_card_is_not_an_error() {
        let f = fixture().await;
        assert!(f.ledger.get_today(&f.couple.couple_id).await.unwrap().is_none());
        assert!(f.ledger.get_today("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_mood_update_leaves_partner_untouched() {
        let f = fixture().await;
        let c = &f.couple;
        let partner_update = PulseUpdate {
            mood: Some("😴".into()),
            intensity: Some("Low".into()),
            message: Some("long day".into()),
            doodle: Some("data:image/png;base64,AAA".into()),
        };
        let before = f
            .ledger
            .update_today(&c.couple_id, &c.user2_id, partner_update)
            .await
            .unwrap();

        let after = f
            .ledger
            .update_today(&c.couple_id, &c.user1_id, mood("😊"))
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_vec(&before.user2).unwrap(),
            serde_json::to_vec(&after.user2).unwrap()
        );
        assert_eq!(after.user1.mood.as_deref(), Some("😊"));
        assert_eq!(after.updated_by.as_deref(), Some(c.user1_id.as_str()));
        assert_eq!(after.version, 2);
    }

    #[tokio::test]
    async fn test_gallery_keeps_every_mood_in_order() {
        let f = fixture().await;
        let c = &f.couple;
        let moods = ["😊", "😢", "😡", "🥰"];
        for m in moods {
            f.ledger
                .update_today(&c.couple_id, &c.user2_id, mood(m))
                .await
                .unwrap();
            f.clock.advance(Duration::minutes(1));
        }

        let card = f.ledger.get_today(&c.couple_id).await.unwrap().unwrap();
        let values: Vec<_> = card.user2.mood_gallery.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, moods);
        assert_eq!(card.user2.mood.as_deref(), Some("🥰"));
        assert!(card.user1.mood_gallery.is_empty());
    }

    #[tokio::test]
    async fn test_mood_entry_carries_intensity() {
        let f = fixture().await;
        let c = &f.couple;
        let update = PulseUpdate {
            mood: Some("😊".into()),
            intensity: Some("High".into()),
            ..PulseUpdate::default()
        };
        let card = f.ledger.update_today(&c.couple_id, &c.user1_id, update).await.unwrap();
        assert_eq!(card.user1.intensity.as_deref(), Some("High"));
        assert_eq!(card.user1.mood_gallery[0].intensity.as_deref(), Some("High"));
    }

    #[tokio::test]
    async fn test_update_rules() {
        let f = fixture().await;
        let c = &f.couple;

        let err = f
            .ledger
            .update_today(&c.couple_id, &c.user1_id, PulseUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::Validation(_)));

        let err = f.ledger.update_today("nope", &c.user1_id, mood("😊")).await.unwrap_err();
        assert!(matches!(err, PulseError::NotFound(_)));

        let err = f
            .ledger
            .update_today(&c.couple_id, "stranger", mood("😊"))
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_reaction_needs_a_card() {
        let f = fixture().await;
        let c = &f.couple;
        let err = f
            .ledger
            .add_reaction(&c.couple_id, &c.user1_id, "❤️")
            .await
            .unwrap_err();
        assert_eq!(err, not_found("No today card found"));

        f.ledger.update_today(&c.couple_id, &c.user2_id, mood("😊")).await.unwrap();
        let card = f.ledger.add_reaction(&c.couple_id, &c.user1_id, "❤️").await.unwrap();
        assert_eq!(card.reactions.len(), 1);
        assert_eq!(card.reactions[0].emoji, "❤️");
        assert_eq!(card.user2.mood.as_deref(), Some("😊"));
    }

    #[tokio::test]
    async fn test_days_roll_over_and_history_is_newest_first() {
        let f = fixture().await;
        let c = &f.couple;
        f.ledger.update_today(&c.couple_id, &c.user1_id, mood("😊")).await.unwrap();
        f.clock.advance(Duration::days(1));
        assert!(f.ledger.get_today(&c.couple_id).await.unwrap().is_none());
        f.ledger.update_today(&c.couple_id, &c.user1_id, mood("😢")).await.unwrap();

        let history = f.ledger.get_history(&c.couple_id).await.unwrap();
        let dates: Vec<_> = history.iter().map(|h| h.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-05", "2024-03-04"]);

        let old = f.ledger.get_for_date(&c.couple_id, "2024-03-04").await.unwrap().unwrap();
        assert_eq!(old.user1.mood.as_deref(), Some("😊"));
        assert!(f.ledger.get_for_date(&c.couple_id, "2024-01-01").await.unwrap().is_none());
        assert!(f.ledger.get_for_date(&c.couple_id, "yesterday").await.is_err());
    }
}
