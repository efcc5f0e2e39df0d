//! Weekly challenge scheduling.
//!
//! Each couple has one current challenge, replaced when the ISO week rolls over. A new
//! week draws at random from the library, skipping titles already in the couple's history
//! until every title has been used. A challenge both partners completed is archived once
//! under its week key.

use pulse_common::{PulseError, SharedClock};
use pulse_pairing::CoupleDirectory;
use pulse_store::{get_json, put_json, scan_json, SharedStore};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::calendar::{week_end, week_key, week_start, week_streak};
use crate::keys;
use crate::library::{random_picker, ChallengeTemplate, Picker, WEEKLY_CHALLENGES};
use crate::models::{ChallengeStats, Completion, WeeklyChallenge};

#[derive(Clone)]
pub struct WeeklyScheduler {
    store: SharedStore,
    clock: SharedClock,
    couples: CoupleDirectory,
    picker: Picker,
}

impl WeeklyScheduler {
    pub fn new(store: SharedStore, clock: SharedClock, couples: CoupleDirectory) -> Self {
        Self {
            store,
            clock,
            couples,
            picker: random_picker(),
        }
    }

    pub fn with_picker(mut self, picker: Picker) -> Self {
        self.picker = picker;
        self
    }

    /// This week's challenge, selecting and persisting a new one on rollover.
    pub async fn get_current(&self, couple_id: &str) -> Result<WeeklyChallenge, PulseError> {
        self.couples.require(couple_id).await?;

        let today = self.clock.now().date_naive();
        let key = week_key(today);
        let current: Option<WeeklyChallenge> =
            get_json(self.store.as_ref(), &keys::challenge_current(couple_id)).await?;

        if let Some(challenge) = current.filter(|c| c.week_key == key) {
            return Ok(challenge);
        }

        let used: HashSet<String> = self
            .history(couple_id)
            .await?
            .into_iter()
            .map(|c| c.title)
            .collect();
        let mut candidates: Vec<&ChallengeTemplate> = WEEKLY_CHALLENGES
            .iter()
            .filter(|t| !used.contains(t.title))
            .collect();
        if candidates.is_empty() {
            debug!("Challenge library exhausted for {}; starting over", couple_id);
            candidates = WEEKLY_CHALLENGES.iter().collect();
        }

        let index = (self.picker)(candidates.len()).min(candidates.len() - 1);
        let challenge = WeeklyChallenge::from_template(
            candidates[index],
            key,
            week_start(today),
            week_end(today),
        );
        put_json(
            self.store.as_ref(),
            &keys::challenge_current(couple_id),
            &challenge,
        )
        .await?;

        info!(
            "New weekly challenge '{}' for {} ({})",
            challenge.title, couple_id, challenge.week_key
        );
        Ok(challenge)
    }

    pub async fn complete(
        &self,
        couple_id: &str,
        user_id: &str,
        response: Option<String>,
    ) -> Result<Completion<WeeklyChallenge>, PulseError> {
        let (_, slot) = self.couples.require_member(couple_id, user_id).await?;
        let mut challenge = self.get_current(couple_id).await?;

        if challenge.completed_by(slot) {
            return Ok(Completion {
                challenge,
                just_completed: false,
            });
        }

        let response = response.filter(|r| !r.trim().is_empty());
        let just_completed = challenge.complete(slot, response, self.clock.now());
        put_json(
            self.store.as_ref(),
            &keys::challenge_current(couple_id),
            &challenge,
        )
        .await?;

        if just_completed {
            self.archive(couple_id, &challenge).await?;
            info!(
                "Couple {} completed weekly challenge '{}'",
                couple_id, challenge.title
            );
        }

        Ok(Completion {
            challenge,
            just_completed,
        })
    }

    /// Archived challenges, newest week first.
    pub async fn history(&self, couple_id: &str) -> Result<Vec<WeeklyChallenge>, PulseError> {
        let mut history: Vec<WeeklyChallenge> = scan_json(
            self.store.as_ref(),
            &keys::challenge_history_prefix(couple_id),
        )
        .await?;
        history.sort_by(|a, b| b.week_key.cmp(&a.week_key));
        Ok(history)
    }

    async fn archive(
        &self,
        couple_id: &str,
        challenge: &WeeklyChallenge,
    ) -> Result<(), PulseError> {
        let key = keys::challenge_history(couple_id, &challenge.week_key);
        let existing: Option<WeeklyChallenge> = get_json(self.store.as_ref(), &key).await?;
        if existing.is_none() {
            put_json(self.store.as_ref(), &key, challenge).await?;
        }
        Ok(())
    }
}

pub fn stats(history: &[WeeklyChallenge]) -> ChallengeStats {
    let completed = history.iter().filter(|c| c.both_completed);
    ChallengeStats {
        total_completed: completed.clone().count() as u32,
        total_points: completed.map(|c| c.points).sum(),
        current_streak: week_streak(
            history
                .iter()
                .map(|c| (c.week_key.as_str(), c.both_completed)),
        ),
    }
}
