//! Daily questions, rolled over at each UTC day boundary.

use pulse_common::{validation_error, PulseError, SharedClock};
use pulse_pairing::CoupleDirectory;
use pulse_store::{get_json, put_json, scan_json, SharedStore};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::calendar::{day_key, day_streak};
use crate::keys;
use crate::library::{random_picker, Picker, QuestionTemplate, DAILY_QUESTIONS};
use crate::models::{Completion, DailyChallenge, DailyStats};

#[derive(Clone)]
pub struct DailyScheduler {
    store: SharedStore,
    clock: SharedClock,
    couples: CoupleDirectory,
    picker: Picker,
}

impl DailyScheduler {
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

    pub async fn get_current(&self, couple_id: &str) -> Result<DailyChallenge, PulseError> {
        self.couples.require(couple_id).await?;

        let date = day_key(self.clock.now().date_naive());
        let current: Option<DailyChallenge> =
            get_json(self.store.as_ref(), &keys::daily_current(couple_id)).await?;
        if let Some(challenge) = current.filter(|c| c.date == date) {
            return Ok(challenge);
        }

        let asked: HashSet<String> = self
            .archive(couple_id)
            .await?
            .into_iter()
            .map(|c| c.question)
            .collect();
        let mut candidates: Vec<&QuestionTemplate> = DAILY_QUESTIONS
            .iter()
            .filter(|q| !asked.contains(q.question))
            .collect();
        if candidates.is_empty() {
            debug!("Question library exhausted for {}; starting over", couple_id);
            candidates = DAILY_QUESTIONS.iter().collect();
        }

        let index = (self.picker)(candidates.len()).min(candidates.len() - 1);
        let challenge = DailyChallenge::from_template(candidates[index], date);
        put_json(self.store.as_ref(), &keys::daily_current(couple_id), &challenge).await?;

        debug!("New daily question for {} on {}", couple_id, challenge.date);
        Ok(challenge)
    }

    pub async fn answer(
        &self,
        couple_id: &str,
        user_id: &str,
        answer: &str,
    ) -> Result<Completion<DailyChallenge>, PulseError> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(validation_error("Couple ID, user ID, and answer are required"));
        }
        let (_, slot) = self.couples.require_member(couple_id, user_id).await?;
        let mut challenge = self.get_current(couple_id).await?;

        if challenge.answered_by(slot) {
            return Ok(Completion {
                challenge,
                just_completed: false,
            });
        }

        let just_completed = challenge.answer(slot, answer.to_string(), self.clock.now());
        put_json(self.store.as_ref(), &keys::daily_current(couple_id), &challenge).await?;

        if just_completed {
            let key = keys::daily_history(couple_id, &challenge.date);
            let existing: Option<DailyChallenge> = get_json(self.store.as_ref(), &key).await?;
            if existing.is_none() {
                put_json(self.store.as_ref(), &key, &challenge).await?;
            }
            info!("Couple {} both answered on {}", couple_id, challenge.date);
        }

        Ok(Completion {
            challenge,
            just_completed,
        })
    }

    /// Questions both partners answered, newest first.
    pub async fn archive(&self, couple_id: &str) -> Result<Vec<DailyChallenge>, PulseError> {
        let mut archive: Vec<DailyChallenge> =
            scan_json(self.store.as_ref(), &keys::daily_history_prefix(couple_id)).await?;
        archive.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(archive)
    }
}

pub fn stats(archive: &[DailyChallenge]) -> DailyStats {
    DailyStats {
        total_answered: archive.iter().filter(|c| c.both_answered).count() as u32,
        current_streak: day_streak(archive.iter().map(|c| (c.date.as_str(), c.both_answered))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pulse_common::ManualClock;
    use pulse_pairing::{Couple, IdentityService, PairingService};
    use pulse_store::MemoryKvStore;
    use std::sync::Arc;

    async fn fixture() -> (Arc<ManualClock>, DailyScheduler, Couple) {
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

        let scheduler =
            DailyScheduler::new(store, clock.clone(), couples).with_picker(Arc::new(|_| 0));
        (clock, scheduler, couple)
    }

    #[tokio::test]
    async fn test_question_stable_within_day_and_rolls_over() {
        let (clock, scheduler, couple) = fixture().await;
        let first = scheduler.get_current(&couple.couple_id).await.unwrap();
        assert_eq!(first.date, "2024-03-04");
        assert_eq!(scheduler.get_current(&couple.couple_id).await.unwrap(), first);

        clock.advance(Duration::days(1));
        let next = scheduler.get_current(&couple.couple_id).await.unwrap();
        assert_eq!(next.date, "2024-03-05");
        assert!(next.user1_answer.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_questions_start_over() {
        let (clock, scheduler, couple) = fixture().await;
        let mut asked = HashSet::new();
        for _ in 0..DAILY_QUESTIONS.len() {
            scheduler
                .answer(&couple.couple_id, &couple.user1_id, "yes")
                .await
                .unwrap();
            let done = scheduler
                .answer(&couple.couple_id, &couple.user2_id, "also yes")
                .await
                .unwrap();
            assert!(done.just_completed);
            assert!(asked.insert(done.challenge.question));
            clock.advance(Duration::days(1));
        }
        assert_eq!(asked.len(), DAILY_QUESTIONS.len());

        let next = scheduler.get_current(&couple.couple_id).await.unwrap();
        assert_eq!(next.question, DAILY_QUESTIONS[0].question);
        assert!(next.user1_answer.is_none() && next.user2_answer.is_none());
    }

    #[tokio::test]
    async fn test_blank_answer_rejected() {
        let (_, scheduler, couple) = fixture().await;
        let err = scheduler
            .answer(&couple.couple_id, &couple.user1_id, "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::Validation(_)));
    }

    #[tokio::test]
    async fn test_both_answers_archive_once() {
        let (clock, scheduler, couple) = fixture().await;
        let first = scheduler
            .answer(&couple.couple_id, &couple.user2_id, "pancakes")
            .await
            .unwrap();
        assert!(!first.just_completed);

        let second = scheduler
            .answer(&couple.couple_id, &couple.user1_id, "the walk")
            .await
            .unwrap();
        assert!(second.just_completed);

        let repeat = scheduler
            .answer(&couple.couple_id, &couple.user1_id, "something else")
            .await
            .unwrap();
        assert!(!repeat.just_completed);

        clock.advance(Duration::days(1));
        let next = scheduler.get_current(&couple.couple_id).await.unwrap();
        assert_ne!(next.question, second.challenge.question);

        let archive = scheduler.archive(&couple.couple_id).await.unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].user1_answer.as_deref(), Some("the walk"));
        assert_eq!(stats(&archive).total_answered, 1);
        assert_eq!(stats(&archive).current_streak, 1);
    }
}
