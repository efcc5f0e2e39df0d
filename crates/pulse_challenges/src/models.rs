use chrono::{DateTime, NaiveDate, Utc};
use pulse_pairing::Slot;
use serde::{Deserialize, Serialize};

use crate::library::{ChallengeTemplate, QuestionTemplate};

/// The couple's challenge for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WeeklyChallenge {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub week_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub user1_completed: bool,
    pub user2_completed: bool,
    pub user1_completed_at: Option<DateTime<Utc>>,
    pub user2_completed_at: Option<DateTime<Utc>>,
    pub user1_response: Option<String>,
    pub user2_response: Option<String>,
    pub both_completed: bool,
    pub both_completed_at: Option<DateTime<Utc>>,
}

impl WeeklyChallenge {
    pub fn from_template(
        template: &ChallengeTemplate,
        week_key: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: template.id.to_string(),
            category: template.category.to_string(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            points: template.points,
            week_key,
            start_date,
            end_date,
            user1_completed: false,
            user2_completed: false,
            user1_completed_at: None,
            user2_completed_at: None,
            user1_response: None,
            user2_response: None,
            both_completed: false,
            both_completed_at: None,
        }
    }

    pub fn completed_by(&self, slot: Slot) -> bool {
        match slot {
            Slot::User1 => self.user1_completed,
            Slot::User2 => self.user2_completed,
        }
    }

    /// Marks `slot` complete. Returns true only on the call that completes both slots.
    /// A slot that is already complete keeps its first timestamp and response.
    pub fn complete(&mut self, slot: Slot, response: Option<String>, now: DateTime<Utc>) -> bool {
        if self.completed_by(slot) {
            return false;
        }
        match slot {
            Slot::User1 => {
                self.user1_completed = true;
                self.user1_completed_at = Some(now);
                self.user1_response = response;
            }
            Slot::User2 => {
                self.user2_completed = true;
                self.user2_completed_at = Some(now);
                self.user2_response = response;
            }
        }
        if self.user1_completed && self.user2_completed && !self.both_completed {
            self.both_completed = true;
            self.both_completed_at = Some(now);
            return true;
        }
        false
    }
}

/// The couple's question for one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyChallenge {
    pub id: String,
    pub question: String,
    pub date: String,
    pub user1_answer: Option<String>,
    pub user2_answer: Option<String>,
    pub user1_answered_at: Option<DateTime<Utc>>,
    pub user2_answered_at: Option<DateTime<Utc>>,
    pub both_answered: bool,
    pub both_answered_at: Option<DateTime<Utc>>,
}

impl DailyChallenge {
    pub fn from_template(template: &QuestionTemplate, date: String) -> Self {
        Self {
            id: template.id.to_string(),
            question: template.question.to_string(),
            date,
            user1_answer: None,
            user2_answer: None,
            user1_answered_at: None,
            user2_answered_at: None,
            both_answered: false,
            both_answered_at: None,
        }
    }

    pub fn answered_by(&self, slot: Slot) -> bool {
        match slot {
            Slot::User1 => self.user1_answer.is_some(),
            Slot::User2 => self.user2_answer.is_some(),
        }
    }

    /// Records the answer for `slot`. Returns true only on the call that completes both.
    pub fn answer(&mut self, slot: Slot, answer: String, now: DateTime<Utc>) -> bool {
        if self.answered_by(slot) {
            return false;
        }
        match slot {
            Slot::User1 => {
                self.user1_answer = Some(answer);
                self.user1_answered_at = Some(now);
            }
            Slot::User2 => {
                self.user2_answer = Some(answer);
                self.user2_answered_at = Some(now);
            }
        }
        if self.user1_answer.is_some() && self.user2_answer.is_some() && !self.both_answered {
            self.both_answered = true;
            self.both_answered_at = Some(now);
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    pub total_completed: u32,
    pub total_points: u32,
    pub current_streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_answered: u32,
    pub current_streak: u32,
}

/// Result of a completion or answer; `just_completed` is true for the second partner only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion<T> {
    pub challenge: T,
    pub just_completed: bool,
}
