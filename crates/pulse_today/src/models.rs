use chrono::{DateTime, Utc};
use pulse_pairing::Slot;
use serde::{Deserialize, Serialize};

/// One value ever written to a slot field on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    pub value: String,
    /// Only set on mood entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

/// Everything one partner wrote on a given day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SlotState {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub doodle: Option<String>,
    #[serde(default)]
    pub mood_gallery: Vec<GalleryEntry>,
    #[serde(default)]
    pub message_gallery: Vec<GalleryEntry>,
    #[serde(default)]
    pub doodle_gallery: Vec<GalleryEntry>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub user_id: String,
    pub emoji: String,
    pub timestamp: DateTime<Utc>,
}

/// The shared document of one couple for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct TodayCard {
    pub couple_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub user1: SlotState,
    #[serde(default)]
    pub user2: SlotState,
    pub updated_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
    /// Bumped on every write. Informational; concurrent writers still race last-writer-wins.
    #[serde(default)]
    pub version: u64,
}

impl TodayCard {
    pub fn empty(couple_id: &str, date: &str) -> Self {
        Self {
            couple_id: couple_id.to_string(),
            date: date.to_string(),
            user1: SlotState::default(),
            user2: SlotState::default(),
            updated_by: None,
            updated_at: None,
            reactions: Vec::new(),
            version: 0,
        }
    }

    pub fn slot(&self, slot: Slot) -> &SlotState {
        match slot {
            Slot::User1 => &self.user1,
            Slot::User2 => &self.user2,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut SlotState {
        match slot {
            Slot::User1 => &mut self.user1,
            Slot::User2 => &mut self.user2,
        }
    }
}

/// A partial update from one partner. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PulseUpdate {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub intensity: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub doodle: Option<String>,
}

impl PulseUpdate {
    pub fn is_empty(&self) -> bool {
        self.mood.is_none()
            && self.intensity.is_none()
            && self.message.is_none()
            && self.doodle.is_none()
    }
}
