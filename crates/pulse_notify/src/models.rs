use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened, with the fields each kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "type")]
pub enum NotificationKind {
    #[serde(rename = "nudge")]
    Nudge,
    #[serde(rename = "mood-update")]
    MoodUpdate {
        mood: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intensity: Option<String>,
    },
    #[serde(rename = "message-update")]
    MessageUpdate { message: String },
    #[serde(rename = "doodle-update")]
    DoodleUpdate {
        #[serde(default)]
        doodle: Option<String>,
    },
}

impl NotificationKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NotificationKind::Nudge => "nudge",
            NotificationKind::MoodUpdate { .. } => "mood-update",
            NotificationKind::MessageUpdate { .. } => "message-update",
            NotificationKind::DoodleUpdate { .. } => "doodle-update",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(flatten)]
    pub kind: NotificationKind,
    pub couple_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub receiver_id: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_is_flattened_with_type_tag() {
        let n = Notification {
            id: "n1".into(),
            kind: NotificationKind::MoodUpdate {
                mood: "😊".into(),
                intensity: Some("High".into()),
            },
            couple_id: "c1".into(),
            sender_id: "a".into(),
            sender_name: "Alex".into(),
            receiver_id: "b".into(),
            timestamp: "2024-03-04T10:00:00Z".parse().unwrap(),
            read: false,
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "mood-update");
        assert_eq!(value["mood"], "😊");
        assert_eq!(value["senderName"], "Alex");

        let back: Notification = serde_json::from_value(value).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn test_nudge_has_no_payload_fields() {
        let kind: NotificationKind = serde_json::from_value(json!({"type": "nudge"})).unwrap();
        assert_eq!(kind, NotificationKind::Nudge);
        assert_eq!(kind.type_name(), "nudge");
    }
}
