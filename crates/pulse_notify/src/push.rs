//! Push payloads for partner notifications.

use pulse_common::services::PushPayload;
use std::collections::BTreeMap;

use crate::models::{Notification, NotificationKind};

pub fn push_payload(notification: &Notification) -> PushPayload {
    let sender = notification.sender_name.as_str();
    let (short_type, title, body) = match &notification.kind {
        NotificationKind::Nudge => (
            "nudge",
            format!("💗 Nudge from {sender}"),
            format!("{sender} wants to know how you're doing!"),
        ),
        NotificationKind::MoodUpdate { mood, .. } => (
            "mood",
            format!("😊 {sender} shared their mood"),
            non_empty_or(mood, "Check out their latest update!"),
        ),
        NotificationKind::MessageUpdate { message } => (
            "message",
            format!("💌 New message from {sender}"),
            non_empty_or(message, "Tap to read the message"),
        ),
        NotificationKind::DoodleUpdate { .. } => (
            "doodle",
            format!("🎨 {sender} drew something for you"),
            "See their latest doodle!".to_string(),
        ),
    };

    let mut data = BTreeMap::new();
    data.insert("url".to_string(), "/".to_string());
    data.insert("type".to_string(), short_type.to_string());
    data.insert("notificationId".to_string(), notification.id.clone());
    data.insert("coupleId".to_string(), notification.couple_id.clone());

    PushPayload {
        title,
        body,
        tag: format!("aimo-pulse-{short_type}"),
        data,
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(kind: NotificationKind) -> Notification {
        Notification {
            id: "n1".into(),
            kind,
            couple_id: "c1".into(),
            sender_id: "a".into(),
            sender_name: "Alex".into(),
            receiver_id: "b".into(),
            timestamp: "2024-03-04T10:00:00Z".parse().unwrap(),
            read: false,
        }
    }

    #[test]
    fn test_nudge_payload() {
        let payload = push_payload(&notification(NotificationKind::Nudge));
        assert_eq!(payload.title, "💗 Nudge from Alex");
        assert_eq!(payload.body, "Alex wants to know how you're doing!");
        assert_eq!(payload.tag, "aimo-pulse-nudge");
        assert_eq!(payload.data["notificationId"], "n1");
    }

    #[test]
    fn test_message_payload_uses_text() {
        let payload = push_payload(&notification(NotificationKind::MessageUpdate {
            message: "miss you".into(),
        }));
        assert_eq!(payload.title, "💌 New message from Alex");
        assert_eq!(payload.body, "miss you");
        assert_eq!(payload.data["type"], "message");
    }

    #[test]
    fn test_doodle_payload_has_fixed_body() {
        let payload = push_payload(&notification(NotificationKind::DoodleUpdate { doodle: None }));
        assert_eq!(payload.body, "See their latest doodle!");
    }
}
