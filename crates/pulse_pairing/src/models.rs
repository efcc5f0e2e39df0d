use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

/// What other users and clients may see of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum CodeStatus {
    Active,
    Used,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PairingCode {
    pub code: String,
    /// The issuer.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: CodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_id: Option<String>,
}

impl PairingCode {
    /// Status as of `now`. An active code past its expiry reads as expired even before the
    /// flip is persisted; terminal states never change.
    pub fn effective_status(&self, now: DateTime<Utc>) -> CodeStatus {
        match self.status {
            CodeStatus::Active if now > self.expires_at => CodeStatus::Expired,
            status => status,
        }
    }

    /// Whether the code value is still taken and must not be re-issued.
    pub fn blocks_reissue(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) != CodeStatus::Expired
    }
}

/// Which half of a couple a user occupies. `User1` is always the code issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    User1,
    User2,
}

impl Slot {
    pub fn other(self) -> Slot {
        match self {
            Slot::User1 => Slot::User2,
            Slot::User2 => Slot::User1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Couple {
    pub couple_id: String,
    pub user1_id: String,
    pub user2_id: String,
    pub created_at: DateTime<Utc>,
}

impl Couple {
    pub fn slot_of(&self, user_id: &str) -> Option<Slot> {
        if self.user1_id == user_id {
            Some(Slot::User1)
        } else if self.user2_id == user_id {
            Some(Slot::User2)
        } else {
            None
        }
    }

    pub fn user_in(&self, slot: Slot) -> &str {
        match slot {
            Slot::User1 => &self.user1_id,
            Slot::User2 => &self.user2_id,
        }
    }

    pub fn partner_of(&self, user_id: &str) -> Option<&str> {
        self.slot_of(user_id).map(|slot| self.user_in(slot.other()))
    }
}

/// A couple as seen by one of its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CoupleView {
    pub couple_id: String,
    pub created_at: DateTime<Utc>,
    pub user1_id: String,
    pub user2_id: String,
    pub partner: Option<PublicUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    pub couple_id: String,
    pub partner: PublicUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn code(status: CodeStatus) -> PairingCode {
        let created = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        PairingCode {
            code: "123456".into(),
            user_id: "u1".into(),
            created_at: created,
            expires_at: created + Duration::minutes(15),
            status,
            couple_id: None,
        }
    }

    #[test]
    fn test_active_code_expires_lazily() {
        let c = code(CodeStatus::Active);
        assert_eq!(c.effective_status(c.expires_at), CodeStatus::Active);
        assert_eq!(
            c.effective_status(c.expires_at + Duration::seconds(1)),
            CodeStatus::Expired
        );
    }

    #[test]
    fn test_used_code_stays_used() {
        let c = code(CodeStatus::Used);
        assert_eq!(
            c.effective_status(c.expires_at + Duration::days(1)),
            CodeStatus::Used
        );
        assert!(c.blocks_reissue(c.expires_at + Duration::days(1)));
    }

    #[test]
    fn test_couple_slots() {
        let couple = Couple {
            couple_id: "c1".into(),
            user1_id: "issuer".into(),
            user2_id: "redeemer".into(),
            created_at: Utc::now(),
        };
        assert_eq!(couple.slot_of("issuer"), Some(Slot::User1));
        assert_eq!(couple.slot_of("redeemer"), Some(Slot::User2));
        assert_eq!(couple.slot_of("stranger"), None);
        assert_eq!(couple.partner_of("redeemer"), Some("issuer"));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(code(CodeStatus::Active)).unwrap();
        assert_eq!(json["status"], "active");
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("coupleId").is_none());
    }
}
