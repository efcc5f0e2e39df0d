use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SharkStatus {
    Active,
    Deactivated,
    Expired,
}

/// One activation of Shark Mode. The live copy and the history copy share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SharkMode {
    pub id: String,
    pub couple_id: String,
    pub activated_by: String,
    pub activated_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub duration_days: i64,
    #[serde(default)]
    pub note: String,
    pub reassurance: Option<String>,
    pub reassurance_by: Option<String>,
    pub reassurance_at: Option<DateTime<Utc>>,
    pub status: SharkStatus,
    /// Mirrors `status == Active` for clients that only check a flag.
    pub active: bool,
    pub deactivated_at: Option<DateTime<Utc>>,
}

/// Status of `record` at `now`: an active record past its end reads as expired.
pub fn effective_status(record: &SharkMode, now: DateTime<Utc>) -> SharkStatus {
    match record.status {
        SharkStatus::Active if now > record.ends_at => SharkStatus::Expired,
        status => status,
    }
}

impl SharkMode {
    pub fn with_status(mut self, status: SharkStatus) -> Self {
        self.status = status;
        self.active = status == SharkStatus::Active;
        self
    }

    /// The record as it reads at `now`.
    pub fn effective(self, now: DateTime<Utc>) -> Self {
        let status = effective_status(&self, now);
        self.with_status(status)
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        effective_status(self, now) == SharkStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record(status: SharkStatus) -> SharkMode {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
        SharkMode {
            id: "s1".into(),
            couple_id: "c1".into(),
            activated_by: "u1".into(),
            activated_at: at,
            ends_at: at + Duration::days(2),
            duration_days: 2,
            note: String::new(),
            reassurance: None,
            reassurance_by: None,
            reassurance_at: None,
            status,
            active: status == SharkStatus::Active,
            deactivated_at: None,
        }
    }

    #[test]
    fn test_active_until_end_inclusive() {
        let r = record(SharkStatus::Active);
        assert_eq!(effective_status(&r, r.ends_at), SharkStatus::Active);
        assert_eq!(
            effective_status(&r, r.ends_at + Duration::seconds(1)),
            SharkStatus::Expired
        );
    }

    #[test]
    fn test_deactivated_stays_deactivated() {
        let r = record(SharkStatus::Deactivated);
        assert_eq!(effective_status(&r, r.activated_at), SharkStatus::Deactivated);
        assert_eq!(
            effective_status(&r, r.ends_at + Duration::days(5)),
            SharkStatus::Deactivated
        );
    }

    #[test]
    fn test_effective_updates_flag() {
        let r = record(SharkStatus::Active);
        let later = r.ends_at + Duration::hours(1);
        let expired = r.effective(later);
        assert_eq!(expired.status, SharkStatus::Expired);
        assert!(!expired.active);
    }
}
