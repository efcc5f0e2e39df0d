//! Pairing codes: issue and redeem.

use chrono::Duration;
use pulse_common::{
    conflict, internal_error, invalid_code, new_id, not_found, validation_error, PulseError,
    SharedClock,
};
use pulse_store::{get_json, put_json, SharedStore};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::couples::CoupleDirectory;
use crate::identity::IdentityService;
use crate::keys;
use crate::models::{CodeStatus, Couple, JoinOutcome, PairingCode, PublicUser};

/// Attempts before code generation gives up.
pub const MAX_CODE_ATTEMPTS: usize = 100;

/// Produces candidate code values.
pub type CodeSource = Arc<dyn Fn() -> String + Send + Sync>;

fn random_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Pairing codes are exactly six ASCII digits.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone)]
pub struct PairingService {
    store: SharedStore,
    clock: SharedClock,
    identity: IdentityService,
    couples: CoupleDirectory,
    code_ttl: Duration,
    code_source: CodeSource,
}

impl PairingService {
    pub fn new(
        store: SharedStore,
        clock: SharedClock,
        identity: IdentityService,
        couples: CoupleDirectory,
        code_ttl_minutes: i64,
    ) -> Self {
        Self {
            store,
            clock,
            identity,
            couples,
            code_ttl: Duration::minutes(code_ttl_minutes),
            code_source: Arc::new(random_code),
        }
    }

    pub fn with_code_source(mut self, code_source: CodeSource) -> Self {
        self.code_source = code_source;
        self
    }

    /// Issues a fresh code and points the issuer at it. An earlier code of the same issuer
    /// stays redeemable until its own expiry.
    pub async fn generate_code(&self, user_id: &str) -> Result<PairingCode, PulseError> {
        if user_id.is_empty() {
            return Err(validation_error("User ID is required"));
        }
        self.identity.get_user(user_id).await?;

        let now = self.clock.now();
        let mut attempts = 0;
        let code = loop {
            if attempts == MAX_CODE_ATTEMPTS {
                warn!("No free pairing code after {} attempts", attempts);
                return Err(internal_error("Could not allocate a pairing code"));
            }
            attempts += 1;

            let candidate = (self.code_source)();
            let existing: Option<PairingCode> =
                get_json(self.store.as_ref(), &keys::code(&candidate)).await?;
            match existing {
                Some(existing) if existing.blocks_reissue(now) => {
                    debug!("Pairing code collision, drawing again");
                }
                _ => break candidate,
            }
        };

        let record = PairingCode {
            code: code.clone(),
            user_id: user_id.to_string(),
            created_at: now,
            expires_at: now + self.code_ttl,
            status: CodeStatus::Active,
            couple_id: None,
        };
        put_json(self.store.as_ref(), &keys::code(&code), &record).await?;
        put_json(self.store.as_ref(), &keys::code_for_user(user_id), &code).await?;

        info!("Pairing code issued for user {}", user_id);
        Ok(record)
    }

    /// The issuer's current code with its effective status, if any.
    pub async fn current_code(&self, user_id: &str) -> Result<Option<PairingCode>, PulseError> {
        let Some(code) =
            get_json::<String>(self.store.as_ref(), &keys::code_for_user(user_id)).await?
        else {
            return Ok(None);
        };

        let record: Option<PairingCode> = get_json(self.store.as_ref(), &keys::code(&code)).await?;
        let now = self.clock.now();
        // The value may have been re-issued to someone else after expiring.
        Ok(record
            .filter(|r| r.user_id == user_id)
            .map(|mut r| {
                r.status = r.effective_status(now);
                r
            }))
    }

    /// Redeems `code` for `user_id`, creating the couple with the issuer as `user1`.
    ///
    /// Writes go couple, both indices, then the code flip, so a crash never leaves a used
    /// code without a couple.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The redeeming user, who becomes `user2`
    /// * `code` - Six-digit code issued by the partner
    ///
    /// # Errors
    ///
    /// Checks run in this order:
    ///
    /// * `Validation` if an argument is empty
    /// * `NotFound` if the redeeming user does not exist
    /// * `Conflict` if the redeeming user is already paired
    /// * `InvalidCode` if the code is malformed, unknown, used or expired
    /// * `SelfJoin` if the code belongs to the redeeming user
    /// * `Conflict` if the issuer has paired with someone else meanwhile
    pub async fn join_with_code(
        &self,
        user_id: &str,
        code: &str,
    ) -> Result<JoinOutcome, PulseError> {
        if user_id.is_empty() || code.is_empty() {
            return Err(validation_error("User ID and code are required"));
        }
        self.identity.get_user(user_id).await?;

        if self.couples.couple_id_for_user(user_id).await?.is_some() {
            return Err(conflict("User is already paired"));
        }

        if !is_well_formed_code(code) {
            return Err(invalid_code("Invalid code"));
        }
        let mut record: PairingCode = get_json(self.store.as_ref(), &keys::code(code))
            .await?
            .ok_or_else(|| invalid_code("Invalid code"))?;

        let now = self.clock.now();
        match record.effective_status(now) {
            CodeStatus::Expired => {
                if record.status == CodeStatus::Active {
                    record.status = CodeStatus::Expired;
                    put_json(self.store.as_ref(), &keys::code(code), &record).await?;
                }
                return Err(invalid_code("Code has expired"));
            }
            CodeStatus::Used => return Err(invalid_code("Code has already been used")),
            CodeStatus::Active => {}
        }

        if record.user_id == user_id {
            return Err(PulseError::SelfJoin("Cannot join your own code".to_string()));
        }
        if self.couples.couple_id_for_user(&record.user_id).await?.is_some() {
            return Err(conflict("Code issuer is already paired"));
        }
        let issuer = self
            .identity
            .find_user(&record.user_id)
            .await?
            .ok_or_else(|| not_found("User not found"))?;

        let couple = Couple {
            couple_id: new_id(),
            user1_id: record.user_id.clone(),
            user2_id: user_id.to_string(),
            created_at: now,
        };
        put_json(self.store.as_ref(), &keys::couple(&couple.couple_id), &couple).await?;
        put_json(
            self.store.as_ref(),
            &keys::couple_for_user(&couple.user1_id),
            &couple.couple_id,
        )
        .await?;
        put_json(
            self.store.as_ref(),
            &keys::couple_for_user(&couple.user2_id),
            &couple.couple_id,
        )
        .await?;

        record.status = CodeStatus::Used;
        record.couple_id = Some(couple.couple_id.clone());
        put_json(self.store.as_ref(), &keys::code(code), &record).await?;

        info!(
            "Couple {} formed by {} (issuer) and {}",
            couple.couple_id, couple.user1_id, couple.user2_id
        );
        Ok(JoinOutcome {
            couple_id: couple.couple_id,
            partner: PublicUser::from(&issuer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pulse_common::ManualClock;
    use pulse_store::MemoryKvStore;
    use std::sync::Mutex;

    struct Fixture {
        clock: Arc<ManualClock>,
        identity: IdentityService,
        couples: CoupleDirectory,
        pairing: PairingService,
    }

    fn fixture() -> Fixture {
        let store: SharedStore = Arc::new(MemoryKvStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        ));
        let identity = IdentityService::new(store.clone(), clock.clone());
        let couples = CoupleDirectory::new(store.clone());
        let pairing = PairingService::new(
            store,
            clock.clone(),
            identity.clone(),
            couples.clone(),
            15,
        );
        Fixture {
            clock,
            identity,
            couples,
            pairing,
        }
    }

    fn scripted(codes: &[&str]) -> CodeSource {
        let codes = Mutex::new(codes.iter().map(|c| c.to_string()).collect::<Vec<_>>());
        Arc::new(move || {
            let mut codes = codes.lock().unwrap();
            if codes.len() > 1 {
                codes.remove(0)
            } else {
                codes[0].clone()
            }
        })
    }

    async fn users(f: &Fixture) -> (String, String) {
        let a = f.identity.create_user("alex", "secret1", "Alex").await.unwrap();
        let b = f.identity.create_user("blair", "secret2", "Blair").await.unwrap();
        (a.user_id, b.user_id)
    }

    #[tokio::test]
    async fn test_generated_code_shape() {
        let f = fixture();
        let (a, _) = users(&f).await;
        let code = f.pairing.generate_code(&a).await.unwrap();
        assert_eq!(code.code.len(), 6);
        assert!(code.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(code.expires_at - code.created_at, Duration::minutes(15));
        assert_eq!(code.status, CodeStatus::Active);
    }

    #[tokio::test]
    async fn test_generate_for_unknown_user() {
        let f = fixture();
        let err = f.pairing.generate_code("ghost").await.unwrap_err();
        assert!(matches!(err, PulseError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_generate_skips_active_codes() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let pairing = f.pairing.clone().with_code_source(scripted(&["111111", "111111", "222222"]));

        let first = pairing.generate_code(&a).await.unwrap();
        let second = pairing.generate_code(&b).await.unwrap();
        assert_eq!(first.code, "111111");
        assert_eq!(second.code, "222222");
    }

    #[tokio::test]
    async fn test_generate_reuses_expired_code_values() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let pairing = f.pairing.clone().with_code_source(scripted(&["111111"]));

        pairing.generate_code(&a).await.unwrap();
        f.clock.advance(Duration::minutes(16));
        let reissued = pairing.generate_code(&b).await.unwrap();
        assert_eq!(reissued.code, "111111");
        assert_eq!(reissued.user_id, b);

        // The previous issuer's pointer no longer resolves to a code of theirs.
        assert!(pairing.current_code(&a).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generate_gives_up_when_every_value_is_taken() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let pairing = f.pairing.clone().with_code_source(scripted(&["111111"]));
        pairing.generate_code(&a).await.unwrap();

        let err = pairing.generate_code(&b).await.unwrap_err();
        assert!(matches!(err, PulseError::Internal(_)));
    }

    #[tokio::test]
    async fn test_join_creates_couple_with_issuer_as_user1() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let code = f.pairing.generate_code(&a).await.unwrap();

        let outcome = f.pairing.join_with_code(&b, &code.code).await.unwrap();
        assert_eq!(outcome.partner.user_id, a);

        let couple = f.couples.require(&outcome.couple_id).await.unwrap();
        assert_eq!(couple.user1_id, a);
        assert_eq!(couple.user2_id, b);

        let view_a = f.couples.view_for(&a).await.unwrap().unwrap();
        let view_b = f.couples.view_for(&b).await.unwrap().unwrap();
        assert_eq!(view_a.couple_id, view_b.couple_id);
        assert_eq!(view_a.partner.unwrap().user_id, b);
        assert_eq!(view_b.partner.unwrap().user_id, a);

        let used = f.pairing.current_code(&a).await.unwrap().unwrap();
        assert_eq!(used.status, CodeStatus::Used);
        assert_eq!(used.couple_id.as_deref(), Some(outcome.couple_id.as_str()));
    }

    #[tokio::test]
    async fn test_code_redeems_exactly_once() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let c = f.identity.create_user("casey", "secret3", "Casey").await.unwrap();
        let code = f.pairing.generate_code(&a).await.unwrap();
        f.pairing.join_with_code(&b, &code.code).await.unwrap();

        let again = f.pairing.join_with_code(&b, &code.code).await.unwrap_err();
        assert_eq!(again, conflict("User is already paired"));

        let third = f.pairing.join_with_code(&c.user_id, &code.code).await.unwrap_err();
        assert_eq!(third, invalid_code("Code has already been used"));
    }

    #[tokio::test]
    async fn test_expired_code_fails_and_is_persisted() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let code = f.pairing.generate_code(&a).await.unwrap();

        f.clock.advance(Duration::minutes(15) + Duration::seconds(1));
        let err = f.pairing.join_with_code(&b, &code.code).await.unwrap_err();
        assert_eq!(err, invalid_code("Code has expired"));

        let current = f.pairing.current_code(&a).await.unwrap().unwrap();
        assert_eq!(current.status, CodeStatus::Expired);
        assert!(f.couples.view_for(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cannot_join_own_code_or_unknown_code() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let code = f.pairing.generate_code(&a).await.unwrap();

        let err = f.pairing.join_with_code(&a, &code.code).await.unwrap_err();
        assert!(matches!(err, PulseError::SelfJoin(_)));

        let err = f.pairing.join_with_code(&b, "000000").await.unwrap_err();
        assert_eq!(err, invalid_code("Invalid code"));
    }

    #[tokio::test]
    async fn test_malformed_code_is_invalid_not_a_store_error() {
        let f = fixture();
        let (a, b) = users(&f).await;
        f.pairing.generate_code(&a).await.unwrap();

        for code in [format!("user:{a}"), "12345".into(), "1234567".into(), "12a456".into()] {
            let err = f.pairing.join_with_code(&b, &code).await.unwrap_err();
            assert_eq!(err, invalid_code("Invalid code"));
        }
        assert!(f.couples.view_for(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_couple_id_with_separator_is_not_found() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let code = f.pairing.generate_code(&a).await.unwrap();
        f.pairing.join_with_code(&b, &code.code).await.unwrap();

        let spliced = format!("user:{a}");
        assert!(f.couples.find(&spliced).await.unwrap().is_none());
        let err = f.couples.require_member(&spliced, &a).await.unwrap_err();
        assert_eq!(err, not_found("Couple not found"));
    }

    #[test]
    fn test_is_well_formed_code() {
        assert!(is_well_formed_code("012345"));
        assert!(!is_well_formed_code(""));
        assert!(!is_well_formed_code("１２３４５６"));
    }

    #[tokio::test]
    async fn test_older_code_stays_redeemable_after_regeneration() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let pairing = f.pairing.clone().with_code_source(scripted(&["111111", "222222"]));
        let old = pairing.generate_code(&a).await.unwrap();
        let new = pairing.generate_code(&a).await.unwrap();
        assert_ne!(old.code, new.code);
        assert_eq!(pairing.current_code(&a).await.unwrap().unwrap().code, "222222");

        pairing.join_with_code(&b, &old.code).await.unwrap();
    }

    #[tokio::test]
    async fn test_unpair_removes_couple_for_both() {
        let f = fixture();
        let (a, b) = users(&f).await;
        let code = f.pairing.generate_code(&a).await.unwrap();
        let outcome = f.pairing.join_with_code(&b, &code.code).await.unwrap();

        f.couples.unpair(&b).await.unwrap();
        assert!(f.couples.view_for(&a).await.unwrap().is_none());
        assert!(f.couples.view_for(&b).await.unwrap().is_none());
        assert!(f.couples.find(&outcome.couple_id).await.unwrap().is_none());

        let err = f.couples.unpair(&a).await.unwrap_err();
        assert_eq!(err, not_found("No couple found"));
    }
}
