//! Lookup of couples and membership checks shared by every couple-scoped feature.

use pulse_common::{forbidden, not_found, PulseError};
use pulse_store::{get_json, KvStore, SharedStore};
use tracing::{debug, info, warn};

use crate::keys;
use crate::models::{Couple, CoupleView, PublicUser, Slot, User};

#[derive(Clone)]
pub struct CoupleDirectory {
    store: SharedStore,
}

impl CoupleDirectory {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Looks up a couple by id. Ids never contain the key separator, so one that does is
    /// simply unknown.
    pub async fn find(&self, couple_id: &str) -> Result<Option<Couple>, PulseError> {
        if couple_id.contains(':') {
            debug!("Rejecting couple id containing a key separator");
            return Ok(None);
        }
        Ok(get_json(self.store.as_ref(), &keys::couple(couple_id)).await?)
    }

    pub async fn require(&self, couple_id: &str) -> Result<Couple, PulseError> {
        self.find(couple_id)
            .await?
            .ok_or_else(|| not_found("Couple not found"))
    }

    /// Loads the couple and resolves which slot `user_id` occupies in it.
    pub async fn require_member(
        &self,
        couple_id: &str,
        user_id: &str,
    ) -> Result<(Couple, Slot), PulseError> {
        let couple = self.require(couple_id).await?;
        let slot = couple
            .slot_of(user_id)
            .ok_or_else(|| forbidden("User is not a member of this couple"))?;
        Ok((couple, slot))
    }

    pub async fn couple_id_for_user(&self, user_id: &str) -> Result<Option<String>, PulseError> {
        Ok(get_json(self.store.as_ref(), &keys::couple_for_user(user_id)).await?)
    }

    pub async fn couple_for_user(&self, user_id: &str) -> Result<Option<Couple>, PulseError> {
        match self.couple_id_for_user(user_id).await? {
            Some(couple_id) => self.find(&couple_id).await,
            None => Ok(None),
        }
    }

    /// The user's couple with the partner's public profile, or `None` when unpaired.
    pub async fn view_for(&self, user_id: &str) -> Result<Option<CoupleView>, PulseError> {
        let Some(couple) = self.couple_for_user(user_id).await? else {
            return Ok(None);
        };

        let partner = match couple.partner_of(user_id) {
            Some(partner_id) => get_json::<User>(self.store.as_ref(), &keys::user(partner_id))
                .await?
                .map(|u| PublicUser::from(&u)),
            None => None,
        };

        Ok(Some(CoupleView {
            couple_id: couple.couple_id,
            created_at: couple.created_at,
            user1_id: couple.user1_id,
            user2_id: couple.user2_id,
            partner,
        }))
    }

    /// Removes both membership indices and the couple record. History keyed by the
    /// couple id stays in place.
    pub async fn unpair(&self, user_id: &str) -> Result<(), PulseError> {
        let couple_id = self
            .couple_id_for_user(user_id)
            .await?
            .ok_or_else(|| not_found("No couple found"))?;
        debug!("Unpairing user {} from couple {}", user_id, couple_id);

        match self.find(&couple_id).await? {
            Some(couple) => {
                self.store.delete(&keys::couple_for_user(&couple.user1_id)).await?;
                self.store.delete(&keys::couple_for_user(&couple.user2_id)).await?;
            }
            None => {
                warn!("Couple {} missing for index of user {}", couple_id, user_id);
                self.store.delete(&keys::couple_for_user(user_id)).await?;
            }
        }
        self.store.delete(&keys::couple(&couple_id)).await?;

        info!("Couple {} dissolved", couple_id);
        Ok(())
    }
}
