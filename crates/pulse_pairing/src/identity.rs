//! User registration, login and password reset.
//!
//! Passwords are stored as unsalted SHA-256 hex digests and login does no rate limiting.
//! Reset needs no proof of the old password. These are known gaps kept as-is.

use pulse_common::{
    auth_error, conflict, new_id, not_found, validation_error, PulseError, SharedClock,
};
use pulse_store::{get_json, put_json, scan_json, SharedStore};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::keys;
use crate::models::{PublicUser, User};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn check_password(password: &str) -> Result<(), PulseError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(validation_error("Password must be at least 6 characters"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct IdentityService {
    store: SharedStore,
    clock: SharedClock,
}

impl IdentityService {
    pub fn new(store: SharedStore, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Create a new user account
    ///
    /// # Arguments
    ///
    /// * `username` - Unique login name
    /// * `password` - Plain-text password, stored only as its SHA-256 hex digest
    /// * `display_name` - Name shown to the partner
    ///
    /// # Errors
    ///
    /// * `Validation` if a field is empty or the password is too short
    /// * `Conflict` if the username is already taken
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
    ) -> Result<PublicUser, PulseError> {
        if username.is_empty() || password.is_empty() || display_name.is_empty() {
            return Err(validation_error(
                "Username, password, and display name are required",
            ));
        }
        check_password(password)?;

        if self.find_by_username(username).await?.is_some() {
            return Err(conflict("Username already taken"));
        }

        let user = User {
            user_id: new_id(),
            username: username.to_string(),
            password_hash: hash_password(password),
            display_name: display_name.to_string(),
            created_at: self.clock.now(),
        };
        put_json(self.store.as_ref(), &keys::user(&user.user_id), &user).await?;

        info!("User created: {} ({})", user.username, user.user_id);
        Ok(PublicUser::from(&user))
    }

    /// Match a username and password against the stored accounts.
    ///
    /// # Errors
    ///
    /// * `Validation` if either field is empty
    /// * `Auth` if no account matches both
    pub async fn login(&self, username: &str, password: &str) -> Result<PublicUser, PulseError> {
        if username.is_empty() || password.is_empty() {
            return Err(validation_error("Username and password are required"));
        }

        let password_hash = hash_password(password);
        let user = self
            .all_users()
            .await?
            .into_iter()
            .find(|u| u.username == username && u.password_hash == password_hash)
            .ok_or_else(|| auth_error("Invalid credentials"))?;

        debug!("User logged in: {}", user.user_id);
        Ok(PublicUser::from(&user))
    }

    /// Replace the password of `username`. No proof of the old password is asked for.
    ///
    /// # Errors
    ///
    /// * `Validation` if a field is empty or the new password is too short
    /// * `NotFound` if no account has this username
    pub async fn reset_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<(), PulseError> {
        if username.is_empty() || new_password.is_empty() {
            return Err(validation_error("Username and new password are required"));
        }
        check_password(new_password)?;

        let mut user = self.find_by_username(username).await?.ok_or_else(|| {
            not_found(
                "No account found with this username. Please check your username and try again.",
            )
        })?;
        user.password_hash = hash_password(new_password);
        put_json(self.store.as_ref(), &keys::user(&user.user_id), &user).await?;

        info!("Password reset for user: {}", user.user_id);
        Ok(())
    }

    pub async fn find_user(&self, user_id: &str) -> Result<Option<User>, PulseError> {
        Ok(get_json(self.store.as_ref(), &keys::user(user_id)).await?)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, PulseError> {
        self.find_user(user_id)
            .await?
            .ok_or_else(|| not_found("User not found"))
    }

    /// Display name for notifications, falling back to a neutral label for unknown users.
    pub async fn display_name(&self, user_id: &str) -> Result<String, PulseError> {
        Ok(self
            .find_user(user_id)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_else(|| "Your partner".to_string()))
    }

    // Usernames are not indexed; a prefix scan is fine at this scale.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PulseError> {
        Ok(self
            .all_users()
            .await?
            .into_iter()
            .find(|u| u.username == username))
    }

    async fn all_users(&self) -> Result<Vec<User>, PulseError> {
        Ok(scan_json(self.store.as_ref(), keys::USER_PREFIX).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pulse_common::ManualClock;
    use pulse_store::MemoryKvStore;
    use std::sync::Arc;

    fn service() -> IdentityService {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap());
        IdentityService::new(Arc::new(MemoryKvStore::new()), Arc::new(clock))
    }

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_create_then_login() {
        let identity = service();
        let user = identity.create_user("alex", "secret1", "Alex").await.unwrap();
        assert_eq!(user.username, "alex");

        let logged_in = identity.login("alex", "secret1").await.unwrap();
        assert_eq!(logged_in.user_id, user.user_id);

        let stored = identity.get_user(&user.user_id).await.unwrap();
        assert_eq!(stored.password_hash, hash_password("secret1"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let identity = service();
        let err = identity.create_user("", "secret1", "Alex").await.unwrap_err();
        assert!(matches!(err, PulseError::Validation(_)));

        let err = identity.create_user("alex", "12345", "Alex").await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let identity = service();
        identity.create_user("alex", "secret1", "Alex").await.unwrap();
        let err = identity.create_user("alex", "other12", "Other").await.unwrap_err();
        assert_eq!(err, conflict("Username already taken"));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let identity = service();
        identity.create_user("alex", "secret1", "Alex").await.unwrap();
        let err = identity.login("alex", "secret2").await.unwrap_err();
        assert!(matches!(err, PulseError::Auth(_)));
    }

    #[tokio::test]
    async fn test_reset_password() {
        let identity = service();
        identity.create_user("alex", "secret1", "Alex").await.unwrap();

        let err = identity.reset_password("nobody", "newpass").await.unwrap_err();
        assert!(matches!(err, PulseError::NotFound(_)));
        let err = identity.reset_password("alex", "short").await.unwrap_err();
        assert!(matches!(err, PulseError::Validation(_)));

        identity.reset_password("alex", "newpass").await.unwrap();
        assert!(identity.login("alex", "secret1").await.is_err());
        assert!(identity.login("alex", "newpass").await.is_ok());
    }
}
