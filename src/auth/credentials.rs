//! Credential store: account registration and password checks over the
//! abstract user store.

use std::sync::Arc;

use crate::errors::AppError;
use crate::store::{User, UserStore};

use super::password;

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Create an account. The store's insert is the uniqueness check, so
    /// two concurrent registrations of the same name cannot both succeed.
    pub async fn register(&self, username: &str, plaintext: &str) -> Result<(), AppError> {
        if username.trim().is_empty() {
            return Err(AppError::BadRequest("username must not be empty".into()));
        }

        let hashed_password = password::hash(plaintext, self.bcrypt_cost).await?;
        let user = User {
            username: username.to_string(),
            hashed_password,
        };

        if !self.store.insert_user(&user).await? {
            return Err(AppError::AlreadyExists);
        }
        tracing::info!(username = %username, "user registered");
        Ok(())
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.store.find_by_username(username).await?)
    }

    /// Resolve a username/password pair to a user. Unknown name and wrong
    /// password are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, plaintext: &str) -> Result<User, AppError> {
        let user = match self.store.find_by_username(username).await? {
            Some(user) => user,
            None => return Err(AppError::InvalidCredentials),
        };

        if password::verify(plaintext, &user.hashed_password).await? {
            Ok(user)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    const TEST_COST: u32 = 4;

    fn accounts() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()), TEST_COST)
    }

    #[tokio::test]
    async fn duplicate_registration_fails() {
        let accounts = accounts();
        accounts.register("alice", "pw1").await.unwrap();

        let err = accounts.register("alice", "pw2").await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists));

        // First password still wins.
        assert!(accounts.authenticate("alice", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn empty_username_is_rejected() {
        let err = accounts().register("  ", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_collapse() {
        let accounts = accounts();
        accounts.register("alice", "pw1").await.unwrap();

        let wrong = accounts.authenticate("alice", "nope").await.unwrap_err();
        let unknown = accounts.authenticate("ghost", "pw1").await.unwrap_err();
        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn stored_password_is_hashed() {
        let accounts = accounts();
        accounts.register("alice", "pw1").await.unwrap();
        let user = accounts.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(user.hashed_password, "pw1");
        assert!(user.hashed_password.starts_with("$2"));
    }
}
