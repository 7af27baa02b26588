//! Staff account operations shared by the JSON API and the web UI

use crate::auth::{CredentialHasher, HashError, SessionStore};
use crate::db::{StoreError, UserStore};
use crate::models::{Email, NewUser, Password, User, UserChanges, Username, ValidationError};

/// Account operation error type
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("user '{0}' not found")]
    NotFound(String),

    #[error("you cannot delete your own account")]
    SelfDeletion,

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raw account changes; `None` leaves the field alone
#[derive(Debug, Default)]
pub struct AccountEdit<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<Password>,
}

/// Create an account, hashing the password.
pub async fn create_account(
    users: &dyn UserStore,
    hasher: &dyn CredentialHasher,
    username: &str,
    email: &str,
    password: Password,
) -> Result<User, AccountError> {
    let new = NewUser {
        username: Username::new(username)?,
        email: Email::new(email)?,
        password_hash: hasher.hash(&password)?,
    };
    let user = users.create_user(new).await?;
    tracing::info!(email = %user.email, "account created");
    Ok(user)
}

/// Look an account up by (un-normalised) email.
pub async fn find_account(users: &dyn UserStore, email: &str) -> Result<User, AccountError> {
    let key = Email::new(email).map_err(|_| AccountError::NotFound(email.to_owned()))?;
    users
        .find_by_email(&key)
        .await?
        .ok_or_else(|| AccountError::NotFound(email.to_owned()))
}

/// Apply `edit` to the account at `email`.
///
/// Changing the email or password revokes the account's open sessions.
pub async fn update_account(
    users: &dyn UserStore,
    hasher: &dyn CredentialHasher,
    sessions: &SessionStore,
    email: &str,
    edit: AccountEdit<'_>,
) -> Result<User, AccountError> {
    let key = Email::new(email).map_err(|_| AccountError::NotFound(email.to_owned()))?;

    let changes = UserChanges {
        username: edit.username.map(Username::new).transpose()?,
        email: edit.email.map(Email::new).transpose()?,
        password_hash: edit.password.as_ref().map(|p| hasher.hash(p)).transpose()?,
    };
    let credentials_changed = changes.password_hash.is_some()
        || changes.email.as_ref().is_some_and(|e| e != &key);

    let user = users
        .update_user(&key, changes)
        .await?
        .ok_or_else(|| AccountError::NotFound(email.to_owned()))?;

    if credentials_changed {
        sessions.revoke_user(user.id).await;
    }
    tracing::info!(email = %user.email, "account updated");
    Ok(user)
}

/// Delete the account at `email`. `acting_email`, when given, may not delete itself.
pub async fn delete_account(
    users: &dyn UserStore,
    sessions: &SessionStore,
    email: &str,
    acting_email: Option<&str>,
) -> Result<(), AccountError> {
    let user = find_account(users, email).await?;

    if acting_email.is_some_and(|acting| acting == user.email) {
        return Err(AccountError::SelfDeletion);
    }

    let key = Email::new(&user.email)?;
    if !users.delete_user(&key).await? {
        return Err(AccountError::NotFound(email.to_owned()));
    }
    sessions.revoke_user(user.id).await;
    tracing::info!(email = %user.email, "account deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::BcryptHasher;
    use crate::db::MemoryStore;

    const HASHER: BcryptHasher = BcryptHasher::with_cost(4);

    fn pw() -> Password {
        Password::new("harbor-master").unwrap()
    }

    #[tokio::test]
    async fn create_then_find_normalises_email() {
        let store = MemoryStore::new();
        create_account(&store, &HASHER, "Staff", "Staff@Port.fr", pw())
            .await
            .unwrap();
        let user = find_account(&store, "STAFF@port.fr").await.unwrap();
        assert_eq!(user.email, "staff@port.fr");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_store_duplicate() {
        let store = MemoryStore::new();
        create_account(&store, &HASHER, "a", "a@port.fr", pw()).await.unwrap();
        let err = create_account(&store, &HASHER, "b", "A@port.fr", pw())
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Store(StoreError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn password_change_revokes_sessions() {
        let store = MemoryStore::new();
        let sessions = SessionStore::default();
        let user = create_account(&store, &HASHER, "a", "a@port.fr", pw())
            .await
            .unwrap();
        let session = sessions.issue(&user).await;

        let edit = AccountEdit {
            password: Some(Password::new("another-secret").unwrap()),
            ..Default::default()
        };
        update_account(&store, &HASHER, &sessions, "a@port.fr", edit)
            .await
            .unwrap();
        assert!(sessions.verify(&session.token.to_string()).await.is_err());
    }

    #[tokio::test]
    async fn username_change_keeps_sessions() {
        let store = MemoryStore::new();
        let sessions = SessionStore::default();
        let user = create_account(&store, &HASHER, "a", "a@port.fr", pw())
            .await
            .unwrap();
        let session = sessions.issue(&user).await;

        let edit = AccountEdit {
            username: Some("renamed"),
            ..Default::default()
        };
        let updated = update_account(&store, &HASHER, &sessions, "a@port.fr", edit)
            .await
            .unwrap();
        assert_eq!(updated.username, "renamed");
        assert!(sessions.verify(&session.token.to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn cannot_delete_self() {
        let store = MemoryStore::new();
        let sessions = SessionStore::default();
        create_account(&store, &HASHER, "a", "a@port.fr", pw()).await.unwrap();

        let err = delete_account(&store, &sessions, "a@port.fr", Some("a@port.fr"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::SelfDeletion));

        delete_account(&store, &sessions, "a@port.fr", None).await.unwrap();
        assert!(matches!(
            find_account(&store, "a@port.fr").await,
            Err(AccountError::NotFound(_))
        ));
    }
}
