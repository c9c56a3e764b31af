use async_trait::async_trait;
use bson::DateTime;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    Collection,
};
use tracing::debug;

use crate::users::repo_types::{NewUser, User};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a validated user, stamping `createdAt`/`updatedAt`.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(users: Collection<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut doc = User::from_new(user, DateTime::now());
        let result = self
            .users
            .insert_one(&doc, None)
            .await
            .map_err(classify)?;
        doc.id = result.inserted_id.as_object_id();
        debug!(username = %doc.username, "user document inserted");
        Ok(doc)
    }
}

fn classify(err: mongodb::error::Error) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY => {
            StoreError::Duplicate(we.message.clone())
        }
        _ => StoreError::Backend(err),
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryUserStore;
    use super::*;
    use crate::users::repo_types::Role;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password: "hash".into(),
            role: Role::User,
            first_name: None,
            last_name: None,
            social_links: None,
        }
    }

    #[tokio::test]
    async fn memory_store_stamps_id_and_timestamps() {
        let store = MemoryUserStore::default();
        let user = store
            .insert(new_user("user-a1", "a@example.com"))
            .await
            .unwrap();
        assert!(user.id.is_some());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn memory_store_rejects_duplicate_email_and_username() {
        let store = MemoryUserStore::default();
        store
            .insert(new_user("user-a1", "a@example.com"))
            .await
            .unwrap();

        let err = store
            .insert(new_user("user-b2", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));

        let err = store
            .insert(new_user("user-a1", "b@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.snapshot().len(), 1);
    }
}
