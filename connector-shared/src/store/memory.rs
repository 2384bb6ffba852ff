/// In-memory user store
///
/// Users are kept in a map keyed by the trimmed, lowercased email. The
/// existence check and the insert happen under one write lock, which gives
/// the same atomic uniqueness guarantee as the database constraint.
///
/// # Example
///
/// ```
/// use connector_shared::models::user::CreateUser;
/// use connector_shared::store::{InMemoryUserStore, StoreError, UserStore};
///
/// # async fn example() -> Result<(), StoreError> {
/// let store = InMemoryUserStore::new();
/// let data = CreateUser {
///     name: "Ada".to_string(),
///     email: "ada@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     avatar: "https://www.gravatar.com/avatar/...".to_string(),
/// };
///
/// store.create(data.clone()).await?;
/// assert!(matches!(store.create(data).await, Err(StoreError::DuplicateEmail(_))));
/// # Ok(())
/// # }
/// ```

use super::{StoreError, UserStore};
use crate::models::user::{CreateUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

fn key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&key(email)).cloned())
    }

    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        match users.entry(key(&data.email)) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(data.email)),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    name: data.name,
                    email: data.email,
                    password_hash: data.password_hash,
                    avatar: data.avatar,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
