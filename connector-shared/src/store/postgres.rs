/// PostgreSQL-backed user store
///
/// Uniqueness comes from the `users_email_key` constraint on the CITEXT
/// email column, so concurrent inserts of the same address are resolved by
/// the database and the loser gets `StoreError::DuplicateEmail`.

use super::{StoreError, UserStore};
use crate::{
    db::pool,
    models::user::{CreateUser, User},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn create(&self, data: CreateUser) -> Result<User, StoreError> {
        let user = User::create(&self.pool, data).await?;
        debug!(user_id = %user.id, "Inserted user");
        Ok(user)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
