/// User persistence port
///
/// Handlers talk to storage only through [`UserStore`], so the same
/// registration flow runs against PostgreSQL in production and against an
/// in-memory map in development and tests.
///
/// # Uniqueness
///
/// [`UserStore::create`] is the authority on email uniqueness. Adapters must
/// reject a duplicate email atomically with [`StoreError::DuplicateEmail`];
/// a preceding [`UserStore::find_by_email`] is only a fast path and two
/// concurrent callers may both see `None`.

use crate::models::user::{CreateUser, User};
use async_trait::async_trait;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

/// Errors returned by user store adapters
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another user already owns this email
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// The storage backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateEmail(
                    db_err.constraint().unwrap_or("users_email_key").to_string(),
                )
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Storage operations needed by registration
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by email, case-insensitively
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Inserts a user, failing with `DuplicateEmail` if the email is taken
    async fn create(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Checks that the backend is reachable
    async fn health_check(&self) -> Result<(), StoreError>;
}
