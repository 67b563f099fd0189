use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::User;

/// Failures raised by a user store
///
/// A missing record is not an error at this layer; lookups return `None`.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("no user ids left to assign")]
    IdSpaceExhausted,
}

/// Repository trait for the User entity
///
/// Defines the contract for persisting and retrieving users by identifier.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by its ID
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepositoryError>;

    /// Find every stored user, in insertion order
    async fn find_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Save a user (insert when the id is unset or unknown, otherwise update)
    ///
    /// Returns the stored record with its assigned id.
    async fn save(&self, user: User) -> Result<User, RepositoryError>;

    /// Delete a user by ID; absent ids are ignored
    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError>;

    /// Whether any user has exactly this email (case-sensitive)
    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;
}

/// A user store that can open all-or-nothing units of work
#[async_trait]
pub trait UserStore: UserRepository + 'static {
    type Transaction: UserTransaction;

    /// Begin a transaction against the store
    async fn begin(&self) -> Result<Self::Transaction, RepositoryError>;
}

/// Repository operations scoped to a single transaction
///
/// Dropping the transaction without calling `commit` rolls it back.
#[async_trait]
pub trait UserTransaction: UserRepository + Sized {
    /// Make every write performed through this transaction visible
    async fn commit(self) -> Result<(), RepositoryError>;
}
