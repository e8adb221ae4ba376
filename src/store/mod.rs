//! Storage backends: durable user records in PostgreSQL and TTL-bound
//! key-value entries in Redis, each behind a trait so handlers and tests can
//! swap in-memory implementations.

pub mod ephemeral;
pub mod users;

use thiserror::Error;

/// Failure raised by any storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("key-value store error: {0}")]
    Kv(#[from] redis::RedisError),

    /// Unique-constraint violation on the email column.
    #[error("email already registered")]
    DuplicateEmail,
}
