//! Failure taxonomy for the auth subsystem.
//!
//! Callers branch on the variant, never on message text; HTTP handlers own
//! the mapping to status codes.

use crate::email::MailError;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Collapsed on purpose so login
    /// responses cannot be used to enumerate accounts.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no account registered for that email")]
    UserNotFound,

    /// The code never existed or its TTL ran out; the store cannot tell
    /// which.
    #[error("verification code expired or was never issued")]
    CodeExpiredOrMissing,

    #[error("wrong verification code")]
    CodeMismatch,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("password comparison failed: {0}")]
    HashComparison(String),

    #[error("store operation failed")]
    Persistence(#[source] StoreError),

    #[error("verification email delivery failed")]
    Delivery(#[source] MailError),

    #[error("session creation failed")]
    SessionCreation(#[source] StoreError),

    #[error("failed to generate session token")]
    TokenGeneration(#[from] rand::Error),

    #[error("authentication required")]
    Unauthenticated,

    /// A session resolved to a value that is not a user id.
    #[error("malformed session data")]
    InvalidSessionData,
}
