//! Registration, email verification, and login.
//!
//! [`AuthService`] owns the three collaborators the flows need, a durable
//! [`UserStore`], two [`EphemeralStore`] namespaces (verification codes and
//! sessions), and a [`Mailer`], all injected as trait objects so tests run
//! entirely in memory.

pub mod error;
pub mod guard;
pub mod password;
pub mod token;

use crate::email::Mailer;
use crate::store::ephemeral::EphemeralStore;
use crate::store::users::{NewUser, User, UserStore};
use error::AuthError;
use password::PasswordHasher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Verification codes live for ten minutes from issuance.
pub const CODE_TTL: Duration = Duration::from_secs(10 * 60);

/// Sessions expire 24 hours after login; no sliding renewal.
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const VERIFICATION_SUBJECT: &str = "Email Verification Code";

pub struct AuthService {
    users: Arc<dyn UserStore>,
    codes: Arc<dyn EphemeralStore>,
    sessions: Arc<dyn EphemeralStore>,
    mailer: Arc<dyn Mailer>,
    hasher: PasswordHasher,
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        codes: Arc<dyn EphemeralStore>,
        sessions: Arc<dyn EphemeralStore>,
        mailer: Arc<dyn Mailer>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            codes,
            sessions,
            mailer,
            hasher,
        }
    }

    /// The session namespace, exposed for the guard middleware.
    #[must_use]
    pub fn sessions(&self) -> &dyn EphemeralStore {
        self.sessions.as_ref()
    }

    /// Register a new account and dispatch its verification code.
    ///
    /// The code is written before the user row; a code orphaned by a failed
    /// insert is harmless and expires on its own. Re-registering an email
    /// overwrites the previous code and restarts its TTL.
    ///
    /// # Errors
    ///
    /// `Hashing`, `Persistence` (including duplicate email), or `Delivery`
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let password_hash = self.hasher.hash(password)?;

        let code = token::verification_code();
        self.codes
            .set(email, &code, CODE_TTL)
            .await
            .map_err(AuthError::Persistence)?;

        self.users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(AuthError::Persistence)?;

        self.mailer
            .send(
                email,
                VERIFICATION_SUBJECT,
                &format!("Your email confirmation code: {code}"),
            )
            .await
            .map_err(AuthError::Delivery)?;

        info!(email, "user registered");

        Ok(())
    }

    /// Check a submitted code and mark the account verified.
    ///
    /// The stored code is left to expire rather than deleted, so re-submits
    /// inside the window also succeed.
    ///
    /// # Errors
    ///
    /// `UserNotFound`, `CodeExpiredOrMissing`, `CodeMismatch`, or
    /// `Persistence`
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(AuthError::Persistence)?
            .ok_or(AuthError::UserNotFound)?;

        let stored = self
            .codes
            .get(email)
            .await
            .map_err(AuthError::Persistence)?
            .ok_or(AuthError::CodeExpiredOrMissing)?;

        if stored != code {
            return Err(AuthError::CodeMismatch);
        }

        self.users
            .mark_verified(user.id)
            .await
            .map_err(AuthError::Persistence)?;

        info!(email, "email verified");

        Ok(())
    }

    /// Validate credentials and mint a 24-hour session.
    ///
    /// Unknown emails and wrong passwords both surface as
    /// `InvalidCredentials`. The verified flag is not consulted here.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials`, `HashComparison`, `TokenGeneration`, or
    /// `SessionCreation`
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let Some(user) = self
            .users
            .find_by_email(email)
            .await
            .map_err(AuthError::Persistence)?
        else {
            warn!(email, "login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            warn!(email, "login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = token::session_token()?;
        self.sessions
            .set(&token, &user.id.to_string(), SESSION_TTL)
            .await
            .map_err(AuthError::SessionCreation)?;

        info!(email, user_id = %user.id, "login succeeded");

        Ok((user, token))
    }
}
