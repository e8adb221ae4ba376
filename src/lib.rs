//! Blog backend with email-verified accounts and cookie sessions.
//!
//! PostgreSQL holds users, posts, and comments; Redis holds the two
//! TTL-bound mappings the auth flows depend on (verification codes and
//! sessions). See [`auth::AuthService`] for the core flows and [`api`] for
//! the HTTP surface.

pub mod api;
pub mod auth;
pub mod cli;
pub mod email;
pub mod store;
