//! Authentication, identity resolution, and per-request security context.
//!
//! JWT bearer tokens with Argon2 password hashing. Every request passes
//! through the [`Gate`], which attaches an authenticated [`Principal`] to
//! the request's [`Context`] when it can and lets the request continue
//! anonymously when it cannot.
//!
//! ## Tokens
//!
//! - [`Crypto`] — HS256 signing and verification
//! - [`Claims`] — JWT payload structure
//! - [`Keys`] / [`Secret`] — signing key material
//!
//! ## Identity
//!
//! - [`Account`] — Stored identity with enabled flag and role
//! - [`Credentials`] — Credential store ([`Memory`], PostgreSQL)
//! - [`password`] — Argon2 hashing and verification
//! - [`login()`] — Credential check and session token issue
//!
//! ## Request Pipeline
//!
//! - [`Gate`] — Authentication filter state machine
//! - [`Context`] / [`Principal`] — Per-request security context
mod account;
mod claims;
mod context;
mod courier;
mod crypto;
mod dto;
mod error;
mod gate;
mod login;
pub mod password;
mod store;

pub use account::*;
pub use claims::*;
pub use context::*;
pub use courier::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use gate::*;
pub use login::*;
pub use store::*;

#[cfg(feature = "database")]
mod repository;

#[cfg(feature = "server")]
pub mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use middleware::*;
