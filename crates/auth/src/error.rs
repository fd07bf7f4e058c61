use thiserror::Error;

/// Failures surfaced by token handling, login, and credential lookups.
///
/// Inside the authentication [`Gate`](crate::Gate) every variant degrades to
/// an anonymous request. Only login and action-token redemption surface
/// them to a client, always as a generic unauthorized response.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token failed to parse or its signature did not verify.
    #[error("malformed token")]
    TokenMalformed,

    /// Token verified but its expiry has passed.
    #[error("token expired")]
    TokenExpired,

    /// A verified token names a subject that no longer resolves.
    #[error("no identity for subject {0}")]
    IdentityNotFound(String),

    /// Re-enabling a disabled identity could not be persisted.
    #[error("failed to persist account activation: {0}")]
    SelfHealPersist(#[source] StoreError),

    /// The credential store could not answer.
    #[error("credential store: {0}")]
    Store(#[from] StoreError),

    /// Token could not be signed.
    #[error("token signing: {0}")]
    Signing(String),

    /// Password hashing failed.
    #[error("password hashing: {0}")]
    Hashing(String),
}

/// Failures raised by a [`Credentials`](crate::Credentials) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Username already taken.
    #[error("account already exists")]
    Conflict,

    #[error("{0}")]
    Backend(String),
}

#[cfg(feature = "database")]
impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        match e.code() {
            Some(code) if *code == tokio_postgres::error::SqlState::UNIQUE_VIOLATION => {
                Self::Conflict
            }
            _ => Self::Backend(e.to_string()),
        }
    }
}
