use super::*;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use std::sync::Arc;
use std::time::Duration;

/// Source of signing material.
///
/// The codec only ever asks for the current keys, so rotation can be added
/// behind this trait without touching the filter.
pub trait Keys: Send + Sync {
    fn encoding(&self) -> &EncodingKey;
    fn decoding(&self) -> &DecodingKey;
}

/// Process-wide HMAC-SHA256 secret, fixed at startup.
pub struct Secret {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Secret {
    /// `None` for an empty secret.
    pub fn new(secret: &[u8]) -> Option<Self> {
        (!secret.is_empty()).then(|| Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }
}

impl Keys for Secret {
    fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }
    fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token codec. Issues and verifies compact HS256 bearer tokens.
///
/// Session and action tokens share this codec and differ only by lifetime.
#[derive(Clone)]
pub struct Crypto {
    keys: Arc<dyn Keys>,
    session: Duration,
    action: Duration,
}

impl Crypto {
    pub fn new(keys: impl Keys + 'static) -> Self {
        Self {
            keys: Arc::new(keys),
            session: bh_core::SESSION_TTL,
            action: bh_core::ACTION_TTL,
        }
    }
    pub fn with_lifetimes(self, session: Duration, action: Duration) -> Self {
        Self {
            session,
            action,
            ..self
        }
    }

    /// Signs a token for `subject` expiring `ttl` seconds from now.
    pub fn issue(&self, subject: &str, ttl: i64) -> Result<String, AuthError> {
        let ref claims = Claims::new(subject, ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, self.keys.encoding())
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
    /// Long-lived token handed out at login.
    pub fn session(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, Self::seconds(self.session))
    }
    /// Short-lived token for activation and password reset.
    pub fn action(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, Self::seconds(self.action))
    }

    /// Verifies signature and structure. Expiry is left to the caller.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        jsonwebtoken::decode::<Claims>(token, self.keys.decoding(), &Self::validation())
            .map(|data| data.claims)
            .map_err(|_| AuthError::TokenMalformed)
    }
    /// Verifies signature, structure, and expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.decode(token)?;
        if claims.expired() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    pub fn extract_subject(&self, token: &str) -> Result<String, AuthError> {
        self.decode(token).map(|claims| claims.sub)
    }
    /// Undecodable tokens count as expired.
    pub fn is_expired(&self, token: &str) -> bool {
        self.decode(token).map(|c| c.expired()).unwrap_or(true)
    }
    /// True iff the signature verifies, the token names `expected`, and it
    /// has not expired.
    pub fn validate(&self, token: &str, expected: &str) -> bool {
        self.verify(token)
            .map(|claims| claims.subject() == expected)
            .unwrap_or(false)
    }

    /// Saturates lifetimes too long to represent.
    fn seconds(ttl: Duration) -> i64 {
        i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation
    }
}
