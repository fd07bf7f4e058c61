/// JWT payload.
///
/// `jti` is a fresh UUIDv7 per token, so two tokens for one subject are
/// never byte-identical even when issued within the same second.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims for `subject` living `ttl` seconds from now. A non-positive
    /// `ttl` yields claims that are already expired. `exp` never drops
    /// below the epoch since decoders read it as unsigned.
    pub fn new(subject: &str, ttl: i64) -> Self {
        let now = bh_core::now();
        Self {
            sub: subject.to_string(),
            jti: uuid::Uuid::now_v7(),
            iat: now,
            exp: now.saturating_add(ttl).max(0),
        }
    }
    /// `exp` is the first second at which the token is rejected.
    pub fn expired(&self) -> bool {
        bh_core::now() >= self.exp
    }
    pub fn subject(&self) -> &str {
        &self.sub
    }
    pub fn session(&self) -> uuid::Uuid {
        self.jti
    }
    pub fn issued(&self) -> i64 {
        self.iat
    }
    pub fn expires(&self) -> i64 {
        self.exp
    }
}
