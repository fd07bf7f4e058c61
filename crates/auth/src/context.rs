use super::*;
use bh_core::ID;
use bh_core::Unique;

/// Request metadata attached to an authenticated principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    /// Remote address the request originated from, when known.
    pub origin: Option<String>,
    /// Token id, issue and expiry times of the presented session token.
    pub session: Option<Claims>,
}

impl Details {
    pub fn origin(origin: Option<&str>) -> Self {
        Self {
            origin: origin.map(str::to_string),
            session: None,
        }
    }
}

/// Authenticated identity with its granted authorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: ID<Account>,
    username: String,
    authorities: Vec<Authority>,
    details: Details,
}

impl Principal {
    pub fn new(account: &Account, details: Details) -> Self {
        Self {
            id: account.id(),
            username: account.username().to_string(),
            authorities: account.authorities(),
            details,
        }
    }
    pub fn id(&self) -> ID<Account> {
        self.id
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn authorities(&self) -> &[Authority] {
        &self.authorities
    }
    pub fn details(&self) -> &Details {
        &self.details
    }
    pub fn has(&self, authority: Authority) -> bool {
        self.authorities.contains(&authority)
    }
}

/// Per-request security context.
///
/// Created empty for each request, populated at most once, and dropped
/// with the request. Never shared between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    principal: Option<Principal>,
}

impl Context {
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
    pub fn authenticated(&self) -> bool {
        self.principal.is_some()
    }
    /// Stores `principal` unless one is already present. Returns whether
    /// it was stored.
    pub fn attach(&mut self, principal: Principal) -> bool {
        match self.principal {
            Some(_) => false,
            None => {
                self.principal = Some(principal);
                true
            }
        }
    }
}
