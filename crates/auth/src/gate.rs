//! Per-request authentication filter.
//!
//! Turns an `Authorization: Bearer <token>` header into a populated
//! [`Context`]. The gate never rejects a request: every failure is an
//! explicit transition to `Passthrough`, and route-level
//! extractors decide whether an anonymous request may proceed.
//!
//! ```text
//! Start ─no header──────────────────────────────────────────▶ Passthrough
//!   │
//! TokenPresent ─undecodable─────────────────────────────────▶ Passthrough
//!   │
//! Extracted ─context already holds a principal──────────────▶ Passthrough
//!   │
//! Resolve ─unknown subject / store down─────────────────────▶ Passthrough
//!   │
//! Heal ─disabled: enable, save, re-fetch; save failed───────▶ Passthrough
//!   │
//! Validate ─wrong subject / expired─────────────────────────▶ Passthrough
//!   │
//! Authenticated
//! ```
use super::*;

const BEARER: &str = "Bearer ";

/// Why a request continued without an attached identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NoToken,
    Malformed,
    AlreadyAuthenticated,
    NotFound,
    Unavailable,
    HealFailed,
    Invalid,
}

/// Terminal result of one pass through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Authenticated,
    Passthrough(Reason),
}

#[derive(Debug)]
enum State {
    Start,
    TokenPresent { token: String },
    Extracted { token: String, claims: Claims },
    Resolve { token: String, claims: Claims },
    Heal { token: String, claims: Claims, account: Account },
    Validate { token: String, claims: Claims, account: Account },
    Authenticated(Principal),
    Passthrough(Reason),
}

/// Authentication filter over a credential store and token codec.
#[derive(Clone)]
pub struct Gate {
    store: Store,
    crypto: Crypto,
}

impl Gate {
    pub fn new(store: Store, crypto: Crypto) -> Self {
        Self { store, crypto }
    }
    pub fn crypto(&self) -> &Crypto {
        &self.crypto
    }

    /// Runs the state machine for one request, attaching a principal to
    /// `context` on success. Never fails.
    pub async fn authenticate(
        &self,
        header: Option<&str>,
        context: &mut Context,
        origin: Option<&str>,
    ) -> Outcome {
        let mut state = State::Start;
        loop {
            state = match state {
                State::Authenticated(principal) => {
                    log::debug!("authenticated {}", principal.username());
                    context.attach(principal);
                    return Outcome::Authenticated;
                }
                State::Passthrough(reason) => {
                    log::debug!("continuing anonymously: {:?}", reason);
                    return Outcome::Passthrough(reason);
                }
                state => self.step(state, header, context, origin).await,
            }
        }
    }

    async fn step(
        &self,
        state: State,
        header: Option<&str>,
        context: &Context,
        origin: Option<&str>,
    ) -> State {
        match state {
            State::Start => match header.and_then(|h| h.strip_prefix(BEARER)) {
                Some(token) => State::TokenPresent {
                    token: token.trim().to_string(),
                },
                None => State::Passthrough(Reason::NoToken),
            },
            State::TokenPresent { token } => match self.crypto.decode(&token) {
                Ok(claims) => State::Extracted { token, claims },
                Err(_) => State::Passthrough(Reason::Malformed),
            },
            State::Extracted { token, claims } => match context.authenticated() {
                true => State::Passthrough(Reason::AlreadyAuthenticated),
                false => State::Resolve { token, claims },
            },
            State::Resolve { token, claims } => {
                let found = self.store.find(claims.subject()).await;
                match found {
                    Ok(Some(account)) => State::Heal {
                        token,
                        claims,
                        account,
                    },
                    Ok(None) => {
                        log::warn!("{}", AuthError::IdentityNotFound(claims.sub));
                        State::Passthrough(Reason::NotFound)
                    }
                    Err(e) => {
                        log::warn!("{}", AuthError::Store(e));
                        State::Passthrough(Reason::Unavailable)
                    }
                }
            }
            State::Heal {
                token,
                claims,
                account,
            } => match account.enabled() {
                true => State::Validate {
                    token,
                    claims,
                    account,
                },
                false => self.heal(token, claims, account).await,
            },
            State::Validate {
                token,
                claims,
                account,
            } => match self.crypto.validate(&token, account.username()) {
                true => State::Authenticated(Principal::new(
                    &account,
                    Details {
                        origin: origin.map(str::to_string),
                        session: Some(claims),
                    },
                )),
                false => {
                    log::debug!("token rejected for {}", account.username());
                    State::Passthrough(Reason::Invalid)
                }
            },
            terminal => terminal,
        }
    }

    /// Re-enables a disabled account because it presented a verifiable
    /// token, then re-reads it from the store.
    async fn heal(&self, token: String, claims: Claims, account: Account) -> State {
        log::warn!("activating disabled account {}", account.username());
        if let Err(e) = self.store.save(&account.with_enabled(true)).await {
            log::warn!("{}", AuthError::SelfHealPersist(e));
            return State::Passthrough(Reason::HealFailed);
        }
        let found = self.store.find(claims.subject()).await;
        match found {
            Ok(Some(account)) => State::Validate {
                token,
                claims,
                account,
            },
            Ok(None) => {
                log::warn!("{}", AuthError::IdentityNotFound(claims.sub));
                State::Passthrough(Reason::NotFound)
            }
            Err(e) => {
                log::warn!("{}", AuthError::Store(e));
                State::Passthrough(Reason::Unavailable)
            }
        }
    }
}
