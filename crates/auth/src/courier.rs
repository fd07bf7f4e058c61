use std::sync::Arc;
use std::sync::Mutex;

/// Hands action tokens to their owner out of band.
///
/// Mail delivery lives outside this crate; implementations decide where
/// the token goes.
#[async_trait::async_trait]
pub trait Courier: Send + Sync {
    async fn deliver(&self, username: &str, token: &str);
}

/// Shared handle to the configured courier.
pub type Dispatch = Arc<dyn Courier>;

/// Records that a token was issued without exposing it.
pub struct Journal;

#[async_trait::async_trait]
impl Courier for Journal {
    async fn deliver(&self, username: &str, _: &str) {
        log::info!("action token issued for {}", username);
    }
}

/// Keeps delivered tokens in memory.
#[derive(Default)]
pub struct Outbox {
    sent: Mutex<Vec<(String, String)>>,
}

impl Outbox {
    /// Most recent token delivered to `username`.
    pub fn latest(&self, username: &str) -> Option<String> {
        self.sent
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|(user, _)| user == username)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait::async_trait]
impl Courier for Outbox {
    async fn deliver(&self, username: &str, token: &str) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((username.to_string(), token.to_string()));
        }
    }
}
