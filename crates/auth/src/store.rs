use super::*;
use bh_core::Unique;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

/// Credential store consumed by login and the authentication gate.
///
/// `save` must be an idempotent last-write-wins update: concurrent
/// requests may activate the same account at once.
#[async_trait::async_trait]
pub trait Credentials: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<Account>, StoreError>;
    async fn save(&self, account: &Account) -> Result<Account, StoreError>;
    /// Inserts a new account, failing with [`StoreError::Conflict`] when the
    /// username or email is taken.
    async fn create(&self, account: &Account) -> Result<(), StoreError>;
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Shared handle to whichever store backs the process.
pub type Store = Arc<dyn Credentials>;

/// In-process store keyed by username.
#[derive(Default)]
pub struct Memory {
    accounts: RwLock<HashMap<String, Account>>,
}

impl Memory {
    fn poisoned<T>(_: T) -> StoreError {
        StoreError::Backend("account map poisoned".to_string())
    }
}

impl FromIterator<Account> for Memory {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        Self {
            accounts: RwLock::new(
                iter.into_iter()
                    .map(|a| (a.username().to_string(), a))
                    .collect(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl Credentials for Memory {
    async fn find(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.accounts
            .read()
            .map(|map| map.get(username).cloned())
            .map_err(Self::poisoned)
    }
    async fn save(&self, account: &Account) -> Result<Account, StoreError> {
        let mut map = self.accounts.write().map_err(Self::poisoned)?;
        match map.get(account.username()) {
            Some(stored) if stored.id() == account.id() => {
                map.insert(account.username().to_string(), account.clone());
                Ok(account.clone())
            }
            _ => Err(StoreError::Backend(format!(
                "no stored account {}",
                account.id()
            ))),
        }
    }
    async fn create(&self, account: &Account) -> Result<(), StoreError> {
        let mut map = self.accounts.write().map_err(Self::poisoned)?;
        if map.contains_key(account.username())
            || map.values().any(|a| a.email() == account.email())
        {
            return Err(StoreError::Conflict);
        }
        map.insert(account.username().to_string(), account.clone());
        Ok(())
    }
}
