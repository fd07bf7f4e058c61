use super::*;
use bh_core::Unique;
use serde::Deserialize;
use serde::Serialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Deserialize)]
pub struct ResetRequest {
    pub username: String,
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub token: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub enabled: bool,
}

impl From<&Account> for UserInfo {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            username: account.username().to_string(),
            enabled: account.enabled(),
        }
    }
}

#[derive(Serialize)]
pub struct PrincipalInfo {
    pub id: String,
    pub username: String,
    pub authorities: Vec<Authority>,
}

impl From<&Principal> for PrincipalInfo {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id().to_string(),
            username: principal.username().to_string(),
            authorities: principal.authorities().to_vec(),
        }
    }
}
