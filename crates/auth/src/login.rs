use super::*;
use std::sync::LazyLock;

/// Hash checked against when the username is unknown, so a miss costs the
/// same Argon2 work as a wrong password.
static DECOY: LazyLock<String> =
    LazyLock::new(|| password::hash("decoy-password").unwrap_or_default());

/// Verifies `username`/`password` and issues a session token.
///
/// Unknown usernames and wrong passwords fail identically with
/// [`AuthError::InvalidCredentials`]. Account state is never mutated here.
pub async fn login(
    store: &dyn Credentials,
    crypto: &Crypto,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    let account = match store.find(username).await? {
        Some(account) if password::verify(password, account.hashword()) => account,
        Some(_) => return Err(AuthError::InvalidCredentials),
        None => {
            password::verify(password, &DECOY);
            return Err(AuthError::InvalidCredentials);
        }
    };
    log::debug!("issuing session token for {}", account.username());
    crypto.session(account.username())
}
