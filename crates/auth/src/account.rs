use bh_core::ID;
use bh_core::Unique;

/// Coarse permission level attached to an account.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn authorities(&self) -> Vec<Authority> {
        match self {
            Self::User => vec![Authority::User],
            Self::Admin => vec![Authority::User, Authority::Admin],
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Granted authority consulted by route-level authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Authority {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

/// Stored identity. The username is unique and resolves to at most one
/// account.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    id: ID<Self>,
    username: String,
    email: String,
    hashword: String,
    enabled: bool,
    role: Role,
}

impl Account {
    pub fn new(id: ID<Self>, username: String, email: String, hashword: String) -> Self {
        Self {
            id,
            username,
            email,
            hashword,
            enabled: false,
            role: Role::default(),
        }
    }
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
    pub fn with_role(self, role: Role) -> Self {
        Self { role, ..self }
    }
    pub fn with_hashword(self, hashword: String) -> Self {
        Self { hashword, ..self }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn hashword(&self) -> &str {
        &self.hashword
    }
    pub fn enabled(&self) -> bool {
        self.enabled
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn authorities(&self) -> Vec<Authority> {
        self.role.authorities()
    }
}

impl Unique for Account {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("enabled", &self.enabled)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use bh_database::*;

    impl Schema for Account {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          UUID PRIMARY KEY,
                    username    VARCHAR(32) UNIQUE NOT NULL,
                    email       VARCHAR(255) UNIQUE NOT NULL,
                    hashword    TEXT NOT NULL,
                    enabled     BOOLEAN NOT NULL DEFAULT FALSE,
                    role        VARCHAR(16) NOT NULL DEFAULT 'user'
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_username ON ",
                USERS,
                " (username);
                 CREATE INDEX IF NOT EXISTS idx_users_email ON ",
                USERS,
                " (email);"
            )
        }
    }
}
