use super::*;
use bh_core::ID;
use bh_core::Unique;
use bh_database::*;
use tokio_postgres::Client;
use tokio_postgres::Row;

const COLUMNS: &str = "id, username, email, hashword, enabled, role";

fn hydrate(row: Row) -> Account {
    Account::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, String>(3),
    )
    .with_enabled(row.get::<_, bool>(4))
    .with_role(Role::from(row.get::<_, &str>(5)))
}

/// PostgreSQL-backed credential store over the users table.
#[async_trait::async_trait]
impl Credentials for Client {
    async fn find(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT ", COLUMNS, " FROM ", USERS, " WHERE username = $1"),
            &[&username],
        )
        .await
        .map(|opt| opt.map(hydrate))
        .map_err(StoreError::from)
    }

    async fn save(&self, account: &Account) -> Result<Account, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "UPDATE ",
                USERS,
                " SET email = $2, hashword = $3, enabled = $4, role = $5 WHERE id = $1 RETURNING ",
                COLUMNS
            ),
            &[
                &account.id().inner(),
                &account.email(),
                &account.hashword(),
                &account.enabled(),
                &account.role().to_string(),
            ],
        )
        .await?
        .map(hydrate)
        .ok_or_else(|| StoreError::Backend(format!("no stored account {}", account.id())))
    }

    async fn create(&self, account: &Account) -> Result<(), StoreError> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (",
                COLUMNS,
                ") VALUES ($1, $2, $3, $4, $5, $6)"
            ),
            &[
                &account.id().inner(),
                &account.username(),
                &account.email(),
                &account.hashword(),
                &account.enabled(),
                &account.role().to_string(),
            ],
        )
        .await
        .map(|_| ())
        .map_err(StoreError::from)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.execute("SELECT 1", &[])
            .await
            .map(|_| ())
            .map_err(StoreError::from)
    }
}
