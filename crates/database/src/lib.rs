//! PostgreSQL connectivity and schema bootstrap.
//!
//! ## Connectivity
//!
//! - [`db()`] — Establishes a database connection from a connection URL
//! - [`prepare()`] — Creates a table and its indices if they are missing
//!
//! ## Schema
//!
//! - [`Schema`] — Table metadata and DDL generation
//!
//! ## Table Names
//!
//! Constants for all persistent entities owned by the auth core.
mod schema;

pub use schema::*;

use std::sync::Arc;
use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Establishes a database connection.
///
/// Returns an `Arc<Client>` suitable for sharing across async tasks.
/// The connection driver is spawned onto the current tokio runtime.
pub async fn db(url: &str) -> Result<Arc<Client>, PgErr> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await?;
    Ok(Arc::new(client))
}

/// Creates the table described by `T` along with its indices.
/// Safe to run on every startup.
pub async fn prepare<T: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("preparing table {}", T::name());
    client.batch_execute(T::creates()).await?;
    client.batch_execute(T::indices()).await?;
    Ok(())
}

/// Table for registered user accounts.
#[rustfmt::skip]
pub const USERS:       &str = "users";
