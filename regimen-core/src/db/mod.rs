pub mod gateway;
pub mod models;
pub mod operations;
pub mod schema;
pub mod statements;

use std::str::FromStr;
use std::time::Duration;

use log::{debug, info};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::error::Result;

pub use gateway::{Gateway, SqliteGateway};
pub use schema::Table;
pub use statements::{Statement, Value};

/// Opens the store. The pool holds a single connection: every cascade runs
/// against the same writer, one statement at a time.
///
/// Opening never touches the schema; call [`crate::seed::reset_database`]
/// explicitly to (re)create it.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        // an in-memory database lives exactly as long as its connection
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;

    if in_memory {
        debug!("Opened in-memory database");
    } else {
        info!("Opened database at {}", database_url);
    }
    Ok(pool)
}

pub async fn connect_in_memory() -> Result<SqlitePool> {
    connect("sqlite::memory:").await
}
