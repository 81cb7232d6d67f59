//! The only place statements reach the store.

use std::future::Future;

use log::trace;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnection};
use sqlx::Row;

use crate::db::statements::{Statement, Value};
use crate::error::{Error, Result};

/// Runs statements against a store, one at a time.
///
/// Implementations do not retry. Inserts are not idempotent, so a failed
/// statement is reported to the caller as is.
pub trait Gateway {
    fn execute(&mut self, statement: &Statement) -> impl Future<Output = Result<()>> + Send;

    /// Runs an identifier-producing insert and returns the generated id.
    ///
    /// Fails with [`Error::Integrity`] when the statement is not an insert or
    /// yields no identifier. A non-insert is rejected before it reaches the
    /// store.
    fn execute_returning_id(
        &mut self,
        statement: &Statement,
    ) -> impl Future<Output = Result<i64>> + Send;
}

/// Gateway over a single SQLite connection. Pass a `Transaction` (which
/// derefs to the connection) to scope a whole cascade in it.
pub struct SqliteGateway<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteGateway<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

/// True when the statement's leading keyword is `INSERT` (or `REPLACE`, which
/// SQLite treats as an insert).
fn is_insert(sql: &str) -> bool {
    let keyword = sql
        .trim_start()
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    keyword.eq_ignore_ascii_case("INSERT") || keyword.eq_ignore_ascii_case("REPLACE")
}

fn require_insert(statement: &Statement) -> Result<()> {
    if is_insert(statement.sql()) {
        Ok(())
    } else {
        Err(Error::integrity(format!(
            "statement does not insert a row: {}",
            statement.sql()
        )))
    }
}

fn bind_params(statement: &Statement) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    let mut query = sqlx::query(statement.sql());
    for value in statement.params() {
        query = match value {
            Value::Null => query.bind(None::<i64>),
            Value::Integer(v) => query.bind(*v),
            Value::Real(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
        };
    }
    query
}

impl Gateway for SqliteGateway<'_> {
    async fn execute(&mut self, statement: &Statement) -> Result<()> {
        trace!("execute: {}", statement);
        bind_params(statement).execute(&mut *self.conn).await?;
        Ok(())
    }

    async fn execute_returning_id(&mut self, statement: &Statement) -> Result<i64> {
        trace!("execute_returning_id: {}", statement);
        require_insert(statement)?;
        let row = bind_params(statement)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or_else(|| {
                Error::integrity(format!("statement produced no identifier: {}", statement.sql()))
            })?;

        let id: Option<i64> = row.try_get(0).map_err(|e| {
            Error::integrity(format!(
                "statement returned a non-integer identifier: {} ({})",
                statement.sql(),
                e
            ))
        })?;
        id.ok_or_else(|| Error::integrity(format!("statement returned a null identifier: {}", statement.sql())))
    }
}

/// In-memory gateway for exercising callers without a store. Records every
/// statement, hands out sequential ids and can be told to fail at a given
/// statement.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingGateway {
    pub statements: Vec<Statement>,
    pub fail_at: Option<usize>,
    next_id: i64,
}

#[cfg(test)]
impl RecordingGateway {
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Default::default()
        }
    }

    pub fn sql_starting_with(&self, prefix: &str) -> Vec<&Statement> {
        self.statements
            .iter()
            .filter(|s| s.sql().starts_with(prefix))
            .collect()
    }

    fn record(&mut self, statement: &Statement) -> Result<()> {
        if self.fail_at == Some(self.statements.len()) {
            return Err(Error::Store(sqlx::Error::Protocol(format!(
                "injected failure at statement {}",
                self.statements.len()
            ))));
        }
        self.statements.push(statement.clone());
        Ok(())
    }
}

#[cfg(test)]
impl Gateway for RecordingGateway {
    async fn execute(&mut self, statement: &Statement) -> Result<()> {
        self.record(statement)
    }

    async fn execute_returning_id(&mut self, statement: &Statement) -> Result<i64> {
        self.record(statement)?;
        require_insert(statement)?;
        if !statement.sql().contains("RETURNING") {
            return Err(Error::integrity("statement produced no identifier"));
        }
        self.next_id += 1;
        Ok(self.next_id)
    }
}
