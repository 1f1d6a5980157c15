//! SQLite backend: provider binding over `rusqlite` plus the thin facade
//! surface.
//!
//! rusqlite is a blocking API, so open and execution run on
//! `spawn_blocking` tasks; the connection moves into the task and back so it
//! stays owned by the session for the duration of one call. The connection
//! string is the database path (`:memory:` and `file:` URIs included).
//!
//! SQLite has no stored routines, so [`CommandKind::StoredProcedure`]
//! requests are rejected with [`SqlConduitError::Unsupported`].

mod params;
mod query;

use async_trait::async_trait;

use crate::backend::{Backend, Connection, Statement};
use crate::error::SqlConduitError;
use crate::facade::backend_facade;
use crate::results::RowSet;
use crate::types::{BackendKind, CommandKind};

/// Provider binding for SQLite.
pub struct Sqlite;

/// One live rusqlite connection, scoped to a single call. The `Option` is
/// only empty while a blocking task holds the connection.
pub struct SqliteSession {
    conn: Option<rusqlite::Connection>,
}

#[async_trait]
impl Backend for Sqlite {
    type Connection = SqliteSession;

    const KIND: BackendKind = BackendKind::Sqlite;

    async fn open(connection_string: &str) -> Result<Self::Connection, SqlConduitError> {
        let path = connection_string.to_owned();
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(path))
            .await
            .map_err(|e| SqlConduitError::Connection(format!("sqlite open join error: {e}")))?
            .map_err(|e| SqlConduitError::Connection(format!("sqlite open error: {e}")))?;
        Ok(SqliteSession { conn: Some(conn) })
    }
}

impl SqliteSession {
    /// Run `op` against the connection on a blocking task, restoring the
    /// connection into the session afterwards.
    async fn with_conn<R, F>(&mut self, op: F) -> Result<R, SqlConduitError>
    where
        R: Send + 'static,
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlConduitError> + Send + 'static,
    {
        let mut conn = self
            .conn
            .take()
            .ok_or_else(|| SqlConduitError::Connection("sqlite connection lost".to_string()))?;
        let (conn, result) = tokio::task::spawn_blocking(move || {
            let result = op(&mut conn);
            (conn, result)
        })
        .await
        .map_err(|e| SqlConduitError::Execution(format!("sqlite join error: {e}")))?;
        self.conn = Some(conn);
        result
    }
}

#[async_trait]
impl Connection for SqliteSession {
    async fn query(&mut self, statement: &Statement<'_>) -> Result<RowSet, SqlConduitError> {
        reject_stored_procedure(statement)?;
        let sql = statement.sql.to_owned();
        let values = params::to_sqlite_values(statement.params);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            query::collect_rows(&mut stmt, &values)
        })
        .await
    }

    async fn execute(&mut self, statement: &Statement<'_>) -> Result<u64, SqlConduitError> {
        reject_stored_procedure(statement)?;
        let sql = statement.sql.to_owned();
        let values = params::to_sqlite_values(statement.params);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let refs: Vec<&dyn rusqlite::ToSql> =
                values.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
            let affected = stmt.execute(&refs[..])?;
            u64::try_from(affected).map_err(|e| {
                SqlConduitError::Execution(format!("sqlite affected rows conversion error: {e}"))
            })
        })
        .await
    }
}

fn reject_stored_procedure(statement: &Statement<'_>) -> Result<(), SqlConduitError> {
    if statement.kind == CommandKind::StoredProcedure {
        return Err(SqlConduitError::Unsupported(
            "SQLite has no stored procedures".to_string(),
        ));
    }
    Ok(())
}

backend_facade!(crate::sqlite::Sqlite);
