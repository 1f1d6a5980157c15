//! Turso backend: provider binding over the `turso` in-process client plus
//! the thin facade surface.
//!
//! The connection string is the database path (`:memory:` included). Turso
//! is natively async, so no blocking bridge is needed.
//!
//! Turso has no stored routines, so [`CommandKind::StoredProcedure`]
//! requests are rejected with [`SqlConduitError::Unsupported`].

mod params;
mod query;

use async_trait::async_trait;

use crate::backend::{Backend, Connection, Statement};
use crate::error::SqlConduitError;
use crate::facade::backend_facade;
use crate::results::RowSet;
use crate::types::{BackendKind, CommandKind};

/// Provider binding for Turso.
pub struct Turso;

/// One live turso connection, scoped to a single call. The database handle
/// is kept alongside so it outlives the connection.
pub struct TursoSession {
    _db: turso::Database,
    conn: turso::Connection,
}

#[async_trait]
impl Backend for Turso {
    type Connection = TursoSession;

    const KIND: BackendKind = BackendKind::Turso;

    async fn open(connection_string: &str) -> Result<Self::Connection, SqlConduitError> {
        let db = turso::Builder::new_local(connection_string)
            .build()
            .await
            .map_err(|e| {
                SqlConduitError::Connection(format!("turso database open error: {e}"))
            })?;
        let conn = db
            .connect()
            .map_err(|e| SqlConduitError::Connection(format!("turso connect error: {e}")))?;
        Ok(TursoSession { _db: db, conn })
    }
}

#[async_trait]
impl Connection for TursoSession {
    async fn query(&mut self, statement: &Statement<'_>) -> Result<RowSet, SqlConduitError> {
        reject_stored_procedure(statement)?;
        let mut stmt = self.conn.prepare(statement.sql).await?;
        let column_names: Vec<String> = stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();
        let rows = stmt.query(params::to_turso_params(statement.params)).await?;
        query::collect_rows(column_names, rows).await
    }

    async fn execute(&mut self, statement: &Statement<'_>) -> Result<u64, SqlConduitError> {
        reject_stored_procedure(statement)?;
        let affected = self
            .conn
            .execute(statement.sql, params::to_turso_params(statement.params))
            .await?;
        Ok(affected)
    }
}

fn reject_stored_procedure(statement: &Statement<'_>) -> Result<(), SqlConduitError> {
    if statement.kind == CommandKind::StoredProcedure {
        return Err(SqlConduitError::Unsupported(
            "Turso has no stored procedures".to_string(),
        ));
    }
    Ok(())
}

backend_facade!(crate::turso::Turso);
