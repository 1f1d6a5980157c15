//! PostgreSQL backend: provider binding over `tokio-postgres` plus the thin
//! facade surface.
//!
//! Each call opens its own client with `tokio_postgres::connect`; the
//! background connection task is spawned onto the ambient runtime and winds
//! down when the client drops at the end of the call.

mod params;
mod query;

use std::borrow::Cow;

use async_trait::async_trait;
use tracing::warn;

use crate::backend::{Backend, Connection, Statement};
use crate::error::SqlConduitError;
use crate::facade::backend_facade;
use crate::results::RowSet;
use crate::types::{BackendKind, CommandKind};

use params::PgParams;

/// Provider binding for PostgreSQL.
pub struct Postgres;

/// One live Postgres client, scoped to a single call.
pub struct PgSession {
    client: tokio_postgres::Client,
}

#[async_trait]
impl Backend for Postgres {
    type Connection = PgSession;

    const KIND: BackendKind = BackendKind::Postgres;

    async fn open(connection_string: &str) -> Result<Self::Connection, SqlConduitError> {
        let (client, connection) =
            tokio_postgres::connect(connection_string, tokio_postgres::NoTls).await?;
        // The connection task ends on its own once the client drops.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                warn!(error = %e, "postgres connection task ended with error");
            }
        });
        Ok(PgSession { client })
    }
}

#[async_trait]
impl Connection for PgSession {
    async fn query(&mut self, statement: &Statement<'_>) -> Result<RowSet, SqlConduitError> {
        let sql = render_sql(statement);
        let prepared = self.client.prepare(&sql).await?;
        let bound = PgParams::bind(statement.params);
        let rows = self.client.query(&prepared, bound.as_refs()).await?;
        query::collect_rows(&prepared, &rows)
    }

    async fn execute(&mut self, statement: &Statement<'_>) -> Result<u64, SqlConduitError> {
        let sql = render_sql(statement);
        let bound = PgParams::bind(statement.params);
        let affected = self.client.execute(sql.as_ref(), bound.as_refs()).await?;
        Ok(affected)
    }
}

/// For stored routines the SQL text is the routine name; render the
/// Postgres invocation with positional placeholders.
fn render_sql<'a>(statement: &Statement<'a>) -> Cow<'a, str> {
    match statement.kind {
        CommandKind::Text => Cow::Borrowed(statement.sql),
        CommandKind::StoredProcedure => {
            let placeholders: Vec<String> = (1..=statement.params.len())
                .map(|i| format!("${i}"))
                .collect();
            Cow::Owned(format!(
                "CALL {}({})",
                statement.sql,
                placeholders.join(", ")
            ))
        }
    }
}

backend_facade!(crate::postgres::Postgres);
