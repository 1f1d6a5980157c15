//! SQL Server backend: provider binding over `tiberius` plus the thin
//! facade surface.
//!
//! The connection string is an ADO.NET-style string understood by
//! `tiberius::Config::from_ado_string`; each call resolves the address,
//! opens a TCP stream, and hands it to tiberius through the tokio
//! compatibility shim.

mod params;
mod query;

use std::borrow::Cow;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::backend::{Backend, Connection, Statement};
use crate::error::SqlConduitError;
use crate::facade::backend_facade;
use crate::results::RowSet;
use crate::types::{BackendKind, CommandKind};

/// Provider binding for SQL Server.
pub struct Mssql;

/// One live tiberius client, scoped to a single call.
pub struct MssqlSession {
    client: tiberius::Client<Compat<TcpStream>>,
}

#[async_trait]
impl Backend for Mssql {
    type Connection = MssqlSession;

    const KIND: BackendKind = BackendKind::Mssql;

    async fn open(connection_string: &str) -> Result<Self::Connection, SqlConduitError> {
        let config = tiberius::Config::from_ado_string(connection_string)?;
        let tcp = TcpStream::connect(config.get_addr()).await.map_err(|e| {
            SqlConduitError::Connection(format!("sql server tcp connection error: {e}"))
        })?;
        tcp.set_nodelay(true).map_err(|e| {
            SqlConduitError::Connection(format!("sql server tcp configuration error: {e}"))
        })?;
        let client = tiberius::Client::connect(config, tcp.compat_write()).await?;
        Ok(MssqlSession { client })
    }
}

#[async_trait]
impl Connection for MssqlSession {
    async fn query(&mut self, statement: &Statement<'_>) -> Result<RowSet, SqlConduitError> {
        let sql = render_sql(statement);
        let bound = params::bind_params(&sql, statement.params);
        let stream = bound.query(&mut self.client).await?;
        query::collect_rows(stream).await
    }

    async fn execute(&mut self, statement: &Statement<'_>) -> Result<u64, SqlConduitError> {
        let sql = render_sql(statement);
        let bound = params::bind_params(&sql, statement.params);
        let result = bound.execute(&mut self.client).await?;
        Ok(result.rows_affected().iter().sum())
    }
}

/// For stored routines the SQL text is the routine name; render the T-SQL
/// invocation with positional placeholders.
fn render_sql<'a>(statement: &Statement<'a>) -> Cow<'a, str> {
    match statement.kind {
        CommandKind::Text => Cow::Borrowed(statement.sql),
        CommandKind::StoredProcedure => {
            let placeholders: Vec<String> = (1..=statement.params.len())
                .map(|i| format!("@P{i}"))
                .collect();
            Cow::Owned(format!("EXEC {} {}", statement.sql, placeholders.join(", ")))
        }
    }
}

backend_facade!(crate::mssql::Mssql);
