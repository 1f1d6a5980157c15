//! The generic command executor.
//!
//! One pipeline — open, bind, execute, materialize, release — written once
//! and instantiated per backend through the [`Backend`] provider binding.
//! Every entry point opens a connection scoped to the call and drops it on
//! every exit path; nothing is cached or shared between calls, and failures
//! propagate to the caller unchanged.

use std::future::Future;

use tracing::debug;

use crate::backend::{Backend, Connection, Statement};
use crate::error::SqlConduitError;
use crate::materialize::{FromRow, FromSqlValue};
use crate::results::DynamicRow;
use crate::types::{CommandKind, SqlParam, SqlValue};

/// Row-set execution with the default typed materializer: one `T` per fetched
/// row, in fetch order.
///
/// # Errors
/// Propagates open, execute, and fetch failures unchanged; field binding
/// failures surface as [`SqlConduitError::Materialization`].
pub async fn fetch_rows<B: Backend, T: FromRow>(
    connection_string: &str,
    sql: &str,
    params: &[SqlParam],
    kind: CommandKind,
) -> Result<Vec<T>, SqlConduitError> {
    fetch_rows_with::<B, T, _>(connection_string, sql, params, kind, T::from_row).await
}

/// Row-set execution with a caller-supplied row mapper.
///
/// # Errors
/// Propagates open, execute, and fetch failures unchanged, plus whatever the
/// mapper itself returns.
pub async fn fetch_rows_with<B, T, F>(
    connection_string: &str,
    sql: &str,
    params: &[SqlParam],
    kind: CommandKind,
    mut mapper: F,
) -> Result<Vec<T>, SqlConduitError>
where
    B: Backend,
    F: FnMut(&DynamicRow) -> Result<T, SqlConduitError>,
{
    let mut conn = open_connection::<B>(connection_string, sql).await?;
    let statement = Statement { sql, kind, params };
    let set = conn.query(&statement).await?;
    debug!(backend = ?B::KIND, rows = set.len(), "row-set fetched");
    let rows = set.into_dynamic();
    let mut out = Vec::with_capacity(rows.len());
    for row in &rows {
        out.push(mapper(row)?);
    }
    Ok(out)
}

/// Row-set execution in dynamic mode: one [`DynamicRow`] per fetched row,
/// every column exposed verbatim in emission order.
///
/// # Errors
/// Propagates open, execute, and fetch failures unchanged.
pub async fn fetch_dynamic<B: Backend>(
    connection_string: &str,
    sql: &str,
    params: &[SqlParam],
    kind: CommandKind,
) -> Result<Vec<DynamicRow>, SqlConduitError> {
    let mut conn = open_connection::<B>(connection_string, sql).await?;
    let statement = Statement { sql, kind, params };
    let set = conn.query(&statement).await?;
    debug!(backend = ?B::KIND, rows = set.len(), "row-set fetched");
    Ok(set.into_dynamic())
}

/// Scalar execution: the first column of the first row, coerced to `T`.
/// An empty result reads as NULL, so `Option<T>` targets yield `None` while
/// concrete targets fail with a scalar-coercion error.
///
/// # Errors
/// Propagates open and execute failures unchanged; a value that cannot
/// convert yields [`SqlConduitError::ScalarCoercion`].
pub async fn fetch_scalar<B: Backend, T: FromSqlValue>(
    connection_string: &str,
    sql: &str,
    params: &[SqlParam],
    kind: CommandKind,
) -> Result<T, SqlConduitError> {
    let mut conn = open_connection::<B>(connection_string, sql).await?;
    let statement = Statement { sql, kind, params };
    let set = conn.query(&statement).await?;
    let value = set.into_scalar().unwrap_or(SqlValue::Null);
    T::from_sql_value(value).map_err(|e| SqlConduitError::ScalarCoercion {
        found: e.found,
        target: e.target,
    })
}

/// Non-query execution: the backend-reported affected-row count. No row
/// materialization occurs.
///
/// # Errors
/// Propagates open and execute failures unchanged.
pub async fn execute<B: Backend>(
    connection_string: &str,
    sql: &str,
    params: &[SqlParam],
    kind: CommandKind,
) -> Result<u64, SqlConduitError> {
    let mut conn = open_connection::<B>(connection_string, sql).await?;
    let statement = Statement { sql, kind, params };
    let affected = conn.execute(&statement).await?;
    debug!(backend = ?B::KIND, affected, "statement executed");
    Ok(affected)
}

async fn open_connection<B: Backend>(
    connection_string: &str,
    sql: &str,
) -> Result<B::Connection, SqlConduitError> {
    debug!(backend = ?B::KIND, sql, "opening connection");
    B::open(connection_string).await
}

/// Blocking mirrors of the five execution shapes.
///
/// Each drives the async pipeline to completion on a private current-thread
/// runtime, so an identical request produces an identical result in either
/// mode. Must not be called from inside an async context.
pub mod blocking {
    use super::{
        Backend, CommandKind, DynamicRow, FromRow, FromSqlValue, SqlConduitError, SqlParam,
    };

    /// Blocking counterpart of [`fetch_rows`](super::fetch_rows).
    ///
    /// # Errors
    /// Identical to the async variant, plus a connection error when the
    /// runtime cannot be started.
    pub fn fetch_rows<B: Backend, T: FromRow>(
        connection_string: &str,
        sql: &str,
        params: &[SqlParam],
        kind: CommandKind,
    ) -> Result<Vec<T>, SqlConduitError> {
        run(super::fetch_rows::<B, T>(connection_string, sql, params, kind))
    }

    /// Blocking counterpart of [`fetch_rows_with`](super::fetch_rows_with).
    ///
    /// # Errors
    /// Identical to the async variant, plus a connection error when the
    /// runtime cannot be started.
    pub fn fetch_rows_with<B, T, F>(
        connection_string: &str,
        sql: &str,
        params: &[SqlParam],
        kind: CommandKind,
        mapper: F,
    ) -> Result<Vec<T>, SqlConduitError>
    where
        B: Backend,
        F: FnMut(&DynamicRow) -> Result<T, SqlConduitError>,
    {
        run(super::fetch_rows_with::<B, T, F>(
            connection_string,
            sql,
            params,
            kind,
            mapper,
        ))
    }

    /// Blocking counterpart of [`fetch_dynamic`](super::fetch_dynamic).
    ///
    /// # Errors
    /// Identical to the async variant, plus a connection error when the
    /// runtime cannot be started.
    pub fn fetch_dynamic<B: Backend>(
        connection_string: &str,
        sql: &str,
        params: &[SqlParam],
        kind: CommandKind,
    ) -> Result<Vec<DynamicRow>, SqlConduitError> {
        run(super::fetch_dynamic::<B>(connection_string, sql, params, kind))
    }

    /// Blocking counterpart of [`fetch_scalar`](super::fetch_scalar).
    ///
    /// # Errors
    /// Identical to the async variant, plus a connection error when the
    /// runtime cannot be started.
    pub fn fetch_scalar<B: Backend, T: FromSqlValue>(
        connection_string: &str,
        sql: &str,
        params: &[SqlParam],
        kind: CommandKind,
    ) -> Result<T, SqlConduitError> {
        run(super::fetch_scalar::<B, T>(connection_string, sql, params, kind))
    }

    /// Blocking counterpart of [`execute`](super::execute).
    ///
    /// # Errors
    /// Identical to the async variant, plus a connection error when the
    /// runtime cannot be started.
    pub fn execute<B: Backend>(
        connection_string: &str,
        sql: &str,
        params: &[SqlParam],
        kind: CommandKind,
    ) -> Result<u64, SqlConduitError> {
        run(super::execute::<B>(connection_string, sql, params, kind))
    }

    pub(crate) fn run<T>(
        fut: impl super::Future<Output = Result<T, SqlConduitError>>,
    ) -> Result<T, SqlConduitError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                SqlConduitError::Connection(format!("failed to start blocking runtime: {e}"))
            })?;
        runtime.block_on(fut)
    }
}
