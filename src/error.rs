use thiserror::Error;

/// Unified error type for every engine operation.
///
/// Native client failures are wrapped transparently so callers see the
/// original backend error signal; the engine adds no context and never
/// retries. The remaining variants cover the engine's own failure points:
/// connection establishment, statement execution, scalar coercion, and
/// typed-row materialization.
#[derive(Debug, Error)]
pub enum SqlConduitError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    Mssql(#[from] tiberius::error::Error),

    #[cfg(feature = "turso")]
    #[error(transparent)]
    Turso(#[from] turso::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("statement execution error: {0}")]
    Execution(String),

    #[error("cannot read {found} value as {target}")]
    ScalarCoercion {
        found: &'static str,
        target: &'static str,
    },

    #[error("cannot materialize column '{column}' ({found}) into {target}")]
    Materialization {
        column: String,
        found: &'static str,
        target: &'static str,
    },

    #[error("unsupported operation: {0}")]
    Unsupported(String),
}
