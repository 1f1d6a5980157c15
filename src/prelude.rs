//! Convenience re-exports for callers.
//!
//! ```
//! use sql_conduit::prelude::*;
//! ```

pub use crate::backend::{Backend, Connection, Statement};
pub use crate::error::SqlConduitError;
pub use crate::materialize::{FromRow, FromSqlValue};
pub use crate::results::{DynamicRow, RowSet};
pub use crate::types::{BackendKind, CommandKind, SqlParam, SqlValue};

pub use crate::impl_from_row;

#[cfg(feature = "mssql")]
pub use crate::mssql;
#[cfg(feature = "postgres")]
pub use crate::postgres;
#[cfg(feature = "sqlite")]
pub use crate::sqlite;
#[cfg(feature = "turso")]
pub use crate::turso;
