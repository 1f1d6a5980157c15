//! Provider-agnostic SQL execution: one open → bind → execute → materialize →
//! release pipeline, instantiated per backend, in async and blocking flavors.

pub mod backend;
pub mod error;
pub mod executor;
pub mod materialize;
pub mod results;
pub mod types;

mod facade;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "turso")]
pub mod turso;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub mod prelude;

pub use backend::{Backend, Connection, Statement};
pub use error::SqlConduitError;
pub use materialize::{CoercionError, FromRow, FromSqlValue};
pub use results::{DynamicRow, RowSet};
pub use types::{BackendKind, CommandKind, SqlParam, SqlValue};
