//! Provider binding: the capability set every backend adapter satisfies.
//!
//! A backend is a zero-sized type-level selector ([`Backend`]) plus a live
//! session type ([`Connection`]). The executor is written once against these
//! two traits; each backend module supplies one small adapter.

use async_trait::async_trait;

use crate::error::SqlConduitError;
use crate::results::RowSet;
use crate::types::{BackendKind, CommandKind, SqlParam};

/// One request as the backend sees it: SQL text, command kind, and the bound
/// parameters in caller-supplied order. Immutable once execution begins.
#[derive(Debug, Clone, Copy)]
pub struct Statement<'a> {
    pub sql: &'a str,
    pub kind: CommandKind,
    pub params: &'a [SqlParam],
}

/// Type-level selector binding a logical backend kind to its concrete
/// connection machinery. Holds no state and performs no I/O beyond opening.
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// The live session type this backend produces.
    type Connection: Connection;

    /// Logical kind, for diagnostics.
    const KIND: BackendKind;

    /// Open a fresh native connection scoped to one call.
    ///
    /// # Errors
    /// Returns a connection failure when the string is invalid, the host is
    /// unreachable, or authentication is rejected.
    async fn open(connection_string: &str) -> Result<Self::Connection, SqlConduitError>;
}

/// A live backend session. Release is scope-exit `Drop`: the executor keeps
/// the connection local to one call, so it is dropped on every exit path,
/// success or failure, before anything reaches the caller.
#[async_trait]
pub trait Connection: Send {
    /// Execute a row-returning statement and fetch every row, preserving
    /// backend emission order.
    ///
    /// # Errors
    /// Propagates the native client's execute or fetch failure unchanged.
    async fn query(&mut self, statement: &Statement<'_>) -> Result<RowSet, SqlConduitError>;

    /// Execute a non-query statement and return the backend-reported
    /// affected-row count.
    ///
    /// # Errors
    /// Propagates the native client's execute failure unchanged.
    async fn execute(&mut self, statement: &Statement<'_>) -> Result<u64, SqlConduitError>;
}
