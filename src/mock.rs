//! Instrumented in-memory backend for tests.
//!
//! A [`MockDatabase`] registers scripted results under a connection-string
//! name and counts open/close events, so tests can assert the engine's
//! resource discipline: exactly one open and one close per call, on success
//! and on failure alike. [`MockBackend`] is the provider binding; the
//! handle's name is the connection string.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::backend::{Backend, Connection, Statement};
use crate::error::SqlConduitError;
use crate::results::RowSet;
use crate::types::{BackendKind, SqlValue};

static REGISTRY: LazyLock<Mutex<HashMap<String, Arc<MockState>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[derive(Debug, Clone)]
enum Script {
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<SqlValue>>,
    },
    Affected(u64),
    Fail(String),
}

#[derive(Debug, Default)]
struct MockState {
    scripts: Mutex<HashMap<String, Script>>,
    opens: AtomicUsize,
    closes: AtomicUsize,
    fail_next_open: AtomicBool,
}

/// Handle to one scripted database. Dropping the handle unregisters it.
#[derive(Debug)]
pub struct MockDatabase {
    name: String,
    state: Arc<MockState>,
}

impl MockDatabase {
    /// Register a scripted database under `name`; pass the same name as the
    /// connection string when executing against [`MockBackend`].
    #[must_use]
    pub fn install(name: &str) -> Self {
        let state = Arc::new(MockState::default());
        lock(&REGISTRY).insert(name.to_string(), state.clone());
        Self {
            name: name.to_string(),
            state,
        }
    }

    /// The connection string that reaches this database.
    #[must_use]
    pub fn connection_string(&self) -> &str {
        &self.name
    }

    /// Script a row-returning result for an exact SQL text.
    pub fn script_rows(&self, sql: &str, columns: &[&str], rows: Vec<Vec<SqlValue>>) {
        lock(&self.state.scripts).insert(
            sql.to_string(),
            Script::Rows {
                columns: columns.iter().map(|c| (*c).to_string()).collect(),
                rows,
            },
        );
    }

    /// Script an affected-row count for an exact SQL text.
    pub fn script_affected(&self, sql: &str, affected: u64) {
        lock(&self.state.scripts).insert(sql.to_string(), Script::Affected(affected));
    }

    /// Script an execution failure for an exact SQL text.
    pub fn script_failure(&self, sql: &str, message: &str) {
        lock(&self.state.scripts).insert(sql.to_string(), Script::Fail(message.to_string()));
    }

    /// Make the next open attempt fail with a connection error.
    pub fn fail_next_open(&self) {
        self.state.fail_next_open.store(true, Ordering::SeqCst);
    }

    /// Number of connections opened so far.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.state.opens.load(Ordering::SeqCst)
    }

    /// Number of connections closed so far.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

impl Drop for MockDatabase {
    fn drop(&mut self) {
        lock(&REGISTRY).remove(&self.name);
    }
}

/// Provider binding for the mock backend.
pub struct MockBackend;

/// One "connection" to a scripted database; close is observed on drop.
pub struct MockConnection {
    state: Arc<MockState>,
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Backend for MockBackend {
    type Connection = MockConnection;

    const KIND: BackendKind = BackendKind::Mock;

    async fn open(connection_string: &str) -> Result<Self::Connection, SqlConduitError> {
        let state = lock(&REGISTRY)
            .get(connection_string)
            .cloned()
            .ok_or_else(|| {
                SqlConduitError::Connection(format!(
                    "no mock database named '{connection_string}'"
                ))
            })?;
        if state.fail_next_open.swap(false, Ordering::SeqCst) {
            return Err(SqlConduitError::Connection(
                "scripted open failure".to_string(),
            ));
        }
        state.opens.fetch_add(1, Ordering::SeqCst);
        Ok(MockConnection { state })
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn query(&mut self, statement: &Statement<'_>) -> Result<RowSet, SqlConduitError> {
        match self.script_for(statement.sql)? {
            Script::Rows { columns, rows } => {
                let mut set = RowSet::with_capacity(columns, rows.len());
                for row in rows {
                    set.push_row(row);
                }
                Ok(set)
            }
            Script::Affected(_) => Err(SqlConduitError::Execution(format!(
                "'{}' is scripted as a non-query statement",
                statement.sql
            ))),
            Script::Fail(message) => Err(SqlConduitError::Execution(message)),
        }
    }

    async fn execute(&mut self, statement: &Statement<'_>) -> Result<u64, SqlConduitError> {
        match self.script_for(statement.sql)? {
            Script::Affected(n) => Ok(n),
            Script::Rows { .. } => Err(SqlConduitError::Execution(format!(
                "'{}' is scripted as a row-returning statement",
                statement.sql
            ))),
            Script::Fail(message) => Err(SqlConduitError::Execution(message)),
        }
    }
}

impl MockConnection {
    fn script_for(&self, sql: &str) -> Result<Script, SqlConduitError> {
        lock(&self.state.scripts).get(sql).cloned().ok_or_else(|| {
            SqlConduitError::Execution(format!("no scripted result for '{sql}'"))
        })
    }
}
