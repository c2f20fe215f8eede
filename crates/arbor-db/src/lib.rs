pub mod posts;
pub mod refcodes;
pub mod schema;
pub mod tree;
pub mod users;

pub use posts::Posts;
pub use refcodes::RefcodeGate;
pub use users::Users;

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

use arbor_types::{ErrorReporter, StoreError};

use crate::tree::Tree;

/// Handle to the schemaless record store: one SQLite database holding JSON
/// documents addressed by (tree, key).
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        schema::init(&conn)?;

        info!("Record store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn tree(&self, name: &'static str) -> Tree<'_> {
        Tree::new(self, name)
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&conn)
    }
}

/// Outcome classification inside a store task: domain errors flow back to
/// the caller as-is, anything else is reported and masked as `Unavailable`.
pub(crate) enum OpError {
    Domain(StoreError),
    Internal(anyhow::Error),
}

impl From<StoreError> for OpError {
    fn from(e: StoreError) -> Self {
        Self::Domain(e)
    }
}

impl From<anyhow::Error> for OpError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl From<serde_json::Error> for OpError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.into())
    }
}

/// Run one adapter operation on the blocking pool. SQLite work must not sit
/// on the async runtime; every operation is a suspend point for the caller.
pub(crate) async fn run_op<T, F>(
    store: &Arc<Store>,
    reporter: &Arc<dyn ErrorReporter>,
    tag: &'static str,
    f: F,
) -> Result<T, StoreError>
where
    F: FnOnce(&Store) -> Result<T, OpError> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    match tokio::task::spawn_blocking(move || f(&store)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(OpError::Domain(err))) => Err(err),
        Ok(Err(OpError::Internal(err))) => {
            reporter.report(tag, &err);
            Err(StoreError::Unavailable { tag })
        }
        Err(err) => {
            reporter.report(tag, &anyhow::anyhow!("store task failed: {}", err));
            Err(StoreError::Unavailable { tag })
        }
    }
}
