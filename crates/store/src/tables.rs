//! Table lifecycle manager
//!
//! Stateless facade over the engine handle. Holds no table-status cache:
//! every ensure_exists re-queries the engine, so concurrent callers always
//! act on what the engine reports, not on stale local state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use stash_core::{Result, StashError, TableDescription, TableSpec, TableStatus};
use stash_engine::StorageEngine;

use crate::DEFAULT_CREATE_TIMEOUT;

/// Initial poll interval for the activation wait.
const BACKOFF_INITIAL: Duration = Duration::from_millis(50);

/// Poll interval ceiling.
const BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Table lifecycle operations: describe, list, create, delete, and the
/// idempotent ensure_exists.
///
/// # Thread Safety
///
/// Clone is cheap (Arc clone); instances sharing an engine see the same
/// tables.
#[derive(Clone)]
pub struct TableManager {
    engine: Arc<dyn StorageEngine>,
    create_timeout: Duration,
}

impl TableManager {
    /// New manager with the default 60s ensure_exists ceiling.
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self {
            engine,
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }

    /// Override the ensure_exists wait ceiling.
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    /// Current description and status. Fails `TableNotFound` if absent.
    pub fn describe(&self, name: &str) -> Result<TableDescription> {
        self.engine.describe_table(name)
    }

    /// Names of all tables in the target environment.
    pub fn list(&self) -> Result<Vec<String>> {
        self.engine.list_tables()
    }

    /// Begin asynchronous creation. Fails `TableAlreadyExists` if present;
    /// callers building idempotent flows treat that as success-equivalent.
    pub fn create(&self, spec: &TableSpec) -> Result<TableDescription> {
        tracing::info!(table = %spec.name, "creating table");
        self.engine.create_table(spec)
    }

    /// Begin asynchronous deletion. Fails `TableNotFound` if absent.
    pub fn delete(&self, name: &str) -> Result<TableDescription> {
        tracing::info!(table = %name, "deleting table");
        self.engine.delete_table(name)
    }

    /// Create the table if absent, then block until it is `Active`.
    ///
    /// Safe to call concurrently for the same name: at most one creation is
    /// issued; a caller losing the race observes `TableAlreadyExists` from
    /// create, treats it as benign, and waits for `Active` like the winner.
    /// A table observed `Deleting` (or deleted out from under the wait) is
    /// re-created once it goes absent, so the call still converges on an
    /// `Active` table. Fails `TableCreateTimeout` when the table has not
    /// activated within the configured ceiling.
    pub fn ensure_exists(&self, spec: &TableSpec) -> Result<TableDescription> {
        let started = Instant::now();
        let deadline = started + self.create_timeout;

        match self.engine.describe_table(&spec.name) {
            Ok(d) if d.status == TableStatus::Active => return Ok(d),
            Ok(d) => {
                tracing::debug!(table = %spec.name, status = ?d.status, "table pending, waiting");
            }
            Err(StashError::TableNotFound { .. }) => self.begin_create(spec)?,
            Err(e) => return Err(e),
        }

        self.wait_for_active(spec, started, deadline)
    }

    /// Issue create, treating a lost creation race as benign.
    fn begin_create(&self, spec: &TableSpec) -> Result<()> {
        match self.engine.create_table(spec) {
            Ok(_) => Ok(()),
            Err(StashError::TableAlreadyExists { .. }) => {
                // The winner's table is the one we wait for
                tracing::debug!(table = %spec.name, "table created concurrently");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Poll describe with bounded exponential backoff until `Active`,
    /// re-issuing create whenever the table is observed absent.
    fn wait_for_active(
        &self,
        spec: &TableSpec,
        started: Instant,
        deadline: Instant,
    ) -> Result<TableDescription> {
        let mut backoff = BACKOFF_INITIAL;
        loop {
            match self.engine.describe_table(&spec.name) {
                Ok(d) if d.status == TableStatus::Active => {
                    tracing::info!(
                        table = %spec.name,
                        waited_ms = started.elapsed().as_millis() as u64,
                        "table active"
                    );
                    return Ok(d);
                }
                // Creating or Deleting: keep polling
                Ok(_) => {}
                // Absent: either our create is not yet visible, or a
                // concurrent delete completed; create is benign either way
                Err(StashError::TableNotFound { .. }) => self.begin_create(spec)?,
                Err(e) if e.is_retryable() => {
                    tracing::debug!(table = %spec.name, error = %e, "retryable describe failure");
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(StashError::TableCreateTimeout {
                    table: spec.name.clone(),
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            let remaining = deadline - now;
            std::thread::sleep(backoff.min(remaining));
            backoff = (backoff * 2).min(BACKOFF_MAX);
        }
    }
}
