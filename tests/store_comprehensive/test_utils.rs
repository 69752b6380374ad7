//! Shared helpers for the comprehensive suite.

use std::sync::Arc;
use std::time::Duration;

use stashdb::{Key, MemoryEngine, Stash, StoreConfig, TableSpec};

/// Install a test tracing subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Stash over a fresh in-process engine.
pub fn stash() -> Stash {
    init_tracing();
    Stash::in_memory()
}

/// Stash whose engine delays lifecycle transitions, for poll-loop tests.
pub fn slow_stash(delay: Duration) -> Stash {
    init_tracing();
    Stash::with_engine(
        Arc::new(MemoryEngine::with_activation_delay(delay)),
        StoreConfig::default(),
    )
}

/// A `t1`-style table with a string partition key `id`, created and active.
pub fn active_table(stash: &Stash, name: &str) -> TableSpec {
    let spec = TableSpec::simple(name, "id");
    stash.tables().ensure_exists(&spec).unwrap();
    spec
}

/// Single-attribute string key.
pub fn string_key(name: &str, value: &str) -> Key {
    let mut key = Key::new();
    key.insert(name.to_string(), value.into());
    key
}
