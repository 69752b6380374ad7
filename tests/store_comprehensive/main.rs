//! Store comprehensive test suite
//!
//! End-to-end verification of the public API through the `Stash` handle:
//! value codec exactness, table lifecycle (including the concurrent
//! ensure-exists race), item semantics, and the memory record layer.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test store_comprehensive
//! ```

mod test_utils;

mod item_semantics;
mod memory_records;
mod table_lifecycle;
