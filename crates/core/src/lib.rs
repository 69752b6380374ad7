//! Core types for the stash item store
//!
//! - `value`: attribute-typed storage values and the JSON codec
//! - `table`: table specs, key schemas, lifecycle status
//! - `error`: the shared error taxonomy
//! - `config`: environment-driven configuration

pub mod config;
pub mod error;
pub mod table;
pub mod value;

pub use config::StoreConfig;
pub use error::{Result, StashError};
pub use table::{
    BillingMode, KeyDefinition, KeySchema, KeyType, TableDescription, TableSpec, TableStatus,
};
pub use value::{item_from_json, item_to_json, Attr, Item, Key, Number};
