//! Storage layer
//!
//! Durable key-value persistence of the shelf collections, one JSON file per
//! shelf key. Writes are atomic; reads are defensive (missing or corrupt data
//! degrades to an empty shelf).

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::ShelfPersistence;
