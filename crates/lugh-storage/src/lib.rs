//! Lugh Storage - Node factory and statement bridge
//!
//! This crate provides the factory through which graphs are created, the
//! in-memory implementation, import of subject–predicate–object statements
//! into graphs, and Turtle / N-Triples text formats.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod format;
pub mod import;
pub mod memory;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use format::{read_ntriples, read_path, read_turtle, write_ntriples, write_turtle, RdfFormat};
pub use import::import_statements;
pub use memory::MemoryStorage;
pub use traits::Storage;
