//! CLI command implementations

pub mod completions;
pub mod config;
pub mod convert;
pub mod find;
pub mod show;
