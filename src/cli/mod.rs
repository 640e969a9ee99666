//! CLI command handlers

pub mod commands;

pub use commands::{analyze, inspect, lookup, normalize};
