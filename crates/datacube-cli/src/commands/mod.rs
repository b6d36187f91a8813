//! Subcommand implementations.

pub mod collection;
pub mod config;
pub mod database;
pub mod document;

mod input;
