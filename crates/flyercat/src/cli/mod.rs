//! Command handlers for the flyercat CLI.

pub mod build;
pub mod config;
