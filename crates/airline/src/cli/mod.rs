//! CLI command handlers

pub mod config;
pub mod error;
pub mod session;
