//! Chuck CLI library
//!
//! Argument parsing, configuration loading and command handlers for the
//! `chuck` binary.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use app::ChuckApp;
pub use cli::{Cli, Commands};
pub use config::AppConfig;
pub use error::{CliError, Result};
