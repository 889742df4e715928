//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`cover`] - Coverage of a single disc
//! - [`init`] - Configuration initialization
//! - [`run`] - Main command (targets, coverage, download)

pub mod common;
pub mod cover;
pub mod init;
pub mod run;
