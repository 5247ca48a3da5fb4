//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`serve`] - Run the HTTP tile server
//! - [`tile`] - Compose a single tile to a file
//! - [`capabilities`] - Print a dataset's extent and year span
//! - [`config`] - Configuration management (init, path, show)

pub mod capabilities;
pub mod config;
pub mod dataset;
pub mod serve;
pub mod tile;
