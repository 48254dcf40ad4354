//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`factories`] - Hydrated factories with map positions
//! - [`features`] - Raw feature records of a layer
//! - [`filter`] - Client-side attribute filters
//! - [`images`] - Attachment URLs per factory
//! - [`project`] - Coordinate projection
//! - [`timeline`] - Factories active in a year

pub mod common;
pub mod config;
pub mod factories;
pub mod features;
pub mod filter;
pub mod images;
pub mod project;
pub mod timeline;
