//! Configuration for the Giudecca feature-service core.
//!
//! Settings are read from an INI file at `~/.giudecca/config.ini`. Every
//! value has a compiled-in default, so a missing file or a missing key is
//! never an error; a malformed value is.
//!
//! # Example
//!
//! ```
//! use giudecca::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.service.timeout, giudecca::config::DEFAULT_SERVICE_TIMEOUT_SECS);
//! assert!(config.endpoint("factories").is_none());
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, ServiceSettings};
