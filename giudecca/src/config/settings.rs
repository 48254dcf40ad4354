//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::coord::MapBounds;
use crate::factory::FactoryKeys;
use crate::filter::RelationalFilters;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Feature service connection settings
    pub service: ServiceSettings,
    /// Layer name to feature layer URL
    pub endpoints: BTreeMap<String, String>,
    /// Geographic bounds and size of the map image
    pub map: MapBounds,
    /// Attribute key names of the factories layer
    pub attributes: FactoryKeys,
    /// Data-explorer filters backed by an over-time layer
    pub relational_filters: RelationalFilters,
    /// Logging settings
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// URL of the feature layer registered under `layer`.
    pub fn endpoint(&self, layer: &str) -> Option<&str> {
        self.endpoints.get(layer).map(String::as_str)
    }
}

/// Feature service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    /// Opaque API token passed to the feature service
    pub api_token: Option<String>,
    /// Timeout in seconds for HTTP requests.
    pub timeout: u64,
    /// Maximum per-factory lookups in flight.
    pub max_concurrent_lookups: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory holding the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
