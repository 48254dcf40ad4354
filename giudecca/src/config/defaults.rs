//! Default values and constants for all configuration settings.

use std::collections::BTreeMap;

use super::file::config_directory;
use super::settings::*;
use crate::coord::MapBounds;
use crate::factory::{FactoryKeys, DEFAULT_MAX_CONCURRENT_LOOKUPS};
use crate::filter::RelationalFilters;
use crate::service::DEFAULT_TIMEOUT_SECS;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = DEFAULT_TIMEOUT_SECS;

/// Name of the configuration directory under the home directory.
pub const CONFIG_DIR_NAME: &str = ".giudecca";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "giudecca.log";

/// Endpoint key of the factories layer.
pub const FACTORIES_LAYER: &str = "factories";

/// Endpoint key of the time periods layer.
pub const TIMEPERIODS_LAYER: &str = "timeperiods";

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            timeout: DEFAULT_SERVICE_TIMEOUT_SECS,
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            service: ServiceSettings::default(),
            endpoints: BTreeMap::new(),
            map: MapBounds::default(),
            attributes: FactoryKeys::default(),
            relational_filters: RelationalFilters::default(),
            logging: LoggingSettings::default(),
        }
    }
}
