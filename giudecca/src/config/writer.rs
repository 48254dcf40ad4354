//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::fmt::Write;
use std::path::Path;

use super::defaults::{FACTORIES_LAYER, TIMEPERIODS_LAYER};
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_token = config.service.api_token.as_deref().unwrap_or("");
    let map = &config.map;
    let keys = &config.attributes;

    let mut out = format!(
        r#"[service]
; Opaque API token sent to the feature service as the `token` parameter.
; Leave empty for public layers.
api_token = {}
; Timeout in seconds for HTTP requests (default: 30)
timeout = {}
; Maximum per-factory lookups in flight while hydrating (default: 16)
max_concurrent_lookups = {}

[endpoints]
; Feature layer URLs by layer name, e.g.
; {} = https://services.arcgis.com/<org>/arcgis/rest/services/<service>/FeatureServer/0
; {} = ...
"#,
        api_token,
        config.service.timeout,
        config.service.max_concurrent_lookups,
        FACTORIES_LAYER,
        TIMEPERIODS_LAYER,
    );

    for (layer, url) in &config.endpoints {
        let _ = writeln!(out, "{} = {}", layer, url);
    }

    let _ = write!(
        out,
        r#"
[map]
; Geographic bounds of the map image in WGS84 degrees
min_lat = {}
max_lat = {}
min_lon = {}
max_lon = {}
; Map image size in pixels
width = {}
height = {}

[attributes]
; Attribute names of the factories layer
factory_id = {}
object_id = {}
english_name = {}
italian_name = {}
opening_year = {}
closing_year = {}
latitude = {}
longitude = {}

[relational_filters]
; Data-explorer filter name = layer holding its values over time.
; When this section is present it replaces the built-in mapping.
"#,
        map.min_lat(),
        map.max_lat(),
        map.min_lon(),
        map.max_lon(),
        map.width(),
        map.height(),
        keys.factory_id,
        keys.object_id,
        keys.english_name,
        keys.italian_name,
        keys.opening_year,
        keys.closing_year,
        keys.latitude,
        keys.longitude,
    );

    for (filter, layer) in config.relational_filters.iter() {
        let _ = writeln!(out, "{} = {}", filter, layer);
    }

    let _ = write!(
        out,
        r#"
[logging]
; Directory and file name of the log file
directory = {}
file = {}
"#,
        path_to_string(&config.logging.directory),
        config.logging.file,
    );

    out
}

/// Format a path, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
