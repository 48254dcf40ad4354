//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::{Ini, Properties};
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{CoordError, MapBounds};
use crate::filter::RelationalFilters;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [service] section
    if let Some(section) = ini.section(Some("service")) {
        if let Some(v) = section.get("api_token") {
            let v = v.trim();
            if !v.is_empty() {
                config.service.api_token = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("timeout") {
            config.service.timeout = parse_positive(v).ok_or_else(|| {
                invalid("service", "timeout", v, "must be a positive integer (seconds)")
            })?;
        }
        if let Some(v) = section.get("max_concurrent_lookups") {
            config.service.max_concurrent_lookups = parse_positive(v).ok_or_else(|| {
                invalid("service", "max_concurrent_lookups", v, "must be a positive integer")
            })?;
        }
    }

    // [endpoints] section
    if let Some(section) = ini.section(Some("endpoints")) {
        for (layer, url) in section.iter() {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                continue;
            }
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid("endpoints", layer, url, "must be an http(s) URL"));
            }
            config.endpoints.insert(layer.to_string(), url.to_string());
        }
    }

    // [map] section
    if let Some(section) = ini.section(Some("map")) {
        config.map = parse_map(section, &config.map)?;
    }

    // [attributes] section
    if let Some(section) = ini.section(Some("attributes")) {
        let keys = &mut config.attributes;
        let fields = [
            ("factory_id", &mut keys.factory_id),
            ("object_id", &mut keys.object_id),
            ("english_name", &mut keys.english_name),
            ("italian_name", &mut keys.italian_name),
            ("opening_year", &mut keys.opening_year),
            ("closing_year", &mut keys.closing_year),
            ("latitude", &mut keys.latitude),
            ("longitude", &mut keys.longitude),
        ];
        for (key, field) in fields {
            if let Some(v) = section.get(key) {
                let v = v.trim();
                if v.is_empty() {
                    return Err(invalid("attributes", key, v, "must not be empty"));
                }
                *field = v.to_string();
            }
        }
    }

    // [relational_filters] section replaces the built-in mapping
    if let Some(section) = ini.section(Some("relational_filters")) {
        let mut filters = RelationalFilters::empty();
        for (filter, layer) in section.iter() {
            let layer = layer.trim();
            if !layer.is_empty() {
                filters.insert(filter, layer);
            }
        }
        config.relational_filters = filters;
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_map(section: &Properties, defaults: &MapBounds) -> Result<MapBounds, ConfigFileError> {
    let number = |key: &str, default: f64| -> Result<f64, ConfigFileError> {
        match section.get(key) {
            Some(v) => v
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid("map", key, v, "must be a finite number")),
            None => Ok(default),
        }
    };

    let min_lat = number("min_lat", defaults.min_lat())?;
    let max_lat = number("max_lat", defaults.max_lat())?;
    let min_lon = number("min_lon", defaults.min_lon())?;
    let max_lon = number("max_lon", defaults.max_lon())?;
    let width = number("width", defaults.width())?;
    let height = number("height", defaults.height())?;

    MapBounds::new(min_lat, max_lat, min_lon, max_lon, width, height).map_err(|e| {
        let (key, value) = match &e {
            CoordError::InvalidLatitudeRange { min_lat, max_lat } => {
                ("max_lat", format!("{} .. {}", min_lat, max_lat))
            }
            CoordError::InvalidLongitudeRange { min_lon, max_lon } => {
                ("max_lon", format!("{} .. {}", min_lon, max_lon))
            }
            CoordError::InvalidMapSize { width, height } => {
                ("width", format!("{}x{}", width, height))
            }
        };
        invalid("map", key, &value, &e.to_string())
    })
}

fn parse_positive<T>(value: &str) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .trim()
        .parse::<T>()
        .ok()
        .filter(|n| *n > T::default())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
