//! The `Factory` entity and the attribute keys it is read from.

use crate::coord::{MapBounds, PixelCoord};
use crate::feature::{FeatureRecord, OBJECT_ID_KEY};
use serde::Serialize;

use super::HydrationError;

/// Attribute key names of the factories layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryKeys {
    pub factory_id: String,
    pub object_id: String,
    pub english_name: String,
    pub italian_name: String,
    pub opening_year: String,
    pub closing_year: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for FactoryKeys {
    fn default() -> Self {
        Self {
            factory_id: "Factory_ID".to_string(),
            object_id: OBJECT_ID_KEY.to_string(),
            english_name: "English_Name".to_string(),
            italian_name: "Italian_Name".to_string(),
            opening_year: "Opening_Year".to_string(),
            closing_year: "Closing_Year".to_string(),
            latitude: "Latitude".to_string(),
            longitude: "Longitude".to_string(),
        }
    }
}

/// Display language for factory names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Italian,
}

/// Geographic location in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// One industrial site.
///
/// `position` is `Some` exactly when `location` is: it is the location
/// projected onto the map image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factory {
    pub factory_id: i64,
    pub object_id: Option<i64>,
    pub english_name: Option<String>,
    pub italian_name: Option<String>,
    pub opening_year: Option<i32>,
    pub closing_year: Option<i32>,
    pub location: Option<GeoLocation>,
    pub position: Option<PixelCoord>,
}

impl Factory {
    /// Reads the attribute-derived fields of a factory.
    ///
    /// Only the factory id is required; every other attribute that is
    /// missing or malformed is left as `None`. Location and position are
    /// filled in by hydration.
    pub fn from_record(record: &FeatureRecord, keys: &FactoryKeys) -> Result<Self, HydrationError> {
        let factory_id =
            record
                .integer(&keys.factory_id)
                .ok_or_else(|| HydrationError::MissingAttribute {
                    key: keys.factory_id.clone(),
                })?;

        let year = |key: &str| {
            record
                .integer(key)
                .and_then(|y| i32::try_from(y).ok())
        };

        Ok(Self {
            factory_id,
            object_id: record.integer(&keys.object_id),
            english_name: record.text(&keys.english_name).map(str::to_string),
            italian_name: record.text(&keys.italian_name).map(str::to_string),
            opening_year: year(&keys.opening_year),
            closing_year: year(&keys.closing_year),
            location: None,
            position: None,
        })
    }

    /// Sets the location and projects it onto the map.
    pub fn set_location(&mut self, lat: f64, lon: f64, bounds: &MapBounds) {
        self.location = Some(GeoLocation { lat, lon });
        self.position = Some(bounds.project(lat, lon));
    }

    /// Name in the requested language, falling back to the other one.
    pub fn display_name(&self, language: Language) -> Option<&str> {
        let (preferred, other) = match language {
            Language::English => (&self.english_name, &self.italian_name),
            Language::Italian => (&self.italian_name, &self.english_name),
        };
        preferred.as_deref().or(other.as_deref())
    }

    /// Whether the factory was operating during `year`.
    ///
    /// A factory with no opening year is never considered active; one with
    /// no closing year is still active.
    pub fn is_active_in(&self, year: i32) -> bool {
        match self.opening_year {
            Some(opening) => opening <= year && self.closing_year.map_or(true, |c| c >= year),
            None => false,
        }
    }
}
