//! Coordinate type definitions

use serde::Serialize;
use std::fmt;

/// Southern edge of the Giudecca map image.
pub const DEFAULT_MIN_LAT: f64 = 45.4215;
/// Northern edge of the Giudecca map image.
pub const DEFAULT_MAX_LAT: f64 = 45.4310;

/// Western edge of the Giudecca map image.
pub const DEFAULT_MIN_LON: f64 = 12.3000;
/// Eastern edge of the Giudecca map image.
pub const DEFAULT_MAX_LON: f64 = 12.3450;

/// Pixel width of the map image.
pub const DEFAULT_MAP_WIDTH: f64 = 2000.0;
/// Pixel height of the map image.
pub const DEFAULT_MAP_HEIGHT: f64 = 600.0;

/// Position on the map image in pixels.
///
/// Origin is the top-left corner: x grows eastwards, y grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelCoord {
    pub x: f64,
    pub y: f64,
}

impl PixelCoord {
    /// Returns true if the position falls on the visible canvas.
    pub fn is_within(&self, bounds: &MapBounds) -> bool {
        (0.0..=bounds.width()).contains(&self.x) && (0.0..=bounds.height()).contains(&self.y)
    }
}

/// Geographic rectangle mapped linearly onto a fixed-size map image.
///
/// Constructed once from configuration and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
    width: f64,
    height: f64,
}

impl MapBounds {
    /// Creates bounds from a geographic rectangle and the map image size.
    ///
    /// # Errors
    ///
    /// Returns an error if either range is empty or inverted, or if the
    /// image size is not strictly positive.
    pub fn new(
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
        width: f64,
        height: f64,
    ) -> Result<Self, CoordError> {
        // Negated comparisons also reject NaN
        if !(min_lat < max_lat) {
            return Err(CoordError::InvalidLatitudeRange { min_lat, max_lat });
        }
        if !(min_lon < max_lon) {
            return Err(CoordError::InvalidLongitudeRange { min_lon, max_lon });
        }
        if !(width > 0.0 && height > 0.0) {
            return Err(CoordError::InvalidMapSize { width, height });
        }

        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
            width,
            height,
        })
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    /// Map image width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Map image height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Latitude span in degrees.
    pub fn delta_lat(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn delta_lon(&self) -> f64 {
        self.max_lon - self.min_lon
    }
}

impl Default for MapBounds {
    fn default() -> Self {
        Self {
            min_lat: DEFAULT_MIN_LAT,
            max_lat: DEFAULT_MAX_LAT,
            min_lon: DEFAULT_MIN_LON,
            max_lon: DEFAULT_MAX_LON,
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
        }
    }
}

/// Errors that can occur when building map bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Minimum latitude is not below maximum latitude
    InvalidLatitudeRange { min_lat: f64, max_lat: f64 },
    /// Minimum longitude is not below maximum longitude
    InvalidLongitudeRange { min_lon: f64, max_lon: f64 },
    /// Map image has a zero or negative dimension
    InvalidMapSize { width: f64, height: f64 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitudeRange { min_lat, max_lat } => {
                write!(
                    f,
                    "Invalid latitude range: {} .. {} (min must be below max)",
                    min_lat, max_lat
                )
            }
            CoordError::InvalidLongitudeRange { min_lon, max_lon } => {
                write!(
                    f,
                    "Invalid longitude range: {} .. {} (min must be below max)",
                    min_lon, max_lon
                )
            }
            CoordError::InvalidMapSize { width, height } => {
                write!(
                    f,
                    "Invalid map size: {}x{} (both dimensions must be positive)",
                    width, height
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
