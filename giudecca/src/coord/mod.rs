//! Coordinate projection module
//!
//! Maps geographic coordinates (latitude/longitude) onto pixel positions of
//! the fixed-size Giudecca map image, using a linear transform over a fixed
//! bounding box.

mod types;

pub use types::{
    CoordError, MapBounds, PixelCoord, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_MAX_LAT,
    DEFAULT_MAX_LON, DEFAULT_MIN_LAT, DEFAULT_MIN_LON,
};

impl MapBounds {
    /// Converts geographic coordinates to a pixel position on the map image.
    ///
    /// The result is not clamped: points outside the bounding box land
    /// outside the canvas. NaN inputs propagate to the output.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in degrees
    /// * `lon` - Longitude in degrees
    #[inline]
    pub fn project(&self, lat: f64, lon: f64) -> PixelCoord {
        // Offsets from the west and south edges, in degrees
        let lon_offset = lon - self.min_lon();
        let lat_offset = lat - self.min_lat();

        let x = (lon_offset / self.delta_lon()) * self.width();
        // Pixel rows grow southwards
        let y = self.height() - (lat_offset / self.delta_lat()) * self.height();

        PixelCoord { x, y }
    }

    /// Converts a pixel position back to geographic coordinates.
    ///
    /// Returns `(lat, lon)`.
    #[inline]
    pub fn unproject(&self, pixel: PixelCoord) -> (f64, f64) {
        let lon = self.min_lon() + (pixel.x / self.width()) * self.delta_lon();
        let lat = self.min_lat() + ((self.height() - pixel.y) / self.height()) * self.delta_lat();
        (lat, lon)
    }
}

/// Converts geographic coordinates to a pixel position using the default
/// Giudecca map bounds.
#[inline]
pub fn lat_lon_to_pixel(lat: f64, lon: f64) -> PixelCoord {
    MapBounds::default().project(lat, lon)
}
