//! Coordinate projection onto the map image.

use clap::Args;
use giudecca::config::ConfigFile;
use giudecca::coord::{MapBounds, PixelCoord};
use serde::Serialize;

use super::common::print_json;
use crate::error::CliError;

/// Arguments for the `project` command.
#[derive(Debug, Args)]
#[command(allow_negative_numbers = true)]
pub struct ProjectArgs {
    /// Latitude in decimal degrees (x in pixels with --inverse)
    pub first: f64,

    /// Longitude in decimal degrees (y in pixels with --inverse)
    pub second: f64,

    /// Convert pixel coordinates back to latitude/longitude
    #[arg(long)]
    pub inverse: bool,

    /// Use the built-in Giudecca bounds instead of the configured ones
    #[arg(long)]
    pub default_bounds: bool,
}

#[derive(Debug, PartialEq, Serialize)]
struct Projection {
    lat: f64,
    lon: f64,
    x: f64,
    y: f64,
    visible: bool,
}

/// Print the projection of one point.
pub fn run(args: ProjectArgs, config: &ConfigFile) -> Result<(), CliError> {
    let bounds = if args.default_bounds {
        MapBounds::default()
    } else {
        config.map
    };

    print_json(&projection(&args, &bounds))
}

fn projection(args: &ProjectArgs, bounds: &MapBounds) -> Projection {
    let (lat, lon, pixel) = if args.inverse {
        let pixel = PixelCoord {
            x: args.first,
            y: args.second,
        };
        let (lat, lon) = bounds.unproject(pixel);
        (lat, lon, pixel)
    } else {
        (args.first, args.second, bounds.project(args.first, args.second))
    };

    Projection {
        lat,
        lon,
        x: pixel.x,
        y: pixel.y,
        visible: pixel.is_within(bounds),
    }
}
