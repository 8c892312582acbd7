//! Extent reprojection between supported reference systems.

use super::{Crs, Extent};

/// Half the earth's circumference in Web Mercator meters.
pub const HALF_EARTH: f64 = 20_037_508.342_789_244;

/// Web Mercator valid latitude limit in degrees.
const MAX_MERC_LAT: f64 = 85.051_128_78;

/// Reprojects extents between reference systems.
///
/// The transformer is opaque to the rendering core: a failed transform
/// (`None`) degrades to "no features for this tile", never an error.
pub trait ExtentTransformer: Send + Sync {
    /// Reproject `extent` into `target`.
    ///
    /// Returns `None` when the input is invalid or the transform cannot be
    /// performed. Reprojecting into the extent's own reference system is
    /// the identity.
    fn transform(&self, extent: &Extent, target: Crs) -> Option<Extent>;
}

/// Built-in transformer covering the geodetic and Web Mercator frames.
#[derive(Debug, Default, Clone, Copy)]
pub struct GeodeticTransformer;

fn lon_to_merc_x(lon: f64) -> f64 {
    lon * HALF_EARTH / 180.0
}

fn lat_to_merc_y(lat: f64) -> f64 {
    // Clamp to the Mercator latitude limit so polar-touching extents
    // project to the finite Mercator square instead of infinity.
    let lat = lat.clamp(-MAX_MERC_LAT, MAX_MERC_LAT);
    let rad = lat.to_radians();
    ((std::f64::consts::FRAC_PI_4 + rad / 2.0).tan().ln()) * HALF_EARTH / std::f64::consts::PI
}

fn merc_x_to_lon(x: f64) -> f64 {
    x * 180.0 / HALF_EARTH
}

fn merc_y_to_lat(y: f64) -> f64 {
    let y_rad = y * std::f64::consts::PI / HALF_EARTH;
    (2.0 * y_rad.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees()
}

impl ExtentTransformer for GeodeticTransformer {
    fn transform(&self, extent: &Extent, target: Crs) -> Option<Extent> {
        if !extent.is_valid() {
            return None;
        }
        if extent.crs == target {
            return Some(*extent);
        }
        let result = match (extent.crs, target) {
            (Crs::Geodetic, Crs::WebMercator) => Extent::new(
                Crs::WebMercator,
                lon_to_merc_x(extent.min_x),
                lat_to_merc_y(extent.min_y),
                lon_to_merc_x(extent.max_x),
                lat_to_merc_y(extent.max_y),
            ),
            (Crs::WebMercator, Crs::Geodetic) => Extent::new(
                Crs::Geodetic,
                merc_x_to_lon(extent.min_x),
                merc_y_to_lat(extent.min_y),
                merc_x_to_lon(extent.max_x),
                merc_y_to_lat(extent.max_y),
            ),
            _ => return None,
        };
        result.is_valid().then_some(result)
    }
}
