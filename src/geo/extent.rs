//! Extent and reference-system types.

use std::fmt;

/// Coordinate reference systems understood by the built-in transformer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Plate carrée lat/lon degrees (EPSG:4326).
    Geodetic,
    /// Spherical Web Mercator meters (EPSG:3857).
    WebMercator,
}

impl Crs {
    /// Returns the EPSG code for this reference system.
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Geodetic => 4326,
            Crs::WebMercator => 3857,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// A bounding rectangle tied to a reference system.
///
/// An extent is valid only when its bounds are finite and non-degenerate
/// (`min < max` on both axes). Invalid extents must short-circuit
/// downstream processing rather than propagate bad geometry, so every
/// operation here checks validity first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// West edge.
    pub min_x: f64,
    /// South edge.
    pub min_y: f64,
    /// East edge.
    pub max_x: f64,
    /// North edge.
    pub max_y: f64,
    /// Reference system the bounds are expressed in.
    pub crs: Crs,
}

impl Extent {
    /// Create a new extent.
    pub fn new(crs: Crs, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
            crs,
        }
    }

    /// True when the bounds are finite and non-degenerate.
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }

    /// Width along the X axis.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height along the Y axis.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the point lies within the extent (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// True when `other` fits entirely inside this extent.
    pub fn contains_extent(&self, other: &Extent) -> bool {
        self.crs == other.crs
            && self.contains(other.min_x, other.min_y)
            && self.contains(other.max_x, other.max_y)
    }

    /// Intersect two extents in the same reference system.
    ///
    /// Returns `None` when the reference systems differ (reproject first),
    /// when either extent is invalid, or when the intersection is empty or
    /// degenerate.
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        if self.crs != other.crs || !self.is_valid() || !other.is_valid() {
            return None;
        }
        let result = Extent::new(
            self.crs,
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        result.is_valid().then_some(result)
    }

    /// Union of two extents in the same reference system.
    ///
    /// Returns `None` when the reference systems differ or either extent
    /// is invalid.
    pub fn union(&self, other: &Extent) -> Option<Extent> {
        if self.crs != other.crs || !self.is_valid() || !other.is_valid() {
            return None;
        }
        Some(Extent::new(
            self.crs,
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        ))
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}, {:.6}, {:.6}] {}",
            self.min_x, self.min_y, self.max_x, self.max_y, self.crs
        )
    }
}
