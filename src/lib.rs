//! FeatureLayer - vector feature rasterization for tiled map pipelines
//!
//! This library converts vector geographic features (points, lines,
//! polygons with attributes) into raster RGBA tiles. Given a tile key it
//! determines which stored features intersect the tile's extent, resolves
//! which style applies to each feature, and drives a pluggable rasterizer
//! over a fixed-resolution image buffer.
//!
//! # High-Level API
//!
//! The [`layer::FeatureTileLayer`] is the entry point:
//!
//! ```ignore
//! use featurelayer::layer::FeatureTileLayer;
//! use featurelayer::tiling::{TileKey, TilingProfile};
//! use std::sync::Arc;
//!
//! let mut layer = FeatureTileLayer::new(rasterizer).with_style_sheet(sheet);
//! layer.set_feature_source(source)?;
//! layer.initialize()?;
//!
//! let key = TileKey::new(4, 5, 7, TilingProfile::GlobalGeodetic)?;
//! let image = layer.render_tile(&key);
//! ```
//!
//! Feature storage and the concrete rasterizer are collaborators supplied
//! by the embedder: anything implementing
//! [`feature::FeatureSource`] can feed the pipeline, and anything
//! implementing [`raster::FeatureRasterizer`] can paint it.

pub mod feature;
pub mod geo;
pub mod layer;
pub mod raster;
pub mod style;
pub mod tiling;

/// Version of the featurelayer library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_tiling_module_exists() {
        use crate::tiling::{TileKey, TilingProfile};
        let key = TileKey::new(0, 0, 0, TilingProfile::WebMercator);
        assert!(key.is_ok());
    }
}
