//! Tile image allocation and the rasterization hook triple.
//!
//! A concrete rasterizer is one implementation of [`FeatureRasterizer`],
//! selected by composition at layer construction time. The driver calls
//! the three hooks in order — `pre_process`, one `render_style_group` per
//! style group, `post_process` — threading a fresh, tile-scoped
//! [`BuildData`] accumulator through all of them. The accumulator's type
//! is the rasterizer's business; the driver only owns its lifetime.

use crate::feature::Feature;
use crate::geo::Extent;
use crate::style::Style;
use image::RgbaImage;
use std::any::Any;

/// Default tile edge length in pixels.
pub const DEFAULT_PIXELS_PER_TILE: u32 = 256;

/// Opaque per-tile accumulator, created by the rasterizer and dropped with
/// the tile.
pub type BuildData = Box<dyn Any + Send>;

/// Allocate a zeroed RGBA8 tile image (fully transparent).
pub fn allocate_tile_image(pixels_per_tile: u32) -> RgbaImage {
    RgbaImage::new(pixels_per_tile, pixels_per_tile)
}

/// Paints styled feature groups into a tile image.
///
/// Hooks return `false` to signal failure for their step; the driver logs
/// and continues, never aborting the tile. Implementations must tolerate
/// empty feature slices.
pub trait FeatureRasterizer: Send + Sync {
    /// Fresh per-tile accumulator, created before any hook runs.
    fn create_build_data(&self) -> BuildData;

    /// Setup hook, called once per tile before any style group renders.
    fn pre_process(&self, image: &mut RgbaImage, data: &mut BuildData) -> bool {
        let _ = (image, data);
        true
    }

    /// Paint one styled feature group into the image.
    ///
    /// `extent` is the tile's extent, not the (possibly narrower) query
    /// region the features were fetched with.
    fn render_style_group(
        &self,
        style: &Style,
        features: &[Feature],
        data: &mut BuildData,
        extent: &Extent,
        image: &mut RgbaImage,
    ) -> bool;

    /// Finalization hook, called once per tile after all style groups.
    fn post_process(&self, image: &mut RgbaImage, data: &mut BuildData) -> bool {
        let _ = (image, data);
        true
    }
}
