//! The tile rasterizer driver: layer lifecycle, extent intersection, style
//! dispatch, geometry coercion, and the level-of-detail gate.

mod error;
mod layout;
mod tile_layer;

pub use error::LayerError;
pub use layout::{FeatureDisplayLayout, LodPolicy};
pub use tile_layer::{FeatureTileLayer, InitReport};
