//! Vector features, geometry coercion, and the feature source contract.

mod geometry;
mod source;
mod types;

pub use geometry::{Geometry, GeometryType};
pub use source::{FeatureCursor, FeatureSource, MemoryFeatureSource, Query};
pub use types::{Feature, FeatureProfile};
