//! Spatial extents, reference systems, and extent reprojection.
//!
//! An [`Extent`] is a bounding rectangle tied to a [`Crs`]. Two extents are
//! comparable only in a common reference system; the [`ExtentTransformer`]
//! trait performs the reprojection. The built-in [`GeodeticTransformer`]
//! covers the geodetic (EPSG:4326) and Web Mercator (EPSG:3857) frames,
//! which is what both tiling profiles need. Embedders with exotic reference
//! systems supply their own transformer.

mod extent;
mod transform;

pub use extent::{Crs, Extent};
pub use transform::{ExtentTransformer, GeodeticTransformer, HALF_EARTH};
