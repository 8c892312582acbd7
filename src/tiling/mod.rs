//! Quadtree tiling profiles and tile addressing.
//!
//! A [`TileKey`] is a quadtree address (level, row, column) within a
//! [`TilingProfile`]. Row 0 sits at the north edge. The key derives its
//! spatial [`Extent`] arithmetically from the profile's world extent, so
//! keys are cheap to copy and never carry pixel data.

use crate::geo::{Crs, Extent, HALF_EARTH};
use std::fmt;
use thiserror::Error;

/// Deepest addressable quadtree level.
pub const MAX_LEVEL: u8 = 30;

/// Errors raised while constructing tile keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TileKeyError {
    /// Row or column exceeds the grid dimensions at the requested level.
    #[error("tile ({row}, {col}) out of range at level {level} ({cols}x{rows} grid)")]
    OutOfRange {
        level: u8,
        row: u32,
        col: u32,
        cols: u32,
        rows: u32,
    },

    /// Level exceeds [`MAX_LEVEL`].
    #[error("level {level} exceeds the maximum supported level {max}")]
    LevelTooDeep { level: u8, max: u8 },
}

/// A quadtree tiling scheme over a world extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilingProfile {
    /// Two root tiles spanning lat/lon degrees (the standard global
    /// geographic profile).
    GlobalGeodetic,
    /// One root tile spanning the Web Mercator square.
    WebMercator,
}

impl TilingProfile {
    /// Reference system tile extents are expressed in.
    pub fn crs(&self) -> Crs {
        match self {
            TilingProfile::GlobalGeodetic => Crs::Geodetic,
            TilingProfile::WebMercator => Crs::WebMercator,
        }
    }

    /// Full extent covered by the profile.
    pub fn world_extent(&self) -> Extent {
        match self {
            TilingProfile::GlobalGeodetic => {
                Extent::new(Crs::Geodetic, -180.0, -90.0, 180.0, 90.0)
            }
            TilingProfile::WebMercator => Extent::new(
                Crs::WebMercator,
                -HALF_EARTH,
                -HALF_EARTH,
                HALF_EARTH,
                HALF_EARTH,
            ),
        }
    }

    /// Grid dimensions (columns, rows) at a level. Levels beyond
    /// [`MAX_LEVEL`] are clamped.
    pub fn grid_size(&self, level: u8) -> (u32, u32) {
        let side = 1u32 << level.min(MAX_LEVEL);
        match self {
            TilingProfile::GlobalGeodetic => (side * 2, side),
            TilingProfile::WebMercator => (side, side),
        }
    }
}

/// Quadtree address of one tile. Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    level: u8,
    row: u32,
    col: u32,
    profile: TilingProfile,
}

impl TileKey {
    /// Create a tile key, validating the address against the profile grid.
    pub fn new(level: u8, row: u32, col: u32, profile: TilingProfile) -> Result<Self, TileKeyError> {
        if level > MAX_LEVEL {
            return Err(TileKeyError::LevelTooDeep {
                level,
                max: MAX_LEVEL,
            });
        }
        let (cols, rows) = profile.grid_size(level);
        if row >= rows || col >= cols {
            return Err(TileKeyError::OutOfRange {
                level,
                row,
                col,
                cols,
                rows,
            });
        }
        Ok(Self {
            level,
            row,
            col,
            profile,
        })
    }

    /// Zoom level.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Row, 0 at the north edge.
    pub fn row(&self) -> u32 {
        self.row
    }

    /// Column, 0 at the west edge.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Tiling profile the address belongs to.
    pub fn profile(&self) -> TilingProfile {
        self.profile
    }

    /// Spatial extent of this tile in the profile's reference system.
    pub fn extent(&self) -> Extent {
        let world = self.profile.world_extent();
        let (cols, rows) = self.profile.grid_size(self.level);
        let tile_w = world.width() / cols as f64;
        let tile_h = world.height() / rows as f64;
        let min_x = world.min_x + self.col as f64 * tile_w;
        let max_y = world.max_y - self.row as f64 * tile_h;
        Extent::new(world.crs, min_x, max_y - tile_h, min_x + tile_w, max_y)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}/{}/{}", self.level, self.row, self.col)
    }
}
