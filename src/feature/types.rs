//! Feature and feature-profile types.

use crate::feature::Geometry;
use crate::geo::Extent;
use crate::style::Style;
use crate::tiling::TilingProfile;
use std::collections::BTreeMap;

/// A discrete vector geographic object: geometry plus attributes, with an
/// optional embedded style.
///
/// Features are produced by a [`FeatureSource`](crate::feature::FeatureSource)
/// per query, owned by the rendering pipeline for the duration of one tile
/// render, and discarded after the tile image is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: u64,
    geometry: Geometry,
    attributes: BTreeMap<String, String>,
    style: Option<Style>,
}

impl Feature {
    /// Create a feature with the given id and geometry.
    pub fn new(id: u64, geometry: Geometry) -> Self {
        Self {
            id,
            geometry,
            attributes: BTreeMap::new(),
            style: None,
        }
    }

    /// Attach an embedded style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    /// Attach an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Unique feature id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Feature geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Replace the geometry, used by the coercion step.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
    }

    /// Attribute map.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Embedded style, if the source carries per-feature symbology.
    pub fn style(&self) -> Option<&Style> {
        self.style.as_ref()
    }
}

/// Spatial metadata a feature source reports about its data.
///
/// A source may declare a formal tiling profile; when present its world
/// extent takes precedence over the raw data extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureProfile {
    extent: Extent,
    profile: Option<TilingProfile>,
}

impl FeatureProfile {
    /// Create a profile from the source's raw data extent.
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            profile: None,
        }
    }

    /// Declare a formal tiling profile for the source.
    pub fn with_tiling_profile(mut self, profile: TilingProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Raw data extent in the source's native reference system.
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Formal tiling profile, if any.
    pub fn tiling_profile(&self) -> Option<TilingProfile> {
        self.profile
    }

    /// Extent to advertise as the layer's data extent: the formal
    /// profile's world extent when declared, the raw extent otherwise.
    pub fn data_extent(&self) -> Extent {
        match self.profile {
            Some(p) => p.world_extent(),
            None => self.extent,
        }
    }
}
