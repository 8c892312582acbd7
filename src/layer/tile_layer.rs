//! The per-tile rendering driver.

use crate::feature::{Feature, FeatureProfile, FeatureSource, GeometryType, Query};
use crate::geo::{Crs, Extent, ExtentTransformer, GeodeticTransformer};
use crate::layer::{FeatureDisplayLayout, LayerError};
use crate::raster::{allocate_tile_image, BuildData, FeatureRasterizer, DEFAULT_PIXELS_PER_TILE};
use crate::style::{Style, StyleSheet};
use crate::tiling::{TileKey, TilingProfile};
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, warn};

/// Layer lifecycle. Configuration is mutable only before initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerState {
    Unconfigured,
    Initialized,
}

/// Outcome of a successful initialization.
///
/// Unresolved selector styles are a caller configuration defect; they are
/// reported here (and logged) once, then skipped silently per tile.
#[derive(Debug, Clone, PartialEq)]
pub struct InitReport {
    /// Data extent derived from the feature source's profile.
    pub data_extent: Option<Extent>,
    /// Selectors whose named style is absent from the sheet.
    pub unresolved_styles: Vec<LayerError>,
}

/// Renders vector features into raster tile images.
///
/// The layer orchestrates the full per-tile pipeline: intersect the tile
/// extent with the feature data extent across reference systems, resolve
/// which styles apply, pull matching features through the geometry
/// coercer, and drive the rasterizer's hook triple over a fresh RGBA8
/// image buffer.
///
/// After [`initialize`](Self::initialize) the layer is immutable and an
/// `Arc<FeatureTileLayer>` may be shared across threads; every render call
/// works on its own image and build data.
pub struct FeatureTileLayer {
    source: Option<Arc<dyn FeatureSource>>,
    rasterizer: Arc<dyn FeatureRasterizer>,
    transformer: Arc<dyn ExtentTransformer>,
    style_sheet: Option<StyleSheet>,
    layout: Option<FeatureDisplayLayout>,
    geometry_override: Option<GeometryType>,
    profile: Option<TilingProfile>,
    pixels_per_tile: u32,
    data_extent: Option<Extent>,
    state: LayerState,
}

impl FeatureTileLayer {
    /// Create an unconfigured layer around a rasterizer.
    pub fn new(rasterizer: Arc<dyn FeatureRasterizer>) -> Self {
        Self {
            source: None,
            rasterizer,
            transformer: Arc::new(GeodeticTransformer),
            style_sheet: None,
            layout: None,
            geometry_override: None,
            profile: None,
            pixels_per_tile: DEFAULT_PIXELS_PER_TILE,
            data_extent: None,
            state: LayerState::Unconfigured,
        }
    }

    /// Replace the extent transformer (the built-in one covers geodetic
    /// and Web Mercator).
    pub fn with_transformer(mut self, transformer: Arc<dyn ExtentTransformer>) -> Self {
        self.transformer = transformer;
        self
    }

    /// Set the style sheet.
    pub fn with_style_sheet(mut self, sheet: StyleSheet) -> Self {
        self.style_sheet = Some(sheet);
        self
    }

    /// Set the display layout controlling level-of-detail gating.
    pub fn with_layout(mut self, layout: FeatureDisplayLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Force every feature's geometry to the given type; features that
    /// cannot be coerced are dropped from the render set.
    pub fn with_geometry_override(mut self, target: GeometryType) -> Self {
        self.geometry_override = Some(target);
        self
    }

    /// Set the output tiling profile. Defaults to global geodetic at
    /// initialization when unset.
    pub fn with_profile(mut self, profile: TilingProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Set the tile edge length in pixels.
    pub fn with_pixels_per_tile(mut self, pixels: u32) -> Self {
        self.pixels_per_tile = pixels;
        self
    }

    /// Bind the feature source. One-time: attempts after initialization
    /// are rejected and the existing source stays in effect.
    pub fn set_feature_source(&mut self, source: Arc<dyn FeatureSource>) -> Result<(), LayerError> {
        if self.state == LayerState::Initialized {
            warn!(source = source.name(), "cannot set feature source after initialization");
            return Err(LayerError::AlreadyInitialized);
        }
        self.source = Some(source);
        Ok(())
    }

    /// Initialize the layer.
    ///
    /// Defaults the output profile, requires a feature source (the one
    /// hard failure in the pipeline), initializes it, derives the data
    /// extent from its feature profile, and validates the style sheet.
    pub fn initialize(&mut self) -> Result<InitReport, LayerError> {
        if self.profile.is_none() {
            self.profile = Some(TilingProfile::GlobalGeodetic);
        }

        let source = self.source.as_ref().ok_or(LayerError::NoFeatureSource)?;
        source.initialize();
        self.data_extent = source.feature_profile().map(|p| p.data_extent());

        let unresolved_styles = match &self.style_sheet {
            Some(sheet) => sheet
                .unresolved_selectors()
                .into_iter()
                .map(|(selector, style)| {
                    warn!(selector, style, "selector references unknown style");
                    LayerError::UnknownStyle {
                        selector,
                        style: style.to_string(),
                    }
                })
                .collect(),
            None => Vec::new(),
        };

        self.state = LayerState::Initialized;
        Ok(InitReport {
            data_extent: self.data_extent,
            unresolved_styles,
        })
    }

    /// Data extent derived at initialization, if any.
    pub fn data_extent(&self) -> Option<&Extent> {
        self.data_extent.as_ref()
    }

    /// Output tiling profile (set explicitly or defaulted at
    /// initialization).
    pub fn profile(&self) -> Option<TilingProfile> {
        self.profile
    }

    /// Render one tile.
    ///
    /// Returns `None` when there is nothing to draw: the layer is not
    /// initialized, has no source, or the source has no usable feature
    /// profile. Everything else yields an allocated image; data sparsity
    /// only makes it emptier, never an error.
    pub fn render_tile(&self, key: &TileKey) -> Option<RgbaImage> {
        if self.state != LayerState::Initialized {
            return None;
        }
        let source = self.source.as_ref()?;
        let profile = source.feature_profile()?;

        let mut image = allocate_tile_image(self.pixels_per_tile);
        let mut data = self.rasterizer.create_build_data();

        if !self.rasterizer.pre_process(&mut image, &mut data) {
            warn!(tile = %key, "rasterizer pre-process reported failure");
        }

        let render_full = match &self.layout {
            None => true,
            Some(layout) => {
                let allowed = layout.allows_level(key.level());
                if !allowed {
                    debug!(tile = %key, "level suppressed by display layout");
                }
                allowed
            }
        };
        if render_full {
            self.dispatch_styles(source.as_ref(), &profile, key, &mut image, &mut data);
        }

        if !self.rasterizer.post_process(&mut image, &mut data) {
            warn!(tile = %key, "rasterizer post-process reported failure");
        }

        Some(image)
    }

    /// Style dispatch loop. Exactly one of four mutually exclusive modes
    /// runs per tile: embedded styles, selectors, the sheet's default
    /// style, or a neutral style when no sheet exists.
    fn dispatch_styles(
        &self,
        source: &dyn FeatureSource,
        profile: &FeatureProfile,
        key: &TileKey,
        image: &mut RgbaImage,
        data: &mut BuildData,
    ) {
        let tile_extent = key.extent();
        let Some(region) = self.query_region(&profile.extent(), &tile_extent) else {
            debug!(tile = %key, "tile does not intersect feature data");
            return;
        };

        if source.has_embedded_styles() {
            self.render_embedded(source, key, region, &tile_extent, image, data);
        } else if let Some(sheet) = &self.style_sheet {
            if !sheet.selectors().is_empty() {
                for selector in sheet.selectors() {
                    // Unresolved names were reported at initialization.
                    let Some(style) = sheet.style(selector.style_name()) else {
                        continue;
                    };
                    self.query_and_render(
                        source,
                        style,
                        selector.query().clone(),
                        region,
                        key,
                        &tile_extent,
                        image,
                        data,
                    );
                }
            } else {
                self.query_and_render(
                    source,
                    sheet.default_style(),
                    Query::new().with_tile_key(*key),
                    region,
                    key,
                    &tile_extent,
                    image,
                    data,
                );
            }
        } else {
            self.query_and_render(
                source,
                &Style::empty(),
                Query::new().with_tile_key(*key),
                region,
                key,
                &tile_extent,
                image,
                data,
            );
        }
    }

    /// Compute the query region for a tile: round-trip both extents
    /// through the geodetic frame, intersect, and reproject the
    /// intersection back into the source's native reference system.
    ///
    /// `None` (empty intersection or failed transform) means zero features
    /// for this tile, not an error.
    fn query_region(&self, source_extent: &Extent, tile_extent: &Extent) -> Option<Extent> {
        let source_geo = self.transformer.transform(source_extent, Crs::Geodetic)?;
        let tile_geo = self.transformer.transform(tile_extent, Crs::Geodetic)?;
        let intersection = source_geo.intersection(&tile_geo)?;
        self.transformer.transform(&intersection, source_extent.crs)
    }

    /// Embedded-style mode: each feature renders as a singleton group
    /// using its own style; the sheet is never consulted.
    fn render_embedded(
        &self,
        source: &dyn FeatureSource,
        key: &TileKey,
        region: Extent,
        tile_extent: &Extent,
        image: &mut RgbaImage,
        data: &mut BuildData,
    ) {
        let mut query = Query::new().with_tile_key(*key);
        query.merge_bounds(region);

        let mut cursor = source.create_cursor(&query);
        while cursor.has_more() {
            let Some(mut feature) = cursor.next_feature() else {
                break;
            };
            if !self.coerce_geometry(&mut feature) {
                continue;
            }
            let Some(style) = feature.style().cloned() else {
                debug!(id = feature.id(), "embedded-style feature has no style; skipping");
                continue;
            };
            let group = [feature];
            if !self
                .rasterizer
                .render_style_group(&style, &group, data, tile_extent, image)
            {
                warn!(tile = %key, style = style.name(), "rasterizer reported failure for embedded feature");
            }
        }
    }

    /// Query the source for one style group and render it.
    #[allow(clippy::too_many_arguments)]
    fn query_and_render(
        &self,
        source: &dyn FeatureSource,
        style: &Style,
        mut query: Query,
        region: Extent,
        key: &TileKey,
        tile_extent: &Extent,
        image: &mut RgbaImage,
        data: &mut BuildData,
    ) {
        query.merge_bounds(region);
        if query.tile_key().is_none() {
            query = query.with_tile_key(*key);
        }

        let mut features = Vec::new();
        let mut cursor = source.create_cursor(&query);
        while cursor.has_more() {
            let Some(mut feature) = cursor.next_feature() else {
                break;
            };
            if self.coerce_geometry(&mut feature) {
                features.push(feature);
            }
        }
        debug!(tile = %key, style = style.name(), count = features.len(), "rendering style group");

        if !self
            .rasterizer
            .render_style_group(style, &features, data, tile_extent, image)
        {
            warn!(tile = %key, style = style.name(), "rasterizer reported failure for style group");
        }
    }

    /// Apply the geometry-type override. Matching features pass through
    /// untouched; failed coercions drop the feature from the render set.
    fn coerce_geometry(&self, feature: &mut Feature) -> bool {
        let Some(target) = self.geometry_override else {
            return true;
        };
        if feature.geometry().component_type() == target {
            return true;
        }
        match feature.geometry().clone_as(target) {
            Some(geometry) => {
                feature.set_geometry(geometry);
                true
            }
            None => {
                debug!(id = feature.id(), ?target, "dropping feature; geometry not coercible");
                false
            }
        }
    }
}
