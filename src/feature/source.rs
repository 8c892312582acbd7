//! Feature source and cursor contracts, plus an in-memory source.
//!
//! The storage/query engine behind a layer is opaque to the rendering
//! core: anything that can report a [`FeatureProfile`] and produce a
//! [`FeatureCursor`] for a [`Query`] can feed the pipeline. The bundled
//! [`MemoryFeatureSource`] holds its features in a `Vec` and is the
//! reference implementation used throughout the tests.

use crate::feature::{Feature, FeatureProfile};
use crate::geo::Extent;
use crate::tiling::TileKey;
use tracing::debug;

/// A spatial/attribute feature query.
///
/// Bounds are progressively widened by merging (union) with newly computed
/// regions; they are never silently replaced, so a caller-supplied filter
/// is widened rather than lost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    bounds: Option<Extent>,
    tile_key: Option<TileKey>,
    expression: Option<String>,
}

impl Query {
    /// Empty query matching everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spatial bounds filter.
    pub fn with_bounds(mut self, bounds: Extent) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Attach the tile key the query originates from, as a hint for
    /// sources with tile-aligned storage.
    pub fn with_tile_key(mut self, key: TileKey) -> Self {
        self.tile_key = Some(key);
        self
    }

    /// Set an attribute filter expression, evaluated by the source.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Spatial bounds filter.
    pub fn bounds(&self) -> Option<&Extent> {
        self.bounds.as_ref()
    }

    /// Originating tile key hint.
    pub fn tile_key(&self) -> Option<&TileKey> {
        self.tile_key.as_ref()
    }

    /// Attribute filter expression.
    pub fn expression(&self) -> Option<&str> {
        self.expression.as_deref()
    }

    /// Widen the bounds with `region` (union). Existing bounds are kept
    /// when the union cannot be computed (reference-system mismatch).
    pub fn merge_bounds(&mut self, region: Extent) {
        self.bounds = match self.bounds {
            None => Some(region),
            Some(existing) => match existing.union(&region) {
                Some(merged) => Some(merged),
                None => {
                    debug!(%existing, %region, "cannot merge query bounds; keeping existing");
                    Some(existing)
                }
            },
        };
    }
}

/// A lazy, forward-only sequence of features satisfying a query.
pub trait FeatureCursor {
    /// True while features remain.
    fn has_more(&self) -> bool;

    /// Next feature, or `None` when drained.
    fn next_feature(&mut self) -> Option<Feature>;
}

/// The feature storage/query engine contract.
///
/// Implementations must support concurrent independent queries; the
/// rendering core drains (or abandons) every cursor within the scope of a
/// single style-group render and holds no locks across source calls.
pub trait FeatureSource: Send + Sync {
    /// Source name for logging and identification.
    fn name(&self) -> &str;

    /// One-time setup, called by the layer during its own initialization.
    fn initialize(&self) {}

    /// Spatial metadata for the stored data, or `None` when the source
    /// cannot describe its contents (the layer then renders nothing).
    fn feature_profile(&self) -> Option<FeatureProfile>;

    /// True when features carry their own embedded styles; the layer then
    /// bypasses the style sheet entirely.
    fn has_embedded_styles(&self) -> bool {
        false
    }

    /// Open a cursor over features matching `query`.
    fn create_cursor(&self, query: &Query) -> Box<dyn FeatureCursor + '_>;
}

/// In-memory feature source backed by a `Vec`.
#[derive(Debug, Clone)]
pub struct MemoryFeatureSource {
    name: String,
    profile: FeatureProfile,
    features: Vec<Feature>,
    embedded_styles: bool,
}

impl MemoryFeatureSource {
    /// Create an empty source with the given profile.
    pub fn new(profile: FeatureProfile) -> Self {
        Self {
            name: "memory".to_string(),
            profile,
            features: Vec::new(),
            embedded_styles: false,
        }
    }

    /// Add a feature.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Declare that features carry embedded styles.
    pub fn with_embedded_styles(mut self) -> Self {
        self.embedded_styles = true;
        self
    }

    /// Number of stored features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no features are stored.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn matches(&self, feature: &Feature, query: &Query) -> bool {
        if let Some(bounds) = query.bounds() {
            if !vertices_overlap(feature.geometry().vertices(), bounds) {
                return false;
            }
        }
        if let Some(expr) = query.expression() {
            if !attribute_match(feature, expr) {
                return false;
            }
        }
        true
    }
}

/// Inclusive interval-overlap test between a vertex set's envelope and the
/// query bounds. Deliberately avoids `Extent::is_valid`: a single point has
/// a degenerate envelope but still overlaps.
fn vertices_overlap(vertices: &[(f64, f64)], bounds: &Extent) -> bool {
    if vertices.is_empty() {
        return false;
    }
    let (mut min_x, mut min_y) = vertices[0];
    let (mut max_x, mut max_y) = vertices[0];
    for &(x, y) in vertices {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    min_x <= bounds.max_x && max_x >= bounds.min_x && min_y <= bounds.max_y && max_y >= bounds.min_y
}

/// Evaluate a `key=value` attribute expression.
fn attribute_match(feature: &Feature, expression: &str) -> bool {
    match expression.split_once('=') {
        Some((key, value)) => feature
            .attributes()
            .get(key.trim())
            .is_some_and(|v| v == value.trim()),
        None => false,
    }
}

impl FeatureSource for MemoryFeatureSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_profile(&self) -> Option<FeatureProfile> {
        Some(self.profile)
    }

    fn has_embedded_styles(&self) -> bool {
        self.embedded_styles
    }

    fn create_cursor(&self, query: &Query) -> Box<dyn FeatureCursor + '_> {
        let matched: Vec<Feature> = self
            .features
            .iter()
            .filter(|f| self.matches(f, query))
            .cloned()
            .collect();
        Box::new(MemoryCursor {
            features: matched,
            position: 0,
        })
    }
}

/// Cursor over a pre-filtered feature list.
struct MemoryCursor {
    features: Vec<Feature>,
    position: usize,
}

impl FeatureCursor for MemoryCursor {
    fn has_more(&self) -> bool {
        self.position < self.features.len()
    }

    fn next_feature(&mut self) -> Option<Feature> {
        let feature = self.features.get(self.position).cloned();
        self.position += 1;
        feature
    }
}
