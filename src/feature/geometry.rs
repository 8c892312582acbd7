//! Feature geometry and geometry-type coercion.

/// Component geometry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryType {
    /// Unordered point collection.
    PointSet,
    /// Ordered open vertex chain.
    LineString,
    /// Closed exterior ring.
    Polygon,
    /// Unrecognized source geometry; never renderable after coercion.
    Unknown,
}

impl GeometryType {
    /// Parse a geometry-type override from configuration.
    ///
    /// Accepts the usual synonyms, case-insensitive: `line`, `lines`,
    /// `linestring`; `point`, `points`, `pointset`; `polygon`, `polygons`.
    pub fn parse_override(value: &str) -> Option<GeometryType> {
        match value.to_ascii_lowercase().as_str() {
            "line" | "lines" | "linestring" => Some(GeometryType::LineString),
            "point" | "points" | "pointset" => Some(GeometryType::PointSet),
            "polygon" | "polygons" => Some(GeometryType::Polygon),
            _ => None,
        }
    }
}

/// A feature geometry: a vertex list interpreted per component type.
///
/// Coordinates are (x, y) pairs in the feature source's native reference
/// system. Polygons carry their exterior ring with no closing duplicate
/// vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    PointSet(Vec<(f64, f64)>),
    LineString(Vec<(f64, f64)>),
    Polygon(Vec<(f64, f64)>),
    Unknown,
}

impl Geometry {
    /// Component type of this geometry.
    pub fn component_type(&self) -> GeometryType {
        match self {
            Geometry::PointSet(_) => GeometryType::PointSet,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::Unknown => GeometryType::Unknown,
        }
    }

    /// Vertex list, empty for unknown geometry.
    pub fn vertices(&self) -> &[(f64, f64)] {
        match self {
            Geometry::PointSet(v) | Geometry::LineString(v) | Geometry::Polygon(v) => v,
            Geometry::Unknown => &[],
        }
    }

    /// Clone this geometry as `target`, returning `None` when the
    /// conversion is not meaningful.
    ///
    /// Conversions that succeed: any typed geometry to a point set (its
    /// vertices); a polygon to a line string (the exterior ring); a line
    /// string of at least three vertices to a polygon; identity. A point
    /// set carries no vertex order, so it converts to neither lines nor
    /// polygons. Unknown geometry converts to nothing.
    pub fn clone_as(&self, target: GeometryType) -> Option<Geometry> {
        if self.component_type() == target {
            return Some(self.clone());
        }
        match (self, target) {
            (Geometry::Unknown, _) | (_, GeometryType::Unknown) => None,
            (_, GeometryType::PointSet) => Some(Geometry::PointSet(self.vertices().to_vec())),
            (Geometry::Polygon(ring), GeometryType::LineString) => {
                Some(Geometry::LineString(ring.clone()))
            }
            (Geometry::LineString(pts), GeometryType::Polygon) if pts.len() >= 3 => {
                Some(Geometry::Polygon(pts.clone()))
            }
            _ => None,
        }
    }
}
