//! End-to-end pipeline tests: feature source -> style dispatch ->
//! rasterizer hooks -> tile image.

use featurelayer::feature::{
    Feature, FeatureProfile, Geometry, GeometryType, MemoryFeatureSource, Query,
};
use featurelayer::geo::{Crs, Extent};
use featurelayer::layer::{FeatureDisplayLayout, FeatureTileLayer, LayerError, LodPolicy};
use featurelayer::raster::{BuildData, FeatureRasterizer};
use featurelayer::style::{Style, StyleSelector, StyleSheet};
use featurelayer::tiling::{TileKey, TilingProfile};
use image::RgbaImage;
use std::sync::{Arc, Mutex};

/// Accumulates vertex pixels per style group during render passes and
/// composites them into the image buffer in post-process.
#[derive(Default)]
struct VertexRasterizer {
    passes: Mutex<Vec<(String, Vec<u64>)>>,
}

impl VertexRasterizer {
    fn passes(&self) -> Vec<(String, Vec<u64>)> {
        self.passes.lock().unwrap().clone()
    }
}

impl FeatureRasterizer for VertexRasterizer {
    fn create_build_data(&self) -> BuildData {
        Box::new(Vec::<(u32, u32)>::new())
    }

    fn render_style_group(
        &self,
        style: &Style,
        features: &[Feature],
        data: &mut BuildData,
        extent: &Extent,
        image: &mut RgbaImage,
    ) -> bool {
        self.passes.lock().unwrap().push((
            style.name().to_string(),
            features.iter().map(Feature::id).collect(),
        ));
        let Some(pixels) = data.downcast_mut::<Vec<(u32, u32)>>() else {
            return false;
        };
        let (w, h) = (image.width() as f64, image.height() as f64);
        for feature in features {
            for &(x, y) in feature.geometry().vertices() {
                if !extent.contains(x, y) {
                    continue;
                }
                let px = ((x - extent.min_x) / extent.width() * w).min(w - 1.0) as u32;
                let py = ((extent.max_y - y) / extent.height() * h).min(h - 1.0) as u32;
                pixels.push((px, py));
            }
        }
        true
    }

    fn post_process(&self, image: &mut RgbaImage, data: &mut BuildData) -> bool {
        let Some(pixels) = data.downcast_ref::<Vec<(u32, u32)>>() else {
            return false;
        };
        for &(px, py) in pixels {
            image.put_pixel(px, py, image::Rgba([255, 255, 255, 255]));
        }
        true
    }
}

fn world_extent() -> Extent {
    Extent::new(Crs::Geodetic, -180.0, -90.0, 180.0, 90.0)
}

fn opaque_pixel_count(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p.0[3] != 0).count()
}

fn west_root() -> TileKey {
    TileKey::new(0, 0, 0, TilingProfile::GlobalGeodetic).unwrap()
}

#[test]
fn selector_pipeline_paints_matching_features() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    let source = MemoryFeatureSource::new(FeatureProfile::new(world_extent()))
        .with_feature(
            Feature::new(1, Geometry::PointSet(vec![(-100.0, 40.0)]))
                .with_attribute("kind", "city"),
        )
        .with_feature(
            Feature::new(
                2,
                Geometry::LineString(vec![(-120.0, 30.0), (-110.0, 35.0)]),
            )
            .with_attribute("kind", "road"),
        );
    let sheet = StyleSheet::new()
        .with_style(Style::new("cities"))
        .with_style(Style::new("roads"))
        .with_selector(StyleSelector::new(
            "cities",
            Query::new().with_expression("kind=city"),
        ))
        .with_selector(StyleSelector::new(
            "roads",
            Query::new().with_expression("kind=road"),
        ));

    let mut layer = FeatureTileLayer::new(rasterizer.clone()).with_style_sheet(sheet);
    layer.set_feature_source(Arc::new(source)).unwrap();
    let report = layer.initialize().unwrap();
    assert!(report.unresolved_styles.is_empty());

    let image = layer.render_tile(&west_root()).unwrap();
    assert_eq!(
        rasterizer.passes(),
        vec![
            ("cities".to_string(), vec![1]),
            ("roads".to_string(), vec![2]),
        ]
    );
    // One city vertex + two road vertices composited in post-process.
    assert_eq!(opaque_pixel_count(&image), 3);
}

#[test]
fn overlapping_selectors_render_duplicates() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    let source = MemoryFeatureSource::new(FeatureProfile::new(world_extent())).with_feature(
        Feature::new(1, Geometry::PointSet(vec![(-100.0, 40.0)])).with_attribute("kind", "city"),
    );
    let sheet = StyleSheet::new()
        .with_style(Style::new("halo"))
        .with_style(Style::new("label"))
        .with_selector(StyleSelector::new("halo", Query::new()))
        .with_selector(StyleSelector::new("label", Query::new()));

    let mut layer = FeatureTileLayer::new(rasterizer.clone()).with_style_sheet(sheet);
    layer.set_feature_source(Arc::new(source)).unwrap();
    layer.initialize().unwrap();

    layer.render_tile(&west_root()).unwrap();
    let passes = rasterizer.passes();
    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].1, vec![1]);
    assert_eq!(passes[1].1, vec![1]);
}

#[test]
fn non_intersecting_tile_yields_blank_image() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    // Data confined to the western hemisphere.
    let extent = Extent::new(Crs::Geodetic, -170.0, 10.0, -60.0, 60.0);
    let source = MemoryFeatureSource::new(FeatureProfile::new(extent))
        .with_feature(Feature::new(1, Geometry::PointSet(vec![(-100.0, 40.0)])));

    let mut layer = FeatureTileLayer::new(rasterizer.clone());
    layer.set_feature_source(Arc::new(source)).unwrap();
    layer.initialize().unwrap();

    let east = TileKey::new(0, 0, 1, TilingProfile::GlobalGeodetic).unwrap();
    let image = layer.render_tile(&east).unwrap();
    assert!(rasterizer.passes().is_empty());
    assert_eq!(opaque_pixel_count(&image), 0);
}

#[test]
fn embedded_styles_render_singleton_groups() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    let source = MemoryFeatureSource::new(FeatureProfile::new(world_extent()))
        .with_embedded_styles()
        .with_feature(
            Feature::new(1, Geometry::PointSet(vec![(-100.0, 40.0)]))
                .with_style(Style::new("red-dot")),
        )
        .with_feature(
            Feature::new(2, Geometry::PointSet(vec![(-90.0, 30.0)]))
                .with_style(Style::new("blue-dot")),
        );
    // Sheet present but must be ignored in embedded mode.
    let sheet = StyleSheet::new()
        .with_style(Style::new("never"))
        .with_selector(StyleSelector::new("never", Query::new()))
        .with_default_style(Style::new("never-default"));

    let mut layer = FeatureTileLayer::new(rasterizer.clone()).with_style_sheet(sheet);
    layer.set_feature_source(Arc::new(source)).unwrap();
    layer.initialize().unwrap();

    let image = layer.render_tile(&west_root()).unwrap();
    let passes = rasterizer.passes();
    assert_eq!(
        passes,
        vec![
            ("red-dot".to_string(), vec![1]),
            ("blue-dot".to_string(), vec![2]),
        ]
    );
    assert_eq!(opaque_pixel_count(&image), 2);
}

#[test]
fn geometry_override_from_config_string() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    let source = MemoryFeatureSource::new(FeatureProfile::new(world_extent()))
        .with_feature(Feature::new(
            1,
            Geometry::Polygon(vec![(-100.0, 40.0), (-99.0, 40.0), (-99.0, 41.0)]),
        ))
        .with_feature(Feature::new(2, Geometry::PointSet(vec![(-100.0, 40.0)])));

    let target = GeometryType::parse_override("Lines").unwrap();
    let mut layer = FeatureTileLayer::new(rasterizer.clone()).with_geometry_override(target);
    layer.set_feature_source(Arc::new(source)).unwrap();
    layer.initialize().unwrap();

    layer.render_tile(&west_root()).unwrap();
    let passes = rasterizer.passes();
    assert_eq!(passes.len(), 1);
    // Polygon converted to a line string; the point was dropped.
    assert_eq!(passes[0].1, vec![1]);
}

#[test]
fn lod_gate_controls_full_rendering() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    let source = MemoryFeatureSource::new(FeatureProfile::new(world_extent()))
        .with_feature(Feature::new(1, Geometry::PointSet(vec![(-100.0, 40.0)])));
    let layout = FeatureDisplayLayout::new(15.0).with_policy(LodPolicy::MinLevel(2));

    let mut layer = FeatureTileLayer::new(rasterizer.clone()).with_layout(layout);
    layer.set_feature_source(Arc::new(source)).unwrap();
    layer.initialize().unwrap();

    // Below the threshold: image allocated, no dispatch.
    let image = layer.render_tile(&west_root()).unwrap();
    assert!(rasterizer.passes().is_empty());
    assert_eq!(opaque_pixel_count(&image), 0);

    // At the threshold: full rendering.
    let key = TileKey::new(2, 1, 1, TilingProfile::GlobalGeodetic).unwrap();
    assert!(key.extent().contains(-100.0, 40.0));
    let image = layer.render_tile(&key).unwrap();
    assert_eq!(rasterizer.passes().len(), 1);
    assert_eq!(opaque_pixel_count(&image), 1);
}

#[test]
fn initialization_without_source_is_the_hard_failure() {
    let mut layer = FeatureTileLayer::new(Arc::new(VertexRasterizer::default()));
    assert_eq!(layer.initialize(), Err(LayerError::NoFeatureSource));
}

#[test]
fn initialized_layer_renders_concurrently() {
    let rasterizer = Arc::new(VertexRasterizer::default());
    let source = MemoryFeatureSource::new(FeatureProfile::new(world_extent()))
        .with_feature(Feature::new(1, Geometry::PointSet(vec![(-100.0, 40.0)])))
        .with_feature(Feature::new(2, Geometry::PointSet(vec![(100.0, -40.0)])));

    let mut layer = FeatureTileLayer::new(rasterizer);
    layer.set_feature_source(Arc::new(source)).unwrap();
    layer.initialize().unwrap();
    let layer = Arc::new(layer);

    let handles: Vec<_> = (0..4u32)
        .map(|i| {
            let layer = Arc::clone(&layer);
            std::thread::spawn(move || {
                let key = TileKey::new(1, i / 2, i % 2, TilingProfile::GlobalGeodetic).unwrap();
                layer.render_tile(&key).map(|img| img.width())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(256));
    }
}
