//! SVG rendering of a cleaning cycle.
//!
//! Draws, bottom to top:
//! - cleaned cells (translucent fill)
//! - room polygons and feature-map walls
//! - uncleaned cells, colored per region, and each region's centroid
//! - docking station, robot pose, and the two boundary thresholds

use std::fmt::Write;
use std::path::Path;

use crate::core::{CellState, WorldPoint};
use crate::monitor::{Thresholds, Verdict};
use crate::orchestrator::CycleResult;

use super::payload::{FeatureMap, LineSegment, Polygon};

/// Region colors, cycled by region index
pub const REGION_COLORS: [&str; 10] = [
    "red", "blue", "green", "orange", "purple", "cyan", "magenta", "yellow", "brown", "lime",
];

/// Configuration for SVG rendering
#[derive(Clone, Debug)]
pub struct SvgConfig {
    /// Pixels per world unit
    pub scale: f64,
    /// Padding around the drawing in pixels
    pub padding: f64,
    /// Cleaned cell fill
    pub cleaned_color: &'static str,
    /// Wall and polygon stroke
    pub wall_color: &'static str,
    /// Radius of uncleaned-cell dots in pixels
    pub cell_dot_radius: f64,
    /// Radius of centroid markers in pixels
    pub centroid_radius: f64,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            scale: 0.1,
            padding: 20.0,
            cleaned_color: "#4169E1",
            wall_color: "#808080",
            cell_dot_radius: 1.0,
            centroid_radius: 4.0,
        }
    }
}

/// Axis-aligned world bounds
#[derive(Clone, Copy, Debug)]
struct Bounds {
    min: WorldPoint,
    max: WorldPoint,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min: WorldPoint::new(f64::INFINITY, f64::INFINITY),
            max: WorldPoint::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    fn include(&mut self, p: WorldPoint) {
        if !p.is_finite() {
            return;
        }
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }
}

/// Builder that renders a [`CycleResult`] with optional map context.
pub struct CycleRenderer {
    config: SvgConfig,
    feature_map: Option<FeatureMap>,
    polygons: Vec<Polygon>,
    thresholds: Option<Thresholds>,
}

impl CycleRenderer {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            feature_map: None,
            polygons: Vec::new(),
            thresholds: None,
        }
    }

    /// Add walls, docking pose and map id from the feature map
    pub fn with_feature_map(mut self, feature_map: FeatureMap) -> Self {
        self.feature_map = Some(feature_map);
        self
    }

    /// Add room outlines
    pub fn with_polygons(mut self, polygons: Vec<Polygon>) -> Self {
        self.polygons = polygons;
        self
    }

    /// Draw threshold lines
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Render to an SVG string
    pub fn render(&self, result: &CycleResult) -> String {
        let bounds = self.bounds(result);
        let scale = self.config.scale;
        let padding = self.config.padding;
        let title_height = 30.0;

        let width = (bounds.max.x - bounds.min.x) * scale + 2.0 * padding;
        let height = (bounds.max.y - bounds.min.y) * scale + 2.0 * padding + title_height;

        // World to pixel, SVG Y-axis flipped
        let to_px = |p: WorldPoint| -> (f64, f64) {
            (
                padding + (p.x - bounds.min.x) * scale,
                title_height + padding + (bounds.max.y - p.y) * scale,
            )
        };

        let mut svg = String::new();
        writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#).unwrap();
        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
            width, height, width, height
        )
        .unwrap();
        writeln!(&mut svg, r##"  <rect width="100%" height="100%" fill="#FFFFFF"/>"##).unwrap();

        let map_id = self.feature_map.as_ref().and_then(FeatureMap::map_id);
        writeln!(
            &mut svg,
            r##"  <text x="{:.0}" y="22" font-family="sans-serif" font-size="14" text-anchor="middle" fill="#333">map_id : {} | cycle {} | {}</text>"##,
            width / 2.0,
            map_id.as_deref().unwrap_or("-"),
            result.cycle,
            verdict_label(result.verdict)
        )
        .unwrap();

        self.render_cleaned(&mut svg, result, &to_px);
        self.render_walls(&mut svg, &to_px);
        self.render_regions(&mut svg, result, &to_px);
        self.render_markers(&mut svg, result, &to_px);
        self.render_thresholds(&mut svg, bounds, &to_px);

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    /// Render and write to `path`
    pub fn save(&self, result: &CycleResult, path: &Path) -> Result<(), std::io::Error> {
        std::fs::write(path, self.render(result))
    }

    fn bounds(&self, result: &CycleResult) -> Bounds {
        let mut bounds = Bounds::empty();

        if result.descriptor.cell_count() > 0 {
            let (min, max) = result.descriptor.bounds();
            bounds.include(min);
            bounds.include(max);
        }
        for region in &result.regions {
            bounds.include(region.centroid);
        }
        if let Some(pose) = result.pose {
            bounds.include(pose.position());
        }
        for segment in self.segments() {
            bounds.include(segment.start());
            bounds.include(segment.end());
        }
        if let Some(dock) = self.feature_map.as_ref().and_then(|m| m.docking_pose) {
            bounds.include(WorldPoint::new(dock.x, dock.y));
        }

        if bounds.is_empty() {
            bounds.include(WorldPoint::ZERO);
        }

        // Stretch to include both threshold lines
        if let Some(t) = self.thresholds {
            bounds.include(WorldPoint::new(t.x, bounds.min.y));
            bounds.include(WorldPoint::new(bounds.min.x, t.y));
        }

        // Keep a degenerate drawing visible
        if bounds.max.x - bounds.min.x < 1.0 {
            bounds.max.x = bounds.min.x + 1.0;
        }
        if bounds.max.y - bounds.min.y < 1.0 {
            bounds.max.y = bounds.min.y + 1.0;
        }

        bounds
    }

    fn segments(&self) -> impl Iterator<Item = &LineSegment> + '_ {
        let lines = self
            .feature_map
            .iter()
            .flat_map(|m| m.lines.iter());
        let outlines = self.polygons.iter().flat_map(|p| p.segments.iter());
        lines.chain(outlines)
    }

    fn render_cleaned(
        &self,
        svg: &mut String,
        result: &CycleResult,
        to_px: &impl Fn(WorldPoint) -> (f64, f64),
    ) {
        let cell_px = result.descriptor.resolution * self.config.scale;

        writeln!(svg, r#"  <g id="cleaned" opacity="0.5">"#).unwrap();
        for (cell, state) in result.grid.iter() {
            if state != CellState::Cleaned {
                continue;
            }
            // Anchor at the cell's upper-left corner in pixel space
            let corner = result.descriptor.cell_to_world(cell);
            let (px, py) = to_px(WorldPoint::new(
                corner.x,
                corner.y + result.descriptor.resolution,
            ));
            writeln!(
                svg,
                r#"    <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                px, py, cell_px, cell_px, self.config.cleaned_color
            )
            .unwrap();
        }
        writeln!(svg, "  </g>").unwrap();
    }

    fn render_walls(&self, svg: &mut String, to_px: &impl Fn(WorldPoint) -> (f64, f64)) {
        writeln!(svg, r#"  <g id="walls">"#).unwrap();
        for segment in self.segments() {
            let (x1, y1) = to_px(segment.start());
            let (x2, y2) = to_px(segment.end());
            writeln!(
                svg,
                r#"    <line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1.5"/>"#,
                x1, y1, x2, y2, self.config.wall_color
            )
            .unwrap();
        }
        writeln!(svg, "  </g>").unwrap();
    }

    fn render_regions(
        &self,
        svg: &mut String,
        result: &CycleResult,
        to_px: &impl Fn(WorldPoint) -> (f64, f64),
    ) {
        writeln!(svg, r#"  <g id="regions">"#).unwrap();
        for (i, located) in result.regions.iter().enumerate() {
            let color = REGION_COLORS[i % REGION_COLORS.len()];
            writeln!(svg, r#"    <g id="region-{}" fill="{}">"#, i + 1, color).unwrap();

            for &cell in located.region.cells() {
                let (px, py) = to_px(result.descriptor.cell_to_world(cell));
                writeln!(
                    svg,
                    r#"      <circle cx="{:.1}" cy="{:.1}" r="{:.1}"/>"#,
                    px, py, self.config.cell_dot_radius
                )
                .unwrap();
            }

            let (cx, cy) = to_px(located.centroid);
            writeln!(
                svg,
                r#"      <circle class="centroid" cx="{:.1}" cy="{:.1}" r="{:.1}" stroke="black" stroke-width="1"/>"#,
                cx, cy, self.config.centroid_radius
            )
            .unwrap();
            writeln!(svg, "    </g>").unwrap();
        }
        writeln!(svg, "  </g>").unwrap();
    }

    fn render_markers(
        &self,
        svg: &mut String,
        result: &CycleResult,
        to_px: &impl Fn(WorldPoint) -> (f64, f64),
    ) {
        if let Some(dock) = self.feature_map.as_ref().and_then(|m| m.docking_pose) {
            let (x, y) = to_px(WorldPoint::new(dock.x, dock.y));
            let r = 6.0;
            writeln!(
                svg,
                r##"  <polygon id="dock" points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" fill="#1F77B4"/>"##,
                x, y - r, x + r, y, x, y + r, x - r, y
            )
            .unwrap();
        }

        if let Some(pose) = result.pose {
            let (x, y) = to_px(pose.position());
            writeln!(
                svg,
                r##"  <polygon id="robot" points="{}" fill="#FF7F0E" stroke="black" stroke-width="0.5"/>"##,
                star_points(x, y, 9.0, 4.0)
            )
            .unwrap();
        }
    }

    fn render_thresholds(
        &self,
        svg: &mut String,
        bounds: Bounds,
        to_px: &impl Fn(WorldPoint) -> (f64, f64),
    ) {
        let Some(t) = self.thresholds else {
            return;
        };

        let (x, top) = to_px(WorldPoint::new(t.x, bounds.max.y));
        let (_, bottom) = to_px(WorldPoint::new(t.x, bounds.min.y));
        writeln!(
            svg,
            r#"  <line id="threshold-x" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="red" stroke-width="1" stroke-dasharray="6,4"/>"#,
            x, top, x, bottom
        )
        .unwrap();

        let (left, y) = to_px(WorldPoint::new(bounds.min.x, t.y));
        let (right, _) = to_px(WorldPoint::new(bounds.max.x, t.y));
        writeln!(
            svg,
            r#"  <line id="threshold-y" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="green" stroke-width="1" stroke-dasharray="6,4"/>"#,
            left, y, right, y
        )
        .unwrap();
    }
}

fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Nominal => "nominal",
        Verdict::Violated => "boundary violated",
        Verdict::Unknown => "pose unknown",
    }
}

/// Five-pointed star polygon points around `(cx, cy)`
fn star_points(cx: f64, cy: f64, outer: f64, inner: f64) -> String {
    let mut points = String::new();
    for i in 0..10 {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / 5.0;
        if i > 0 {
            points.push(' ');
        }
        write!(
            &mut points,
            "{:.1},{:.1}",
            cx + radius * angle.cos(),
            cy + radius * angle.sin()
        )
        .unwrap();
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GridDescriptor;
    use crate::coverage::RunLengthStream;
    use crate::io::payload::{DockingPose, GridPayload, PosePayload};
    use crate::orchestrator::{CleaningOrchestrator, RecordingGateway};
    use tempfile::TempDir;

    fn sample_result() -> CycleResult {
        let descriptor = GridDescriptor {
            lower_left_x: -500.0,
            lower_left_y: -500.0,
            size_x: 10,
            size_y: 10,
            resolution: 100.0,
        };
        let stream = RunLengthStream::new(vec![3, 4, 20, 2]);
        let mut orch = CleaningOrchestrator::new(
            RecordingGateway::new(),
            Thresholds::new(-1300.0, -2500.0),
            WorldPoint::ZERO,
        );
        orch.run_cycle(
            &GridPayload::from_parts(&descriptor, &stream),
            Some(&PosePayload::new(100.0, 200.0)),
        )
        .unwrap()
    }

    #[test]
    fn test_render_basic() {
        let result = sample_result();
        let svg = CycleRenderer::new(SvgConfig::default()).render(&result);
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"id="region-1""#));
        assert!(svg.contains(r#"id="region-2""#));
        assert_eq!(svg.matches(r#"class="centroid""#).count(), 2);
        assert!(svg.contains(r#"id="robot""#));
        assert!(!svg.contains("threshold-x"));
    }

    #[test]
    fn test_render_with_context() {
        let result = sample_result();
        let feature_map = FeatureMap {
            map_id: Some(serde_json::json!(5)),
            lines: vec![LineSegment {
                x1: -500.0,
                y1: -500.0,
                x2: 500.0,
                y2: -500.0,
            }],
            docking_pose: Some(DockingPose { x: 0.0, y: -450.0 }),
        };
        let svg = CycleRenderer::new(SvgConfig::default())
            .with_feature_map(feature_map)
            .with_polygons(vec![Polygon {
                segments: vec![LineSegment {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 0.0,
                    y2: 100.0,
                }],
            }])
            .with_thresholds(Thresholds::new(-1300.0, -2500.0))
            .render(&result);

        assert!(svg.contains("map_id : 5"));
        assert!(svg.contains(r#"id="dock""#));
        assert!(svg.contains("threshold-x"));
        assert!(svg.contains("threshold-y"));
        assert_eq!(svg.matches("<line ").count(), 4);
    }

    #[test]
    fn test_render_empty_grid() {
        let mut orch = CleaningOrchestrator::new(
            RecordingGateway::new(),
            Thresholds::new(-1300.0, -2500.0),
            WorldPoint::ZERO,
        );
        let payload = GridPayload {
            lower_left_x: Some(0.0),
            lower_left_y: Some(0.0),
            size_x: Some(0),
            size_y: Some(0),
            resolution: Some(50.0),
            cleaned: Some(vec![]),
        };
        let result = orch.run_cycle(&payload, None).unwrap();
        let svg = CycleRenderer::new(SvgConfig::default()).render(&result);
        assert!(svg.contains("pose unknown"));
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("result.svg");
        CycleRenderer::new(SvgConfig::default())
            .save(&sample_result(), &path)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml"));
    }

    #[test]
    fn test_save_to_missing_dir_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("result.svg");
        let err = CycleRenderer::new(SvgConfig::default())
            .save(&sample_result(), &path)
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
