//! Freehand path layer.

use super::{point_to_segment_dist, LayerBase, LayerColor, LayerTrait, LayerType};
use crate::stroke::{stroke_outline, StrokeOptions};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// One captured pointer sample. Serialized as an `[x, y, pressure]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct StrokeSample {
    pub x: f64,
    pub y: f64,
    /// Normalized pressure in `[0, 1]`.
    pub pressure: f64,
}

impl StrokeSample {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self { x, y, pressure }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<[f64; 3]> for StrokeSample {
    fn from([x, y, pressure]: [f64; 3]) -> Self {
        Self { x, y, pressure }
    }
}

impl From<StrokeSample> for [f64; 3] {
    fn from(sample: StrokeSample) -> Self {
        [sample.x, sample.y, sample.pressure]
    }
}

/// A committed freehand stroke.
///
/// Samples were absolute canvas coordinates at capture time, so a freshly
/// committed path has its origin at `(0, 0)`. Moving the path changes the
/// origin and leaves the samples untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    pub points: Vec<StrokeSample>,
    /// Outline size the stroke was drawn with. `None` means the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl PathLayer {
    /// Build a path from captured samples, filled with `fill`.
    pub fn from_samples(points: Vec<StrokeSample>, fill: LayerColor) -> Self {
        let mut base = LayerBase::new(0.0, 0.0, 0.0, 0.0);
        base.fill = fill;
        Self {
            base,
            points,
            size: None,
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    /// Outline size, falling back to the default stroke size.
    pub fn stroke_size(&self) -> f64 {
        self.size.unwrap_or(StrokeOptions::default().size)
    }

    /// `options` with the size replaced by this path's own.
    pub fn stroke_options(&self, options: &StrokeOptions) -> StrokeOptions {
        StrokeOptions {
            size: self.size.unwrap_or(options.size),
            ..*options
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Outline polygon in the local frame.
    pub fn outline(&self, options: &StrokeOptions) -> Vec<Point> {
        stroke_outline(&self.points, &self.stroke_options(options))
    }

    fn hit_radius(&self) -> f64 {
        self.stroke_size() / 2.0
    }
}

impl LayerTrait for PathLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Path
    }

    fn local_bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let bounds = self
            .points
            .iter()
            .fold(Rect::from_points(first.point(), first.point()), |acc, sample| {
                acc.union_pt(sample.point())
            });
        let pad = self.hit_radius();
        bounds.inflate(pad, pad)
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        let reach = tolerance + self.hit_radius();
        match self.points.as_slice() {
            [] => false,
            [only] => point.distance(only.point()) <= reach,
            samples => samples
                .windows(2)
                .any(|w| point_to_segment_dist(point, w[0].point(), w[1].point()) <= reach),
        }
    }
}
