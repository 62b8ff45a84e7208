//! In-progress freehand capture.

use super::{outline_to_path, stroke_outline, StrokeOptions};
use crate::layers::{LayerColor, PathLayer, StrokeSample};
use kurbo::{BezPath, Point};

/// Derived outline of a sample sequence.
#[derive(Debug, Clone)]
pub struct StrokeOutline {
    /// Closed boundary polygon.
    pub polygon: Vec<Point>,
    /// The polygon as a fillable path.
    pub path: BezPath,
}

impl StrokeOutline {
    pub fn from_samples(samples: &[StrokeSample], options: &StrokeOptions) -> Self {
        let polygon = stroke_outline(samples, options);
        let path = outline_to_path(&polygon);
        Self { polygon, path }
    }

    /// SVG path data of the outline.
    pub fn svg_path_data(&self) -> String {
        self.path.to_svg()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum CaptureState {
    #[default]
    Idle,
    Capturing,
}

/// Buffers pointer samples for one stroke and keeps a live preview.
///
/// The buffer lives here, not in the layer store; the store only sees the
/// finished [`PathLayer`].
#[derive(Debug, Clone)]
pub struct StrokeCapture {
    state: CaptureState,
    samples: Vec<StrokeSample>,
    preview: Option<StrokeOutline>,
    options: StrokeOptions,
    default_pressure: f64,
    fill: LayerColor,
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(StrokeOptions::default(), 0.5)
    }
}

impl StrokeCapture {
    pub fn new(options: StrokeOptions, default_pressure: f64) -> Self {
        Self {
            state: CaptureState::Idle,
            samples: Vec::new(),
            preview: None,
            options,
            default_pressure,
            fill: LayerColor::black(),
        }
    }

    pub fn options(&self) -> &StrokeOptions {
        &self.options
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    /// Start a new stroke, dropping anything left over.
    pub fn begin(&mut self) {
        self.samples.clear();
        self.preview = None;
        self.state = CaptureState::Capturing;
        log::trace!("stroke capture started");
    }

    /// Append a canvas-space sample and refresh the preview.
    ///
    /// Missing, zero or non-finite pressure falls back to the default.
    /// Ignored while idle.
    pub fn push(&mut self, point: Point, pressure: Option<f64>) -> Option<&StrokeOutline> {
        if !self.is_capturing() {
            return None;
        }
        let pressure = match pressure {
            Some(p) if p.is_finite() && p > 0.0 => p.min(1.0),
            _ => self.default_pressure,
        };
        self.samples.push(StrokeSample::new(point.x, point.y, pressure));
        self.preview = Some(StrokeOutline::from_samples(&self.samples, &self.options));
        self.preview.as_ref()
    }

    /// Samples captured so far.
    pub fn samples(&self) -> &[StrokeSample] {
        &self.samples
    }

    /// Outline of the stroke in progress.
    pub fn preview(&self) -> Option<&StrokeOutline> {
        self.preview.as_ref()
    }

    /// End the stroke. Returns the path to commit, or `None` when nothing
    /// was captured.
    pub fn finish(&mut self) -> Option<PathLayer> {
        if !self.is_capturing() {
            return None;
        }
        self.state = CaptureState::Idle;
        self.preview = None;
        let samples = std::mem::take(&mut self.samples);
        if samples.is_empty() {
            log::debug!("stroke released with no samples");
            return None;
        }
        log::debug!("stroke finished with {} samples", samples.len());
        Some(PathLayer::from_samples(samples, self.fill).with_size(self.options.size))
    }

    /// Drop the stroke in progress.
    pub fn discard(&mut self) {
        if self.is_capturing() {
            log::debug!("stroke discarded with {} samples", self.samples.len());
        }
        self.state = CaptureState::Idle;
        self.samples.clear();
        self.preview = None;
    }
}
