//! Freehand stroke engine: sample capture and outline generation.

mod capture;
mod outline;

pub use capture::{StrokeCapture, StrokeOutline};
pub use outline::{outline_from_points, outline_to_path, stroke_outline, stroke_points, StrokePoint};

use serde::{Deserialize, Serialize};

/// How far a stroke end narrows.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Taper {
    #[default]
    None,
    /// Taper across the whole stroke.
    Full,
    /// Taper over a fixed distance in canvas units.
    Length(f64),
}

impl Taper {
    pub(crate) fn length(self, size: f64, total_length: f64) -> f64 {
        match self {
            Taper::None => 0.0,
            Taper::Full => size.max(total_length),
            Taper::Length(length) => length.max(0.0),
        }
    }
}

/// Options for one end of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaperOptions {
    /// Round the end off when it is not tapered.
    pub cap: bool,
    pub taper: Taper,
}

impl Default for TaperOptions {
    fn default() -> Self {
        Self {
            cap: true,
            taper: Taper::None,
        }
    }
}

/// Parameters of the outline algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeOptions {
    /// Base diameter of the stroke.
    pub size: f64,
    /// How much pressure affects the diameter, in `[-1, 1]`.
    pub thinning: f64,
    /// How far apart outline points must be, relative to `size`.
    pub smoothing: f64,
    /// How strongly input points are pulled towards the previous point.
    pub streamline: f64,
    /// Derive pressure from pointer speed instead of the device.
    pub simulate_pressure: bool,
    pub start: TaperOptions,
    pub end: TaperOptions,
    /// The input is complete; the final sample is used as-is.
    pub last: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 10.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            simulate_pressure: true,
            start: TaperOptions::default(),
            end: TaperOptions::default(),
            last: false,
        }
    }
}

impl StrokeOptions {
    /// True when every parameter is in range.
    pub fn is_valid(&self) -> bool {
        self.size.is_finite()
            && self.size > 0.0
            && (-1.0..=1.0).contains(&self.thinning)
            && (0.0..=1.0).contains(&self.smoothing)
            && (0.0..=1.0).contains(&self.streamline)
    }
}
