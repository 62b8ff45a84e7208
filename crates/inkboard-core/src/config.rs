//! Board configuration.
//!
//! Every tunable the core uses lives in [`BoardConfig`]. All fields have
//! defaults, so a partial JSON document is enough:
//!
//! ```json
//! {
//!   "camera": { "minScale": 0.2, "maxScale": 4.0 },
//!   "stroke": { "size": 8 },
//!   "historyLimit": 100
//! }
//! ```

use crate::camera::CameraLimits;
use crate::controls::ZoomControlLimits;
use crate::error::{BoardError, BoardResult};
use crate::mode::ModeChangePolicy;
use crate::stroke::StrokeOptions;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Smallest width or height a resize may produce.
pub const MIN_LAYER_SIZE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Limits for wheel zoom and direct camera updates.
    pub camera: CameraLimits,
    /// Stricter limits for the zoom buttons.
    pub zoom_control: ZoomControlLimits,
    /// Freehand outline parameters.
    pub stroke: StrokeOptions,
    pub min_layer_size: f64,
    /// Pressure recorded when the device reports none.
    pub default_pressure: f64,
    pub history_limit: usize,
    pub rotation_enabled: bool,
    /// Rotation increment while Shift is held, in degrees.
    pub rotation_snap_degrees: f64,
    /// Initial viewport, used to centre new layers.
    pub viewport: Size,
    pub mid_capture_mode_change: ModeChangePolicy,
    /// Pick radius in screen pixels.
    pub hit_tolerance: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            camera: CameraLimits::default(),
            zoom_control: ZoomControlLimits::default(),
            stroke: StrokeOptions::default(),
            min_layer_size: MIN_LAYER_SIZE,
            default_pressure: 0.5,
            history_limit: crate::history::DEFAULT_HISTORY_LIMIT,
            rotation_enabled: true,
            rotation_snap_degrees: 15.0,
            viewport: Size::new(800.0, 600.0),
            mid_capture_mode_change: ModeChangePolicy::default(),
            hit_tolerance: 4.0,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> BoardResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BoardError::Config(e.to_string()))?;
        config.validate()?;
        log::debug!("Loaded board configuration");
        Ok(config)
    }

    pub fn to_json(&self) -> BoardResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BoardError::Config(e.to_string()))
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> BoardResult<()> {
        self.camera.validate()?;
        self.zoom_control.validate()?;

        if !self.stroke.is_valid() {
            return Err(BoardError::Config(format!(
                "stroke options out of range: {:?}",
                self.stroke
            )));
        }
        if !(self.min_layer_size.is_finite() && self.min_layer_size >= 0.0) {
            return Err(BoardError::Config(format!(
                "min_layer_size must be non-negative, got {}",
                self.min_layer_size
            )));
        }
        if !(self.default_pressure > 0.0 && self.default_pressure <= 1.0) {
            return Err(BoardError::Config(format!(
                "default_pressure must be in (0, 1], got {}",
                self.default_pressure
            )));
        }
        if self.history_limit == 0 {
            return Err(BoardError::Config("history_limit must be at least 1".to_string()));
        }
        if !(self.rotation_snap_degrees.is_finite() && self.rotation_snap_degrees > 0.0) {
            return Err(BoardError::Config(format!(
                "rotation_snap_degrees must be positive, got {}",
                self.rotation_snap_degrees
            )));
        }
        if !(self.viewport.width >= 0.0 && self.viewport.height >= 0.0) {
            return Err(BoardError::Config(format!(
                "viewport must not be negative, got {:?}",
                self.viewport
            )));
        }
        if !(self.hit_tolerance.is_finite() && self.hit_tolerance >= 0.0) {
            return Err(BoardError::Config(format!(
                "hit_tolerance must be non-negative, got {}",
                self.hit_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.min_layer_size - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.mid_capture_mode_change, ModeChangePolicy::Commit);
    }

    #[test]
    fn test_partial_json() {
        let config = BoardConfig::from_json(
            r#"{ "camera": { "minScale": 0.2, "maxScale": 4.0 }, "historyLimit": 10 }"#,
        )
        .unwrap();
        assert!((config.camera.min_scale - 0.2).abs() < f64::EPSILON);
        assert!((config.camera.zoom_step - 1.1).abs() < f64::EPSILON);
        assert_eq!(config.history_limit, 10);
        assert!((config.stroke.size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip() {
        let config = BoardConfig {
            mid_capture_mode_change: ModeChangePolicy::Discard,
            ..BoardConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(BoardConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        let cases = [
            r#"{ "camera": { "minScale": 0.0 } }"#,
            r#"{ "camera": { "minScale": 5.0, "maxScale": 1.0 } }"#,
            r#"{ "camera": { "zoomStep": 1.0 } }"#,
            r#"{ "historyLimit": 0 }"#,
            r#"{ "defaultPressure": 0.0 }"#,
            r#"{ "stroke": { "size": -1 } }"#,
            r#"not json"#,
        ];
        for case in cases {
            assert!(
                matches!(BoardConfig::from_json(case), Err(BoardError::Config(_))),
                "accepted {case}"
            );
        }
    }
}
