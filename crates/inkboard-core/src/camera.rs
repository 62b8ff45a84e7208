//! Camera module for pan/zoom transforms.

use crate::error::{BoardError, BoardResult};
use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom range and wheel step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Multiplicative factor applied per wheel notch.
    pub zoom_step: f64,
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 10.0,
            zoom_step: 1.1,
        }
    }
}

impl CameraLimits {
    /// Clamp `scale` into range. Non-finite input collapses to the nearest
    /// sensible bound.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.min_scale.max(1.0_f64.min(self.max_scale));
        }
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Error if `scale` is outside the range.
    pub fn check_scale(&self, scale: f64) -> BoardResult<()> {
        if (self.min_scale..=self.max_scale).contains(&scale) {
            Ok(())
        } else {
            Err(BoardError::ScaleOutOfRange {
                scale,
                min: self.min_scale,
                max: self.max_scale,
            })
        }
    }

    pub(crate) fn validate(&self) -> BoardResult<()> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(BoardError::Config(format!(
                "min_scale must be positive, got {}",
                self.min_scale
            )));
        }
        if !(self.max_scale.is_finite() && self.max_scale >= self.min_scale) {
            return Err(BoardError::Config(format!(
                "max_scale {} is below min_scale {}",
                self.max_scale, self.min_scale
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(BoardError::Config(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}

/// Which way a zoom gesture goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Direction of a wheel event. Scrolling down zooms out; holding
    /// ctrl/cmd (trackpad pinch) inverts that.
    pub fn from_wheel(delta_y: f64, ctrl: bool) -> Self {
        let zoom_out = delta_y > 0.0;
        if zoom_out != ctrl {
            ZoomDirection::Out
        } else {
            ZoomDirection::In
        }
    }
}

/// The view transform.
///
/// `x, y` is the screen position of the canvas origin (the accumulated pan)
/// and `scale` the zoom factor. Cameras are values: every operation returns
/// a new one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Camera {
    pub fn new(x: f64, y: f64, scale: f64) -> Self {
        Self { x, y, scale }
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Canvas to screen transform, for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset()) * Affine::scale(self.scale)
    }

    /// Screen to canvas transform, for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset())
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a screen-space length to canvas units.
    pub fn screen_len_to_canvas(&self, len: f64) -> f64 {
        len / self.scale
    }

    /// Pan by a screen-space delta. Scale is unchanged.
    pub fn panned(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }

    /// Rescale keeping the canvas point under `screen_point` fixed.
    pub fn zoomed_to(self, screen_point: Point, scale: f64, limits: &CameraLimits) -> Self {
        let new_scale = limits.clamp_scale(scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return self;
        }

        let anchor = self.screen_to_canvas(screen_point);
        Self {
            x: screen_point.x - anchor.x * new_scale,
            y: screen_point.y - anchor.y * new_scale,
            scale: new_scale,
        }
    }

    /// One wheel step of pointer-anchored zoom.
    pub fn zoom_at(self, screen_point: Point, direction: ZoomDirection, limits: &CameraLimits) -> Self {
        let scale = match direction {
            ZoomDirection::In => self.scale * limits.zoom_step,
            ZoomDirection::Out => self.scale / limits.zoom_step,
        };
        self.zoomed_to(screen_point, scale, limits)
    }

    /// Merge a partial update, clamping the scale. Non-finite fields are
    /// dropped.
    pub fn merged(self, update: &CameraUpdate, limits: &CameraLimits) -> Self {
        let pick = |value: Option<f64>, current: f64| match value {
            Some(v) if v.is_finite() => v,
            _ => current,
        };
        let scale = match update.scale {
            Some(s) if !s.is_nan() => limits.clamp_scale(s),
            _ => self.scale,
        };
        Self {
            x: pick(update.x, self.x),
            y: pick(update.y, self.y),
            scale,
        }
    }
}

/// Partial camera update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl CameraUpdate {
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            scale: None,
        }
    }
}

impl From<Camera> for CameraUpdate {
    fn from(camera: Camera) -> Self {
        Self {
            x: Some(camera.x),
            y: Some(camera.y),
            scale: Some(camera.scale),
        }
    }
}
