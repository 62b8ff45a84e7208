//! Rectangle layer.

use super::{LayerBase, LayerTrait, LayerType};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A rectangle with optional rounded corners. Origin is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl RectangleLayer {
    pub fn new(base: LayerBase) -> Self {
        Self {
            base,
            corner_radius: None,
        }
    }

    /// Get the local-frame rectangle.
    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.base.width, self.base.height).abs()
    }
}

impl LayerTrait for RectangleLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Rectangle
    }

    fn local_bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        let pad = tolerance + self.base.stroke_width / 2.0;
        self.as_rect().inflate(pad, pad).contains(point)
    }
}
