//! Text layer.

use super::{LayerBase, LayerTrait, LayerType};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Horizontal text alignment inside the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A block of text laid out inside `width × height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    #[serde(flatten)]
    pub base: LayerBase,
    /// The text content (may be empty).
    pub text: String,
    /// Font size in canvas units, always positive.
    pub font_size: f64,
    pub font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

impl TextLayer {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "sans-serif";

    pub fn new(base: LayerBase, text: impl Into<String>) -> Self {
        Self {
            base,
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            align: None,
        }
    }

    pub fn align(&self) -> TextAlign {
        self.align.unwrap_or_default()
    }
}

impl LayerTrait for TextLayer {
    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Text
    }

    fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.base.width, self.base.height).abs()
    }

    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool {
        self.local_bounds().inflate(tolerance, tolerance).contains(point)
    }
}
