//! Layer definitions for the whiteboard.
//!
//! A layer is one drawable entity. The set of kinds is closed: every
//! operation that needs kind-specific data matches exhaustively on
//! [`Layer`].

mod circle;
mod factory;
mod path;
mod rectangle;
mod text;

pub use circle::CircleLayer;
pub use factory::{create_layer_factory, FactoryContext};
pub use path::{PathLayer, StrokeSample};
pub use rectangle::RectangleLayer;
pub use text::{TextAlign, TextLayer};

use kurbo::{Affine, Point, Rect, Shape as KurboShape, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, immutable layer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The discriminant of a layer.
///
/// `Icon` is reserved: it names a kind that has no layer representation yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerType {
    Rectangle,
    Circle,
    Text,
    Path,
    Icon,
}

impl LayerType {
    /// Get the display name for this layer type.
    pub fn name(self) -> &'static str {
        match self {
            LayerType::Rectangle => "Rectangle",
            LayerType::Circle => "Circle",
            LayerType::Text => "Text",
            LayerType::Path => "Path",
            LayerType::Icon => "Icon",
        }
    }

    /// Whether layers of this kind get resize handles.
    pub fn is_resizable(self) -> bool {
        matches!(self, LayerType::Rectangle | LayerType::Circle | LayerType::Text)
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RGBA8 color as stored on a layer. Serialized as a hex string or
/// `"transparent"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl LayerColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse `transparent`, `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Some(Self::transparent());
        }
        let hex = value.strip_prefix('#')?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb` (opaque), `#rrggbbaa`, or `transparent`.
    pub fn to_hex(&self) -> String {
        match self.a {
            0 => "transparent".to_string(),
            255 => format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b),
            a => format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a),
        }
    }
}

impl TryFrom<String> for LayerColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid color {value:?}"))
    }
}

impl From<LayerColor> for String {
    fn from(color: LayerColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for LayerColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<LayerColor> for Color {
    fn from(color: LayerColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Attributes shared by every layer kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerBase {
    pub(crate) id: LayerId,
    /// Canvas-space origin.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: LayerColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<LayerColor>,
    #[serde(default)]
    pub stroke_width: f64,
    /// Rotation in degrees, about the origin.
    #[serde(default)]
    pub rotation: f64,
}

impl LayerBase {
    /// Create base attributes with a fresh id.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: LayerId::new(),
            x,
            y,
            width,
            height,
            fill: LayerColor::transparent(),
            stroke: None,
            stroke_width: 0.0,
            rotation: 0.0,
        }
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Local-to-canvas transform: translate to the origin, then rotate.
    pub fn transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }
}

/// Behavior every layer kind provides.
///
/// Geometry methods work in the layer's local frame, where the origin
/// `(x, y)` sits at `(0, 0)` and rotation has not been applied.
pub trait LayerTrait {
    fn base(&self) -> &LayerBase;

    fn base_mut(&mut self) -> &mut LayerBase;

    fn layer_type(&self) -> LayerType;

    /// Bounding box in the local frame.
    fn local_bounds(&self) -> Rect;

    /// Hit-test a point given in the local frame.
    fn hit_test_local(&self, point: Point, tolerance: f64) -> bool;
}

/// A drawable entity. Tagged by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    Rectangle(RectangleLayer),
    Circle(CircleLayer),
    Text(TextLayer),
    Path(PathLayer),
}

impl Layer {
    fn inner(&self) -> &dyn LayerTrait {
        match self {
            Layer::Rectangle(l) => l,
            Layer::Circle(l) => l,
            Layer::Text(l) => l,
            Layer::Path(l) => l,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn LayerTrait {
        match self {
            Layer::Rectangle(l) => l,
            Layer::Circle(l) => l,
            Layer::Text(l) => l,
            Layer::Path(l) => l,
        }
    }

    pub fn id(&self) -> &LayerId {
        &self.base().id
    }

    pub fn layer_type(&self) -> LayerType {
        self.inner().layer_type()
    }

    pub fn base(&self) -> &LayerBase {
        self.inner().base()
    }

    pub fn base_mut(&mut self) -> &mut LayerBase {
        self.inner_mut().base_mut()
    }

    pub fn is_resizable(&self) -> bool {
        self.layer_type().is_resizable()
    }

    /// Bounding box in the local frame.
    pub fn local_bounds(&self) -> Rect {
        self.inner().local_bounds()
    }

    /// Axis-aligned bounding box in canvas space (rotation included).
    pub fn bounds(&self) -> Rect {
        (self.base().transform() * self.local_bounds().to_path(0.1)).bounding_box()
    }

    /// Hit-test a canvas-space point.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.base().transform().inverse() * point;
        self.inner().hit_test_local(local, tolerance)
    }

    /// Convert a local-bounds rectangle (in canvas space, unrotated) back to
    /// the origin the layer would need to occupy it.
    pub fn origin_for_bounds(&self, bounds: Rect) -> Point {
        match self {
            Layer::Circle(_) => bounds.center(),
            Layer::Rectangle(_) | Layer::Text(_) | Layer::Path(_) => bounds.origin(),
        }
    }

    /// Merge a partial update into this layer.
    ///
    /// The discriminant never changes; fields that do not exist on this
    /// kind are ignored. Returns whether any stored value changed.
    pub fn apply_update(&mut self, update: &LayerUpdate) -> bool {
        let before = self.clone();
        {
            let base = self.base_mut();
            if let Some(x) = update.x {
                base.x = x;
            }
            if let Some(y) = update.y {
                base.y = y;
            }
            if let Some(width) = update.width {
                base.width = width;
            }
            if let Some(height) = update.height {
                base.height = height;
            }
            if let Some(fill) = update.fill {
                base.fill = fill;
            }
            if let Some(stroke) = update.stroke {
                base.stroke = stroke;
            }
            if let Some(stroke_width) = update.stroke_width {
                base.stroke_width = stroke_width;
            }
            if let Some(rotation) = update.rotation {
                base.rotation = rotation;
            }
        }

        match self {
            Layer::Rectangle(rect) => {
                if let Some(radius) = update.corner_radius {
                    rect.corner_radius = Some(radius);
                }
            }
            Layer::Text(text) => {
                if let Some(content) = &update.text {
                    text.text = content.clone();
                }
                if let Some(font_size) = update.font_size {
                    if font_size > 0.0 {
                        text.font_size = font_size;
                    } else {
                        log::warn!("Ignoring non-positive font size {} for {}", font_size, text.base.id);
                    }
                }
                if let Some(family) = &update.font_family {
                    text.font_family = family.clone();
                }
                if let Some(align) = update.align {
                    text.align = Some(align);
                }
            }
            Layer::Circle(_) | Layer::Path(_) => {}
        }

        if update.has_kind_specific_fields_for_other_kind(self.layer_type()) {
            log::warn!(
                "Update for {} layer {} carries fields it does not have; they were ignored",
                self.layer_type(),
                self.id()
            );
        }

        *self != before
    }
}

/// A partial update to a layer. `None` leaves a field untouched.
///
/// There is deliberately no way to express a change of kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub fill: Option<LayerColor>,
    /// `Some(None)` removes the stroke.
    pub stroke: Option<Option<LayerColor>>,
    pub stroke_width: Option<f64>,
    pub rotation: Option<f64>,
    pub corner_radius: Option<f64>,
    pub text: Option<String>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub align: Option<TextAlign>,
}

impl LayerUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update only the origin.
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Update origin and size together.
    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_fill(mut self, fill: LayerColor) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Option<LayerColor>) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = Some(width);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Check whether the update is empty.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn has_kind_specific_fields_for_other_kind(&self, kind: LayerType) -> bool {
        let rect_fields = self.corner_radius.is_some();
        let text_fields = self.text.is_some()
            || self.font_size.is_some()
            || self.font_family.is_some()
            || self.align.is_some();
        match kind {
            LayerType::Rectangle => text_fields,
            LayerType::Text => rect_fields,
            LayerType::Circle | LayerType::Path | LayerType::Icon => rect_fields || text_fields,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    point.distance(proj)
}
