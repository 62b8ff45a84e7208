//! Headless chrome: toolbar, zoom buttons and the properties panel.
//!
//! These hold no state of their own. Each reads the store and turns a user
//! action into store operations, so any UI toolkit can draw them.

use crate::camera::{Camera, CameraUpdate};
use crate::error::{BoardError, BoardResult};
use crate::layers::{LayerColor, LayerType, LayerUpdate};
use crate::mode::Mode;
use serde::{Deserialize, Serialize};

/// Stroke width range offered by the properties panel.
pub const STROKE_WIDTH_RANGE: (f64, f64) = (0.0, 20.0);
/// Font size range offered by the properties panel.
pub const FONT_SIZE_RANGE: (f64, f64) = (8.0, 120.0);

/// A named swatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub name: &'static str,
    pub color: LayerColor,
}

impl Swatch {
    const fn rgb(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name,
            color: LayerColor::new(r, g, b, 255),
        }
    }
}

/// Colors offered for fill and stroke.
pub const PALETTE: [Swatch; 12] = [
    Swatch {
        name: "Transparent",
        color: LayerColor::transparent(),
    },
    Swatch::rgb("Black", 0, 0, 0),
    Swatch::rgb("White", 255, 255, 255),
    Swatch::rgb("Gray", 107, 114, 128),
    Swatch::rgb("Red", 239, 68, 68),
    Swatch::rgb("Orange", 249, 115, 22),
    Swatch::rgb("Yellow", 234, 179, 8),
    Swatch::rgb("Green", 34, 197, 94),
    Swatch::rgb("Teal", 20, 184, 166),
    Swatch::rgb("Blue", 59, 130, 246),
    Swatch::rgb("Violet", 139, 92, 246),
    Swatch::rgb("Pink", 236, 72, 153),
];

/// A toolbar button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolbarAction {
    Select,
    Hand,
    Pencil,
    /// Create a layer immediately, bypassing click-to-place.
    Create(LayerType),
}

/// Toolbar contract.
pub struct Toolbar;

impl Toolbar {
    /// Buttons in display order.
    pub const ACTIONS: [ToolbarAction; 6] = [
        ToolbarAction::Select,
        ToolbarAction::Hand,
        ToolbarAction::Pencil,
        ToolbarAction::Create(LayerType::Rectangle),
        ToolbarAction::Create(LayerType::Circle),
        ToolbarAction::Create(LayerType::Text),
    ];

    pub fn label(action: ToolbarAction) -> &'static str {
        match action {
            ToolbarAction::Select => "Select",
            ToolbarAction::Hand => "Hand Tool",
            ToolbarAction::Pencil => "Pencil",
            ToolbarAction::Create(kind) => kind.name(),
        }
    }

    /// Whether the button shows as pressed. Create buttons never stay
    /// active; Select covers click-to-place too.
    pub fn is_active(action: ToolbarAction, mode: Mode) -> bool {
        match action {
            ToolbarAction::Select => matches!(mode, Mode::Selection | Mode::Inserting(_)),
            ToolbarAction::Hand => mode == Mode::Hand,
            ToolbarAction::Pencil => mode == Mode::Pencil,
            ToolbarAction::Create(_) => false,
        }
    }
}

/// Range and step of the zoom buttons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomControlLimits {
    pub min: f64,
    pub max: f64,
    /// Additive step per click.
    pub step: f64,
}

impl Default for ZoomControlLimits {
    fn default() -> Self {
        Self {
            min: 0.5,
            max: 2.0,
            step: 0.1,
        }
    }
}

impl ZoomControlLimits {
    pub(crate) fn validate(&self) -> BoardResult<()> {
        if !(self.min.is_finite() && self.min > 0.0 && self.max.is_finite() && self.max >= self.min) {
            return Err(BoardError::Config(format!(
                "zoom control range [{}, {}] is invalid",
                self.min, self.max
            )));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(BoardError::Config(format!(
                "zoom control step must be positive, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

/// Zoom buttons contract.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomControl {
    pub limits: ZoomControlLimits,
}

impl ZoomControl {
    pub fn new(limits: ZoomControlLimits) -> Self {
        Self { limits }
    }

    pub fn can_zoom_in(&self, camera: &Camera) -> bool {
        camera.scale < self.limits.max
    }

    pub fn can_zoom_out(&self, camera: &Camera) -> bool {
        camera.scale > self.limits.min
    }

    pub fn zoom_in(&self, camera: &Camera) -> CameraUpdate {
        CameraUpdate::scale((camera.scale + self.limits.step).min(self.limits.max))
    }

    pub fn zoom_out(&self, camera: &Camera) -> CameraUpdate {
        CameraUpdate::scale((camera.scale - self.limits.step).max(self.limits.min))
    }

    /// Zoom as a whole percentage, e.g. `"110%"`.
    pub fn label(&self, camera: &Camera) -> String {
        format!("{}%", (camera.scale * 100.0).round())
    }
}

/// A properties panel edit on the selected layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Fill(LayerColor),
    /// A transparent stroke removes it.
    Stroke(LayerColor),
    StrokeWidth(f64),
    Text(String),
    FontSize(f64),
}

impl PropertyEdit {
    /// Whether the panel shows this edit for a layer kind.
    pub fn applies_to(&self, kind: LayerType) -> bool {
        match self {
            PropertyEdit::Text(_) | PropertyEdit::FontSize(_) => kind == LayerType::Text,
            PropertyEdit::Fill(_) | PropertyEdit::Stroke(_) | PropertyEdit::StrokeWidth(_) => true,
        }
    }

    /// The layer update for this edit, with numeric inputs clamped to the
    /// panel's ranges.
    pub fn to_update(&self) -> LayerUpdate {
        match self {
            PropertyEdit::Fill(color) => LayerUpdate::new().with_fill(*color),
            PropertyEdit::Stroke(color) => {
                let stroke = (!color.is_transparent()).then_some(*color);
                LayerUpdate::new().with_stroke(stroke)
            }
            PropertyEdit::StrokeWidth(width) => {
                LayerUpdate::new().with_stroke_width(clamp_input(*width, STROKE_WIDTH_RANGE))
            }
            PropertyEdit::Text(text) => LayerUpdate::new().with_text(text.clone()),
            PropertyEdit::FontSize(size) => {
                LayerUpdate::new().with_font_size(clamp_input(*size, FONT_SIZE_RANGE))
            }
        }
    }
}

fn clamp_input(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolbar_active_state() {
        assert!(Toolbar::is_active(ToolbarAction::Select, Mode::Selection));
        assert!(Toolbar::is_active(
            ToolbarAction::Select,
            Mode::Inserting(LayerType::Circle)
        ));
        assert!(!Toolbar::is_active(ToolbarAction::Select, Mode::Hand));
        assert!(Toolbar::is_active(ToolbarAction::Pencil, Mode::Pencil));
        assert!(!Toolbar::is_active(
            ToolbarAction::Create(LayerType::Rectangle),
            Mode::Selection
        ));
        assert_eq!(Toolbar::label(ToolbarAction::Create(LayerType::Text)), "Text");
    }

    #[test]
    fn test_zoom_control_steps_and_bounds() {
        let control = ZoomControl::default();
        let camera = Camera::new(0.0, 0.0, 1.0);
        assert_eq!(control.zoom_in(&camera).scale, Some(1.1));
        assert_eq!(control.label(&camera), "100%");

        let top = Camera::new(0.0, 0.0, 1.95);
        assert_eq!(control.zoom_in(&top).scale, Some(2.0));
        assert!(!control.can_zoom_in(&Camera::new(0.0, 0.0, 2.0)));

        let bottom = Camera::new(0.0, 0.0, 0.55);
        assert_eq!(control.zoom_out(&bottom).scale, Some(0.5));
        assert!(!control.can_zoom_out(&Camera::new(0.0, 0.0, 0.5)));
        assert!(control.can_zoom_out(&camera));
    }

    #[test]
    fn test_property_edits() {
        assert_eq!(
            PropertyEdit::StrokeWidth(35.0).to_update().stroke_width,
            Some(20.0)
        );
        assert_eq!(PropertyEdit::FontSize(2.0).to_update().font_size, Some(8.0));
        assert_eq!(
            PropertyEdit::Stroke(LayerColor::transparent()).to_update().stroke,
            Some(None)
        );
        assert_eq!(
            PropertyEdit::Fill(LayerColor::black()).to_update().fill,
            Some(LayerColor::black())
        );
        assert!(!PropertyEdit::FontSize(12.0).applies_to(LayerType::Rectangle));
        assert!(PropertyEdit::Text("hi".into()).applies_to(LayerType::Text));
    }

    #[test]
    fn test_palette() {
        assert!(PALETTE[0].color.is_transparent());
        assert_eq!(PALETTE[4].color.to_hex(), "#ef4444");
        assert_eq!(PALETTE[9].color.to_hex(), "#3b82f6");
    }
}
