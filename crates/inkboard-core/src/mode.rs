//! Interaction modes.

use crate::layers::LayerType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The active interaction mode. Exactly one is active at a time and any
/// mode may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "layerType")]
pub enum Mode {
    /// Select, move, resize and rotate layers.
    #[default]
    Selection,
    /// Drag the stage to pan.
    Hand,
    /// Freehand drawing.
    Pencil,
    /// Click-to-place a layer of this kind.
    Inserting(LayerType),
}

impl Mode {
    /// Whether a drag anywhere on the stage pans the camera.
    pub fn stage_draggable(self) -> bool {
        matches!(self, Mode::Hand)
    }

    /// Whether layers can be picked and dragged.
    pub fn layers_draggable(self) -> bool {
        matches!(self, Mode::Selection)
    }

    /// Whether pointer input feeds the stroke engine.
    pub fn routes_to_stroke_engine(self) -> bool {
        matches!(self, Mode::Pencil)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Selection => "Selection",
            Mode::Hand => "Hand",
            Mode::Pencil => "Pencil",
            Mode::Inserting(_) => "Inserting",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Inserting(kind) => write!(f, "Inserting({kind})"),
            other => f.write_str(other.name()),
        }
    }
}

/// What happens to a stroke in progress when the mode changes under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeChangePolicy {
    /// Commit the partial stroke as if the pointer had been released.
    #[default]
    Commit,
    /// Drop the partial stroke.
    Discard,
}
