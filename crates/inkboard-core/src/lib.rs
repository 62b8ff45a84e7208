//! Inkboard Core Library
//!
//! Platform-agnostic core of the Inkboard whiteboard: the layer model, the
//! freehand stroke engine, the camera, interaction modes, the layer store
//! with undo/redo, and the selection/transform controller.

pub mod board;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod history;
pub mod input;
pub mod layers;
pub mod mode;
pub mod shortcuts;
pub mod store;
pub mod stroke;
pub mod transform;

pub use board::Whiteboard;
pub use camera::{Camera, CameraLimits, CameraUpdate, ZoomDirection};
pub use config::BoardConfig;
pub use controls::{PropertyEdit, Toolbar, ToolbarAction, ZoomControl, ZoomControlLimits, PALETTE};
pub use error::{BoardError, BoardResult};
pub use history::History;
pub use input::{KeyInput, Modifiers, PointerInput, WheelInput};
pub use layers::{
    Layer, LayerBase, LayerColor, LayerId, LayerType, LayerUpdate, StrokeSample, TextAlign,
};
pub use mode::{Mode, ModeChangePolicy};
pub use shortcuts::{Shortcut, ShortcutAction, ShortcutRegistry};
pub use store::{BoardState, LayerStore, ListenerId};
pub use stroke::{StrokeCapture, StrokeOptions, StrokeOutline};
pub use transform::{Corner, Handle, HandleKind, NodeGeometry, TransformController};
