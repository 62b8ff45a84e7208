//! Renderer trait abstraction.

use crate::display::Scene;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Trait for rendering backends.
///
/// A backend receives a finished [`Scene`] once per frame. Items are in
/// canvas space; backends apply `scene.view_transform` on top of each
/// item's own transform.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, scene: &Scene) -> RenderResult<()>;

    /// Color to clear to before drawing.
    fn background_color(&self, scene: &Scene) -> Color {
        scene.background
    }
}
