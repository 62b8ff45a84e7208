//! Inkboard Render Library
//!
//! Turns whiteboard state into a display list and defines the renderer
//! abstraction backends implement. An SVG backend is included.

mod display;
mod renderer;
mod svg;

pub use display::{
    build_display_list, layer_item, DisplayItem, ItemRole, Overlay, Primitive, Scene,
    BACKGROUND_COLOR, PREVIEW_OPACITY, SELECTION_COLOR,
};
pub use renderer::{RenderResult, Renderer, RendererError};
pub use svg::SvgRenderer;
