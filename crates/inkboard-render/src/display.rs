//! Display-list construction.
//!
//! Every layer kind maps to exactly one [`Primitive`]. The mapping is an
//! exhaustive match over [`Layer`], so adding a kind fails to compile until
//! it has a drawable form.

use inkboard_core::layers::{Layer, LayerColor, LayerId, TextAlign};
use inkboard_core::stroke::{outline_to_path, StrokeOptions, StrokeOutline};
use inkboard_core::transform::{Handle, HandleKind, HANDLE_SIZE};
use inkboard_core::{BoardState, Camera, Whiteboard};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape, Stroke};
use peniko::Color;

/// Opacity of the stroke being drawn.
pub const PREVIEW_OPACITY: f32 = 0.6;
/// Selection highlight color (blue).
pub const SELECTION_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);
/// Default canvas background.
pub const BACKGROUND_COLOR: Color = Color::from_rgba8(250, 250, 250, 255);

/// Geometry of one display item, in the item's local frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(RoundedRect),
    Ellipse(Ellipse),
    Text {
        text: String,
        font_size: f64,
        font_family: String,
        align: TextAlign,
        /// Layout box the text wraps inside.
        bounds: Rect,
    },
    Path(BezPath),
}

impl Primitive {
    /// Outline of the primitive for backends that only fill and stroke
    /// paths. Text has none.
    pub fn to_path(&self) -> Option<BezPath> {
        match self {
            Primitive::Rect(rect) => Some(rect.to_path(0.1)),
            Primitive::Ellipse(ellipse) => Some(ellipse.to_path(0.1)),
            Primitive::Text { .. } => None,
            Primitive::Path(path) => Some(path.clone()),
        }
    }
}

/// What an item is drawn for.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemRole {
    Layer(LayerId),
    Preview,
    SelectionBox,
    Handle(HandleKind),
}

/// One drawing command in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub role: ItemRole,
    pub primitive: Primitive,
    /// Local frame to canvas.
    pub transform: Affine,
    pub fill: Option<Color>,
    pub stroke: Option<(Stroke, Color)>,
    pub opacity: f32,
}

impl DisplayItem {
    fn new(role: ItemRole, primitive: Primitive, transform: Affine) -> Self {
        Self {
            role,
            primitive,
            transform,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }
}

/// A frame ready to hand to a [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Canvas to screen.
    pub view_transform: Affine,
    pub background: Color,
    /// Items back to front.
    pub items: Vec<DisplayItem>,
}

impl Scene {
    /// Build the frame for a whiteboard as it currently looks, transient
    /// gesture state included.
    pub fn from_board(board: &Whiteboard) -> Self {
        let live = board.live_layer();
        let handles = match &live {
            Some(layer) => board.transform_controller().handles_for(layer),
            None => board.handles().to_vec(),
        };
        let overlay = Overlay {
            preview: board.preview(),
            live_layer: live.as_ref(),
            handles: &handles,
        };
        build_display_list(board.state(), &board.config().stroke, &overlay)
    }

    pub fn layer_items(&self) -> impl Iterator<Item = &DisplayItem> {
        self.items
            .iter()
            .filter(|item| matches!(item.role, ItemRole::Layer(_)))
    }
}

/// Transient state drawn on top of the stored layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    /// Stroke being captured.
    pub preview: Option<&'a StrokeOutline>,
    /// Replaces the stored layer with the same id while a transform runs.
    pub live_layer: Option<&'a Layer>,
    /// Selection handles, in canvas coordinates.
    pub handles: &'a [Handle],
}

/// Build the display list: layers in z-order, then the stroke preview, then
/// the selection box and its handles.
pub fn build_display_list(state: &BoardState, stroke: &StrokeOptions, overlay: &Overlay<'_>) -> Scene {
    let live = overlay.live_layer;
    let resolve = |layer: &'_ Layer| -> Layer {
        match live {
            Some(live) if live.id() == layer.id() => live.clone(),
            _ => layer.clone(),
        }
    };

    let mut items: Vec<DisplayItem> = state
        .layers
        .iter()
        .map(|layer| layer_item(&resolve(layer), stroke))
        .collect();

    if let Some(preview) = overlay.preview {
        let mut item = DisplayItem::new(
            ItemRole::Preview,
            Primitive::Path(preview.path.clone()),
            Affine::IDENTITY,
        );
        item.fill = Some(Color::BLACK);
        item.opacity = PREVIEW_OPACITY;
        items.push(item);
    }

    if let Some(selected) = state.selected_layer() {
        let selected = resolve(selected);
        items.extend(selection_items(&selected, overlay.handles, &state.camera));
    }

    log::trace!("Display list built with {} items", items.len());
    Scene {
        view_transform: state.camera.transform(),
        background: BACKGROUND_COLOR,
        items,
    }
}

/// Map one layer to its drawable form.
pub fn layer_item(layer: &Layer, stroke_options: &StrokeOptions) -> DisplayItem {
    let base = layer.base();
    let primitive = match layer {
        Layer::Rectangle(rect) => {
            Primitive::Rect(RoundedRect::from_rect(rect.as_rect(), rect.corner_radius.unwrap_or(0.0)))
        }
        Layer::Circle(circle) => Primitive::Ellipse(Ellipse::new(
            Point::ZERO,
            (circle.radius_x(), circle.radius_y()),
            0.0,
        )),
        Layer::Text(text) => Primitive::Text {
            text: text.text.clone(),
            font_size: text.font_size,
            font_family: text.font_family.clone(),
            align: text.align(),
            bounds: layer.local_bounds(),
        },
        Layer::Path(path) => {
            Primitive::Path(outline_to_path(&path.outline(stroke_options)))
        }
    };

    let mut item = DisplayItem::new(ItemRole::Layer(layer.id().clone()), primitive, base.transform());
    item.fill = paint(base.fill);
    // Paths are filled outlines; their stroke attributes are unused.
    if !matches!(layer, Layer::Path(_)) && base.stroke_width > 0.0 {
        item.stroke = base
            .stroke
            .and_then(paint)
            .map(|color| (Stroke::new(base.stroke_width), color));
    }
    item
}

fn paint(color: LayerColor) -> Option<Color> {
    (!color.is_transparent()).then(|| color.into())
}

/// Dashed box around the selection plus one item per handle. Sizes are
/// divided by the zoom so they stay constant on screen.
fn selection_items(layer: &Layer, handles: &[Handle], camera: &Camera) -> Vec<DisplayItem> {
    let line_width = camera.screen_len_to_canvas(1.0);
    let dash = camera.screen_len_to_canvas(4.0);
    let half = camera.screen_len_to_canvas(HANDLE_SIZE) / 2.0;

    let mut items = Vec::with_capacity(handles.len() + 1);
    let mut outline = DisplayItem::new(
        ItemRole::SelectionBox,
        Primitive::Rect(RoundedRect::from_rect(layer.local_bounds(), 0.0)),
        layer.base().transform(),
    );
    outline.stroke = Some((
        Stroke::new(line_width).with_dashes(0.0, [dash, dash]),
        SELECTION_COLOR,
    ));
    items.push(outline);

    for handle in handles {
        let primitive = match handle.kind {
            HandleKind::Corner(_) => Primitive::Rect(RoundedRect::from_rect(
                Rect::from_center_size(handle.position, (half * 2.0, half * 2.0)),
                0.0,
            )),
            HandleKind::Rotate => Primitive::Ellipse(Ellipse::new(handle.position, (half, half), 0.0)),
        };
        let mut item = DisplayItem::new(ItemRole::Handle(handle.kind), primitive, Affine::IDENTITY);
        item.fill = Some(Color::WHITE);
        item.stroke = Some((Stroke::new(line_width * 1.5), SELECTION_COLOR));
        items.push(item);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::{LayerType, LayerUpdate, Mode, PointerInput};

    fn roles(scene: &Scene) -> Vec<&ItemRole> {
        scene.items.iter().map(|item| &item.role).collect()
    }

    #[test]
    fn test_empty_board() {
        let board = Whiteboard::default();
        let scene = Scene::from_board(&board);
        assert!(scene.items.is_empty());
        assert_eq!(scene.view_transform, Affine::IDENTITY);
    }

    #[test]
    fn test_kind_mapping() {
        let mut board = Whiteboard::default();
        board.create_layer(LayerType::Rectangle).unwrap();
        board.create_layer(LayerType::Circle).unwrap();
        board.create_layer(LayerType::Text).unwrap();
        board.select(None);

        let scene = Scene::from_board(&board);
        let items: Vec<_> = scene.layer_items().collect();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0].primitive, Primitive::Rect(_)));
        assert!(matches!(items[1].primitive, Primitive::Ellipse(_)));
        assert!(matches!(items[2].primitive, Primitive::Text { .. }));

        // Shapes: transparent fill, black 2px stroke.
        assert_eq!(items[0].fill, None);
        let (stroke, color) = items[0].stroke.as_ref().unwrap();
        assert!((stroke.width - 2.0).abs() < f64::EPSILON);
        assert_eq!(*color, Color::BLACK);

        // Text: black fill, no stroke.
        assert_eq!(items[2].fill, Some(Color::BLACK));
        assert!(items[2].stroke.is_none());
        assert_eq!(items[0].transform, Affine::translate((350.0, 250.0)));
    }

    #[test]
    fn test_selection_overlay() {
        let mut board = Whiteboard::default();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        let scene = Scene::from_board(&board);
        assert_eq!(roles(&scene)[0], &ItemRole::Layer(id));
        assert_eq!(roles(&scene)[1], &ItemRole::SelectionBox);
        // Four corners and the rotation handle.
        let handles = scene
            .items
            .iter()
            .filter(|item| matches!(item.role, ItemRole::Handle(_)))
            .count();
        assert_eq!(handles, 5);
    }

    #[test]
    fn test_preview_drawn_translucent() {
        let mut board = Whiteboard::default();
        board.set_mode(Mode::Pencil);
        board.pointer_down(&PointerInput::at(0.0, 0.0));
        board.pointer_move(&PointerInput::at(10.0, 10.0));

        let scene = Scene::from_board(&board);
        let preview = scene.items.last().unwrap();
        assert_eq!(preview.role, ItemRole::Preview);
        assert!((preview.opacity - PREVIEW_OPACITY).abs() < f32::EPSILON);

        board.pointer_up();
        let scene = Scene::from_board(&board);
        // The committed stroke is selected: outline box, no handles.
        assert_eq!(roles(&scene).len(), 2);
        assert!(matches!(scene.items[0].primitive, Primitive::Path(_)));
        assert_eq!(scene.items[0].fill, Some(Color::BLACK));
        assert_eq!(scene.items[1].role, ItemRole::SelectionBox);
    }

    #[test]
    fn test_live_layer_replaces_stored() {
        let mut board = Whiteboard::default();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        board.pointer_down(&PointerInput::at(400.0, 300.0));
        board.pointer_move(&PointerInput::at(410.0, 300.0));

        let scene = Scene::from_board(&board);
        let layer = scene.layer_items().next().unwrap();
        assert_eq!(layer.role, ItemRole::Layer(id.clone()));
        assert_eq!(layer.transform, Affine::translate((360.0, 250.0)));
        // Stored geometry is untouched until release.
        assert!((board.store().layer(&id).unwrap().base().x - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_keeps_overlay_constant_on_screen() {
        let mut board = Whiteboard::default();
        board.create_layer(LayerType::Circle).unwrap();
        board.set_camera(inkboard_core::CameraUpdate::scale(2.0));
        let scene = Scene::from_board(&board);
        let selection = scene
            .items
            .iter()
            .find(|item| item.role == ItemRole::SelectionBox)
            .unwrap();
        let (stroke, _) = selection.stroke.as_ref().unwrap();
        assert!((stroke.width - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transparent_stroke_dropped() {
        let mut board = Whiteboard::default();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        board.update_layer(&id, &LayerUpdate::new().with_stroke(None));
        let item = layer_item(board.store().layer(&id).unwrap(), &StrokeOptions::default());
        assert!(item.stroke.is_none());
    }
}
