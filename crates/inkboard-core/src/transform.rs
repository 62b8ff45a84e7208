//! Selection handles and move/resize/rotate gestures.
//!
//! The controller keeps one handle set bound to the selected layer. While a
//! gesture runs, the layer's on-screen representation is tracked as a
//! [`NodeGeometry`]: a screen position plus a multiplicative scale, the
//! way a scene graph reports a transformed node. Nothing reaches the store
//! until the gesture ends, when the geometry is folded back into stored
//! dimensions.

use crate::camera::Camera;
use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::layers::{Layer, LayerId, LayerUpdate};
use kurbo::{Affine, Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Distance from the top edge to the rotation handle, in canvas units.
pub const ROTATE_HANDLE_OFFSET: f64 = 25.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for resizing.
    Corner(Corner),
    /// Rotation handle (above the top edge).
    Rotate,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }

    fn of(self, rect: Rect) -> Point {
        Point::new(
            if self.is_right() { rect.x1 } else { rect.x0 },
            if self.is_bottom() { rect.y1 } else { rect.y0 },
        )
    }

    fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a canvas point hits this handle. `tolerance` is in canvas
    /// units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point - self.position).hypot2() <= tolerance * tolerance
    }
}

/// On-screen state of a node being transformed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    /// Screen position of the layer origin.
    pub position: Point,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees.
    pub rotation: f64,
}

impl NodeGeometry {
    /// The node as the layer currently sits on screen.
    pub fn of_layer(layer: &Layer, camera: &Camera) -> Self {
        let base = layer.base();
        Self {
            position: camera.canvas_to_screen(base.origin()),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: base.rotation,
        }
    }

    /// Apply this geometry to a copy of `layer` without any floor, for
    /// live display.
    pub fn apply_to(&self, layer: &Layer, camera: &Camera) -> Layer {
        let mut live = layer.clone();
        let origin = camera.screen_to_canvas(self.position);
        let base = live.base_mut();
        base.x = origin.x;
        base.y = origin.y;
        base.width *= self.scale_x;
        base.height *= self.scale_y;
        base.rotation = self.rotation;
        live
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Manipulation {
    /// Whole-layer drag starting at this canvas point.
    Move { start: Point },
    Resize { corner: Corner, box_: Rect },
    /// Rotation about this canvas point.
    Rotate { center: Point },
}

#[derive(Debug, Clone)]
struct ActiveTransform {
    original: Layer,
    manipulation: Manipulation,
    node: NodeGeometry,
}

/// Binds handles to the selected layer and runs transform gestures.
#[derive(Debug, Clone)]
pub struct TransformController {
    bound: Option<LayerId>,
    handles: Vec<Handle>,
    active: Option<ActiveTransform>,
    min_size: f64,
    rotation_enabled: bool,
    rotation_snap: f64,
}

impl Default for TransformController {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl TransformController {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            bound: None,
            handles: Vec::new(),
            active: None,
            min_size: config.min_layer_size,
            rotation_enabled: config.rotation_enabled,
            rotation_snap: config.rotation_snap_degrees,
        }
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    /// Layer the handles are bound to.
    pub fn bound_layer_id(&self) -> Option<&LayerId> {
        self.bound.as_ref()
    }

    /// Handles of the bound layer, in canvas coordinates.
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Re-bind to the current selection. Handles follow the layer's stored
    /// geometry; `None` unbinds and drops any gesture in flight.
    pub fn sync_selection(&mut self, selected: Option<&Layer>) {
        match selected {
            Some(layer) => {
                if self.bound.as_ref() != Some(layer.id()) {
                    log::debug!("Transform handles bound to {}", layer.id());
                    self.active = None;
                    self.bound = Some(layer.id().clone());
                }
                self.handles = self.handles_for(layer);
            }
            None => {
                if self.bound.take().is_some() {
                    log::debug!("Transform handles unbound");
                }
                self.handles.clear();
                self.active = None;
            }
        }
    }

    /// Handles for a layer. Only resizable kinds get any.
    pub fn handles_for(&self, layer: &Layer) -> Vec<Handle> {
        if !layer.is_resizable() {
            return Vec::new();
        }
        let transform = layer.base().transform();
        let bounds = layer.local_bounds();
        let mut handles: Vec<Handle> = Corner::ALL
            .iter()
            .map(|&corner| Handle::new(transform * corner.of(bounds), HandleKind::Corner(corner)))
            .collect();
        if self.rotation_enabled {
            let top_center = Point::new(bounds.center().x, bounds.y0 - ROTATE_HANDLE_OFFSET);
            handles.push(Handle::new(transform * top_center, HandleKind::Rotate));
        }
        handles
    }

    /// Find which handle (if any) is hit at the given canvas point.
    pub fn hit_test_handles(&self, point: Point, tolerance: f64) -> Option<HandleKind> {
        self.handles
            .iter()
            .find(|handle| handle.hit_test(point, tolerance))
            .map(|handle| handle.kind)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Current node geometry of the gesture in flight.
    pub fn node(&self) -> Option<&NodeGeometry> {
        self.active.as_ref().map(|active| &active.node)
    }

    /// The transformed layer as it should be displayed right now.
    pub fn live_layer(&self, camera: &Camera) -> Option<Layer> {
        self.active
            .as_ref()
            .map(|active| active.node.apply_to(&active.original, camera))
    }

    /// Start dragging the whole layer from a canvas point.
    pub fn begin_move(&mut self, layer: &Layer, pointer: Point, camera: &Camera) {
        self.begin(layer, Manipulation::Move { start: pointer }, camera);
    }

    /// Start a handle drag.
    pub fn begin_handle(&mut self, layer: &Layer, kind: HandleKind, camera: &Camera) {
        let manipulation = match kind {
            HandleKind::Corner(corner) => Manipulation::Resize {
                corner,
                box_: layer.local_bounds(),
            },
            HandleKind::Rotate => Manipulation::Rotate {
                center: layer.base().transform() * layer.local_bounds().center(),
            },
        };
        self.begin(layer, manipulation, camera);
    }

    fn begin(&mut self, layer: &Layer, manipulation: Manipulation, camera: &Camera) {
        log::debug!("Transform {:?} started on {}", manipulation, layer.id());
        self.active = Some(ActiveTransform {
            original: layer.clone(),
            manipulation,
            node: NodeGeometry::of_layer(layer, camera),
        });
    }

    /// Feed the pointer (canvas space). `constrain` keeps the aspect ratio
    /// while resizing and snaps the angle while rotating.
    pub fn drag_to(&mut self, pointer: Point, constrain: bool, camera: &Camera) -> Option<NodeGeometry> {
        let mut active = self.active.take()?;
        let original = &active.original;
        match active.manipulation {
            Manipulation::Move { start } => {
                let origin = original.base().origin() + (pointer - start);
                active.node.position = camera.canvas_to_screen(origin);
            }
            Manipulation::Resize { corner, box_ } => {
                let local = original.base().transform().inverse() * pointer;
                let candidate = resize_candidate(original.local_bounds(), corner, local, constrain);
                let accepted = self.bound_box(box_, candidate);
                if accepted != box_ {
                    let bounds = original.local_bounds();
                    active.node.scale_x = accepted.width() / bounds.width();
                    active.node.scale_y = accepted.height() / bounds.height();
                    let origin = original.base().transform() * original.origin_for_bounds(accepted);
                    active.node.position = camera.canvas_to_screen(origin);
                    active.manipulation = Manipulation::Resize {
                        corner,
                        box_: accepted,
                    };
                }
            }
            Manipulation::Rotate { center } => {
                let degrees = self.rotation_for(center, pointer, constrain);
                let local_center = original.local_bounds().center();
                let offset = (Affine::rotate(degrees.to_radians()) * local_center).to_vec2();
                let origin = center - offset;
                active.node.rotation = degrees;
                active.node.position = camera.canvas_to_screen(origin);
            }
        }
        let node = active.node;
        self.active = Some(active);
        Some(node)
    }

    fn rotation_for(&self, center: Point, pointer: Point, snap: bool) -> f64 {
        let v = pointer - center;
        // The handle sits straight above the centre at zero rotation.
        let degrees = v.y.atan2(v.x).to_degrees() + 90.0;
        let degrees = if snap {
            (degrees / self.rotation_snap).round() * self.rotation_snap
        } else {
            degrees
        };
        normalize_degrees(degrees)
    }

    /// End the gesture and produce the update to store.
    pub fn finish(&mut self, camera: &Camera) -> Option<(LayerId, LayerUpdate)> {
        let mut active = self.active.take()?;
        let id = active.original.id().clone();
        let update = match active.manipulation {
            Manipulation::Move { .. } => self.on_drag_end(active.node.position, camera),
            Manipulation::Resize { .. } | Manipulation::Rotate { .. } => {
                self.on_transform_end(&active.original, &mut active.node, camera)
            }
        };
        log::debug!("Transform finished on {}", id);
        Some((id, update))
    }

    /// Drop the gesture in flight.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Transform cancelled");
        }
    }

    /// Update for a finished drag: the node's final screen position in
    /// canvas space.
    pub fn on_drag_end(&self, screen_position: Point, camera: &Camera) -> LayerUpdate {
        let origin = camera.screen_to_canvas(screen_position);
        LayerUpdate::position(origin.x, origin.y)
    }

    /// Fold a finished transform back into stored geometry.
    ///
    /// The node's scale is read and then reset to 1 before the new size is
    /// computed, so the visual scale and the stored size are never applied
    /// twice. Sizes are floored at the minimum; negative scales count as 0.
    pub fn on_transform_end(&self, layer: &Layer, node: &mut NodeGeometry, camera: &Camera) -> LayerUpdate {
        let scale_x = node.scale_x.max(0.0);
        let scale_y = node.scale_y.max(0.0);
        node.scale_x = 1.0;
        node.scale_y = 1.0;

        let base = layer.base();
        let width = self.min_size.max(base.width * scale_x);
        let height = self.min_size.max(base.height * scale_y);
        let origin = camera.screen_to_canvas(node.position);

        let mut update = LayerUpdate::geometry(origin.x, origin.y, width, height);
        if node.rotation != base.rotation {
            update = update.with_rotation(node.rotation);
        }
        update
    }

    /// Reject sizes under the floor. Negative sizes (flips) always fail.
    pub fn check_bounds(&self, candidate: Size) -> BoardResult<Size> {
        if candidate.width < self.min_size || candidate.height < self.min_size {
            return Err(BoardError::InvalidGeometry {
                width: candidate.width,
                height: candidate.height,
                min: self.min_size,
            });
        }
        Ok(candidate)
    }

    /// Resize bound function: `new` if acceptable, otherwise `old`.
    ///
    /// `new` is not normalized, so a box dragged past its anchor has a
    /// negative width or height and is rejected.
    pub fn bound_box(&self, old: Rect, new: Rect) -> Rect {
        match self.check_bounds(Size::new(new.width(), new.height())) {
            Ok(_) => new,
            Err(err) => {
                log::debug!("Resize rejected: {}", err);
                old
            }
        }
    }
}

impl Default for NodeGeometry {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }
}

/// Box produced by dragging `corner` of `bounds` to `pointer` (local frame),
/// anchored at the opposite corner. Left/top drags keep `x0`/`y0` as the
/// moving edge, so the result is unnormalized when the drag crosses over.
fn resize_candidate(bounds: Rect, corner: Corner, pointer: Point, keep_aspect: bool) -> Rect {
    let anchor = corner.opposite().of(bounds);
    let sign_x = if corner.is_right() { 1.0 } else { -1.0 };
    let sign_y = if corner.is_bottom() { 1.0 } else { -1.0 };
    let mut width = (pointer.x - anchor.x) * sign_x;
    let mut height = (pointer.y - anchor.y) * sign_y;

    if keep_aspect && bounds.width() > 0.0 && bounds.height() > 0.0 {
        let scale = (width / bounds.width()).max(height / bounds.height());
        width = bounds.width() * scale;
        height = bounds.height() * scale;
    }

    let (x0, x1) = if corner.is_right() {
        (anchor.x, anchor.x + width)
    } else {
        (anchor.x - width, anchor.x)
    };
    let (y0, y1) = if corner.is_bottom() {
        (anchor.y, anchor.y + height)
    } else {
        (anchor.y - height, anchor.y)
    };
    Rect::new(x0, y0, x1, y1)
}

fn normalize_degrees(degrees: f64) -> f64 {
    let d = degrees.rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_LAYER_SIZE;
    use crate::layers::{CircleLayer, LayerBase, LayerColor, PathLayer, RectangleLayer, StrokeSample};

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Layer {
        Layer::Rectangle(RectangleLayer::new(LayerBase::new(x, y, w, h)))
    }

    fn controller() -> TransformController {
        TransformController::default()
    }

    #[test]
    fn test_sync_selection_binds_and_unbinds() {
        let mut controller = controller();
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        controller.sync_selection(Some(&layer));
        assert_eq!(controller.bound_layer_id(), Some(layer.id()));
        assert_eq!(controller.handles().len(), 5);

        controller.sync_selection(None);
        assert!(controller.bound_layer_id().is_none());
        assert!(controller.handles().is_empty());
    }

    #[test]
    fn test_paths_get_no_handles() {
        let mut controller = controller();
        let path = Layer::Path(PathLayer::from_samples(
            vec![StrokeSample::new(0.0, 0.0, 0.5), StrokeSample::new(10.0, 0.0, 0.5)],
            LayerColor::black(),
        ));
        controller.sync_selection(Some(&path));
        assert_eq!(controller.bound_layer_id(), Some(path.id()));
        assert!(controller.handles().is_empty());
    }

    #[test]
    fn test_handle_positions_and_hit() {
        let controller = controller();
        let layer = rect(10.0, 20.0, 100.0, 50.0);
        let handles = controller.handles_for(&layer);
        let bottom_right = handles
            .iter()
            .find(|h| h.kind == HandleKind::Corner(Corner::BottomRight))
            .unwrap();
        assert!((bottom_right.position.x - 110.0).abs() < 1e-9);
        assert!((bottom_right.position.y - 70.0).abs() < 1e-9);

        let rotate = handles.iter().find(|h| h.kind == HandleKind::Rotate).unwrap();
        assert!((rotate.position.x - 60.0).abs() < 1e-9);
        assert!((rotate.position.y + 5.0).abs() < 1e-9);

        let mut bound = controller;
        bound.sync_selection(Some(&layer));
        assert_eq!(
            bound.hit_test_handles(Point::new(111.0, 71.0), 4.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(bound.hit_test_handles(Point::new(60.0, 45.0), 4.0), None);
    }

    #[test]
    fn test_resize_floor_on_transform_end() {
        let controller = controller();
        let camera = Camera::default();
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        let mut node = NodeGeometry {
            scale_x: 0.02,
            ..NodeGeometry::of_layer(&layer, &camera)
        };
        let update = controller.on_transform_end(&layer, &mut node, &camera);
        assert_eq!(update.width, Some(5.0));
        assert_eq!(update.height, Some(100.0));
        // The node's own scale is reset.
        assert!((node.scale_x - 1.0).abs() < f64::EPSILON);
        assert!((node.scale_y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_scale_is_floored() {
        let controller = controller();
        let camera = Camera::default();
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        let mut node = NodeGeometry {
            scale_x: -2.0,
            ..NodeGeometry::of_layer(&layer, &camera)
        };
        let update = controller.on_transform_end(&layer, &mut node, &camera);
        assert_eq!(update.width, Some(5.0));
    }

    #[test]
    fn test_transform_end_uses_canvas_position() {
        let controller = controller();
        let camera = Camera::new(100.0, 50.0, 2.0);
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        let mut node = NodeGeometry {
            position: Point::new(120.0, 70.0),
            scale_x: 1.5,
            scale_y: 0.5,
            rotation: 0.0,
        };
        let update = controller.on_transform_end(&layer, &mut node, &camera);
        assert_eq!(update.x, Some(10.0));
        assert_eq!(update.y, Some(10.0));
        assert_eq!(update.width, Some(150.0));
        assert_eq!(update.height, Some(50.0));
        assert_eq!(update.rotation, None);
    }

    #[test]
    fn test_bound_box_rejects_below_floor() {
        let controller = controller();
        let old = Rect::new(0.0, 0.0, 100.0, 100.0);
        let ok = Rect::new(0.0, 0.0, 5.0, 100.0);
        let small = Rect::new(0.0, 0.0, 4.9, 100.0);
        let flipped = Rect::new(0.0, 0.0, -50.0, 100.0);
        assert_eq!(controller.bound_box(old, ok), ok);
        assert_eq!(controller.bound_box(old, small), old);
        assert_eq!(controller.bound_box(old, flipped), old);
        assert!(matches!(
            controller.check_bounds(Size::new(2.0, 100.0)),
            Err(BoardError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_corner_drag_resizes() {
        let mut controller = controller();
        let camera = Camera::default();
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        controller.begin_handle(&layer, HandleKind::Corner(Corner::BottomRight), &camera);

        let node = controller.drag_to(Point::new(50.0, 200.0), false, &camera).unwrap();
        assert!((node.scale_x - 0.5).abs() < 1e-9);
        assert!((node.scale_y - 2.0).abs() < 1e-9);

        // Too small: the previous box is kept.
        let node = controller.drag_to(Point::new(2.0, 200.0), false, &camera).unwrap();
        assert!((node.scale_x - 0.5).abs() < 1e-9);

        let (id, update) = controller.finish(&camera).unwrap();
        assert_eq!(&id, layer.id());
        assert_eq!(update.width, Some(50.0));
        assert_eq!(update.height, Some(200.0));
        assert!(!controller.is_active());
    }

    #[test]
    fn test_top_left_drag_moves_origin() {
        let mut controller = controller();
        let camera = Camera::default();
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        controller.begin_handle(&layer, HandleKind::Corner(Corner::TopLeft), &camera);
        controller.drag_to(Point::new(20.0, 30.0), false, &camera);
        let (_, update) = controller.finish(&camera).unwrap();
        assert_eq!(update.x, Some(20.0));
        assert_eq!(update.y, Some(30.0));
        assert_eq!(update.width, Some(80.0));
        assert_eq!(update.height, Some(70.0));
    }

    #[test]
    fn test_circle_resize_keeps_centre_origin() {
        let mut controller = controller();
        let camera = Camera::default();
        let circle = Layer::Circle(CircleLayer::new(LayerBase::new(50.0, 50.0, 100.0, 100.0)));
        controller.begin_handle(&circle, HandleKind::Corner(Corner::BottomRight), &camera);
        controller.drag_to(Point::new(200.0, 200.0), false, &camera);
        let (_, update) = controller.finish(&camera).unwrap();
        // Anchored at the top-left corner (0, 0): new box is 0..200.
        assert_eq!(update.width, Some(200.0));
        assert!((update.x.unwrap() - 100.0).abs() < 1e-9);
        assert!((update.y.unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_gesture() {
        let mut controller = controller();
        let camera = Camera::new(10.0, 10.0, 2.0);
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        controller.begin_move(&layer, Point::new(5.0, 5.0), &camera);
        controller.drag_to(Point::new(25.0, 15.0), false, &camera);

        let live = controller.live_layer(&camera).unwrap();
        assert!((live.base().x - 20.0).abs() < 1e-9);

        let (_, update) = controller.finish(&camera).unwrap();
        assert_eq!(update, LayerUpdate::position(20.0, 10.0));
    }

    #[test]
    fn test_rotate_gesture_snaps() {
        let mut controller = controller();
        let camera = Camera::default();
        let layer = rect(0.0, 0.0, 100.0, 100.0);
        controller.begin_handle(&layer, HandleKind::Rotate, &camera);

        // Straight right of the centre is a quarter turn.
        let node = controller.drag_to(Point::new(150.0, 50.0), false, &camera).unwrap();
        assert!((node.rotation - 90.0).abs() < 1e-9);

        let node = controller.drag_to(Point::new(150.0, 45.0), true, &camera).unwrap();
        assert!((node.rotation - 90.0).abs() < 1e-9);

        let (_, update) = controller.finish(&camera).unwrap();
        assert_eq!(update.rotation, Some(90.0));
        // Rotated about the centre (50, 50): the origin swings to (100, 0).
        assert!((update.x.unwrap() - 100.0).abs() < 1e-9);
        assert!(update.y.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_repeated_resizes_do_not_compound() {
        let mut controller = controller();
        let camera = Camera::default();
        let mut layer = rect(0.0, 0.0, 100.0, 100.0);
        for _ in 0..3 {
            controller.begin_handle(&layer, HandleKind::Corner(Corner::BottomRight), &camera);
            let corner = Point::new(layer.base().width * 2.0, layer.base().height);
            controller.drag_to(corner, false, &camera);
            let (_, update) = controller.finish(&camera).unwrap();
            layer.apply_update(&update);
        }
        assert!((layer.base().width - 800.0).abs() < 1e-9);
        assert!((layer.base().height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(270.0) + 90.0).abs() < 1e-9);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-9);
        assert!(normalize_degrees(360.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_size_constant() {
        assert!((controller().min_size() - MIN_LAYER_SIZE).abs() < f64::EPSILON);
    }
}
