//! The whiteboard: routes pointer, wheel and keyboard input to the store,
//! the stroke capture and the transform controller.

use crate::camera::{CameraUpdate, ZoomDirection};
use crate::config::BoardConfig;
use crate::controls::{PropertyEdit, ToolbarAction, ZoomControl};
use crate::error::BoardResult;
use crate::input::{KeyInput, PointerInput, WheelInput};
use crate::layers::{Layer, LayerId, LayerType, LayerUpdate};
use crate::mode::{Mode, ModeChangePolicy};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::store::{BoardState, LayerStore, ListenerId};
use crate::stroke::{StrokeCapture, StrokeOutline};
use crate::transform::{Handle, TransformController, HANDLE_SIZE};
use kurbo::{Point, Size};

/// Pointer gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Camera drag; `last` is the previous screen position.
    Panning { last: Point },
    Drawing,
    Transforming,
}

/// Interactive whiteboard state and input routing.
///
/// Each pointer gesture is wrapped in a history batch, so one
/// down/move/up sequence is one undo step.
#[derive(Debug)]
pub struct Whiteboard {
    store: LayerStore,
    capture: StrokeCapture,
    transform: TransformController,
    zoom_control: ZoomControl,
    config: BoardConfig,
    gesture: Gesture,
}

impl Default for Whiteboard {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Whiteboard {
    pub fn new(config: BoardConfig) -> Self {
        Self {
            store: LayerStore::new(&config),
            capture: StrokeCapture::new(config.stroke, config.default_pressure),
            transform: TransformController::new(&config),
            zoom_control: ZoomControl::new(config.zoom_control),
            config,
            gesture: Gesture::Idle,
        }
    }

    /// Build a board from a JSON configuration.
    pub fn from_config_json(json: &str) -> BoardResult<Self> {
        BoardConfig::from_json(json).map(Self::new)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Read access to the store. Mutations go through the board so the
    /// transform handles stay bound to the selection.
    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn state(&self) -> &BoardState {
        self.store.state()
    }

    pub fn mode(&self) -> Mode {
        self.store.mode()
    }

    /// Whether a pointer drag should pan the stage right now.
    pub fn stage_draggable(&self) -> bool {
        self.store.mode().stage_draggable() && !self.capture.is_capturing()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_capturing()
    }

    /// Live outline of the stroke being drawn.
    pub fn preview(&self) -> Option<&StrokeOutline> {
        self.capture.preview()
    }

    /// The selected layer as displayed mid-transform, if a transform runs.
    pub fn live_layer(&self) -> Option<Layer> {
        self.transform.live_layer(&self.store.camera())
    }

    /// Handles bound to the selection, in canvas coordinates.
    pub fn handles(&self) -> &[Handle] {
        self.transform.handles()
    }

    pub fn transform_controller(&self) -> &TransformController {
        &self.transform
    }

    // --- Store operations ---

    /// Create a default layer at the viewport centre.
    pub fn create_layer(&mut self, kind: LayerType) -> BoardResult<LayerId> {
        let id = self.store.create_layer(kind)?;
        self.sync_transform();
        Ok(id)
    }

    pub fn update_layer(&mut self, id: &LayerId, update: &LayerUpdate) -> bool {
        let changed = self.store.update_layer(id, update);
        self.sync_transform();
        changed
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> bool {
        let removed = self.store.remove_layer(id);
        self.sync_transform();
        removed
    }

    pub fn select(&mut self, id: Option<LayerId>) -> bool {
        let changed = self.store.set_selected_layer_id(id);
        self.sync_transform();
        changed
    }

    /// Switch modes. A stroke in progress is committed or discarded per
    /// [`BoardConfig::mid_capture_mode_change`]; other gestures are
    /// cancelled.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode != self.store.mode() {
            self.interrupt_gesture();
        }
        let changed = self.store.set_mode(mode);
        self.sync_transform();
        changed
    }

    pub fn set_camera(&mut self, update: CameraUpdate) -> bool {
        self.store.set_camera(update)
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.store.set_viewport(viewport);
    }

    pub fn undo(&mut self) -> bool {
        if self.gesture != Gesture::Idle {
            log::debug!("Undo ignored during a gesture");
            return false;
        }
        let undone = self.store.undo();
        self.sync_transform();
        undone
    }

    pub fn redo(&mut self) -> bool {
        if self.gesture != Gesture::Idle {
            log::debug!("Redo ignored during a gesture");
            return false;
        }
        let redone = self.store.redo();
        self.sync_transform();
        redone
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&BoardState) + 'static) -> ListenerId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Chrome ---

    pub fn zoom_control(&self) -> &ZoomControl {
        &self.zoom_control
    }

    pub fn zoom_in(&mut self) -> bool {
        let update = self.zoom_control.zoom_in(&self.store.camera());
        self.store.set_camera(update)
    }

    pub fn zoom_out(&mut self) -> bool {
        let update = self.zoom_control.zoom_out(&self.store.camera());
        self.store.set_camera(update)
    }

    /// Apply a toolbar button press.
    pub fn toolbar(&mut self, action: ToolbarAction) -> BoardResult<()> {
        match action {
            ToolbarAction::Select => {
                self.set_mode(Mode::Selection);
            }
            ToolbarAction::Hand => {
                self.set_mode(Mode::Hand);
            }
            ToolbarAction::Pencil => {
                self.set_mode(Mode::Pencil);
            }
            ToolbarAction::Create(kind) => {
                self.interrupt_gesture();
                self.create_layer(kind)?;
            }
        }
        Ok(())
    }

    /// Apply a properties panel edit to the selected layer.
    pub fn edit_selected(&mut self, edit: &PropertyEdit) -> bool {
        let Some(layer) = self.store.selected_layer() else {
            return false;
        };
        if !edit.applies_to(layer.layer_type()) {
            log::debug!("{:?} does not apply to {}", edit, layer.layer_type());
            return false;
        }
        let id = layer.id().clone();
        self.update_layer(&id, &edit.to_update())
    }

    // --- Input ---

    pub fn pointer_down(&mut self, input: &PointerInput) {
        if self.gesture != Gesture::Idle {
            log::debug!("Pointer down during {:?}; settling it first", self.gesture);
            self.pointer_up();
        }

        let camera = self.store.camera();
        let point = camera.screen_to_canvas(input.position);
        self.store.begin_batch();
        self.gesture = match self.store.mode() {
            Mode::Selection => self.press_selection(point, input.position),
            Mode::Hand => Gesture::Panning {
                last: input.position,
            },
            Mode::Pencil => {
                self.capture.begin();
                Gesture::Drawing
            }
            Mode::Inserting(kind) => {
                if let Err(err) = self.store.create_layer_at(kind, point) {
                    log::warn!("Click-to-place failed: {}", err);
                }
                Gesture::Idle
            }
        };
        if self.gesture == Gesture::Idle {
            self.store.end_batch();
        }
        self.sync_transform();
    }

    fn press_selection(&mut self, point: Point, screen: Point) -> Gesture {
        let camera = self.store.camera();
        let handle_reach = camera.screen_len_to_canvas(HANDLE_SIZE / 2.0 + self.config.hit_tolerance);
        if let Some(kind) = self.transform.hit_test_handles(point, handle_reach) {
            if let Some(layer) = self.store.selected_layer() {
                self.transform.begin_handle(layer, kind, &camera);
                return Gesture::Transforming;
            }
        }

        let tolerance = camera.screen_len_to_canvas(self.config.hit_tolerance);
        let hit = self
            .store
            .state()
            .layer_at(point, tolerance)
            .map(|layer| layer.id().clone());
        match hit {
            Some(id) => {
                self.store.set_selected_layer_id(Some(id.clone()));
                self.sync_transform();
                if let Some(layer) = self.store.layer(&id) {
                    self.transform.begin_move(layer, point, &camera);
                }
                Gesture::Transforming
            }
            None => {
                self.store.set_selected_layer_id(None);
                Gesture::Panning { last: screen }
            }
        }
    }

    pub fn pointer_move(&mut self, input: &PointerInput) {
        let camera = self.store.camera();
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Panning { last } => {
                let panned = camera.panned(input.position - last);
                self.store.set_camera(CameraUpdate::from(panned));
                self.gesture = Gesture::Panning {
                    last: input.position,
                };
            }
            Gesture::Drawing => {
                let point = camera.screen_to_canvas(input.position);
                self.capture.push(point, input.pressure);
            }
            Gesture::Transforming => {
                let point = camera.screen_to_canvas(input.position);
                self.transform.drag_to(point, input.modifiers.shift, &camera);
            }
        }
    }

    pub fn pointer_up(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => return,
            Gesture::Panning { .. } => {}
            Gesture::Drawing => self.commit_stroke(),
            Gesture::Transforming => {
                let camera = self.store.camera();
                if let Some((id, update)) = self.transform.finish(&camera) {
                    self.store.update_layer(&id, &update);
                }
            }
        }
        self.store.end_batch();
        self.sync_transform();
    }

    /// Wheel zoom anchored at the pointer. Ignored while a gesture is in
    /// progress; handle geometry is held in screen space until release.
    pub fn wheel(&mut self, input: &WheelInput) -> bool {
        if input.delta_y == 0.0 {
            return false;
        }
        if self.gesture != Gesture::Idle {
            log::debug!("Wheel zoom ignored during a gesture");
            return false;
        }
        let direction = ZoomDirection::from_wheel(input.delta_y, input.modifiers.command());
        let camera = self
            .store
            .camera()
            .zoom_at(input.position, direction, self.store.camera_limits());
        self.store.set_camera(CameraUpdate::from(camera))
    }

    /// Handle a key press. Returns whether a shortcut fired.
    pub fn key_down(&mut self, input: &KeyInput) -> bool {
        let Some(action) = ShortcutRegistry::resolve(input) else {
            return false;
        };
        log::debug!("Shortcut {:?}", action);
        match action {
            ShortcutAction::DeleteSelection => {
                if self.gesture != Gesture::Idle {
                    return false;
                }
                match self.store.selected_layer_id().cloned() {
                    Some(id) => self.remove_layer(&id),
                    None => false,
                }
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Cancel => {
                self.cancel_gesture();
                self.select(None);
                self.set_mode(Mode::Selection);
                true
            }
            ShortcutAction::SetMode(mode) => {
                self.set_mode(mode);
                true
            }
        }
    }

    // --- Internals ---

    fn commit_stroke(&mut self) {
        let Some(path) = self.capture.finish() else {
            log::debug!("Stroke released with no samples");
            return;
        };
        let samples = path.len();
        match self.store.insert_layer(Layer::Path(path)) {
            Ok(id) => log::debug!("Committed stroke {} ({} samples)", id, samples),
            Err(err) => log::warn!("Stroke not committed: {}", err),
        }
    }

    /// End the current gesture because the mode is changing.
    fn interrupt_gesture(&mut self) {
        match self.gesture {
            Gesture::Idle => return,
            Gesture::Drawing => match self.config.mid_capture_mode_change {
                ModeChangePolicy::Commit => self.commit_stroke(),
                ModeChangePolicy::Discard => {
                    log::debug!("Discarding stroke of {} samples", self.capture.samples().len());
                    self.capture.discard();
                }
            },
            Gesture::Transforming => self.transform.cancel(),
            Gesture::Panning { .. } => {}
        }
        self.gesture = Gesture::Idle;
        self.store.end_batch();
    }

    /// Drop the current gesture without committing anything.
    fn cancel_gesture(&mut self) {
        match self.gesture {
            Gesture::Idle => return,
            Gesture::Drawing => self.capture.discard(),
            Gesture::Transforming => self.transform.cancel(),
            Gesture::Panning { .. } => {}
        }
        self.gesture = Gesture::Idle;
        self.store.end_batch();
    }

    fn sync_transform(&mut self) {
        self.transform.sync_selection(self.store.selected_layer());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::transform::{Corner, HandleKind};

    fn board() -> Whiteboard {
        Whiteboard::default()
    }

    #[test]
    fn test_click_to_place() {
        let mut board = board();
        board.set_mode(Mode::Inserting(LayerType::Circle));
        board.pointer_down(&PointerInput::at(120.0, 80.0));
        board.pointer_up();

        assert_eq!(board.state().layers.len(), 1);
        let layer = &board.state().layers[0];
        assert_eq!(layer.layer_type(), LayerType::Circle);
        assert!((layer.base().x - 120.0).abs() < f64::EPSILON);
        assert!((layer.base().y - 80.0).abs() < f64::EPSILON);
        assert_eq!(board.mode(), Mode::Selection);
        assert_eq!(board.store().selected_layer_id(), Some(layer.id()));
    }

    #[test]
    fn test_click_to_place_unsupported() {
        let mut board = board();
        board.set_mode(Mode::Inserting(LayerType::Icon));
        board.pointer_down(&PointerInput::at(10.0, 10.0));
        assert!(board.state().layers.is_empty());
        assert_eq!(board.mode(), Mode::Inserting(LayerType::Icon));
    }

    #[test]
    fn test_select_and_move() {
        let mut board = board();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        board.select(None);

        // Default rectangle spans (350, 250)-(450, 350).
        board.pointer_down(&PointerInput::at(400.0, 300.0));
        assert_eq!(board.store().selected_layer_id(), Some(&id));
        board.pointer_move(&PointerInput::at(420.0, 330.0));

        let live = board.live_layer().unwrap();
        assert!((live.base().x - 370.0).abs() < 1e-9);
        // Nothing is stored until release.
        assert!((board.store().layer(&id).unwrap().base().x - 350.0).abs() < f64::EPSILON);

        board.pointer_up();
        let layer = board.store().layer(&id).unwrap();
        assert!((layer.base().x - 370.0).abs() < 1e-9);
        assert!((layer.base().y - 280.0).abs() < 1e-9);
        assert!(board.live_layer().is_none());
    }

    #[test]
    fn test_empty_click_clears_selection_and_pans() {
        let mut board = board();
        board.create_layer(LayerType::Rectangle).unwrap();
        assert!(!board.handles().is_empty());

        board.pointer_down(&PointerInput::at(10.0, 10.0));
        assert_eq!(board.store().selected_layer_id(), None);
        assert!(board.handles().is_empty());
        board.pointer_move(&PointerInput::at(30.0, 5.0));
        board.pointer_up();

        let camera = board.store().camera();
        assert!((camera.x - 20.0).abs() < f64::EPSILON);
        assert!((camera.y + 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hand_mode_does_not_select() {
        let mut board = board();
        board.create_layer(LayerType::Rectangle).unwrap();
        board.select(None);
        board.set_mode(Mode::Hand);
        assert!(board.stage_draggable());

        board.pointer_down(&PointerInput::at(400.0, 300.0));
        board.pointer_move(&PointerInput::at(410.0, 300.0));
        board.pointer_up();
        assert_eq!(board.store().selected_layer_id(), None);
        assert!((board.store().camera().x - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_through_handle() {
        let mut board = board();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        let corner = board
            .handles()
            .iter()
            .find(|handle| handle.kind == HandleKind::Corner(Corner::BottomRight))
            .map(|handle| handle.position)
            .unwrap();
        assert_eq!(corner, Point::new(450.0, 350.0));

        board.pointer_down(&PointerInput::at(corner.x, corner.y));
        board.pointer_move(&PointerInput::at(500.0, 400.0));
        board.pointer_up();

        let layer = board.store().layer(&id).unwrap();
        assert!((layer.base().width - 150.0).abs() < 1e-9);
        assert!((layer.base().height - 150.0).abs() < 1e-9);
        assert!((layer.base().x - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_pencil_suppresses_stage_drag() {
        let mut board = board();
        board.set_mode(Mode::Pencil);
        board.pointer_down(&PointerInput::at(0.0, 0.0));
        assert!(board.is_capturing());
        assert!(!board.stage_draggable());
        board.pointer_move(&PointerInput::at(4.0, 4.0));
        assert!(board.preview().is_some());
        board.pointer_up();
        assert!(!board.is_capturing());
        assert!(board.preview().is_none());
        assert_eq!(board.store().camera(), crate::camera::Camera::default());
    }

    #[test]
    fn test_pointer_down_without_samples_commits_nothing() {
        let mut board = board();
        board.set_mode(Mode::Pencil);
        board.pointer_down(&PointerInput::at(0.0, 0.0));
        board.pointer_up();
        assert!(board.state().layers.is_empty());
        assert!(!board.is_capturing());
    }

    #[test]
    fn test_wheel_zoom() {
        let mut board = board();
        assert!(board.wheel(&WheelInput::new(Point::new(100.0, 100.0), -3.0)));
        assert!((board.store().camera().scale - 1.1).abs() < 1e-12);

        let ctrl = WheelInput::new(Point::new(100.0, 100.0), -3.0).with_modifiers(Modifiers::ctrl());
        board.wheel(&ctrl);
        assert!((board.store().camera().scale - 1.0).abs() < 1e-12);
        assert!(!board.wheel(&WheelInput::new(Point::ZERO, 0.0)));
    }

    #[test]
    fn test_wheel_ignored_while_moving() {
        let mut board = board();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        board.pointer_down(&PointerInput::at(400.0, 300.0));
        board.pointer_move(&PointerInput::at(410.0, 300.0));

        assert!(!board.wheel(&WheelInput::new(Point::ZERO, 120.0)));
        assert_eq!(board.store().camera(), crate::camera::Camera::default());

        board.pointer_up();
        let layer = board.store().layer(&id).unwrap();
        assert!((layer.base().x - 360.0).abs() < 1e-9);
        assert!((layer.base().y - 250.0).abs() < 1e-9);

        // Idle again, so the wheel zooms.
        assert!(board.wheel(&WheelInput::new(Point::ZERO, 120.0)));
    }

    #[test]
    fn test_shortcuts() {
        let mut board = board();
        let id = board.create_layer(LayerType::Text).unwrap();
        assert!(board.key_down(&KeyInput::new("Delete")));
        assert!(board.store().layer(&id).is_none());

        let undo = KeyInput::new("z").with_modifiers(Modifiers::ctrl());
        assert!(board.key_down(&undo));
        assert!(board.store().layer(&id).is_some());

        assert!(board.key_down(&KeyInput::new("p")));
        assert_eq!(board.mode(), Mode::Pencil);

        assert!(board.key_down(&KeyInput::new("Escape")));
        assert_eq!(board.mode(), Mode::Selection);
        assert_eq!(board.store().selected_layer_id(), None);

        assert!(!board.key_down(&KeyInput::new("q")));
    }

    #[test]
    fn test_escape_cancels_transform() {
        let mut board = board();
        let id = board.create_layer(LayerType::Rectangle).unwrap();
        board.pointer_down(&PointerInput::at(400.0, 300.0));
        board.pointer_move(&PointerInput::at(500.0, 300.0));
        board.key_down(&KeyInput::new("Escape"));
        board.pointer_up();
        assert!((board.store().layer(&id).unwrap().base().x - 350.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toolbar_and_properties() {
        let mut board = board();
        board.toolbar(ToolbarAction::Pencil).unwrap();
        assert_eq!(board.mode(), Mode::Pencil);
        board.toolbar(ToolbarAction::Create(LayerType::Rectangle)).unwrap();
        assert_eq!(board.mode(), Mode::Selection);
        assert!(board.toolbar(ToolbarAction::Create(LayerType::Path)).is_err());

        assert!(board.edit_selected(&PropertyEdit::StrokeWidth(50.0)));
        assert!((board.store().selected_layer().unwrap().base().stroke_width - 20.0).abs() < f64::EPSILON);
        assert!(!board.edit_selected(&PropertyEdit::FontSize(30.0)));
    }

    #[test]
    fn test_zoom_buttons() {
        let mut board = board();
        for _ in 0..20 {
            board.zoom_in();
        }
        assert!((board.store().camera().scale - 2.0).abs() < f64::EPSILON);
        assert!(!board.zoom_control().can_zoom_in(&board.store().camera()));
        assert!(!board.zoom_in());
        board.zoom_out();
        assert!((board.store().camera().scale - 1.9).abs() < 1e-9);
    }
}
