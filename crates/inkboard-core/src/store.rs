//! The layer store: single owner of board state.
//!
//! Every mutation builds the next [`BoardState`] from a copy of the current
//! one and swaps it in whole, so readers never see a half-applied change.
//! Each applied transition is recorded in the [`History`] and announced to
//! subscribers.

use crate::camera::{Camera, CameraLimits, CameraUpdate};
use crate::config::BoardConfig;
use crate::error::{BoardError, BoardResult};
use crate::history::History;
use crate::layers::{create_layer_factory, FactoryContext, Layer, LayerId, LayerType, LayerUpdate};
use crate::mode::Mode;
use kurbo::{Point, Size};
use std::fmt;

/// Snapshot of everything the store owns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardState {
    /// Layers in z-order, back to front.
    pub layers: Vec<Layer>,
    pub selected_layer_id: Option<LayerId>,
    pub mode: Mode,
    pub camera: Camera,
}

impl BoardState {
    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    pub fn contains(&self, id: &LayerId) -> bool {
        self.layer(id).is_some()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected_layer_id.as_ref().and_then(|id| self.layer(id))
    }

    /// Topmost layer under a canvas point.
    pub fn layer_at(&self, point: Point, tolerance: f64) -> Option<&Layer> {
        self.layers.iter().rev().find(|layer| layer.hit_test(point, tolerance))
    }
}

/// Handle returned by [`LayerStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked with the new state after every applied transition.
pub type Listener = Box<dyn FnMut(&BoardState)>;

/// Observable container for layers, selection, mode and camera.
pub struct LayerStore {
    state: BoardState,
    history: History<BoardState>,
    camera_limits: CameraLimits,
    viewport: Size,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    revision: u64,
}

impl fmt::Debug for LayerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerStore")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("camera_limits", &self.camera_limits)
            .field("viewport", &self.viewport)
            .field("listeners", &format!("<{} listeners>", self.listeners.len()))
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl LayerStore {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            state: BoardState::default(),
            history: History::new(config.history_limit),
            camera_limits: config.camera,
            viewport: config.viewport,
            listeners: Vec::new(),
            next_listener: 0,
            revision: 0,
        }
    }

    // --- Reads ---

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn layers(&self) -> &[Layer] {
        &self.state.layers
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.state.layer(id)
    }

    pub fn selected_layer_id(&self) -> Option<&LayerId> {
        self.state.selected_layer_id.as_ref()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.state.selected_layer()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn camera(&self) -> Camera {
        self.state.camera
    }

    pub fn camera_limits(&self) -> &CameraLimits {
        &self.camera_limits
    }

    /// Size of the visible area in screen pixels.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Number of transitions applied so far, undo and redo included.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Mutations ---

    /// Create a default layer of `kind` near the viewport centre, select it
    /// and return to selection mode.
    pub fn create_layer(&mut self, kind: LayerType) -> BoardResult<LayerId> {
        let context = FactoryContext::Viewport(self.viewport);
        self.create_layer_with(kind, context)
    }

    /// Create a default layer of `kind` with its origin at a canvas point.
    pub fn create_layer_at(&mut self, kind: LayerType, point: Point) -> BoardResult<LayerId> {
        self.create_layer_with(kind, FactoryContext::At(point))
    }

    fn create_layer_with(&mut self, kind: LayerType, context: FactoryContext) -> BoardResult<LayerId> {
        let layer = create_layer_factory(kind, context)?;
        let id = layer.id().clone();
        self.transition("create_layer", |state| {
            state.layers.push(layer);
            state.selected_layer_id = Some(id.clone());
            state.mode = Mode::Selection;
        });
        log::debug!("Created {} layer {}", kind, id);
        Ok(id)
    }

    /// Append a fully formed layer and select it. The mode is left alone.
    ///
    /// Paths must carry at least one sample.
    pub fn insert_layer(&mut self, layer: Layer) -> BoardResult<LayerId> {
        let id = layer.id().clone();
        if self.state.contains(&id) {
            log::warn!("Refusing to insert duplicate layer {}", id);
            return Err(BoardError::DuplicateLayerId(id));
        }
        if let Layer::Path(path) = &layer {
            if path.is_empty() {
                log::warn!("Refusing to insert empty path {}", id);
                return Err(BoardError::EmptyPath(id));
            }
        }
        let selected = id.clone();
        self.transition("insert_layer", |state| {
            state.layers.push(layer);
            state.selected_layer_id = Some(selected);
        });
        log::debug!("Inserted layer {}", id);
        Ok(id)
    }

    /// Merge `update` into the layer `id`. A missing id is a no-op.
    ///
    /// Returns whether anything changed.
    pub fn update_layer(&mut self, id: &LayerId, update: &LayerUpdate) -> bool {
        match self.try_update_layer(id, update) {
            Ok(changed) => changed,
            Err(err) => {
                log::warn!("update_layer ignored: {}", err);
                false
            }
        }
    }

    /// Like [`update_layer`](Self::update_layer) but reports a missing id.
    pub fn try_update_layer(&mut self, id: &LayerId, update: &LayerUpdate) -> BoardResult<bool> {
        if !self.state.contains(id) {
            return Err(BoardError::LayerNotFound(id.clone()));
        }
        Ok(self.transition("update_layer", |state| {
            if let Some(layer) = state.layer_mut(id) {
                layer.apply_update(update);
            }
        }))
    }

    /// Remove the layer `id`. Selection is cleared whenever a layer is
    /// removed, whichever layer was selected.
    pub fn remove_layer(&mut self, id: &LayerId) -> bool {
        if !self.state.contains(id) {
            log::warn!("remove_layer ignored: {}", BoardError::LayerNotFound(id.clone()));
            return false;
        }
        self.transition("remove_layer", |state| {
            state.layers.retain(|layer| layer.id() != id);
            state.selected_layer_id = None;
        })
    }

    /// Select a layer, or clear the selection with `None`. Unknown ids are
    /// ignored.
    pub fn set_selected_layer_id(&mut self, id: Option<LayerId>) -> bool {
        if let Some(missing) = id.as_ref().filter(|id| !self.state.contains(id)) {
            log::warn!("Cannot select missing layer {}", missing);
            return false;
        }
        self.transition("set_selected_layer_id", |state| {
            state.selected_layer_id = id;
        })
    }

    pub fn set_mode(&mut self, mode: Mode) -> bool {
        let previous = self.state.mode;
        let changed = self.transition("set_mode", |state| state.mode = mode);
        if changed {
            log::debug!("Mode {} -> {}", previous, mode);
        }
        changed
    }

    /// Merge a partial camera update. The scale is clamped into range.
    pub fn set_camera(&mut self, update: CameraUpdate) -> bool {
        let camera = self.state.camera.merged(&update, &self.camera_limits);
        if let Some(Err(err)) = update.scale.map(|scale| self.camera_limits.check_scale(scale)) {
            log::debug!("{}; clamped to {}", err, camera.scale);
        }
        self.transition("set_camera", |state| state.camera = camera)
    }

    /// Step back one history entry.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(self.state.clone()) else {
            return false;
        };
        self.restore("undo", previous);
        true
    }

    /// Re-apply the last undone entry.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(self.state.clone()) else {
            return false;
        };
        self.restore("redo", next);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Start coalescing mutations into one history entry.
    pub fn begin_batch(&mut self) {
        self.history.begin_batch();
    }

    /// Stop coalescing. Batches nest.
    pub fn end_batch(&mut self) {
        self.history.end_batch();
    }

    // --- Observation ---

    pub fn subscribe(&mut self, listener: impl FnMut(&BoardState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    // --- Internals ---

    /// Apply `f` to a copy of the state and swap it in if anything changed.
    fn transition(&mut self, op: &str, f: impl FnOnce(&mut BoardState)) -> bool {
        let mut next = self.state.clone();
        f(&mut next);
        if next == self.state {
            log::trace!("{} changed nothing", op);
            return false;
        }
        let before = std::mem::replace(&mut self.state, next);
        self.history.record(before);
        self.commit(op);
        true
    }

    fn restore(&mut self, op: &str, state: BoardState) {
        self.state = state;
        self.commit(op);
    }

    fn commit(&mut self, op: &str) {
        self.revision += 1;
        log::debug!("{} applied (revision {})", op, self.revision);
        let state = &self.state;
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }
}
