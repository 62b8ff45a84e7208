//! Keyboard shortcut registry.

use crate::input::KeyInput;
use crate::mode::Mode;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    DeleteSelection,
    Undo,
    Redo,
    /// Clear the selection and go back to selection mode.
    Cancel,
    SetMode(Mode),
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub action: ShortcutAction,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        action: ShortcutAction,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, input: &KeyInput) -> bool {
        self.key.eq_ignore_ascii_case(&input.key)
            && self.ctrl == input.modifiers.command()
            && self.shift == input.modifiers.shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, ShortcutAction::Undo, "Undo"),
            Shortcut::new("Z", true, true, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Y", true, false, ShortcutAction::Redo, "Redo"),
            Shortcut::new("Delete", false, false, ShortcutAction::DeleteSelection, "Delete selected layer"),
            Shortcut::new("Backspace", false, false, ShortcutAction::DeleteSelection, "Delete selected layer"),
            Shortcut::new("Escape", false, false, ShortcutAction::Cancel, "Clear selection"),
            Shortcut::new("V", false, false, ShortcutAction::SetMode(Mode::Selection), "Select tool"),
            Shortcut::new("H", false, false, ShortcutAction::SetMode(Mode::Hand), "Hand tool"),
            Shortcut::new("P", false, false, ShortcutAction::SetMode(Mode::Pencil), "Pencil tool"),
        ]
    }

    /// Find the action bound to a key press.
    pub fn resolve(input: &KeyInput) -> Option<ShortcutAction> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(input))
            .map(|shortcut| shortcut.action)
    }
}
