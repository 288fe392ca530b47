// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Keyboard shortcut handling.
//!
//! Provides configurable keyboard bindings for transport, note editing,
//! timing and view actions.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

use super::EditorAction;

/// Screen cells panned per keypress
const PAN_STEP: f64 = 4.0;

/// A keyboard shortcut definition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// Key code
    pub code: KeyCode,
    /// Required modifiers
    pub modifiers: KeyModifiers,
}

impl Shortcut {
    /// Create a new shortcut. Shift on a character key is folded into the
    /// character itself, since terminals disagree on reporting it.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let modifiers = match code {
            KeyCode::Char(_) => modifiers.difference(KeyModifiers::SHIFT),
            _ => modifiers,
        };
        Self { code, modifiers }
    }

    /// Create a shortcut with no modifiers
    pub fn key(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    /// Create a shortcut with Ctrl modifier
    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    /// Create a shortcut with Shift modifier
    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }

    /// Check if this shortcut matches a key event
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        *self == Shortcut::new(code, modifiers)
    }
}

/// A keyboard binding (shortcut to action)
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// The shortcut
    pub shortcut: Shortcut,
    /// The action to perform
    pub action: EditorAction,
    /// Description for help display
    pub description: String,
    /// Category for grouping in help
    pub category: String,
}

impl KeyBinding {
    /// Create a new key binding
    pub fn new(shortcut: Shortcut, action: EditorAction, description: impl Into<String>) -> Self {
        Self {
            shortcut,
            action,
            description: description.into(),
            category: "General".to_string(),
        }
    }

    /// Set the category
    pub fn category(mut self, cat: impl Into<String>) -> Self {
        self.category = cat.into();
        self
    }
}

/// Keyboard controller with configurable bindings
pub struct KeyboardController {
    bindings: HashMap<Shortcut, KeyBinding>,
}

impl KeyboardController {
    /// Create an empty keyboard controller
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a keyboard controller with default bindings
    pub fn with_defaults() -> Self {
        let mut controller = Self::new();
        controller.add_default_bindings();
        controller
    }

    /// Add default keyboard bindings
    fn add_default_bindings(&mut self) {
        use EditorAction as A;

        let table = [
            // Transport
            ("Transport", Shortcut::key(KeyCode::Char(' ')), A::TogglePlay, "Play/Pause"),
            ("Transport", Shortcut::key(KeyCode::Esc), A::Stop, "Stop"),
            ("Transport", Shortcut::key(KeyCode::Char('[')), A::SeekBy(-5.0), "Seek -5s"),
            ("Transport", Shortcut::key(KeyCode::Char(']')), A::SeekBy(5.0), "Seek +5s"),
            ("Transport", Shortcut::key(KeyCode::Char('{')), A::SeekBy(-1.0), "Seek -1s"),
            ("Transport", Shortcut::key(KeyCode::Char('}')), A::SeekBy(1.0), "Seek +1s"),
            // Notes
            ("Notes", Shortcut::key(KeyCode::Char('t')), A::AddTab, "Add Tab Note"),
            ("Notes", Shortcut::key(KeyCode::Char('d')), A::AddDirection, "Add Direction Note"),
            ("Notes", Shortcut::key(KeyCode::Delete), A::DeleteNote, "Delete Note"),
            ("Notes", Shortcut::key(KeyCode::Char('x')), A::DeleteNote, "Delete Note"),
            ("Notes", Shortcut::key(KeyCode::Char('s')), A::SortNotes, "Sort By Beat"),
            ("Notes", Shortcut::key(KeyCode::Char('X')), A::ClearAll, "Clear All Notes"),
            ("Notes", Shortcut::key(KeyCode::Left), A::AdjustBeat(-1), "Beat -1"),
            ("Notes", Shortcut::key(KeyCode::Right), A::AdjustBeat(1), "Beat +1"),
            ("Notes", Shortcut::shift(KeyCode::Left), A::StepBeat(-1), "Beat -1 Grid Step"),
            ("Notes", Shortcut::shift(KeyCode::Right), A::StepBeat(1), "Beat +1 Grid Step"),
            ("Notes", Shortcut::key(KeyCode::Char('.')), A::NextDirection, "Direction Clockwise"),
            ("Notes", Shortcut::key(KeyCode::Char(',')), A::PrevDirection, "Direction Counter-clockwise"),
            ("Notes", Shortcut::key(KeyCode::Char('n')), A::ToggleKind, "Toggle Tab/Direction"),
            // Navigation
            ("Navigation", Shortcut::key(KeyCode::Up), A::SelectPrev, "Previous Note"),
            ("Navigation", Shortcut::key(KeyCode::Down), A::SelectNext, "Next Note"),
            ("Navigation", Shortcut::key(KeyCode::Char('k')), A::SelectPrev, "Previous Note"),
            ("Navigation", Shortcut::key(KeyCode::Char('j')), A::SelectNext, "Next Note"),
            // Timing
            ("Timing", Shortcut::key(KeyCode::Char('b')), A::AdjustBpm(1.0), "BPM +1"),
            ("Timing", Shortcut::key(KeyCode::Char('B')), A::AdjustBpm(-1.0), "BPM -1"),
            ("Timing", Shortcut::key(KeyCode::Char('g')), A::AdjustSubdivisions(1), "Subdivisions +1"),
            ("Timing", Shortcut::key(KeyCode::Char('G')), A::AdjustSubdivisions(-1), "Subdivisions -1"),
            ("Timing", Shortcut::key(KeyCode::Char('w')), A::AdjustPreDelay(100), "Pre-delay +100ms"),
            ("Timing", Shortcut::key(KeyCode::Char('W')), A::AdjustPreDelay(-100), "Pre-delay -100ms"),
            // View
            ("View", Shortcut::key(KeyCode::Char('+')), A::ZoomIn, "Zoom In"),
            ("View", Shortcut::key(KeyCode::Char('=')), A::ZoomIn, "Zoom In"),
            ("View", Shortcut::key(KeyCode::Char('-')), A::ZoomOut, "Zoom Out"),
            ("View", Shortcut::ctrl(KeyCode::Left), A::Pan(PAN_STEP, 0.0), "Pan Left"),
            ("View", Shortcut::ctrl(KeyCode::Right), A::Pan(-PAN_STEP, 0.0), "Pan Right"),
            ("View", Shortcut::ctrl(KeyCode::Up), A::Pan(0.0, PAN_STEP), "Pan Up"),
            ("View", Shortcut::ctrl(KeyCode::Down), A::Pan(0.0, -PAN_STEP), "Pan Down"),
            ("View", Shortcut::key(KeyCode::Char('0')), A::ResetView, "Reset View"),
            ("View", Shortcut::key(KeyCode::Char('f')), A::FocusSelected, "Focus Selected Note"),
            ("View", Shortcut::key(KeyCode::Char('p')), A::FlashPath, "Flash Path"),
            // UI
            ("UI", Shortcut::ctrl(KeyCode::Char('s')), A::Save, "Export Chart"),
        ];

        for (category, shortcut, action, description) in table {
            self.add(KeyBinding::new(shortcut, action, description).category(category));
        }

        self.add(
            KeyBinding::new(Shortcut::key(KeyCode::Char(':')), A::Command, "Command Prompt")
                .category("UI"),
        );
        self.add(
            KeyBinding::new(Shortcut::key(KeyCode::Char('?')), A::ToggleHelp, "Toggle Help")
                .category("UI"),
        );
        self.add(
            KeyBinding::new(Shortcut::key(KeyCode::Char('q')), A::Quit, "Quit").category("UI"),
        );
        self.add(
            KeyBinding::new(Shortcut::ctrl(KeyCode::Char('c')), A::Quit, "Quit").category("UI"),
        );
    }

    /// Add a key binding
    pub fn add(&mut self, binding: KeyBinding) {
        self.bindings.insert(binding.shortcut.clone(), binding);
    }

    /// Remove a key binding
    pub fn remove(&mut self, shortcut: &Shortcut) -> Option<KeyBinding> {
        self.bindings.remove(shortcut)
    }

    /// Get action for a key event
    pub fn get_action(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<&EditorAction> {
        let shortcut = Shortcut::new(code, modifiers);
        self.bindings.get(&shortcut).map(|b| &b.action)
    }

    /// Process a key event and return the action. Key releases are
    /// ignored, and repeats only fire for actions that make sense held.
    pub fn process_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        kind: KeyEventKind,
    ) -> Option<EditorAction> {
        let action = self.get_action(code, modifiers)?;
        match kind {
            KeyEventKind::Press => Some(action.clone()),
            KeyEventKind::Repeat if action.repeats() => Some(action.clone()),
            _ => None,
        }
    }

    /// Get all bindings for help display
    pub fn bindings(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.values()
    }

    /// Get bindings grouped by category, each group in a stable order
    pub fn bindings_by_category(&self) -> HashMap<String, Vec<&KeyBinding>> {
        let mut grouped: HashMap<String, Vec<&KeyBinding>> = HashMap::new();

        for binding in self.bindings.values() {
            grouped
                .entry(binding.category.clone())
                .or_default()
                .push(binding);
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| {
                a.description
                    .cmp(&b.description)
                    .then_with(|| format_shortcut(&a.shortcut).cmp(&format_shortcut(&b.shortcut)))
            });
        }

        grouped
    }

    /// Get binding for a shortcut
    pub fn get_binding(&self, shortcut: &Shortcut) -> Option<&KeyBinding> {
        self.bindings.get(shortcut)
    }
}

impl Default for KeyboardController {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Format a shortcut for display
pub fn format_shortcut(shortcut: &Shortcut) -> String {
    let mut parts = Vec::new();

    if shortcut.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl");
    }
    if shortcut.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt");
    }
    if shortcut.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift");
    }

    let key = match shortcut.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{}", n),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        _ => "?".to_string(),
    };

    parts.push(&key);
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_creation() {
        let s = Shortcut::key(KeyCode::Char('a'));
        assert_eq!(s.code, KeyCode::Char('a'));
        assert_eq!(s.modifiers, KeyModifiers::NONE);

        let s = Shortcut::ctrl(KeyCode::Char('c'));
        assert_eq!(s.modifiers, KeyModifiers::CONTROL);

        let s = Shortcut::shift(KeyCode::Up);
        assert_eq!(s.modifiers, KeyModifiers::SHIFT);
    }

    #[test]
    fn test_shift_folded_into_chars() {
        let s = Shortcut::key(KeyCode::Char('X'));
        assert!(s.matches(KeyCode::Char('X'), KeyModifiers::SHIFT));
        assert!(s.matches(KeyCode::Char('X'), KeyModifiers::NONE));
        assert!(!s.matches(KeyCode::Char('X'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_default_bindings() {
        let controller = KeyboardController::with_defaults();

        let action = controller.get_action(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(action, Some(&EditorAction::TogglePlay));

        let action = controller.get_action(KeyCode::Char('t'), KeyModifiers::NONE);
        assert_eq!(action, Some(&EditorAction::AddTab));

        let action = controller.get_action(KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert_eq!(action, Some(&EditorAction::AdjustBpm(-1.0)));

        let action = controller.get_action(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(action, Some(&EditorAction::StepBeat(1)));

        let action = controller.get_action(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(action, Some(&EditorAction::Save));
    }

    #[test]
    fn test_process_key_kinds() {
        let controller = KeyboardController::with_defaults();

        let action = controller.process_key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(action, Some(EditorAction::AdjustBeat(1)));

        let action = controller.process_key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(action, Some(EditorAction::AdjustBeat(1)));

        // Holding delete must not wipe several notes
        let action = controller.process_key(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Repeat);
        assert_eq!(action, None);

        let action = controller.process_key(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(action, None);

        let action = controller.process_key(KeyCode::Char('z'), KeyModifiers::NONE, KeyEventKind::Press);
        assert_eq!(action, None);
    }

    #[test]
    fn test_add_remove_binding() {
        let mut controller = KeyboardController::new();

        let binding = KeyBinding::new(
            Shortcut::key(KeyCode::Char('z')),
            EditorAction::Stop,
            "Custom Stop",
        );

        controller.add(binding);
        assert!(controller.get_action(KeyCode::Char('z'), KeyModifiers::NONE).is_some());

        controller.remove(&Shortcut::key(KeyCode::Char('z')));
        assert!(controller.get_action(KeyCode::Char('z'), KeyModifiers::NONE).is_none());
    }

    #[test]
    fn test_format_shortcut() {
        let s = Shortcut::key(KeyCode::Char(' '));
        assert_eq!(format_shortcut(&s), "Space");

        let s = Shortcut::ctrl(KeyCode::Char('s'));
        assert_eq!(format_shortcut(&s), "Ctrl+s");

        let s = Shortcut::shift(KeyCode::Left);
        assert_eq!(format_shortcut(&s), "Shift+←");

        let s = Shortcut::key(KeyCode::Char('X'));
        assert_eq!(format_shortcut(&s), "X");
    }

    #[test]
    fn test_bindings_by_category() {
        let controller = KeyboardController::with_defaults();
        let grouped = controller.bindings_by_category();

        for category in ["Transport", "Notes", "Navigation", "Timing", "View", "UI"] {
            assert!(grouped.contains_key(category), "missing {}", category);
        }
    }
}
