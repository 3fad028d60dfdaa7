//! Raw pointer/keyboard input and its translation into canvas events.

use crate::config::EditorConfig;
use crate::element::ElementId;
use crate::manipulation::{CanvasEvent, GestureState};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Keyboard event. Keys use DOM-style names (`"Enter"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// What a raw input amounts to for the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Canvas(CanvasEvent),
    Undo,
    Redo,
}

/// Tracks pressed buttons and click timing across events.
#[derive(Debug, Clone)]
pub struct InputState {
    pub pointer_position: Point,
    pub modifiers: Modifiers,
    pressed_buttons: HashSet<MouseButton>,
    pressed_keys: HashSet<String>,
    last_click: Option<(Instant, Point)>,
    double_click_window: Duration,
    double_click_distance: f64,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl InputState {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            pointer_position: Point::ZERO,
            modifiers: Modifiers::default(),
            pressed_buttons: HashSet::new(),
            pressed_keys: HashSet::new(),
            last_click: None,
            double_click_window: Duration::from_millis(config.double_click_ms),
            double_click_distance: config.double_click_distance,
        }
    }

    /// Update modifier keys state.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    /// Translate a pointer event received now.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<CanvasEvent> {
        self.handle_pointer_event_at(event, Instant::now())
    }

    /// Translate a pointer event received at `now`.
    ///
    /// A second left press within the double-click window and distance is
    /// reported as [`CanvasEvent::DoubleClick`] instead of a pointer-down.
    pub fn handle_pointer_event_at(&mut self, event: PointerEvent, now: Instant) -> Option<CanvasEvent> {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button != MouseButton::Left {
                    return None;
                }
                if self.is_double_click(position, now) {
                    // Reset so a triple click is not another double-click
                    self.last_click = None;
                    Some(CanvasEvent::DoubleClick(position))
                } else {
                    self.last_click = Some((now, position));
                    Some(CanvasEvent::PointerDown(position))
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                let was_pressed = self.pressed_buttons.remove(&button);
                (button == MouseButton::Left && was_pressed).then_some(CanvasEvent::PointerUp(position))
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
                self.is_button_pressed(MouseButton::Left)
                    .then_some(CanvasEvent::PointerMove(position))
            }
        }
    }

    /// Translate a key event given the active gesture and current selection.
    pub fn handle_key_event(
        &mut self,
        event: KeyEvent,
        gesture: &GestureState,
        selected: Option<ElementId>,
    ) -> Option<InputAction> {
        let key = match event {
            KeyEvent::Pressed(key) => {
                self.pressed_keys.insert(key.clone());
                key
            }
            KeyEvent::Released(key) => {
                self.pressed_keys.remove(&key);
                return None;
            }
        };

        match gesture {
            GestureState::Editing { .. } => match key.as_str() {
                "Enter" if !self.modifiers.shift => Some(InputAction::Canvas(CanvasEvent::CommitEdit)),
                "Escape" => Some(InputAction::Canvas(CanvasEvent::CancelEdit)),
                _ => None,
            },
            GestureState::Dragging { .. } => None,
            GestureState::Idle => self.idle_shortcut(&key, selected),
        }
    }

    fn idle_shortcut(&self, key: &str, selected: Option<ElementId>) -> Option<InputAction> {
        let command = self.modifiers.command();
        match key.to_lowercase().as_str() {
            "z" if command && self.modifiers.shift => Some(InputAction::Redo),
            "z" if command => Some(InputAction::Undo),
            "y" if command => Some(InputAction::Redo),
            "d" if command => selected.map(|id| InputAction::Canvas(CanvasEvent::Duplicate(id))),
            "delete" | "backspace" => selected.map(|id| InputAction::Canvas(CanvasEvent::Delete(id))),
            _ => None,
        }
    }

    fn is_double_click(&self, position: Point, now: Instant) -> bool {
        let Some((last_time, last_position)) = self.last_click else {
            return false;
        };
        now.saturating_duration_since(last_time) < self.double_click_window
            && position.distance(last_position) < self.double_click_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_button_press_and_release() {
        let mut input = InputState::default();
        let event = input.handle_pointer_event(down(100.0, 100.0));
        assert_eq!(event, Some(CanvasEvent::PointerDown(Point::new(100.0, 100.0))));
        assert!(input.is_button_pressed(MouseButton::Left));

        let event = input.handle_pointer_event(up(100.0, 100.0));
        assert_eq!(event, Some(CanvasEvent::PointerUp(Point::new(100.0, 100.0))));
        assert!(!input.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_move_only_reported_while_pressed() {
        let mut input = InputState::default();
        assert_eq!(input.handle_pointer_event(PointerEvent::Move { position: Point::new(1.0, 1.0) }), None);
        input.handle_pointer_event(down(0.0, 0.0));
        assert_eq!(
            input.handle_pointer_event(PointerEvent::Move { position: Point::new(5.0, 5.0) }),
            Some(CanvasEvent::PointerMove(Point::new(5.0, 5.0)))
        );
    }

    #[test]
    fn test_right_button_ignored() {
        let mut input = InputState::default();
        let event = input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Right,
        });
        assert_eq!(event, None);
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::default();
        let start = Instant::now();
        input.handle_pointer_event_at(down(100.0, 100.0), start);
        input.handle_pointer_event_at(up(100.0, 100.0), start);

        let second = input.handle_pointer_event_at(down(101.0, 100.0), start + Duration::from_millis(200));
        assert_eq!(second, Some(CanvasEvent::DoubleClick(Point::new(101.0, 100.0))));
        input.handle_pointer_event_at(up(101.0, 100.0), start + Duration::from_millis(220));

        // Third click is a plain press again.
        let third = input.handle_pointer_event_at(down(101.0, 100.0), start + Duration::from_millis(300));
        assert_eq!(third, Some(CanvasEvent::PointerDown(Point::new(101.0, 100.0))));
    }

    #[test]
    fn test_double_click_too_far_or_too_slow() {
        let mut input = InputState::default();
        let start = Instant::now();
        input.handle_pointer_event_at(down(100.0, 100.0), start);
        input.handle_pointer_event_at(up(100.0, 100.0), start);
        let far = input.handle_pointer_event_at(down(150.0, 150.0), start + Duration::from_millis(100));
        assert!(matches!(far, Some(CanvasEvent::PointerDown(_))));
        input.handle_pointer_event_at(up(150.0, 150.0), start);

        let slow = input.handle_pointer_event_at(down(150.0, 150.0), start + Duration::from_millis(900));
        assert!(matches!(slow, Some(CanvasEvent::PointerDown(_))));
    }

    #[test]
    fn test_editing_keys() {
        let mut input = InputState::default();
        let editing = GestureState::Editing {
            element_id: uuid::Uuid::new_v4(),
            original: String::new(),
            draft: String::new(),
        };
        assert_eq!(
            input.handle_key_event(KeyEvent::Pressed("Enter".into()), &editing, None),
            Some(InputAction::Canvas(CanvasEvent::CommitEdit))
        );
        assert_eq!(
            input.handle_key_event(KeyEvent::Pressed("Escape".into()), &editing, None),
            Some(InputAction::Canvas(CanvasEvent::CancelEdit))
        );
        assert_eq!(input.handle_key_event(KeyEvent::Pressed("a".into()), &editing, None), None);
    }

    #[test]
    fn test_idle_shortcuts() {
        let mut input = InputState::default();
        let id = uuid::Uuid::new_v4();
        let idle = GestureState::Idle;

        assert_eq!(
            input.handle_key_event(KeyEvent::Pressed("Delete".into()), &idle, Some(id)),
            Some(InputAction::Canvas(CanvasEvent::Delete(id)))
        );
        assert_eq!(input.handle_key_event(KeyEvent::Pressed("Backspace".into()), &idle, None), None);

        input.set_modifiers(Modifiers { ctrl: true, ..Modifiers::default() });
        assert_eq!(input.handle_key_event(KeyEvent::Pressed("z".into()), &idle, None), Some(InputAction::Undo));
        input.set_modifiers(Modifiers { meta: true, shift: true, ..Modifiers::default() });
        assert_eq!(input.handle_key_event(KeyEvent::Pressed("Z".into()), &idle, None), Some(InputAction::Redo));
    }

    #[test]
    fn test_key_tracking() {
        let mut input = InputState::default();
        input.handle_key_event(KeyEvent::Pressed("a".into()), &GestureState::Idle, None);
        assert!(input.is_key_pressed("a"));
        input.handle_key_event(KeyEvent::Released("a".into()), &GestureState::Idle, None);
        assert!(!input.is_key_pressed("a"));
    }
}
