//! Direct-manipulation gesture state machine.
//!
//! The engine turns [`CanvasEvent`]s into new canvas states. At most one
//! gesture is active at a time. Each [`Transition`] says whether the result
//! should be snapshotted into history: drags commit once on release, discrete
//! actions commit immediately, and selection changes never commit.

use crate::canvas::CanvasState;
use crate::config::EditorConfig;
use crate::element::{DesignElement, ElementId, ElementPatch, normalize_rotation};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Rotation applied by one rotate action, in degrees.
pub const ROTATE_STEP: f64 = 90.0;

/// Whether the canvas accepts gestures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasMode {
    /// Gestures enabled, selection affordances visible.
    #[default]
    Edit,
    /// Rendered as final output; every mutating event is ignored.
    Preview,
}

/// The active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        element_id: ElementId,
        /// Pointer position minus element position at pointer-down.
        drag_offset: Vec2,
        /// Element position at pointer-down.
        origin: Point,
    },
    Editing {
        element_id: ElementId,
        /// Content before editing started.
        original: String,
        /// Uncommitted text.
        draft: String,
    },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Element targeted by the active gesture.
    pub fn element_id(&self) -> Option<ElementId> {
        match self {
            GestureState::Idle => None,
            GestureState::Dragging { element_id, .. } | GestureState::Editing { element_id, .. } => {
                Some(*element_id)
            }
        }
    }
}

/// Input to the manipulation engine, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp(Point),
    DoubleClick(Point),
    /// The canvas lost focus; ends any gesture.
    FocusLost,
    /// Replace the draft text of the element being edited.
    EditText(String),
    CommitEdit,
    CancelEdit,
    Rotate(ElementId),
    /// Grow an element by `delta` in both dimensions.
    Resize { id: ElementId, delta: f64 },
    Delete(ElementId),
    Add(DesignElement),
    Duplicate(ElementId),
    BringToFront(ElementId),
    SendToBack(ElementId),
}

impl CanvasEvent {
    /// Whether this event is a discrete action that snapshots on its own.
    pub fn is_discrete_action(&self) -> bool {
        matches!(
            self,
            CanvasEvent::Rotate(_)
                | CanvasEvent::Resize { .. }
                | CanvasEvent::Delete(_)
                | CanvasEvent::Add(_)
                | CanvasEvent::Duplicate(_)
                | CanvasEvent::BringToFront(_)
                | CanvasEvent::SendToBack(_)
        )
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// The canvas to display.
    pub canvas: CanvasState,
    /// Whether `canvas` should be committed to history.
    pub commit: bool,
}

impl Transition {
    fn live(canvas: CanvasState) -> Self {
        Self { canvas, commit: false }
    }

    fn committed(canvas: CanvasState) -> Self {
        Self { canvas, commit: true }
    }

    fn unchanged(canvas: &CanvasState) -> Self {
        Self::live(canvas.clone())
    }
}

/// Size limits enforced by resize actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeLimits {
    pub min: f64,
    pub max: Size,
}

impl ResizeLimits {
    fn clamp(&self, value: f64, max: f64) -> f64 {
        value.min(max).max(self.min)
    }
}

impl Default for ResizeLimits {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for ResizeLimits {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min: config.min_element_size,
            max: config.max_element_size(),
        }
    }
}

/// Gesture state machine for one canvas.
#[derive(Debug, Clone, Default)]
pub struct ManipulationEngine {
    mode: CanvasMode,
    gesture: GestureState,
    limits: ResizeLimits,
}

impl ManipulationEngine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            mode: CanvasMode::Edit,
            gesture: GestureState::Idle,
            limits: ResizeLimits::from(config),
        }
    }

    pub fn mode(&self) -> CanvasMode {
        self.mode
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn limits(&self) -> ResizeLimits {
        self.limits
    }

    /// Draft text if a text element is being edited.
    pub fn draft(&self) -> Option<&str> {
        match &self.gesture {
            GestureState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Drop any active gesture without touching the canvas.
    pub fn reset(&mut self) {
        self.gesture = GestureState::Idle;
    }

    /// Switch mode. Entering preview cancels the active gesture: a drag is
    /// reverted to where it started and an edit is discarded. Nothing commits.
    pub fn set_mode(&mut self, canvas: &CanvasState, mode: CanvasMode) -> Transition {
        let previous = std::mem::replace(&mut self.mode, mode);
        if mode != CanvasMode::Preview || previous == CanvasMode::Preview {
            return Transition::unchanged(canvas);
        }
        match std::mem::take(&mut self.gesture) {
            GestureState::Dragging { element_id, origin, .. } => {
                log::debug!("Preview mode cancels drag of {}", element_id);
                Transition::live(canvas.update_element(element_id, &ElementPatch::position(origin)))
            }
            GestureState::Editing { element_id, .. } => {
                log::debug!("Preview mode discards edit of {}", element_id);
                Transition::unchanged(canvas)
            }
            GestureState::Idle => Transition::unchanged(canvas),
        }
    }

    /// Apply one event to `canvas`.
    pub fn apply(&mut self, canvas: &CanvasState, event: CanvasEvent) -> Transition {
        if self.mode == CanvasMode::Preview {
            return Transition::unchanged(canvas);
        }

        if event.is_discrete_action() {
            return self.apply_action(canvas, event);
        }

        match event {
            CanvasEvent::PointerDown(point) => self.pointer_down(canvas, point),
            CanvasEvent::PointerMove(point) => self.pointer_move(canvas, point),
            CanvasEvent::PointerUp(_) => self.end_drag(canvas),
            CanvasEvent::DoubleClick(point) => self.double_click(canvas, point),
            CanvasEvent::FocusLost => match self.gesture {
                GestureState::Dragging { .. } => self.end_drag(canvas),
                GestureState::Editing { .. } => self.commit_edit(canvas),
                GestureState::Idle => Transition::unchanged(canvas),
            },
            CanvasEvent::EditText(text) => {
                if let GestureState::Editing { draft, .. } = &mut self.gesture {
                    *draft = text;
                }
                Transition::unchanged(canvas)
            }
            CanvasEvent::CommitEdit => self.commit_edit(canvas),
            CanvasEvent::CancelEdit => {
                if matches!(self.gesture, GestureState::Editing { .. }) {
                    self.gesture = GestureState::Idle;
                }
                Transition::unchanged(canvas)
            }
            _ => Transition::unchanged(canvas),
        }
    }

    fn pointer_down(&mut self, canvas: &CanvasState, point: Point) -> Transition {
        match self.gesture {
            GestureState::Dragging { .. } => Transition::unchanged(canvas),
            GestureState::Editing { .. } => {
                // Clicking away from the editor commits the edit first.
                let edited = self.commit_edit(canvas);
                let next = self.pointer_down(&edited.canvas, point);
                Transition {
                    canvas: next.canvas,
                    commit: edited.commit || next.commit,
                }
            }
            GestureState::Idle => match canvas.element_at(point) {
                Some(id) => {
                    let selected = canvas.select_element(Some(id));
                    if let Some(element) = selected.element(id) {
                        let origin = element.position();
                        self.gesture = GestureState::Dragging {
                            element_id: id,
                            drag_offset: point - origin,
                            origin,
                        };
                    }
                    Transition::live(selected)
                }
                None => Transition::live(canvas.select_element(None)),
            },
        }
    }

    fn pointer_move(&mut self, canvas: &CanvasState, point: Point) -> Transition {
        let GestureState::Dragging {
            element_id,
            drag_offset,
            ..
        } = self.gesture
        else {
            return Transition::unchanged(canvas);
        };
        let target = point - drag_offset;
        Transition::live(canvas.update_element(element_id, &ElementPatch::position(target)))
    }

    fn end_drag(&mut self, canvas: &CanvasState) -> Transition {
        let GestureState::Dragging { element_id, origin, .. } = self.gesture else {
            return Transition::unchanged(canvas);
        };
        self.gesture = GestureState::Idle;
        let moved = canvas
            .element(element_id)
            .is_some_and(|element| element.position() != origin);
        Transition {
            canvas: canvas.clone(),
            commit: moved,
        }
    }

    fn double_click(&mut self, canvas: &CanvasState, point: Point) -> Transition {
        if !self.gesture.is_idle() {
            return Transition::unchanged(canvas);
        }
        let Some(id) = canvas.element_at(point) else {
            return Transition::live(canvas.select_element(None));
        };
        let selected = canvas.select_element(Some(id));
        if let Some(element) = selected.element(id).filter(|e| e.is_text()) {
            let original = element.content().to_string();
            self.gesture = GestureState::Editing {
                element_id: id,
                draft: original.clone(),
                original,
            };
        }
        Transition::live(selected)
    }

    fn commit_edit(&mut self, canvas: &CanvasState) -> Transition {
        if !matches!(self.gesture, GestureState::Editing { .. }) {
            return Transition::unchanged(canvas);
        }
        let GestureState::Editing {
            element_id,
            original,
            draft,
        } = std::mem::take(&mut self.gesture)
        else {
            return Transition::unchanged(canvas);
        };
        if draft == original || !canvas.contains(element_id) {
            return Transition::unchanged(canvas);
        }
        Transition::committed(canvas.update_element(element_id, &ElementPatch::user_content(draft)))
    }

    /// Discrete actions end an active drag first and are ignored while editing.
    fn apply_action(&mut self, canvas: &CanvasState, event: CanvasEvent) -> Transition {
        if matches!(self.gesture, GestureState::Editing { .. }) {
            log::debug!("Ignoring action while editing text");
            return Transition::unchanged(canvas);
        }
        let ended = self.end_drag(canvas);
        let canvas = &ended.canvas;

        let next = match event {
            CanvasEvent::Rotate(id) => canvas.element(id).map(|element| {
                let rotation = normalize_rotation(element.geometry.rotation + ROTATE_STEP);
                canvas.update_element(id, &ElementPatch::rotation(rotation))
            }),
            CanvasEvent::Resize { id, delta } => canvas.element(id).map(|element| {
                let size = Size::new(
                    self.limits.clamp(element.geometry.width + delta, self.limits.max.width),
                    self.limits.clamp(element.geometry.height + delta, self.limits.max.height),
                );
                canvas.update_element(id, &ElementPatch::size(size))
            }),
            CanvasEvent::Delete(id) => canvas.contains(id).then(|| canvas.remove_element(id)),
            CanvasEvent::Add(element) => Some(canvas.add_element(element)),
            CanvasEvent::Duplicate(id) => match canvas.duplicate_element(id) {
                (next, Some(_)) => Some(next),
                (_, None) => None,
            },
            CanvasEvent::BringToFront(id) => canvas.contains(id).then(|| canvas.bring_to_front(id)),
            CanvasEvent::SendToBack(id) => canvas.contains(id).then(|| canvas.send_to_back(id)),
            _ => None,
        };

        match next {
            Some(next) => Transition::committed(next),
            None => {
                log::debug!("Action targets a missing element, ignoring");
                ended
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Background;
    use crate::element::{Geometry, ShapeStyle, TextStyle};

    fn setup() -> (ManipulationEngine, CanvasState, ElementId) {
        let element = DesignElement::text("Hello", Geometry::new(50.0, 50.0, 100.0, 40.0), TextStyle::default())
            .unwrap();
        let id = element.id();
        let canvas = CanvasState::new(Size::new(800.0, 600.0), Background::default())
            .add_element(element)
            .select_element(None);
        (ManipulationEngine::default(), canvas, id)
    }

    fn position(canvas: &CanvasState, id: ElementId) -> Point {
        canvas.element(id).unwrap().position()
    }

    #[test]
    fn test_pointer_down_selects_and_starts_drag() {
        let (mut engine, canvas, id) = setup();
        let t = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 70.0)));
        assert!(!t.commit);
        assert_eq!(t.canvas.selected_id(), Some(id));
        match engine.gesture() {
            GestureState::Dragging { drag_offset, .. } => {
                assert!((drag_offset.x - 10.0).abs() < f64::EPSILON);
                assert!((drag_offset.y - 20.0).abs() < f64::EPSILON);
            }
            other => panic!("expected drag, got {:?}", other),
        }
    }

    #[test]
    fn test_drag_moves_live_and_commits_on_release() {
        let (mut engine, canvas, id) = setup();
        let mut canvas = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 60.0))).canvas;
        for x in [70.0, 90.0, 110.0] {
            let t = engine.apply(&canvas, CanvasEvent::PointerMove(Point::new(x, 60.0)));
            assert!(!t.commit);
            canvas = t.canvas;
        }
        assert_eq!(position(&canvas, id), Point::new(100.0, 50.0));

        let t = engine.apply(&canvas, CanvasEvent::PointerUp(Point::new(110.0, 60.0)));
        assert!(t.commit);
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_drag_clamps_to_origin() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 60.0))).canvas;
        let canvas = engine.apply(&canvas, CanvasEvent::PointerMove(Point::new(0.0, 5.0))).canvas;
        assert_eq!(position(&canvas, id), Point::new(0.0, 0.0));

        // No clamp against the far edge.
        let canvas = engine.apply(&canvas, CanvasEvent::PointerMove(Point::new(2000.0, 5.0))).canvas;
        assert!((position(&canvas, id).x - 1990.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_click_without_move_does_not_commit() {
        let (mut engine, canvas, _) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 60.0))).canvas;
        let t = engine.apply(&canvas, CanvasEvent::PointerUp(Point::new(60.0, 60.0)));
        assert!(!t.commit);
    }

    #[test]
    fn test_click_on_empty_area_clears_selection() {
        let (mut engine, canvas, id) = setup();
        let canvas = canvas.select_element(Some(id));
        let t = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(500.0, 500.0)));
        assert_eq!(t.canvas.selected_id(), None);
        assert!(!t.commit);
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_focus_lost_ends_drag() {
        let (mut engine, canvas, _) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 60.0))).canvas;
        let canvas = engine.apply(&canvas, CanvasEvent::PointerMove(Point::new(80.0, 60.0))).canvas;
        let t = engine.apply(&canvas, CanvasEvent::FocusLost);
        assert!(t.commit);
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_stale_drag_after_delete_is_absorbed() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 60.0))).canvas;
        let canvas = canvas.remove_element(id);
        let t = engine.apply(&canvas, CanvasEvent::PointerMove(Point::new(80.0, 60.0)));
        assert!(t.canvas.is_empty());
        let t = engine.apply(&t.canvas, CanvasEvent::PointerUp(Point::new(80.0, 60.0)));
        assert!(!t.commit);
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_edit_commit_and_cancel() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::DoubleClick(Point::new(60.0, 60.0))).canvas;
        assert!(matches!(engine.gesture(), GestureState::Editing { .. }));

        let t = engine.apply(&canvas, CanvasEvent::EditText("Goodbye".into()));
        assert_eq!(t.canvas.element(id).unwrap().content(), "Hello");
        assert_eq!(engine.draft(), Some("Goodbye"));

        let t = engine.apply(&canvas, CanvasEvent::CommitEdit);
        assert!(t.commit);
        assert_eq!(t.canvas.element(id).unwrap().content(), "Goodbye");

        let canvas = engine.apply(&t.canvas, CanvasEvent::DoubleClick(Point::new(60.0, 60.0))).canvas;
        engine.apply(&canvas, CanvasEvent::EditText("Discarded".into()));
        let t = engine.apply(&canvas, CanvasEvent::CancelEdit);
        assert!(!t.commit);
        assert_eq!(t.canvas.element(id).unwrap().content(), "Goodbye");
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_double_click_on_shape_only_selects() {
        let (mut engine, canvas, _) = setup();
        let shape = DesignElement::shape("star", Geometry::new(300.0, 300.0, 50.0, 50.0), ShapeStyle::default())
            .unwrap();
        let shape_id = shape.id();
        let canvas = canvas.add_element(shape);
        let t = engine.apply(&canvas, CanvasEvent::DoubleClick(Point::new(310.0, 310.0)));
        assert_eq!(t.canvas.selected_id(), Some(shape_id));
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_rotate_four_times() {
        let (mut engine, mut canvas, id) = setup();
        let mut seen = Vec::new();
        for _ in 0..4 {
            let t = engine.apply(&canvas, CanvasEvent::Rotate(id));
            assert!(t.commit);
            canvas = t.canvas;
            seen.push(canvas.element(id).unwrap().geometry.rotation);
        }
        assert_eq!(seen, vec![90.0, 180.0, 270.0, 0.0]);
    }

    #[test]
    fn test_resize_clamps_to_max() {
        let (mut engine, canvas, id) = setup();
        let t = engine.apply(&canvas, CanvasEvent::Resize { id, delta: 10.0 });
        assert!(t.commit);
        let g = t.canvas.element(id).unwrap().geometry;
        assert!((g.width - 110.0).abs() < f64::EPSILON);
        assert!((g.height - 50.0).abs() < f64::EPSILON);

        let t = engine.apply(&t.canvas, CanvasEvent::Resize { id, delta: 1000.0 });
        let g = t.canvas.element(id).unwrap().geometry;
        assert!((g.width - 400.0).abs() < f64::EPSILON);
        assert!((g.height - 400.0).abs() < f64::EPSILON);

        let t = engine.apply(&t.canvas, CanvasEvent::Resize { id, delta: -5000.0 });
        let g = t.canvas.element(id).unwrap().geometry;
        assert!((g.width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_actions_on_missing_id_do_not_commit() {
        let (mut engine, canvas, _) = setup();
        let missing = uuid::Uuid::new_v4();
        for event in [
            CanvasEvent::Rotate(missing),
            CanvasEvent::Delete(missing),
            CanvasEvent::Duplicate(missing),
            CanvasEvent::Resize { id: missing, delta: 10.0 },
        ] {
            let t = engine.apply(&canvas, event);
            assert!(!t.commit);
            assert_eq!(t.canvas, canvas);
        }
    }

    #[test]
    fn test_actions_ignored_while_editing() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::DoubleClick(Point::new(60.0, 60.0))).canvas;
        let t = engine.apply(&canvas, CanvasEvent::Delete(id));
        assert!(!t.commit);
        assert!(t.canvas.contains(id));
    }

    #[test]
    fn test_preview_mode_blocks_mutation() {
        let (mut engine, canvas, id) = setup();
        engine.set_mode(&canvas, CanvasMode::Preview);
        for event in [
            CanvasEvent::PointerDown(Point::new(60.0, 60.0)),
            CanvasEvent::Rotate(id),
            CanvasEvent::Delete(id),
        ] {
            let t = engine.apply(&canvas, event);
            assert!(!t.commit);
            assert_eq!(t.canvas, canvas);
        }
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_preview_mid_drag_reverts_without_commit() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(60.0, 60.0))).canvas;
        let canvas = engine.apply(&canvas, CanvasEvent::PointerMove(Point::new(200.0, 200.0))).canvas;
        let t = engine.set_mode(&canvas, CanvasMode::Preview);
        assert!(!t.commit);
        assert_eq!(position(&t.canvas, id), Point::new(50.0, 50.0));
        assert!(engine.gesture().is_idle());
    }

    #[test]
    fn test_pointer_down_while_editing_commits_edit() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::DoubleClick(Point::new(60.0, 60.0))).canvas;
        engine.apply(&canvas, CanvasEvent::EditText("Changed".into()));
        let t = engine.apply(&canvas, CanvasEvent::PointerDown(Point::new(500.0, 500.0)));
        assert!(t.commit);
        assert_eq!(t.canvas.element(id).unwrap().content(), "Changed");
        assert_eq!(t.canvas.selected_id(), None);
    }

    #[test]
    fn test_focus_lost_commits_edit() {
        let (mut engine, canvas, id) = setup();
        let canvas = engine.apply(&canvas, CanvasEvent::DoubleClick(Point::new(60.0, 60.0))).canvas;
        engine.apply(&canvas, CanvasEvent::EditText("Bye".into()));
        let t = engine.apply(&canvas, CanvasEvent::FocusLost);
        assert!(t.commit);
        assert_eq!(t.canvas.element(id).unwrap().content(), "Bye");
        assert!(engine.gesture().is_idle());

        // Nothing left to commit on a second blur.
        assert!(!engine.apply(&t.canvas, CanvasEvent::FocusLost).commit);
    }
}
