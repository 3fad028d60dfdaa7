//! Canvas state: one editable document.
//!
//! Every editing operation takes `&self` and returns a new [`CanvasState`],
//! so snapshots held by the history are never edited in place. Operations
//! that target a missing element id return an unchanged copy.

use crate::element::{DesignElement, ElementId, ElementPatch, SerializableColor, normalize_rotation};
use kurbo::{Point, Size, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canvas size used when a caller supplies an unusable one.
pub const FALLBACK_CANVAS_SIZE: Size = Size::new(1080.0, 1080.0);

/// Offset applied to duplicated elements.
const DUPLICATE_OFFSET: f64 = 10.0;

/// A color stop within a gradient background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient line, `0.0..=1.0`.
    pub offset: f64,
    pub color: SerializableColor,
}

/// Canvas background fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Background {
    Solid {
        color: SerializableColor,
    },
    /// CSS-style linear gradient; `angle` in degrees, 0 = bottom to top, 90 = left to right.
    LinearGradient {
        angle: f64,
        stops: Vec<GradientStop>,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid {
            color: SerializableColor::white(),
        }
    }
}

impl Background {
    pub fn solid(color: SerializableColor) -> Self {
        Background::Solid { color }
    }

    /// Linear gradient with evenly spaced stops.
    pub fn linear(angle: f64, colors: &[SerializableColor]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f64;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| GradientStop {
                offset: i as f64 / last,
                color,
            })
            .collect();
        Background::LinearGradient { angle, stops }
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, Background::LinearGradient { .. })
    }

    /// Sample the background color at `t` along the gradient line.
    pub fn color_at(&self, t: f64) -> SerializableColor {
        match self {
            Background::Solid { color } => *color,
            Background::LinearGradient { stops, .. } => {
                let Some(first) = stops.first() else {
                    return SerializableColor::transparent();
                };
                if t <= first.offset {
                    return first.color;
                }
                for pair in stops.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    if t <= b.offset {
                        let span = (b.offset - a.offset).max(f64::EPSILON);
                        return a.color.mix(b.color, (t - a.offset) / span);
                    }
                }
                stops.last().map(|s| s.color).unwrap_or(first.color)
            }
        }
    }

    /// Representative color for thumbnails and previews.
    pub fn base_color(&self) -> Color {
        self.color_at(0.0).into()
    }

    /// Start and end points of the gradient line across a canvas of `size`.
    ///
    /// Follows the CSS `linear-gradient` convention: the line passes through the
    /// center and is long enough for the corners to get the end colors.
    pub fn gradient_line(&self, size: Size) -> Option<(Point, Point)> {
        let Background::LinearGradient { angle, .. } = self else {
            return None;
        };
        let radians = angle.to_radians();
        let direction = Vec2::new(radians.sin(), -radians.cos());
        let half_len = (size.width * radians.sin().abs() + size.height * radians.cos().abs()) / 2.0;
        let center = Point::new(size.width / 2.0, size.height / 2.0);
        Some((center - direction * half_len, center + direction * half_len))
    }
}

/// One editable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    pub size: Size,
    #[serde(default)]
    pub background: Background,
    elements: Vec<DesignElement>,
    /// Selection is session state and is not persisted.
    #[serde(skip)]
    selected: Option<ElementId>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(FALLBACK_CANVAS_SIZE, Background::default())
    }
}

impl CanvasState {
    /// Create an empty canvas.
    pub fn new(size: Size, background: Background) -> Self {
        Self {
            size: sanitize_size(size),
            background,
            elements: Vec::new(),
            selected: None,
        }
    }

    /// Create a canvas from a list of elements, with no selection.
    ///
    /// Elements whose id repeats an earlier one get a fresh id.
    pub fn with_elements(size: Size, background: Background, elements: Vec<DesignElement>) -> Self {
        let mut canvas = Self::new(size, background);
        canvas.elements = elements;
        canvas.ensure_unique_ids();
        canvas
    }

    pub fn elements(&self) -> &[DesignElement] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&DesignElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&DesignElement> {
        self.selected.and_then(|id| self.element(id))
    }

    /// Topmost element whose box contains `point`.
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(point))
            .map(|e| e.id())
    }

    /// Append an element on top and select it.
    #[must_use]
    pub fn add_element(&self, element: DesignElement) -> Self {
        let mut next = self.clone();
        let mut element = element;
        if next.contains(element.id()) {
            element.regenerate_id();
        }
        next.selected = Some(element.id());
        next.elements.push(element);
        next
    }

    /// Remove an element; clears the selection if it pointed at it.
    #[must_use]
    pub fn remove_element(&self, id: ElementId) -> Self {
        let mut next = self.clone();
        let before = next.elements.len();
        next.elements.retain(|e| e.id() != id);
        if next.elements.len() == before {
            log::debug!("remove_element: no element {}", id);
        }
        if next.selected == Some(id) {
            next.selected = None;
        }
        next
    }

    /// Merge `patch` into the matching element.
    #[must_use]
    pub fn update_element(&self, id: ElementId, patch: &ElementPatch) -> Self {
        let mut next = self.clone();
        match next.elements.iter_mut().find(|e| e.id() == id) {
            Some(element) => element.apply(patch),
            None => log::debug!("update_element: no element {}", id),
        }
        next
    }

    /// Set the selection; an id that is not present clears it.
    #[must_use]
    pub fn select_element(&self, id: Option<ElementId>) -> Self {
        let mut next = self.clone();
        next.selected = id.filter(|id| self.contains(*id));
        next
    }

    /// Move an element to the top of the paint order.
    #[must_use]
    pub fn bring_to_front(&self, id: ElementId) -> Self {
        let mut next = self.clone();
        if let Some(pos) = next.index_of(id) {
            let element = next.elements.remove(pos);
            next.elements.push(element);
        }
        next
    }

    /// Move an element to the bottom of the paint order.
    #[must_use]
    pub fn send_to_back(&self, id: ElementId) -> Self {
        let mut next = self.clone();
        if let Some(pos) = next.index_of(id) {
            let element = next.elements.remove(pos);
            next.elements.insert(0, element);
        }
        next
    }

    /// Copy an element with a fresh id, slightly offset, and select the copy.
    ///
    /// Returns the new state and the copy's id (`None` if `id` is absent).
    #[must_use]
    pub fn duplicate_element(&self, id: ElementId) -> (Self, Option<ElementId>) {
        let Some(original) = self.element(id) else {
            log::debug!("duplicate_element: no element {}", id);
            return (self.clone(), None);
        };
        let mut copy = original.clone();
        copy.regenerate_id();
        copy.geometry.translate(Vec2::new(DUPLICATE_OFFSET, DUPLICATE_OFFSET));
        let copy_id = copy.id();
        (self.add_element(copy), Some(copy_id))
    }

    /// Replace every element through `f`, keeping ids and selection.
    #[must_use]
    pub fn map_elements(&self, f: impl Fn(&DesignElement) -> DesignElement) -> Self {
        let mut next = self.clone();
        next.elements = self.elements.iter().map(f).collect();
        next.ensure_unique_ids();
        next
    }

    /// Serialize the canvas to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a canvas from JSON, repairing invalid sizes and duplicate ids.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut canvas: Self = serde_json::from_str(json)?;
        canvas.repair();
        Ok(canvas)
    }

    /// Fix invariants that deserialized data may violate.
    pub(crate) fn repair(&mut self) {
        self.size = sanitize_size(self.size);
        self.elements.retain(|element| match element.geometry.validate() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Dropping element {}: {}", element.id(), e);
                false
            }
        });
        for element in &mut self.elements {
            let geometry = &mut element.geometry;
            geometry.set_position(geometry.position());
            geometry.rotation = normalize_rotation(geometry.rotation);
        }
        self.ensure_unique_ids();
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    fn ensure_unique_ids(&mut self) {
        let mut seen = HashSet::new();
        for element in &mut self.elements {
            while !seen.insert(element.id()) {
                log::warn!("Duplicate element id {}, regenerating", element.id());
                element.regenerate_id();
            }
        }
        if let Some(id) = self.selected {
            if !seen.contains(&id) {
                self.selected = None;
            }
        }
    }
}

fn sanitize_size(size: Size) -> Size {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(size.width) && valid(size.height) {
        size
    } else {
        log::warn!("Invalid canvas size {:?}, using {:?}", size, FALLBACK_CANVAS_SIZE);
        FALLBACK_CANVAS_SIZE
    }
}
