//! Design elements: the typed objects placed on a canvas.

mod color;
mod image;
mod style;

pub use color::SerializableColor;
pub use image::{ImageFormat, decode_data_url, image_dimensions, to_data_url};
pub use style::{FontWeight, ImageStyle, ShapeStyle, StylePatch, TextAlign, TextStyle};

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Errors raised when constructing elements.
#[derive(Debug, Error, PartialEq)]
pub enum ElementError {
    #[error("Invalid geometry: width {width} and height {height} must both be positive")]
    InvalidGeometry { width: f64, height: f64 },
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Result type for element construction.
pub type ElementResult<T> = Result<T, ElementError>;

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Element kinds, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
}

/// Position, size and rotation shared by every element kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, normalized to `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Axis-aligned bounding box, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position(), self.size())
    }

    /// Check that both dimensions are finite and strictly positive.
    pub fn validate(&self) -> ElementResult<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(())
        } else {
            Err(ElementError::InvalidGeometry {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Move the top-left corner, clamping into the non-negative quadrant.
    pub fn set_position(&mut self, position: Point) {
        self.x = position.x.max(0.0);
        self.y = position.y.max(0.0);
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position() + delta);
    }
}

/// Kind-specific payload of an element.
///
/// `content` is the literal text for text elements, a URL or `data:` URL for
/// images, and a symbolic shape name or glyph for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementBody {
    Text {
        content: String,
        #[serde(default)]
        style: TextStyle,
    },
    Image {
        content: String,
        #[serde(default)]
        style: ImageStyle,
    },
    Shape {
        content: String,
        #[serde(default)]
        style: ShapeStyle,
    },
}

impl ElementBody {
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        ElementBody::Text {
            content: content.into(),
            style,
        }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ElementBody::Image {
            content: url.into(),
            style: ImageStyle::default(),
        }
    }

    pub fn shape(name: impl Into<String>, style: ShapeStyle) -> Self {
        ElementBody::Shape {
            content: name.into(),
            style,
        }
    }

    /// An empty body of the given kind with default style.
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Text => Self::text(String::new(), TextStyle::default()),
            ElementKind::Image => Self::image(String::new()),
            ElementKind::Shape => Self::shape("rectangle", ShapeStyle::default()),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            ElementBody::Text { .. } => ElementKind::Text,
            ElementBody::Image { .. } => ElementKind::Image,
            ElementBody::Shape { .. } => ElementKind::Shape,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ElementBody::Text { content, .. }
            | ElementBody::Image { content, .. }
            | ElementBody::Shape { content, .. } => content,
        }
    }

    pub fn set_content(&mut self, value: String) {
        match self {
            ElementBody::Text { content, .. }
            | ElementBody::Image { content, .. }
            | ElementBody::Shape { content, .. } => *content = value,
        }
    }

    pub fn apply_style(&mut self, patch: &StylePatch) {
        match self {
            ElementBody::Text { style, .. } => patch.apply_text(style),
            ElementBody::Image { style, .. } => patch.apply_image(style),
            ElementBody::Shape { style, .. } => patch.apply_shape(style),
        }
    }
}

/// Link from an element back to the template text it was resolved from.
///
/// Only elements produced by template instantiation carry a binding; user
/// text never does, so it is never rewritten by field resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBinding {
    /// Blueprint content with its `{{field}}` tokens unresolved.
    pub source: String,
    /// Organization whose data last resolved the tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// One placed object on a canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignElement {
    pub(crate) id: ElementId,
    #[serde(flatten)]
    pub body: ElementBody,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding: Option<FieldBinding>,
}

impl DesignElement {
    /// Create an element with a fresh id.
    ///
    /// Negative positions are clamped to zero and rotation is normalized.
    pub fn new(body: ElementBody, geometry: Geometry) -> ElementResult<Self> {
        geometry.validate()?;
        let mut geometry = geometry;
        geometry.set_position(geometry.position());
        geometry.rotation = normalize_rotation(geometry.rotation);
        Ok(Self {
            id: Uuid::new_v4(),
            body,
            geometry,
            binding: None,
        })
    }

    pub fn text(content: impl Into<String>, geometry: Geometry, style: TextStyle) -> ElementResult<Self> {
        Self::new(ElementBody::text(content, style), geometry)
    }

    pub fn image(url: impl Into<String>, geometry: Geometry) -> ElementResult<Self> {
        Self::new(ElementBody::image(url), geometry)
    }

    pub fn shape(name: impl Into<String>, geometry: Geometry, style: ShapeStyle) -> ElementResult<Self> {
        Self::new(ElementBody::shape(name, style), geometry)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn content(&self) -> &str {
        self.body.content()
    }

    pub fn is_text(&self) -> bool {
        self.kind() == ElementKind::Text
    }

    pub fn position(&self) -> Point {
        self.geometry.position()
    }

    pub fn bounds(&self) -> Rect {
        self.geometry.bounds()
    }

    /// Check if a point (in canvas coordinates) is within this element's box.
    pub fn contains_point(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    /// Whether this element came out of template instantiation.
    pub fn is_template_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Give this element a new unique id (used when duplicating).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    /// Merge a partial update into this element.
    pub fn apply(&mut self, patch: &ElementPatch) {
        if let Some(position) = patch.position {
            self.geometry.set_position(position);
        }
        if let Some(size) = patch.size {
            if size.width > 0.0 && size.height > 0.0 {
                self.geometry.width = size.width;
                self.geometry.height = size.height;
            } else {
                log::debug!("Ignoring non-positive size {:?} for element {}", size, self.id);
            }
        }
        if let Some(rotation) = patch.rotation {
            self.geometry.rotation = normalize_rotation(rotation);
        }
        if let Some(content) = &patch.content {
            self.body.set_content(content.clone());
        }
        if !patch.style.is_empty() {
            self.body.apply_style(&patch.style);
        }
        if patch.detach_binding {
            self.binding = None;
        }
    }
}

/// Construct an element of `kind` with empty content.
pub fn create_element(kind: ElementKind, geometry: Geometry, style: &StylePatch) -> ElementResult<DesignElement> {
    let mut body = ElementBody::empty(kind);
    body.apply_style(style);
    DesignElement::new(body, geometry)
}

/// A partial element update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub content: Option<String>,
    pub style: StylePatch,
    /// Drop the template binding, turning the element into user content.
    pub detach_binding: bool,
}

impl ElementPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn size(size: Size) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn style(style: StylePatch) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Content typed by the user; detaches the template binding.
    pub fn user_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            detach_binding: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_non_positive_size() {
        let err = DesignElement::text("x", Geometry::new(0.0, 0.0, 0.0, 10.0), TextStyle::default())
            .unwrap_err();
        assert_eq!(err, ElementError::InvalidGeometry { width: 0.0, height: 10.0 });
        assert!(create_element(ElementKind::Shape, Geometry::new(0.0, 0.0, 10.0, -1.0), &StylePatch::default()).is_err());
        assert!(DesignElement::image("u", Geometry::new(0.0, 0.0, f64::NAN, 5.0)).is_err());
    }

    #[test]
    fn test_create_clamps_position_and_rotation() {
        let mut geometry = Geometry::new(-20.0, 15.0, 100.0, 40.0);
        geometry.rotation = -90.0;
        let element = DesignElement::text("Hi", geometry, TextStyle::default()).unwrap();
        assert!((element.geometry.x).abs() < f64::EPSILON);
        assert!((element.geometry.y - 15.0).abs() < f64::EPSILON);
        assert!((element.geometry.rotation - 270.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ids_are_unique() {
        let g = Geometry::new(0.0, 0.0, 10.0, 10.0);
        let a = create_element(ElementKind::Text, g, &StylePatch::default()).unwrap();
        let b = create_element(ElementKind::Text, g, &StylePatch::default()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_normalize_rotation() {
        assert!((normalize_rotation(360.0)).abs() < f64::EPSILON);
        assert!((normalize_rotation(450.0) - 90.0).abs() < f64::EPSILON);
        assert!((normalize_rotation(-1e-20)).abs() < f64::EPSILON);
        assert!((normalize_rotation(f64::INFINITY)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_merges_fields() {
        let mut element =
            DesignElement::text("Old", Geometry::new(10.0, 10.0, 100.0, 20.0), TextStyle::default()).unwrap();
        element.binding = Some(FieldBinding {
            source: "{{name}}".to_string(),
            organization: None,
        });

        element.apply(&ElementPatch::position(Point::new(-5.0, 30.0)));
        assert!((element.geometry.x).abs() < f64::EPSILON);
        assert!((element.geometry.y - 30.0).abs() < f64::EPSILON);

        element.apply(&ElementPatch::size(Size::new(0.0, 50.0)));
        assert!((element.geometry.width - 100.0).abs() < f64::EPSILON);

        element.apply(&ElementPatch::content("New"));
        assert_eq!(element.content(), "New");
        assert!(element.is_template_bound());

        element.apply(&ElementPatch::user_content("Mine"));
        assert_eq!(element.content(), "Mine");
        assert!(!element.is_template_bound());
    }

    #[test]
    fn test_json_shape_is_flat() {
        let element = DesignElement::shape(
            "circle",
            Geometry::new(5.0, 6.0, 70.0, 80.0),
            ShapeStyle::default(),
        )
        .unwrap();
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["kind"], "shape");
        assert_eq!(json["content"], "circle");
        assert_eq!(json["x"], 5.0);
        assert_eq!(json["height"], 80.0);
        assert!(json.get("binding").is_none());

        let back: DesignElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_contains_point() {
        let element = DesignElement::image("u", Geometry::new(10.0, 10.0, 50.0, 50.0)).unwrap();
        assert!(element.contains_point(Point::new(30.0, 30.0)));
        assert!(!element.contains_point(Point::new(70.0, 30.0)));
    }
}
