//! Per-kind element styles.
//!
//! Each element kind carries only the style attributes that mean something
//! for it. A [`StylePatch`] can name any attribute; fields that do not apply
//! to the target kind are ignored.

use super::SerializableColor;
use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

/// Horizontal text alignment inside the element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    pub color: SerializableColor,
    pub font_weight: FontWeight,
    pub text_align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
}

impl TextStyle {
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;
    pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

    pub fn sized(font_size: f64) -> Self {
        Self {
            font_size,
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    pub fn with_color(mut self, color: SerializableColor) -> Self {
        self.color = color;
        self
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: Self::DEFAULT_FONT_SIZE,
            color: SerializableColor::black(),
            font_weight: FontWeight::default(),
            text_align: TextAlign::default(),
            line_height: Self::DEFAULT_LINE_HEIGHT,
            background_color: None,
        }
    }
}

/// Style of an image element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStyle {
    pub border_radius: f64,
}

/// Style of a shape element.
///
/// `color` paints glyph-style shapes (icons); `background_color` fills the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    pub color: SerializableColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<SerializableColor>,
    pub border_radius: f64,
    /// Glyph size for icon shapes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            background_color: None,
            border_radius: 0.0,
            font_size: None,
        }
    }
}

/// A partial style update. `None` leaves the attribute untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylePatch {
    pub font_size: Option<f64>,
    pub color: Option<SerializableColor>,
    pub font_weight: Option<FontWeight>,
    pub text_align: Option<TextAlign>,
    pub line_height: Option<f64>,
    pub background_color: Option<SerializableColor>,
    pub border_radius: Option<f64>,
}

impl StylePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_text(&self, style: &mut TextStyle) {
        if let Some(size) = self.font_size.filter(|s| *s > 0.0) {
            style.font_size = size;
        }
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(weight) = self.font_weight {
            style.font_weight = weight;
        }
        if let Some(align) = self.text_align {
            style.text_align = align;
        }
        if let Some(line_height) = self.line_height.filter(|l| *l > 0.0) {
            style.line_height = line_height;
        }
        if let Some(bg) = self.background_color {
            style.background_color = Some(bg);
        }
    }

    pub fn apply_image(&self, style: &mut ImageStyle) {
        if let Some(radius) = self.border_radius {
            style.border_radius = radius.max(0.0);
        }
    }

    pub fn apply_shape(&self, style: &mut ShapeStyle) {
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(bg) = self.background_color {
            style.background_color = Some(bg);
        }
        if let Some(radius) = self.border_radius {
            style.border_radius = radius.max(0.0);
        }
        if let Some(size) = self.font_size.filter(|s| *s > 0.0) {
            style.font_size = Some(size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_ignores_irrelevant_fields() {
        let patch = StylePatch {
            font_weight: Some(FontWeight::Bold),
            border_radius: Some(12.0),
            ..StylePatch::default()
        };

        let mut text = TextStyle::default();
        patch.apply_text(&mut text);
        assert_eq!(text.font_weight, FontWeight::Bold);

        let mut image = ImageStyle::default();
        patch.apply_image(&mut image);
        assert!((image.border_radius - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_patch_rejects_non_positive_font_size() {
        let mut text = TextStyle::default();
        StylePatch {
            font_size: Some(0.0),
            ..StylePatch::default()
        }
        .apply_text(&mut text);
        assert!((text.font_size - TextStyle::DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_style_camel_case_json() {
        let style = TextStyle::sized(32.0).bold();
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["fontSize"], 32.0);
        assert_eq!(json["fontWeight"], "bold");
        assert!(json.get("backgroundColor").is_none());
    }
}
