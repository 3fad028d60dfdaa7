//! Per-product policies: canvas size, default background and default content.
//!
//! Every product type shares the element model and manipulation engine; an
//! adapter only decides what a new document looks like and how its background
//! is painted. Adapters hold no mutable document state. Switching variant or
//! platform rebuilds the canvas from the new adapter.

mod cv;
mod logo;
mod social;
mod travel;

pub use cv::CvAdapter;
pub use logo::LogoAdapter;
pub use social::{SocialAdapter, SocialPlatform};
pub use travel::TravelAdAdapter;

use crate::canvas::{Background, CanvasState};
use crate::element::{DesignElement, Geometry, SerializableColor, ShapeStyle, TextAlign, TextStyle};
use crate::template::ProductKind;
use kurbo::{Point, Rect, Size};
use peniko::Color;

/// Inset of default content from the canvas edges.
const MARGIN: f64 = 40.0;

/// Render-ready description of a canvas background.
#[derive(Debug, Clone)]
pub struct BackgroundFill {
    /// Solid fill, or the first stop of a gradient.
    pub base: Color,
    pub gradient: Option<GradientFill>,
    /// Platform decoration drawn over the background in preview.
    pub chrome: Option<PlatformChrome>,
}

/// A linear gradient resolved against a canvas size.
#[derive(Debug, Clone)]
pub struct GradientFill {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<(f32, Color)>,
}

/// A platform header band shown around social posts.
#[derive(Debug, Clone)]
pub struct PlatformChrome {
    pub label: &'static str,
    pub accent: Color,
    pub band: Rect,
}

impl BackgroundFill {
    pub fn from_background(background: &Background, size: Size) -> Self {
        let gradient = match (background, background.gradient_line(size)) {
            (Background::LinearGradient { stops, .. }, Some((start, end))) if !stops.is_empty() => Some(GradientFill {
                start,
                end,
                stops: stops.iter().map(|s| (s.offset as f32, Color::from(s.color))).collect(),
            }),
            _ => None,
        };
        Self {
            base: background.base_color(),
            gradient,
            chrome: None,
        }
    }
}

/// Text and colors for the default element set.
pub(crate) struct DefaultCopy {
    pub icon: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub footer: &'static str,
    pub ink: SerializableColor,
    pub title_size: f64,
}

/// Title, subtitle, icon glyph and footer at fixed offsets from the edges.
pub(crate) fn default_element_set(size: Size, copy: &DefaultCopy) -> Vec<DesignElement> {
    let inner_width = (size.width - 2.0 * MARGIN).max(1.0);
    let footer_y = (size.height - MARGIN - 40.0).max(0.0);

    let icon_style = ShapeStyle {
        color: copy.ink,
        font_size: Some(64.0),
        ..ShapeStyle::default()
    };
    let elements = [
        DesignElement::shape(copy.icon, Geometry::new(MARGIN, MARGIN, 80.0, 80.0), icon_style),
        DesignElement::text(
            copy.title,
            Geometry::new(MARGIN, MARGIN + 110.0, inner_width, copy.title_size * 1.5),
            TextStyle::sized(copy.title_size).bold().with_color(copy.ink),
        ),
        DesignElement::text(
            copy.subtitle,
            Geometry::new(MARGIN, MARGIN + 110.0 + copy.title_size * 1.5 + 10.0, inner_width, 50.0),
            TextStyle::sized(24.0).with_color(copy.ink),
        ),
        DesignElement::text(
            copy.footer,
            Geometry::new(MARGIN, footer_y, inner_width, 40.0),
            TextStyle::sized(18.0).with_color(copy.ink).aligned(TextAlign::Center),
        ),
    ];

    elements
        .into_iter()
        .filter_map(|element| {
            element
                .inspect_err(|e| log::error!("Default element rejected: {}", e))
                .ok()
        })
        .collect()
}

/// Size, background and default-content policy for one product type.
pub trait VariantAdapter: Send + Sync {
    fn kind(&self) -> ProductKind;

    /// Canvas size for new documents.
    fn canvas_size(&self) -> Size;

    fn default_background(&self) -> Background;

    /// Elements placed on a document created without a template.
    fn default_elements(&self, size: Size) -> Vec<DesignElement>;

    /// Social platform, for adapters that have one.
    fn platform(&self) -> Option<SocialPlatform> {
        None
    }

    /// Resolve the canvas background for painting.
    fn render_background(&self, canvas: &CanvasState) -> BackgroundFill {
        BackgroundFill::from_background(&canvas.background, canvas.size)
    }

    /// A new, non-empty document with default size, background and content.
    fn blank_canvas(&self) -> CanvasState {
        let size = self.canvas_size();
        CanvasState::with_elements(size, self.default_background(), self.default_elements(size))
    }
}

/// Adapter for a product type; `platform` only matters for social posts.
pub fn adapter_for(kind: ProductKind, platform: Option<SocialPlatform>) -> Option<Box<dyn VariantAdapter>> {
    match kind {
        ProductKind::Logo => Some(Box::new(LogoAdapter)),
        ProductKind::TravelAd => Some(Box::new(TravelAdAdapter)),
        ProductKind::Cv => Some(Box::new(CvAdapter)),
        ProductKind::Social => Some(Box::new(SocialAdapter::new(platform.unwrap_or_default()))),
        ProductKind::Other => None,
    }
}
