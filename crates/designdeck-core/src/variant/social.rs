//! Social media posts, sized per platform.

use super::{BackgroundFill, DefaultCopy, PlatformChrome, VariantAdapter, default_element_set};
use crate::canvas::{Background, CanvasState};
use crate::element::{DesignElement, SerializableColor};
use crate::template::ProductKind;
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Height of the platform header band in preview.
const CHROME_HEIGHT: f64 = 48.0;

/// Platforms a social post can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SocialPlatform {
    #[default]
    Instagram,
    InstagramStory,
    Facebook,
    Twitter,
    #[serde(rename = "linkedin")]
    LinkedIn,
}

impl SocialPlatform {
    pub const ALL: [SocialPlatform; 5] = [
        SocialPlatform::Instagram,
        SocialPlatform::InstagramStory,
        SocialPlatform::Facebook,
        SocialPlatform::Twitter,
        SocialPlatform::LinkedIn,
    ];

    /// Default post size for the platform.
    pub fn size(&self) -> Size {
        match self {
            SocialPlatform::Instagram => Size::new(1080.0, 1080.0),
            SocialPlatform::InstagramStory => Size::new(1080.0, 1920.0),
            SocialPlatform::Facebook => Size::new(1200.0, 630.0),
            SocialPlatform::Twitter => Size::new(1024.0, 512.0),
            SocialPlatform::LinkedIn => Size::new(1200.0, 627.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::InstagramStory => "instagram-story",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::LinkedIn => "linkedin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::InstagramStory => "Instagram Story",
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::Twitter => "Twitter",
            SocialPlatform::LinkedIn => "LinkedIn",
        }
    }

    /// Brand accent color.
    pub fn accent(&self) -> SerializableColor {
        match self {
            SocialPlatform::Instagram | SocialPlatform::InstagramStory => SerializableColor::rgb(0xdd, 0x2a, 0x7b),
            SocialPlatform::Facebook => SerializableColor::rgb(0x18, 0x77, 0xf2),
            SocialPlatform::Twitter => SerializableColor::rgb(0x1d, 0xa1, 0xf2),
            SocialPlatform::LinkedIn => SerializableColor::rgb(0x0a, 0x66, 0xc2),
        }
    }

    /// Decorative gradient keyed by platform.
    pub fn decoration(&self) -> Background {
        let rgb = SerializableColor::rgb;
        match self {
            SocialPlatform::Instagram => Background::linear(
                45.0,
                &[rgb(0xf5, 0x85, 0x29), rgb(0xdd, 0x2a, 0x7b), rgb(0x81, 0x34, 0xaf), rgb(0x51, 0x5b, 0xd4)],
            ),
            SocialPlatform::InstagramStory => Background::linear(
                180.0,
                &[rgb(0xf5, 0x85, 0x29), rgb(0xdd, 0x2a, 0x7b), rgb(0x81, 0x34, 0xaf)],
            ),
            SocialPlatform::Facebook => Background::linear(180.0, &[rgb(0x18, 0x77, 0xf2), rgb(0x0b, 0x3d, 0x91)]),
            SocialPlatform::Twitter => Background::linear(135.0, &[rgb(0x1d, 0xa1, 0xf2), rgb(0x0d, 0x8b, 0xd9)]),
            SocialPlatform::LinkedIn => Background::linear(135.0, &[rgb(0x0a, 0x66, 0xc2), rgb(0x00, 0x41, 0x82)]),
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SocialPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        SocialPlatform::ALL
            .into_iter()
            .find(|p| p.as_str() == lower)
            .ok_or_else(|| format!("unknown platform '{}'", s))
    }
}

/// Social post adapter for one platform.
#[derive(Debug, Clone, Copy, Default)]
pub struct SocialAdapter {
    platform: SocialPlatform,
}

impl SocialAdapter {
    pub fn new(platform: SocialPlatform) -> Self {
        Self { platform }
    }

    /// Adapter for another platform.
    pub fn with_platform(&self, platform: SocialPlatform) -> Self {
        Self::new(platform)
    }
}

impl VariantAdapter for SocialAdapter {
    fn kind(&self) -> ProductKind {
        ProductKind::Social
    }

    fn canvas_size(&self) -> Size {
        self.platform.size()
    }

    fn default_background(&self) -> Background {
        self.platform.decoration()
    }

    fn default_elements(&self, size: Size) -> Vec<DesignElement> {
        default_element_set(
            size,
            &DefaultCopy {
                icon: "✦",
                title: "Big News!",
                subtitle: "Share your story",
                footer: "@yourhandle",
                ink: SerializableColor::white(),
                title_size: 64.0,
            },
        )
    }

    fn platform(&self) -> Option<SocialPlatform> {
        Some(self.platform)
    }

    fn render_background(&self, canvas: &CanvasState) -> BackgroundFill {
        let mut fill = BackgroundFill::from_background(&canvas.background, canvas.size);
        fill.chrome = Some(PlatformChrome {
            label: self.platform.label(),
            accent: self.platform.accent().into(),
            band: Rect::new(0.0, 0.0, canvas.size.width, CHROME_HEIGHT.min(canvas.size.height)),
        });
        fill
    }
}
