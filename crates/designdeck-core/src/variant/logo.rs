use super::{DefaultCopy, VariantAdapter, default_element_set};
use crate::canvas::Background;
use crate::element::{DesignElement, SerializableColor};
use crate::template::ProductKind;
use kurbo::Size;

/// Square logo artboard on white.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogoAdapter;

impl VariantAdapter for LogoAdapter {
    fn kind(&self) -> ProductKind {
        ProductKind::Logo
    }

    fn canvas_size(&self) -> Size {
        Size::new(500.0, 500.0)
    }

    fn default_background(&self) -> Background {
        Background::solid(SerializableColor::white())
    }

    fn default_elements(&self, size: Size) -> Vec<DesignElement> {
        default_element_set(
            size,
            &DefaultCopy {
                icon: "★",
                title: "Brand Name",
                subtitle: "Your tagline here",
                footer: "EST. 2024",
                ink: SerializableColor::rgb(0x1f, 0x29, 0x37),
                title_size: 48.0,
            },
        )
    }
}
