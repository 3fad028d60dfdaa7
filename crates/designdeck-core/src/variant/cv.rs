use super::{DefaultCopy, VariantAdapter, default_element_set};
use crate::canvas::Background;
use crate::element::{DesignElement, SerializableColor};
use crate::template::ProductKind;
use kurbo::Size;

/// A4 page at 96 dpi.
#[derive(Debug, Clone, Copy, Default)]
pub struct CvAdapter;

impl VariantAdapter for CvAdapter {
    fn kind(&self) -> ProductKind {
        ProductKind::Cv
    }

    fn canvas_size(&self) -> Size {
        Size::new(794.0, 1123.0)
    }

    fn default_background(&self) -> Background {
        Background::solid(SerializableColor::white())
    }

    fn default_elements(&self, size: Size) -> Vec<DesignElement> {
        default_element_set(
            size,
            &DefaultCopy {
                icon: "●",
                title: "Your Name",
                subtitle: "Job Title",
                footer: "email@example.com · +1 555 0100",
                ink: SerializableColor::rgb(0x11, 0x18, 0x27),
                title_size: 40.0,
            },
        )
    }
}
