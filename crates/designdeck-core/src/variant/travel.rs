use super::{DefaultCopy, VariantAdapter, default_element_set};
use crate::canvas::Background;
use crate::element::{DesignElement, SerializableColor};
use crate::template::ProductKind;
use kurbo::Size;

/// Portrait travel advertisement over a sky gradient.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelAdAdapter;

impl VariantAdapter for TravelAdAdapter {
    fn kind(&self) -> ProductKind {
        ProductKind::TravelAd
    }

    fn canvas_size(&self) -> Size {
        Size::new(1080.0, 1350.0)
    }

    fn default_background(&self) -> Background {
        Background::linear(
            180.0,
            &[SerializableColor::rgb(0x0e, 0xa5, 0xe9), SerializableColor::rgb(0x1e, 0x3a, 0x8a)],
        )
    }

    fn default_elements(&self, size: Size) -> Vec<DesignElement> {
        default_element_set(
            size,
            &DefaultCopy {
                icon: "✈",
                title: "Discover Paradise",
                subtitle: "7 nights from $999",
                footer: "Book now",
                ink: SerializableColor::white(),
                title_size: 72.0,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::VariantAdapter;

    #[test]
    fn test_travel_background_is_gradient() {
        let canvas = TravelAdAdapter.blank_canvas();
        assert!(canvas.background.is_gradient());
        let fill = TravelAdAdapter.render_background(&canvas);
        assert!(fill.gradient.is_some());
    }
}
