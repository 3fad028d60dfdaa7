//! Re-resolving template-bound elements against organization data.

use super::placeholder::substitute;
use crate::canvas::CanvasState;
use crate::element::DesignElement;
use crate::services::{FieldValueProvider, FieldValues, OrganizationProfile};

/// Field values tagged with the organization they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationData {
    pub id: String,
    pub values: FieldValues,
}

impl OrganizationData {
    pub fn new(id: impl Into<String>, values: FieldValues) -> Self {
        Self { id: id.into(), values }
    }
}

impl From<&OrganizationProfile> for OrganizationData {
    fn from(profile: &OrganizationProfile) -> Self {
        Self::new(profile.id.clone(), profile.field_values())
    }
}

fn resolve(element: &DesignElement, values: &FieldValues) -> DesignElement {
    let mut element = element.clone();
    if let Some(binding) = &element.binding {
        let resolved = substitute(&binding.source, values);
        element.body.set_content(resolved.text);
    }
    element
}

/// Stamp `org` onto template-bound text elements and re-resolve every
/// template-bound element against its values.
///
/// Elements without a binding (user-added or user-edited) keep their content.
pub fn merge_organization_fields(canvas: &CanvasState, org: &OrganizationData) -> CanvasState {
    canvas.map_elements(|element| {
        let mut next = resolve(element, &org.values);
        if next.is_text() {
            if let Some(binding) = next.binding.as_mut() {
                binding.organization = Some(org.id.clone());
            }
        }
        next
    })
}

/// Re-resolve template-bound elements against new values.
pub fn resolve_bindings(canvas: &CanvasState, values: &FieldValues) -> CanvasState {
    canvas.map_elements(|element| resolve(element, values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementBody, ElementPatch, Geometry, TextStyle};
    use crate::template::{ElementBlueprint, ProductKind, Template, instantiate};
    use kurbo::Size;

    fn template() -> Template {
        Template {
            name: "Card".to_string(),
            kind: ProductKind::Logo,
            category: String::new(),
            size: Size::new(500.0, 500.0),
            background: Default::default(),
            platform: None,
            elements: vec![ElementBlueprint::new(
                ElementBody::text("{{agencyName}}", TextStyle::default()),
                Geometry::new(0.0, 0.0, 300.0, 60.0),
            )],
        }
    }

    fn org(id: &str, name: &str) -> OrganizationData {
        OrganizationData::new(id, [("agencyName".to_string(), name.to_string())].into())
    }

    #[test]
    fn test_merge_rewrites_bound_text() {
        let canvas = instantiate(&template(), &FieldValues::new());
        assert_eq!(canvas.elements()[0].content(), "");

        let merged = merge_organization_fields(&canvas, &org("org-1", "Blue Sky Tours"));
        let element = &merged.elements()[0];
        assert_eq!(element.content(), "Blue Sky Tours");
        assert_eq!(
            element.binding.as_ref().and_then(|b| b.organization.as_deref()),
            Some("org-1")
        );
        assert_eq!(element.id(), canvas.elements()[0].id());
    }

    #[test]
    fn test_merge_leaves_user_text_alone() {
        let user = DesignElement::text("{{agencyName}} rocks", Geometry::new(0.0, 100.0, 200.0, 40.0), TextStyle::default())
            .unwrap();
        let user_id = user.id();
        let canvas = instantiate(&template(), &FieldValues::new()).add_element(user);
        let bound_id = canvas.elements()[0].id();

        // A user edit detaches the binding.
        let canvas = canvas.update_element(bound_id, &ElementPatch::user_content("My Agency"));

        let merged = merge_organization_fields(&canvas, &org("org-2", "Other"));
        assert_eq!(merged.element(user_id).unwrap().content(), "{{agencyName}} rocks");
        assert_eq!(merged.element(bound_id).unwrap().content(), "My Agency");
        assert!(merged.element(user_id).unwrap().binding.is_none());
    }

    #[test]
    fn test_resolve_bindings_uses_source() {
        let canvas = instantiate(&template(), &org("a", "First").values);
        let again = resolve_bindings(&canvas, &org("b", "Second").values);
        assert_eq!(again.elements()[0].content(), "Second");
    }
}
