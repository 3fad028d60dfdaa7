//! Templates: declarative document blueprints with `{{field}}` placeholders.

mod catalog;
mod organization;
mod placeholder;

pub use catalog::TemplateCatalog;
pub use organization::{OrganizationData, merge_organization_fields, resolve_bindings};
pub use placeholder::{Substitution, has_placeholders, placeholders, substitute};

use crate::canvas::{Background, CanvasState};
use crate::element::{DesignElement, ElementBody, FieldBinding, Geometry};
use crate::services::FieldValues;
use crate::variant::SocialPlatform;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Template errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid template {name}: {reason}")]
    Invalid { name: String, reason: String },
    #[error("Template not found: {0}")]
    NotFound(String),
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Product types the editor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductKind {
    TravelAd,
    Logo,
    Social,
    Cv,
    Other,
}

impl ProductKind {
    pub const ALL: [ProductKind; 5] = [
        ProductKind::TravelAd,
        ProductKind::Logo,
        ProductKind::Social,
        ProductKind::Cv,
        ProductKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductKind::TravelAd => "travel-ad",
            ProductKind::Logo => "logo",
            ProductKind::Social => "social",
            ProductKind::Cv => "cv",
            ProductKind::Other => "other",
        }
    }
}

impl fmt::Display for ProductKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "travel-ad" | "travel" => Ok(ProductKind::TravelAd),
            "logo" => Ok(ProductKind::Logo),
            "social" => Ok(ProductKind::Social),
            "cv" | "resume" => Ok(ProductKind::Cv),
            "other" => Ok(ProductKind::Other),
            other => Err(format!("unknown product type '{}'", other)),
        }
    }
}

/// An element as authored in a template. `content` may contain placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBlueprint {
    /// Authoring id, never reused at instantiation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: ElementBody,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl ElementBlueprint {
    pub fn new(body: ElementBody, geometry: Geometry) -> Self {
        Self {
            id: None,
            body,
            geometry,
        }
    }
}

/// A reusable document blueprint. Templates are read-only data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProductKind,
    #[serde(default)]
    pub category: String,
    pub size: Size,
    #[serde(default)]
    pub background: Background,
    /// Social platform the template is laid out for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<SocialPlatform>,
    #[serde(default)]
    pub elements: Vec<ElementBlueprint>,
}

impl Template {
    /// Parse and validate a template.
    pub fn from_json(json: &str) -> TemplateResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    pub fn to_json(&self) -> TemplateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the canvas size and every blueprint geometry.
    pub fn validate(&self) -> TemplateResult<()> {
        let invalid = |reason: String| TemplateError::Invalid {
            name: self.name.clone(),
            reason,
        };
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.size.width) || !valid(self.size.height) {
            return Err(invalid(format!("canvas size {:?} must be positive", self.size)));
        }
        for (index, blueprint) in self.elements.iter().enumerate() {
            blueprint
                .geometry
                .validate()
                .map_err(|e| invalid(format!("element {}: {}", index, e)))?;
        }
        Ok(())
    }

    /// Every distinct field name the template references.
    pub fn field_names(&self) -> BTreeSet<String> {
        self.elements
            .iter()
            .flat_map(|b| placeholders(b.body.content()))
            .map(str::to_string)
            .collect()
    }
}

/// Expand a template into a fresh canvas.
///
/// Every element gets a new id and a [`FieldBinding`] holding its unresolved
/// content. Missing fields resolve to empty strings; nothing here fails.
pub fn instantiate(template: &Template, values: &FieldValues) -> CanvasState {
    let mut elements = Vec::with_capacity(template.elements.len());
    for blueprint in &template.elements {
        let source = blueprint.body.content().to_string();
        let resolved = substitute(&source, values);
        if !resolved.unresolved.is_empty() {
            log::debug!(
                "Template '{}': no value for {:?}",
                template.name,
                resolved.unresolved
            );
        }

        let mut body = blueprint.body.clone();
        body.set_content(resolved.text);
        match DesignElement::new(body, blueprint.geometry) {
            Ok(mut element) => {
                element.binding = Some(FieldBinding {
                    source,
                    organization: None,
                });
                elements.push(element);
            }
            Err(e) => log::warn!("Template '{}': skipping element: {}", template.name, e),
        }
    }
    CanvasState::with_elements(template.size, template.background.clone(), elements)
}
