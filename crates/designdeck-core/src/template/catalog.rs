//! Built-in template catalog.

use super::{ProductKind, Template, TemplateError, TemplateResult};
use crate::variant::SocialPlatform;
use std::collections::BTreeSet;

/// Template sources embedded in the crate.
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("travel-beach", include_str!("../../templates/travel-beach.json")),
    ("travel-city", include_str!("../../templates/travel-city.json")),
    ("logo-badge", include_str!("../../templates/logo-badge.json")),
    ("logo-wordmark", include_str!("../../templates/logo-wordmark.json")),
    ("social-instagram-promo", include_str!("../../templates/social-instagram-promo.json")),
    ("social-instagram-quote", include_str!("../../templates/social-instagram-quote.json")),
    ("social-story", include_str!("../../templates/social-story.json")),
    ("social-facebook", include_str!("../../templates/social-facebook.json")),
    ("social-twitter", include_str!("../../templates/social-twitter.json")),
    ("social-linkedin", include_str!("../../templates/social-linkedin.json")),
    ("cv-classic", include_str!("../../templates/cv-classic.json")),
];

/// An ordered, read-only collection of templates.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// The templates shipped with the crate. Invalid entries are logged and skipped.
    pub fn builtin() -> Self {
        let templates = BUILTIN_TEMPLATES
            .iter()
            .filter_map(|(file, json)| match Template::from_json(json) {
                Ok(template) => Some(template),
                Err(e) => {
                    log::error!("Built-in template {} is invalid: {}", file, e);
                    None
                }
            })
            .collect();
        Self { templates }
    }

    pub fn from_templates(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn by_kind(&self, kind: ProductKind) -> Vec<&Template> {
        self.templates.iter().filter(|t| t.kind == kind).collect()
    }

    pub fn by_category(&self, category: &str) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| t.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Templates offered for a product, in catalog order.
    ///
    /// For social posts only templates laid out for `platform` qualify.
    pub fn choices(&self, kind: ProductKind, platform: Option<SocialPlatform>) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| t.kind == kind)
            .filter(|t| kind != ProductKind::Social || t.platform == platform)
            .collect()
    }

    pub fn categories(&self) -> BTreeSet<&str> {
        self.templates
            .iter()
            .map(|t| t.category.as_str())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn find(&self, name: &str) -> TemplateResult<&Template> {
        self.templates
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }
}
