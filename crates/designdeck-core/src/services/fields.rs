//! Organization/agency data used to fill template placeholders.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field name to value map consumed by template instantiation.
pub type FieldValues = HashMap<String, String>;

/// Canonical placeholder names filled from an [`OrganizationProfile`].
pub mod field_names {
    pub const AGENCY_NAME: &str = "agencyName";
    pub const TAGLINE: &str = "tagline";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const WEBSITE: &str = "website";
    pub const ADDRESS: &str = "address";
    pub const LOGO_URL: &str = "logoUrl";
}

/// Source of placeholder values.
///
/// Missing keys are not an error; template instantiation substitutes an
/// empty string for them.
pub trait FieldValueProvider: Send + Sync {
    fn field_values(&self) -> FieldValues;
}

/// Profile of the organization a document is made for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationProfile {
    pub id: String,
    pub name: String,
    pub tagline: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
    pub logo_url: String,
    /// Extra fields passed through unchanged.
    pub extra: HashMap<String, String>,
}

impl OrganizationProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a profile from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl FieldValueProvider for OrganizationProfile {
    fn field_values(&self) -> FieldValues {
        let mut values = self.extra.clone();
        let known = [
            (field_names::AGENCY_NAME, &self.name),
            (field_names::TAGLINE, &self.tagline),
            (field_names::PHONE, &self.phone),
            (field_names::EMAIL, &self.email),
            (field_names::WEBSITE, &self.website),
            (field_names::ADDRESS, &self.address),
            (field_names::LOGO_URL, &self.logo_url),
        ];
        // Empty profile fields stay missing so they resolve like any unknown key.
        for (key, value) in known {
            if !value.is_empty() {
                values.insert(key.to_string(), value.clone());
            }
        }
        values
    }
}

/// A fixed set of values, e.g. read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticFieldValues(pub FieldValues);

impl FieldValueProvider for StaticFieldValues {
    fn field_values(&self) -> FieldValues {
        self.0.clone()
    }
}
