//! Boundary interfaces to collaborators outside the editor core.
//!
//! Exporting, image upload and organization data are all reached through
//! traits injected into the editor session. Failures are returned to the
//! caller as [`ServiceError`]; the core never retries.

mod export;
mod fields;
mod images;

pub use export::{ExportFormat, ExportOptions, ExportSink, ExportedFile, JsonExporter};
pub use fields::{FieldValueProvider, FieldValues, OrganizationProfile, StaticFieldValues, field_names};
pub use images::{ImageFile, ImageProvider, InlineImageProvider, UploadedImage};

pub use crate::storage::BoxFuture;
use thiserror::Error;

/// Errors surfaced by external services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
