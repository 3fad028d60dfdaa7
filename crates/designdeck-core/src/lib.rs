//! DesignDeck Core Library
//!
//! Platform-agnostic document model and editing logic for the DesignDeck
//! designer: elements and canvases, the gesture-driven manipulation engine,
//! snapshot history, templates with placeholder substitution, and the
//! per-product variant adapters. Persistence, export and image upload are
//! reached through traits so hosts can plug in their own backends.

pub mod canvas;
pub mod config;
pub mod element;
pub mod history;
pub mod input;
pub mod manipulation;
pub mod services;
pub mod session;
pub mod storage;
pub mod template;
pub mod variant;

pub use canvas::{Background, CanvasState, GradientStop};
pub use config::{ConfigError, EditorConfig};
pub use element::{DesignElement, ElementError, ElementId, ElementKind, ElementPatch, FieldBinding, Geometry};
pub use history::History;
pub use input::{InputAction, InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use manipulation::{CanvasEvent, CanvasMode, GestureState, ManipulationEngine, Transition};
pub use session::{Collaborators, EditorSession, SessionError, SessionResult};
pub use storage::{FileStorage, MemoryStorage, ProjectId, ProjectMetadata, ProjectRecord, Storage, StorageError};
pub use template::{ProductKind, Template, TemplateCatalog, TemplateError, instantiate, substitute};
pub use variant::{SocialPlatform, VariantAdapter, adapter_for};
