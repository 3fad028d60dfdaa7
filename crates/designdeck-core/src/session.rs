//! Editor session: one open document with its history and collaborators.
//!
//! The session owns the live canvas, the undo history and the gesture
//! engine. Persistence, export, image upload and field data are reached only
//! through the collaborators handed to [`EditorSession::new`].

use crate::canvas::CanvasState;
use crate::config::EditorConfig;
use crate::element::{DesignElement, ElementId, Geometry};
use crate::history::History;
use crate::input::{InputAction, InputState, KeyEvent, PointerEvent};
use crate::manipulation::{CanvasEvent, CanvasMode, GestureState, ManipulationEngine};
use crate::services::{
    ExportOptions, ExportSink, ExportedFile, FieldValueProvider, FieldValues, ImageFile, ImageProvider,
    InlineImageProvider, JsonExporter, OrganizationProfile, ServiceError,
};
use crate::storage::{AutoSaveManager, MemoryStorage, ProjectId, ProjectMetadata, Storage, StorageError};
use crate::template::{
    OrganizationData, ProductKind, Template, TemplateCatalog, TemplateError, instantiate, merge_organization_fields,
};
use crate::variant::{BackgroundFill, SocialPlatform, VariantAdapter, adapter_for};
use kurbo::{Point, Size};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Size given to images whose dimensions are unknown.
const FALLBACK_IMAGE_SIZE: f64 = 200.0;

/// Errors from session operations that reach external collaborators.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("No editor variant for product type {0}")]
    UnsupportedVariant(ProductKind),
    #[error("Canvas is not accepting edits: {0}")]
    NotEditable(&'static str),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// External collaborators injected into a session.
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn Storage>,
    pub exporter: Arc<dyn ExportSink>,
    pub images: Arc<dyn ImageProvider>,
    pub fields: Option<Arc<dyn FieldValueProvider>>,
}

impl Collaborators {
    /// In-process implementations: memory storage, JSON export, inline images.
    pub fn in_memory() -> Self {
        Self {
            storage: Arc::new(MemoryStorage::new()),
            exporter: Arc::new(JsonExporter),
            images: Arc::new(InlineImageProvider::new()),
            fields: None,
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_fields(mut self, fields: Arc<dyn FieldValueProvider>) -> Self {
        self.fields = Some(fields);
        self
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// One open document.
pub struct EditorSession {
    canvas: CanvasState,
    history: History<CanvasState>,
    engine: ManipulationEngine,
    input: InputState,
    adapter: Box<dyn VariantAdapter>,
    catalog: Arc<TemplateCatalog>,
    template_index: usize,
    metadata: ProjectMetadata,
    organization: Option<OrganizationData>,
    config: EditorConfig,
    autosave: AutoSaveManager<dyn Storage>,
    exporter: Arc<dyn ExportSink>,
    images: Arc<dyn ImageProvider>,
    fields: Option<Arc<dyn FieldValueProvider>>,
}

impl EditorSession {
    /// Open a new document for `kind`, starting from its first template.
    pub fn new(
        kind: ProductKind,
        platform: Option<SocialPlatform>,
        catalog: Arc<TemplateCatalog>,
        collaborators: Collaborators,
        config: EditorConfig,
    ) -> SessionResult<Self> {
        let adapter = adapter_for(kind, platform).ok_or(SessionError::UnsupportedVariant(kind))?;
        let mut autosave = AutoSaveManager::new(collaborators.storage);
        autosave.set_interval(Duration::from_secs(config.autosave_interval_secs));

        let mut session = Self {
            canvas: CanvasState::default(),
            history: History::with_depth(CanvasState::default(), config.history_depth),
            engine: ManipulationEngine::new(&config),
            input: InputState::new(&config),
            metadata: ProjectMetadata::new("Untitled", kind),
            adapter,
            catalog,
            template_index: 0,
            organization: None,
            config,
            autosave,
            exporter: collaborators.exporter,
            images: collaborators.images,
            fields: collaborators.fields,
        };
        let canvas = session.initial_canvas();
        session.start_document(canvas);
        Ok(session)
    }

    /// Open a saved project.
    pub async fn open(
        id: ProjectId,
        catalog: Arc<TemplateCatalog>,
        collaborators: Collaborators,
        config: EditorConfig,
    ) -> SessionResult<Self> {
        let mut autosave = AutoSaveManager::new(Arc::clone(&collaborators.storage));
        autosave.set_interval(Duration::from_secs(config.autosave_interval_secs));
        let record = autosave.load(id).await?;

        let mut session = Self::new(record.metadata.kind, record.metadata.platform, catalog, collaborators, config)?;
        session.start_document(record.canvas);
        session.autosave = autosave;
        session.metadata = record.metadata;
        Ok(session)
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn history(&self) -> &History<CanvasState> {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.metadata.name = name.into();
        self.autosave.mark_dirty();
    }

    pub fn kind(&self) -> ProductKind {
        self.adapter.kind()
    }

    pub fn platform(&self) -> Option<SocialPlatform> {
        self.adapter.platform()
    }

    pub fn mode(&self) -> CanvasMode {
        self.engine.mode()
    }

    pub fn gesture(&self) -> &GestureState {
        self.engine.gesture()
    }

    /// Draft text while a text element is being edited.
    pub fn draft(&self) -> Option<&str> {
        self.engine.draft()
    }

    pub fn template_index(&self) -> usize {
        self.template_index
    }

    pub fn is_dirty(&self) -> bool {
        self.autosave.is_dirty()
    }

    pub fn render_background(&self) -> BackgroundFill {
        self.adapter.render_background(&self.canvas)
    }

    /// Templates offered for the current product and platform.
    pub fn template_choices(&self) -> Vec<&Template> {
        self.catalog.choices(self.adapter.kind(), self.adapter.platform())
    }

    /// Field values from the provider, overridden by the applied organization.
    pub fn field_values(&self) -> FieldValues {
        let mut values = self.fields.as_ref().map(|f| f.field_values()).unwrap_or_default();
        if let Some(org) = &self.organization {
            values.extend(org.values.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        values
    }

    /// Feed one event to the gesture engine. Returns true if it was committed.
    pub fn handle_event(&mut self, event: CanvasEvent) -> bool {
        let transition = self.engine.apply(&self.canvas, event);
        self.canvas = transition.canvas;
        if transition.commit {
            self.commit();
        }
        transition.commit
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match self.input.handle_pointer_event(event) {
            Some(event) => self.handle_event(event),
            None => false,
        }
    }

    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let action = self
            .input
            .handle_key_event(event, self.engine.gesture(), self.canvas.selected_id());
        match action {
            Some(InputAction::Canvas(event)) => self.handle_event(event),
            Some(InputAction::Undo) => {
                self.undo();
                false
            }
            Some(InputAction::Redo) => {
                self.redo();
                false
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Step back one snapshot, abandoning any active gesture.
    pub fn undo(&mut self) -> &CanvasState {
        self.engine.reset();
        let restored = CanvasState::clone(self.history.undo());
        self.show_snapshot(restored)
    }

    /// Step forward one snapshot, abandoning any active gesture.
    pub fn redo(&mut self) -> &CanvasState {
        self.engine.reset();
        let restored = CanvasState::clone(self.history.redo());
        self.show_snapshot(restored)
    }

    pub fn set_mode(&mut self, mode: CanvasMode) {
        let transition = self.engine.set_mode(&self.canvas, mode);
        self.canvas = transition.canvas;
    }

    /// Replace the document with an instantiated template (one snapshot).
    pub fn load_template(&mut self, template: &Template) {
        let canvas = self.instantiate(template);
        self.metadata.template = Some(template.name.clone());
        self.replace_canvas(canvas);
    }

    /// Load the template at `index` among [`Self::template_choices`].
    pub fn select_template(&mut self, index: usize) -> SessionResult<()> {
        let catalog = Arc::clone(&self.catalog);
        let template = catalog
            .choices(self.adapter.kind(), self.adapter.platform())
            .get(index)
            .copied()
            .ok_or_else(|| TemplateError::NotFound(format!("{} template #{}", self.adapter.kind(), index)))?;
        self.template_index = index;
        self.load_template(template);
        Ok(())
    }

    /// Start a new document of another product type. History starts over.
    pub fn switch_variant(&mut self, kind: ProductKind, platform: Option<SocialPlatform>) -> SessionResult<()> {
        self.adapter = adapter_for(kind, platform).ok_or(SessionError::UnsupportedVariant(kind))?;
        self.template_index = 0;
        self.metadata = ProjectMetadata::new(self.metadata.name.clone(), kind);
        self.metadata.platform = self.adapter.platform();
        self.metadata.organization = self.organization.as_ref().map(|o| o.id.clone());
        self.autosave.detach();
        let canvas = self.initial_canvas();
        self.start_document(canvas);
        Ok(())
    }

    /// Rebuild a social post for another platform (one snapshot).
    ///
    /// The canvas takes the platform's size and the template index returns to 0.
    pub fn switch_platform(&mut self, platform: SocialPlatform) -> SessionResult<()> {
        if self.adapter.kind() != ProductKind::Social {
            return Err(SessionError::UnsupportedVariant(self.adapter.kind()));
        }
        self.adapter = adapter_for(ProductKind::Social, Some(platform))
            .ok_or(SessionError::UnsupportedVariant(ProductKind::Social))?;
        self.template_index = 0;
        self.metadata.platform = Some(platform);
        let canvas = self.initial_canvas();
        self.replace_canvas(canvas);
        Ok(())
    }

    /// Fill template-bound elements from an organization profile (one snapshot).
    ///
    /// Ignored in preview mode and while a text edit is open. An active drag
    /// is ended first, committing it on its own.
    pub fn apply_organization(&mut self, profile: &OrganizationProfile) -> bool {
        if let Err(e) = self.ensure_editable() {
            log::debug!("Organization '{}' not applied: {}", profile.id, e);
            return false;
        }
        if matches!(self.engine.gesture(), GestureState::Dragging { .. }) {
            self.handle_event(CanvasEvent::FocusLost);
        }
        let org = OrganizationData::from(profile);
        self.canvas = merge_organization_fields(&self.canvas, &org);
        self.metadata.organization = Some(org.id.clone());
        self.organization = Some(org);
        self.commit();
        true
    }

    /// Upload an image and place it as a new element (one snapshot).
    pub async fn insert_image(&mut self, file: ImageFile) -> SessionResult<ElementId> {
        self.ensure_editable()?;
        let images = Arc::clone(&self.images);
        let uploaded = images.upload_image(file).await?;

        let natural = uploaded
            .dimensions
            .map(|(w, h)| Size::new(f64::from(w.max(1)), f64::from(h.max(1))))
            .unwrap_or(Size::new(FALLBACK_IMAGE_SIZE, FALLBACK_IMAGE_SIZE));
        let size = fit_within(natural, self.config.max_element_size());
        let origin = Point::new(
            ((self.canvas.size.width - size.width) / 2.0).max(0.0),
            ((self.canvas.size.height - size.height) / 2.0).max(0.0),
        );
        let element = DesignElement::image(uploaded.url, Geometry::new(origin.x, origin.y, size.width, size.height))
            .map_err(|e| ServiceError::Rejected(e.to_string()))?;
        let id = element.id();
        if !self.handle_event(CanvasEvent::Add(element)) || !self.canvas.contains(id) {
            return Err(SessionError::NotEditable("image was not added"));
        }
        Ok(id)
    }

    /// Persist the current snapshot.
    pub async fn save(&mut self) -> SessionResult<ProjectId> {
        let snapshot = CanvasState::clone(self.history.current());
        let metadata = self.stamped_metadata();
        let id = self.autosave.save(&snapshot, &metadata).await?;
        self.metadata = metadata;
        self.metadata.id = Some(id);
        Ok(id)
    }

    /// Save if there are unsaved commits and the autosave interval elapsed.
    pub async fn autosave(&mut self) -> SessionResult<bool> {
        let snapshot = CanvasState::clone(self.history.current());
        let metadata = self.stamped_metadata();
        let saved = self.autosave.maybe_save(&snapshot, &metadata).await?;
        if saved {
            self.metadata = metadata;
        }
        Ok(saved)
    }

    pub async fn export(&self, options: &ExportOptions) -> SessionResult<ExportedFile> {
        let snapshot = CanvasState::clone(self.history.current());
        Ok(self.exporter.render(&snapshot, options).await?)
    }

    fn instantiate(&self, template: &Template) -> CanvasState {
        let canvas = instantiate(template, &self.field_values());
        match &self.organization {
            Some(org) => merge_organization_fields(&canvas, org),
            None => canvas,
        }
    }

    /// First template for the current variant, or the adapter's default content.
    fn initial_canvas(&mut self) -> CanvasState {
        let catalog = Arc::clone(&self.catalog);
        match catalog.choices(self.adapter.kind(), self.adapter.platform()).first() {
            Some(template) => {
                self.metadata.template = Some(template.name.clone());
                self.instantiate(template)
            }
            None => {
                self.metadata.template = None;
                self.adapter.blank_canvas()
            }
        }
    }

    fn start_document(&mut self, canvas: CanvasState) {
        self.engine.reset();
        self.history = History::with_depth(canvas.select_element(None), self.config.history_depth);
        self.canvas = canvas.select_element(None);
    }

    fn replace_canvas(&mut self, canvas: CanvasState) {
        self.engine.reset();
        self.canvas = canvas;
        self.commit();
    }

    fn ensure_editable(&self) -> SessionResult<()> {
        if self.engine.mode() == CanvasMode::Preview {
            return Err(SessionError::NotEditable("preview mode"));
        }
        if matches!(self.engine.gesture(), GestureState::Editing { .. }) {
            return Err(SessionError::NotEditable("text edit in progress"));
        }
        Ok(())
    }

    /// Metadata as it will be written, keeping the open project's id.
    fn stamped_metadata(&self) -> ProjectMetadata {
        let mut metadata = self.metadata.clone();
        if metadata.id.is_none() {
            metadata.id = self.autosave.project_id();
        }
        metadata.stamped()
    }

    fn commit(&mut self) {
        self.history.commit(self.canvas.clone());
        self.autosave.mark_dirty();
    }

    fn show_snapshot(&mut self, restored: CanvasState) -> &CanvasState {
        // Selection is not part of history; keep it when the element survives.
        self.canvas = restored.select_element(self.canvas.selected_id());
        self.autosave.mark_dirty();
        &self.canvas
    }
}

/// Scale `size` down to fit inside `max`, keeping its aspect ratio.
fn fit_within(size: Size, max: Size) -> Size {
    let scale = (max.width / size.width).min(max.height / size.height).min(1.0);
    Size::new(size.width * scale, size.height * scale)
}
