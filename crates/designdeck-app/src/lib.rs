//! DesignDeck command-line shell.
//!
//! Thin layer over `designdeck-core`: every command builds the core objects
//! it needs, runs one operation and returns the text to print.

mod cli;
mod config;

pub use cli::{Cli, Command, InstantiateArgs, NewArgs};
pub use config::AppConfig;

use designdeck_core::services::{FieldValues, OrganizationProfile};
use designdeck_core::storage::{FileStorage, StorageError};
use designdeck_core::{
    Collaborators, ConfigError, EditorSession, SessionError, Storage, Template, TemplateCatalog, TemplateError,
    instantiate,
};
use pollster::block_on;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type AppResult<T> = Result<T, AppError>;

/// Load configuration and run one parsed command.
pub fn run(cli: Cli) -> AppResult<String> {
    let config = AppConfig::load(cli.config.as_deref())?.with_storage_override(cli.storage_dir);
    execute(cli.command, &config)
}

pub fn execute(command: Command, config: &AppConfig) -> AppResult<String> {
    match command {
        Command::New(args) => new_document(args, config),
        Command::Instantiate(args) => instantiate_template(args),
        Command::Templates { kind, platform } => {
            let catalog = TemplateCatalog::builtin();
            let templates = match kind {
                Some(kind) => catalog.choices(kind, platform),
                None => catalog
                    .templates()
                    .iter()
                    .filter(|t| platform.is_none() || t.platform == platform)
                    .collect(),
            };
            Ok(format_templates(&templates))
        }
        Command::Projects => {
            let storage = open_storage(config)?;
            let projects = block_on(storage.list())?;
            let mut out = String::new();
            for project in projects {
                let id = project.id.map(|id| id.to_string()).unwrap_or_default();
                let _ = writeln!(out, "{}  {:<10} {}", id, project.kind, project.name);
            }
            Ok(out)
        }
        Command::Show { id } => {
            let storage = open_storage(config)?;
            let record = block_on(storage.load(id))?;
            Ok(record.to_json()?)
        }
        Command::Delete { id } => {
            let storage = open_storage(config)?;
            block_on(storage.delete(id))?;
            Ok(format!("Deleted {}", id))
        }
    }
}

fn new_document(args: NewArgs, config: &AppConfig) -> AppResult<String> {
    let mut collaborators = Collaborators::in_memory();
    if args.save {
        collaborators = collaborators.with_storage(Arc::new(open_storage(config)?));
    }
    let mut session = EditorSession::new(
        args.variant,
        args.platform,
        Arc::new(TemplateCatalog::builtin()),
        collaborators,
        config.editor.clone(),
    )?;
    if let Some(index) = args.template {
        session.select_template(index)?;
    }
    if let Some(path) = &args.organization {
        let profile = OrganizationProfile::from_json(&read(path)?)?;
        session.apply_organization(&profile);
    }
    if let Some(name) = args.name {
        session.set_name(name);
    }

    if args.save {
        let id = block_on(session.save())?;
        return Ok(id.to_string());
    }
    emit(session.canvas().to_json()?, args.out.as_deref())
}

fn instantiate_template(args: InstantiateArgs) -> AppResult<String> {
    let template = Template::from_json(&read(&args.template)?)?;
    let mut values: FieldValues = match &args.fields {
        Some(path) => serde_json::from_str(&read(path)?)?,
        None => FieldValues::new(),
    };
    values.extend(args.assignments);

    let canvas = instantiate(&template, &values);
    log::info!("Instantiated '{}' with {} elements", template.name, canvas.len());
    emit(canvas.to_json()?, args.out.as_deref())
}

fn format_templates(templates: &[&Template]) -> String {
    let mut out = String::new();
    for template in templates {
        let fields: Vec<_> = template.field_names().into_iter().collect();
        let _ = writeln!(
            out,
            "{:<24} {:<10} {:<12} {}x{}  {}",
            template.name,
            template.kind,
            template.category,
            template.size.width,
            template.size.height,
            fields.join(", ")
        );
    }
    out
}

fn open_storage(config: &AppConfig) -> AppResult<FileStorage> {
    Ok(FileStorage::new(config.storage_dir()?)?)
}

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Write `json` to `out`, or hand it back for printing.
fn emit(json: String, out: Option<&Path>) -> AppResult<String> {
    let Some(path) = out else {
        return Ok(json);
    };
    std::fs::write(path, json).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(format!("Wrote {}", path.display()))
}
