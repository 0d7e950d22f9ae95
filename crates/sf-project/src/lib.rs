//! sf-project: project file format, validation and execution.

pub mod build;
pub mod run;
pub mod schema;
pub mod validate;

pub use build::{build_geotherm, build_reference, build_rock};
pub use run::{MisfitReport, RunOutput, VelocityReport, run_project};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_project};

use sf_core::ErrorKind;
use sf_minerals::MaterialError;
use sf_profile::ProfileError;
use sf_seismic::SeismicError;
use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Seismic(#[from] SeismicError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

impl ProjectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectError::Material(err) => err.kind(),
            ProjectError::Seismic(err) => err.kind(),
            ProjectError::Profile(err) => err.kind(),
            ProjectError::Validation(_)
            | ProjectError::Io(_)
            | ProjectError::Yaml(_)
            | ProjectError::Json(_) => ErrorKind::Configuration,
        }
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_yaml::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_yaml(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_yaml::to_string(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Project> {
    let content = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&content)?;
    validate_project(&project)?;
    Ok(project)
}

pub fn save_json(path: &Path, project: &Project) -> ProjectResult<()> {
    validate_project(project)?;
    let content = serde_json::to_string_pretty(project)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &Path) -> ProjectResult<Project> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}
