//! Error type for the command-line front end.

use sf_core::ErrorKind;
use sf_minerals::MaterialError;
use sf_project::ProjectError;
use std::path::PathBuf;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Project {
        path: PathBuf,
        source: ProjectError,
    },

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CliError::Project { source, .. } => source.kind(),
            CliError::Material(err) => err.kind(),
            CliError::Write { .. } | CliError::Json(_) => ErrorKind::Configuration,
        }
    }

    pub(crate) fn project(path: impl Into<PathBuf>) -> impl FnOnce(ProjectError) -> Self {
        let path = path.into();
        move |source| CliError::Project { path, source }
    }
}
