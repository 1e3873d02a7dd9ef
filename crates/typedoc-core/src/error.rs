//! Errors raised while generating documentation

use std::path::PathBuf;

use thiserror::Error;

use crate::lexer::Location;
use crate::parser::ParseError;
use crate::relpath::RelPathError;

/// A failure that aborts a generation run
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid source pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to parse {}:{location}: {error}", path.display())]
    Parse {
        path: PathBuf,
        location: Location,
        error: ParseError,
    },

    #[error(transparent)]
    Hook(#[from] HookError),
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| GenerateError::Io { path, source }
    }
}

/// A failure reported by a document-generated hook
#[derive(Error, Debug)]
pub enum HookError {
    #[error("failed to determine relpath for {}", dest.display())]
    PathResolution {
        dest: PathBuf,
        #[source]
        source: RelPathError,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
