//! Error types for the content pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or rendering content
#[derive(Error, Debug)]
pub enum Error {
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },

    #[error("Transform error in {stage} stage: {message}")]
    Transform {
        stage: &'static str,
        message: String,
    },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load highlight theme {path}: {message}")]
    Theme { path: String, message: String },

    #[error("Document {id}: {source}")]
    Document {
        id: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn parse(context: impl Into<String>, message: impl ToString) -> Self {
        Error::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    pub fn transform(stage: &'static str, message: impl ToString) -> Self {
        Error::Transform {
            stage,
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the id of the document being processed
    pub fn in_document(self, id: &str) -> Self {
        match self {
            // Already attributed
            Error::Document { .. } => self,
            other => Error::Document {
                id: id.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, skipping document attribution
    pub fn root(&self) -> &Error {
        match self {
            Error::Document { source, .. } => source.root(),
            other => other,
        }
    }
}
