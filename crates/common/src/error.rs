//! Error types shared across ProctorVision crates.

use std::path::PathBuf;

/// Top-level error type for ProctorVision operations.
#[derive(Debug, thiserror::Error)]
pub enum ProctorError {
    #[error("Classifier error: {message}")]
    Classifier { message: String },

    #[error("Script error at line {line}: {message}")]
    Script { line: usize, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ProctorError.
pub type ProctorResult<T> = Result<T, ProctorError>;

impl ProctorError {
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier {
            message: msg.into(),
        }
    }

    pub fn script(line: usize, msg: impl Into<String>) -> Self {
        Self::Script {
            line,
            message: msg.into(),
        }
    }
}
