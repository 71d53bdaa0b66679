use std::path::{Path, PathBuf};

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("input not found '{}': {message}", .path.display())]
    NotFound { path: PathBuf, message: String },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("write error '{}': {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("validation error: {0}")]
    Validation(String),

    /// `completed` counts frames fully written before the interrupt was observed.
    #[error("cancelled after {completed} frame(s)")]
    Cancelled { completed: u64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConvertError {
    pub fn not_found(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn write(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Process exit code for this failure kind. Each kind gets its own code; 2 is left to clap's
    /// usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::NotFound { .. } => 3,
            Self::MalformedDocument(_) => 4,
            Self::Render(_) => 5,
            Self::Write { .. } => 6,
            Self::Encoding(_) => 7,
            Self::Validation(_) => 64,
            Self::Cancelled { .. } => 130,
            Self::Other(_) => 1,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
