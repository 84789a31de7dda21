use crate::utils::parser::ParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// Propagated unchanged from the file system; a missing profile shows up here
    /// with [`io::ErrorKind::NotFound`].
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("Failed to parse profile file '{path}': {source}", path = path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize profile: {0}")]
    Serialize(#[source] serde_yaml::Error),

    #[error("Invalid profile name '{0}'. Names must be non-empty and must not contain path separators.")]
    InvalidName(String),

    #[error("No answer provided for '{key}'. Supply it with --set {key}=VALUE.")]
    MissingAnswer { key: String },

    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidAnswer {
        key: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Assignment(#[from] ParseError),

    #[error("Interactive prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl ProfileError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}
