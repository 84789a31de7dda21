use crate::analysis::error::MigrationError;
use crate::core::io::poscar::PoscarError;
use crate::core::models::structure::StructureError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Failed to read structure file '{path}': {source}", path = path.display())]
    ReadStructure {
        path: PathBuf,
        #[source]
        source: PoscarError,
    },

    #[error("Failed to write structure file '{path}': {source}", path = path.display())]
    WriteStructure {
        path: PathBuf,
        #[source]
        source: PoscarError,
    },

    #[error("I/O error at '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Migrating ion could not be determined: {0}")]
    Migration(#[from] MigrationError),

    #[error("Invalid structure operation: {0}")]
    Structure(#[from] StructureError),

    #[error("Found {found} NEB image directories in '{path}', at least 2 are needed", path = path.display())]
    TooFewImages { path: PathBuf, found: usize },

    #[error("Image directory '{path}' contains neither a CONTCAR nor a POSCAR", path = path.display())]
    MissingImageStructure { path: PathBuf },

    #[error("Invalid supercell specification '{spec}': {reason}")]
    InvalidSupercell { spec: String, reason: String },
}

impl WorkflowError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
