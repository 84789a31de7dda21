pub mod config;
pub mod migration;
pub mod setup;
pub mod util;

use crate::error::{CliError, Result};
use nebkit::core::io::poscar::PoscarFile;
use nebkit::core::io::traits::StructureFile;
use nebkit::core::models::structure::Structure;
use std::path::Path;
use tracing::debug;

/// Reads a POSCAR/CONTCAR file, reporting failures against its path.
pub(crate) fn read_structure(path: &Path) -> Result<Structure> {
    debug!("Reading structure from {:?}", path);
    let (structure, _) = PoscarFile::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    Ok(structure)
}
