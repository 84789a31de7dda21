use super::error::WorkflowError;
use crate::core::io::poscar::{PoscarFile, PoscarMetadata};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Geometry files tried in each image directory, in order of preference.
const IMAGE_STRUCTURE_FILES: [&str; 2] = ["CONTCAR", "POSCAR"];

#[derive(Debug, Clone, PartialEq)]
pub struct NebPath {
    /// All images merged into the frame of the first one.
    pub structure: Structure,
    pub image_count: usize,
}

/// Returns the numbered image directories (`00`, `01`, ...) of an NEB run, in image order.
pub fn image_directories(neb_dir: &Path) -> Result<Vec<PathBuf>, WorkflowError> {
    let mut images: Vec<(u32, PathBuf)> = fs::read_dir(neb_dir)
        .map_err(WorkflowError::io(neb_dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let number = name.parse().ok()?;
            Some((number, path))
        })
        .collect();
    images.sort_by_key(|(number, _)| *number);
    Ok(images.into_iter().map(|(_, path)| path).collect())
}

fn read_image(image_dir: &Path) -> Result<Structure, WorkflowError> {
    let path = IMAGE_STRUCTURE_FILES
        .iter()
        .map(|name| image_dir.join(name))
        .find(|candidate| candidate.metadata().is_ok_and(|m| m.is_file() && m.len() > 0))
        .ok_or_else(|| WorkflowError::MissingImageStructure {
            path: image_dir.to_path_buf(),
        })?;
    debug!("Reading image structure from {:?}", path);
    let (structure, _) = PoscarFile::read_from_path(&path)
        .map_err(|source| WorkflowError::ReadStructure { path, source })?;
    Ok(structure)
}

/// Merges every image of a finished NEB run into a single structure.
///
/// The first image is the frame. Every site of each later image is appended
/// at the same fractional coordinates, so the migrating ion traces its path
/// through the frame's cell. `CONTCAR` is preferred over `POSCAR` in each
/// image directory; empty files are skipped.
///
/// # Errors
///
/// Returns [`WorkflowError::TooFewImages`] if fewer than two numbered image
/// directories exist.
#[instrument(skip_all, fields(neb_dir = %neb_dir.display()))]
pub fn assemble_path(neb_dir: &Path) -> Result<NebPath, WorkflowError> {
    let image_dirs = image_directories(neb_dir)?;
    if image_dirs.len() < 2 {
        return Err(WorkflowError::TooFewImages {
            path: neb_dir.to_path_buf(),
            found: image_dirs.len(),
        });
    }

    let mut structure = read_image(&image_dirs[0])?;
    for image_dir in &image_dirs[1..] {
        let image = read_image(image_dir)?;
        for site in image.sites() {
            let frac = image.lattice().to_fractional(&site.position);
            structure.push_fractional(&site.species, frac);
        }
    }

    info!(
        "Assembled {} images into a path structure with {} sites.",
        image_dirs.len(),
        structure.len()
    );
    Ok(NebPath {
        structure,
        image_count: image_dirs.len(),
    })
}

/// Assembles the NEB path in `neb_dir` and writes it as a POSCAR to `output`.
pub fn write_path(neb_dir: &Path, output: &Path) -> Result<NebPath, WorkflowError> {
    let path = assemble_path(neb_dir)?;
    let metadata = PoscarMetadata {
        comment: format!("NEB path ({} images)", path.image_count),
        ..Default::default()
    };
    PoscarFile::write_to_path(&path.structure, &metadata, output).map_err(|source| {
        WorkflowError::WriteStructure {
            path: output.to_path_buf(),
            source,
        }
    })?;
    Ok(path)
}
