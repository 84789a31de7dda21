use super::error::WorkflowError;
use crate::analysis::migration::find_migrating_ion;
use crate::core::io::poscar::{PoscarFile, PoscarMetadata};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

pub const DEFAULT_INITIAL_MARKER: &str = "init";
pub const DEFAULT_FINAL_MARKER: &str = "final";

const POSCAR_NAME: &str = "POSCAR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionFiles {
    pub initial: Option<PathBuf>,
    pub final_: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSetup {
    pub initial_poscar: PathBuf,
    pub final_poscar: PathBuf,
    /// Present only for migrations: the initial structure minus the migrating ion.
    pub host_poscar: Option<PathBuf>,
    pub migrating_index: Option<usize>,
}

/// Looks for the initial and final structure files of a transition in `directory`.
///
/// Every regular file whose name contains `initial_contains` (resp. `final_contains`)
/// is a candidate. Names are visited in sorted order and the last match wins.
/// Either role may come back empty.
pub fn find_transition_files(
    directory: &Path,
    initial_contains: &str,
    final_contains: &str,
) -> Result<TransitionFiles, WorkflowError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(directory)
        .map_err(WorkflowError::io(directory))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut files = TransitionFiles::default();
    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.contains(initial_contains) {
            files.initial = Some(path.clone());
        }
        if name.contains(final_contains) {
            files.final_ = Some(path.clone());
        }
    }
    debug!(?files, "Scanned {:?} for transition files.", directory);
    Ok(files)
}

pub(crate) fn write_poscar(
    structure: &Structure,
    directory: &Path,
    comment: String,
) -> Result<PathBuf, WorkflowError> {
    fs::create_dir_all(directory).map_err(WorkflowError::io(directory))?;
    let path = directory.join(POSCAR_NAME);
    let metadata = PoscarMetadata {
        comment,
        ..Default::default()
    };
    PoscarFile::write_to_path(structure, &metadata, &path).map_err(|source| {
        WorkflowError::WriteStructure {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}

/// Writes the geometry inputs for the two end points of a transition.
///
/// The initial and final structures land in `directory/initial/POSCAR` and
/// `directory/final/POSCAR`. For a migration, the migrating ion is located
/// first and the host structure (initial structure without that ion) is
/// written to `directory/host/POSCAR`, ready for a static charge-density run.
///
/// # Errors
///
/// Fails before writing anything if `is_migration` is set and the migrating
/// ion cannot be determined.
#[instrument(skip_all, fields(directory = %directory.display(), is_migration = is_migration))]
pub fn set_up_transition(
    directory: &Path,
    initial: &Structure,
    final_: &Structure,
    is_migration: bool,
) -> Result<TransitionSetup, WorkflowError> {
    let migrating_index = if is_migration {
        Some(find_migrating_ion(initial, final_)?)
    } else {
        None
    };

    let initial_poscar = write_poscar(
        initial,
        &directory.join("initial"),
        "initial structure".to_string(),
    )?;
    let final_poscar = write_poscar(final_, &directory.join("final"), "final structure".to_string())?;
    info!("Wrote end-point geometries to {:?} and {:?}.", initial_poscar, final_poscar);

    let host_poscar = match migrating_index {
        Some(index) => {
            let host = initial.without_sites(&[index])?;
            let path = write_poscar(
                &host,
                &directory.join("host"),
                format!("host structure (site {} removed)", index),
            )?;
            info!(
                "Wrote host structure without migrating site {} to {:?}.",
                index, path
            );
            Some(path)
        }
        None => None,
    };

    Ok(TransitionSetup {
        initial_poscar,
        final_poscar,
        host_poscar,
        migrating_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error::MigrationError;
    use crate::core::models::structure::Lattice;
    use nalgebra::Vector3;
    use tempfile::tempdir;

    fn structure(li_frac: [f64; 3]) -> Structure {
        Structure::from_fractional(
            Lattice::cubic(4.0).unwrap(),
            vec![
                ("Li", Vector3::from(li_frac)),
                ("Mn", Vector3::new(0.5, 0.5, 0.5)),
                ("O", Vector3::new(0.25, 0.25, 0.25)),
            ],
        )
    }

    #[test]
    fn find_transition_files_matches_markers_in_file_names() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("init.vasp"), "").unwrap();
        fs::write(dir.path().join("final.vasp"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("initial_runs")).unwrap();

        let files = find_transition_files(dir.path(), "init", "final").unwrap();

        assert_eq!(files.initial, Some(dir.path().join("init.vasp")));
        assert_eq!(files.final_, Some(dir.path().join("final.vasp")));
    }

    #[test]
    fn find_transition_files_leaves_missing_roles_empty() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("init.vasp"), "").unwrap();

        let files = find_transition_files(dir.path(), "init", "final").unwrap();

        assert!(files.initial.is_some());
        assert_eq!(files.final_, None);
    }

    #[test]
    fn find_transition_files_fails_for_missing_directory() {
        let dir = tempdir().unwrap();
        let result = find_transition_files(&dir.path().join("absent"), "init", "final");
        assert!(matches!(result, Err(WorkflowError::Io { .. })));
    }

    #[test]
    fn set_up_transition_writes_end_points_only_when_not_a_migration() {
        let dir = tempdir().unwrap();
        let setup =
            set_up_transition(dir.path(), &structure([0.0; 3]), &structure([0.1, 0.0, 0.0]), false)
                .unwrap();

        assert!(setup.initial_poscar.is_file());
        assert!(setup.final_poscar.is_file());
        assert_eq!(setup.host_poscar, None);
        assert_eq!(setup.migrating_index, None);
        assert!(!dir.path().join("host").exists());
    }

    #[test]
    fn set_up_transition_writes_host_without_migrating_ion() {
        let dir = tempdir().unwrap();
        let initial = structure([0.0; 3]);
        let final_ = structure([0.5, 0.0, 0.0]);

        let setup = set_up_transition(dir.path(), &initial, &final_, true).unwrap();

        assert_eq!(setup.migrating_index, Some(0));
        let host_path = setup.host_poscar.unwrap();
        assert_eq!(host_path, dir.path().join("host").join("POSCAR"));
        let (host, metadata) = PoscarFile::read_from_path(&host_path).unwrap();
        assert_eq!(host.len(), initial.len() - 1);
        assert_eq!(host.sites()[0].species, "Mn");
        assert!(metadata.comment.contains("site 0 removed"));
    }

    #[test]
    fn set_up_transition_rejects_mismatched_migration_before_writing() {
        let dir = tempdir().unwrap();
        let initial = structure([0.0; 3]);
        let final_ = initial.without_sites(&[2]).unwrap();

        let result = set_up_transition(dir.path(), &initial, &final_, true);

        assert!(matches!(
            result,
            Err(WorkflowError::Migration(
                MigrationError::SiteCountMismatch { .. }
            ))
        ));
        assert!(!dir.path().join("initial").exists());
    }
}
