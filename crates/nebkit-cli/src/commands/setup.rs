use super::read_structure;
use crate::cli::{SetupArgs, SetupCommands, TransitionArgs};
use crate::error::{CliError, Result};
use nebkit::workflows::transition::{find_transition_files, set_up_transition};
use std::path::PathBuf;
use tracing::info;

pub fn run(args: SetupArgs) -> Result<()> {
    match args.command {
        SetupCommands::Transition(args) => handle_transition(args),
    }
}

fn handle_transition(args: TransitionArgs) -> Result<()> {
    let (initial_path, final_path) = resolve_end_points(&args)?;
    info!("Initial structure: {:?}", initial_path);
    info!("Final structure: {:?}", final_path);

    let initial = read_structure(&initial_path)?;
    let final_ = read_structure(&final_path)?;
    let setup = set_up_transition(&args.directory, &initial, &final_, args.migration)?;

    println!("Initial geometry: {}", setup.initial_poscar.display());
    println!("Final geometry:   {}", setup.final_poscar.display());
    if let (Some(host), Some(index)) = (&setup.host_poscar, setup.migrating_index) {
        println!(
            "Host geometry:    {} (migrating site {} removed)",
            host.display(),
            index
        );
    }
    Ok(())
}

/// Explicit paths win; missing ones are looked up by file-name marker in the
/// transition directory.
fn resolve_end_points(args: &TransitionArgs) -> Result<(PathBuf, PathBuf)> {
    if let (Some(initial), Some(final_)) = (&args.initial, &args.final_) {
        return Ok((initial.clone(), final_.clone()));
    }

    let found = find_transition_files(&args.directory, &args.initial_contains, &args.final_contains)?;
    let initial = args.initial.clone().or(found.initial).ok_or_else(|| {
        CliError::Argument(format!(
            "No initial structure found in '{}' (no file name contains '{}'). Use --initial.",
            args.directory.display(),
            args.initial_contains
        ))
    })?;
    let final_ = args.final_.clone().or(found.final_).ok_or_else(|| {
        CliError::Argument(format!(
            "No final structure found in '{}' (no file name contains '{}'). Use --final.",
            args.directory.display(),
            args.final_contains
        ))
    })?;
    Ok((initial, final_))
}
