use crate::cli::{UtilArgs, UtilCommands};
use crate::error::Result;
use nebkit::workflows::path::write_path;
use nebkit::workflows::supercell::write_supercell;
use tracing::info;

pub fn run(args: UtilArgs) -> Result<()> {
    match args.command {
        UtilCommands::Path { neb_dir, output } => {
            info!("Assembling NEB path from {:?}", neb_dir);
            let path = write_path(&neb_dir, &output)?;
            println!(
                "Wrote path of {} images ({} sites) to: {}",
                path.image_count,
                path.structure.len(),
                output.display()
            );
        }
        UtilCommands::Supercell { file, factors } => {
            let output = write_supercell(&file, &factors)?;
            println!("Wrote supercell to: {}", output.display());
        }
    }
    Ok(())
}
