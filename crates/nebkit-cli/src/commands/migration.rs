use super::read_structure;
use crate::cli::MigrationArgs;
use crate::error::Result;
use nebkit::analysis::migration::{find_migrating_ion, site_displacements};
use tracing::info;

pub fn run(args: MigrationArgs) -> Result<()> {
    let initial = read_structure(&args.initial)?;
    let final_ = read_structure(&args.final_)?;

    let index = find_migrating_ion(&initial, &final_)?;
    let displacement = site_displacements(initial.sites(), final_.sites())?[index];
    let site = &initial.sites()[index];
    info!(index, displacement, "Located migrating ion.");

    println!(
        "Migrating ion: site {} ({}), displaced by {:.4} Å",
        index, site.species, displacement
    );
    Ok(())
}
