use super::error::MigrationError;
use crate::core::models::structure::{Site, Structure};
use tracing::{debug, instrument};

fn check_site_counts(initial: &[Site], final_: &[Site]) -> Result<(), MigrationError> {
    if initial.len() != final_.len() {
        return Err(MigrationError::SiteCountMismatch {
            initial: initial.len(),
            final_: final_.len(),
        });
    }
    Ok(())
}

/// Distance each site travelled between two snapshots, index by index.
///
/// # Errors
///
/// Returns [`MigrationError::SiteCountMismatch`] if the snapshots differ in length.
pub fn site_displacements(initial: &[Site], final_: &[Site]) -> Result<Vec<f64>, MigrationError> {
    check_site_counts(initial, final_)?;
    Ok(initial
        .iter()
        .zip(final_)
        .map(|(a, b)| (b.position - a.position).norm())
        .collect())
}

/// Finds the index of the site that moved furthest between two snapshots.
///
/// Sites are compared by position in the ordering, so both snapshots must list
/// the same sites in the same order. The largest Euclidean displacement wins;
/// ties go to the earliest site. There is no minimum displacement: if nothing
/// moved, index 0 is returned.
///
/// # Errors
///
/// * [`MigrationError::SiteCountMismatch`] if the snapshots differ in length.
///   No coordinates are compared in that case.
/// * [`MigrationError::EmptyStructure`] if both snapshots have no sites.
pub fn find_migrating_site(initial: &[Site], final_: &[Site]) -> Result<usize, MigrationError> {
    check_site_counts(initial, final_)?;

    let mut sites = initial.iter().zip(final_).enumerate();
    let (_, (first_a, first_b)) = sites.next().ok_or(MigrationError::EmptyStructure)?;

    let mut migrating_index = 0;
    let mut max_distance = (first_b.position - first_a.position).norm();
    for (index, (a, b)) in sites {
        let distance = (b.position - a.position).norm();
        if distance > max_distance {
            max_distance = distance;
            migrating_index = index;
        }
    }

    debug!(
        migrating_index,
        max_distance, "Located site with the largest displacement."
    );
    Ok(migrating_index)
}

/// Structure-level entry point for [`find_migrating_site`].
#[instrument(skip_all, fields(sites = initial.len()))]
pub fn find_migrating_ion(initial: &Structure, final_: &Structure) -> Result<usize, MigrationError> {
    find_migrating_site(initial.sites(), final_.sites())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::structure::Lattice;
    use nalgebra::Point3;

    fn sites(positions: &[[f64; 3]]) -> Vec<Site> {
        positions
            .iter()
            .map(|&[x, y, z]| Site::new("Li", Point3::new(x, y, z)))
            .collect()
    }

    #[test]
    fn single_displaced_site_is_found_for_tiny_displacement() {
        let initial = sites(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        let mut final_ = initial.clone();
        final_[2].position.x += 1e-6;

        assert_eq!(find_migrating_site(&initial, &final_), Ok(2));
    }

    #[test]
    fn single_displaced_site_is_found_for_large_displacement() {
        let initial = sites(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]]);
        let mut final_ = initial.clone();
        final_[1].position = Point3::new(4.0, -3.0, 1.0);

        assert_eq!(find_migrating_site(&initial, &final_), Ok(1));
    }

    #[test]
    fn largest_of_several_displacements_wins() {
        let initial = sites(&[[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]]);
        let final_ = sites(&[[0.0, 0.0, 0.1], [1.0, 0.0, 0.0]]);

        assert_eq!(find_migrating_site(&initial, &final_), Ok(1));
    }

    #[test]
    fn equal_displacements_resolve_to_first_occurrence() {
        let initial = sites(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]]);
        let final_ = sites(&[[0.0, 0.0, 0.0], [1.0, 0.5, 0.0], [2.0, 0.0, 0.5]]);

        assert_eq!(find_migrating_site(&initial, &final_), Ok(1));
    }

    #[test]
    fn identical_snapshots_report_first_site() {
        let initial = sites(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);

        assert_eq!(find_migrating_site(&initial, &initial), Ok(0));
    }

    #[test]
    fn mismatched_site_counts_are_rejected() {
        let initial = sites(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let final_ = sites(&[[0.0, 0.0, 0.0]]);

        let result = find_migrating_site(&initial, &final_);
        assert_eq!(
            result,
            Err(MigrationError::SiteCountMismatch {
                initial: 2,
                final_: 1
            })
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "structures do not have same atom count (initial: 2, final: 1)"
        );
    }

    #[test]
    fn empty_snapshots_are_rejected() {
        assert_eq!(
            find_migrating_site(&[], &[]),
            Err(MigrationError::EmptyStructure)
        );
    }

    #[test]
    fn site_displacements_lists_every_distance() {
        let initial = sites(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        let final_ = sites(&[[3.0, 4.0, 0.0], [1.0, 1.0, 1.0]]);

        let displacements = site_displacements(&initial, &final_).unwrap();
        assert_eq!(displacements.len(), 2);
        assert!((displacements[0] - 5.0).abs() < 1e-12);
        assert_eq!(displacements[1], 0.0);
    }

    #[test]
    fn find_migrating_ion_compares_structures_by_site_order() {
        let lattice = Lattice::cubic(5.0).unwrap();
        let initial = Structure::new(lattice.clone(), sites(&[[0.0, 0.0, 0.0], [2.5, 2.5, 2.5]]));
        let final_ = Structure::new(lattice, sites(&[[1.2, 0.0, 0.0], [2.5, 2.5, 2.5]]));

        assert_eq!(find_migrating_ion(&initial, &final_), Ok(0));
    }
}
