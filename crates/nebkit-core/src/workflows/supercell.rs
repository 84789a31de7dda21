use super::error::WorkflowError;
use crate::core::io::poscar::{PoscarFile, PoscarMetadata};
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use tracing::info;

/// Parses a diagonal supercell specification.
///
/// Accepts three digits (`"223"`) or three integers separated by `x`, commas or
/// whitespace (`"2x2x3"`, `"2,2,3"`, `"2 2 3"`). Every factor must be at least 1.
pub fn parse_supercell_factors(spec: &str) -> Result<[usize; 3], WorkflowError> {
    let invalid = |reason: &str| WorkflowError::InvalidSupercell {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = spec.trim();
    let parts: Vec<&str> = if trimmed.len() == 3 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        (0..3).map(|i| &trimmed[i..i + 1]).collect()
    } else {
        trimmed
            .split(|c: char| c == 'x' || c == 'X' || c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect()
    };
    if parts.len() != 3 {
        return Err(invalid("expected three factors"));
    }

    let mut factors = [0usize; 3];
    for (factor, part) in factors.iter_mut().zip(&parts) {
        *factor = part
            .parse()
            .map_err(|_| invalid("factors must be non-negative integers"))?;
    }
    if factors.contains(&0) {
        return Err(invalid("factors must be at least 1"));
    }
    Ok(factors)
}

/// Builds the diagonal supercell `factors[0] x factors[1] x factors[2]`.
///
/// Sites are emitted site-major: all periodic copies of site 0 first, then
/// those of site 1, and so on, so species groups stay contiguous.
pub fn make_supercell(structure: &Structure, factors: [usize; 3]) -> Result<Structure, WorkflowError> {
    let invalid = |reason: &str| WorkflowError::InvalidSupercell {
        spec: format!("{}x{}x{}", factors[0], factors[1], factors[2]),
        reason: reason.to_string(),
    };
    if factors.contains(&0) {
        return Err(invalid("factors must be at least 1"));
    }
    let site_count = factors
        .iter()
        .try_fold(1usize, |acc, &factor| acc.checked_mul(factor))
        .and_then(|copies| copies.checked_mul(structure.len()))
        .ok_or_else(|| invalid("supercell too large"))?;

    let lattice = structure.lattice().scaled(factors)?;
    let scale = Vector3::new(factors[0] as f64, factors[1] as f64, factors[2] as f64);
    let mut supercell = Structure::new(lattice, Vec::with_capacity(site_count));

    for site in structure.sites() {
        let frac = structure.lattice().to_fractional(&site.position);
        for i in 0..factors[0] {
            for j in 0..factors[1] {
                for k in 0..factors[2] {
                    let shifted = frac + Vector3::new(i as f64, j as f64, k as f64);
                    supercell.push_fractional(&site.species, shifted.component_div(&scale));
                }
            }
        }
    }
    Ok(supercell)
}

/// Output path for a supercell of `input`: `<stem>_<factors>.vasp` next to the input.
///
/// Single-digit factors are written run together (`_223`), larger ones separated by `x`.
pub fn supercell_output_path(input: &Path, factors: [usize; 3]) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string());
    let tag = if factors.iter().all(|&f| f < 10) {
        format!("{}{}{}", factors[0], factors[1], factors[2])
    } else {
        format!("{}x{}x{}", factors[0], factors[1], factors[2])
    };
    input.with_file_name(format!("{}_{}.vasp", stem, tag))
}

/// Reads `input`, expands it by `spec` and writes the supercell next to it.
///
/// Returns the path of the written file.
pub fn write_supercell(input: &Path, spec: &str) -> Result<PathBuf, WorkflowError> {
    let factors = parse_supercell_factors(spec)?;
    let (structure, metadata) =
        PoscarFile::read_from_path(input).map_err(|source| WorkflowError::ReadStructure {
            path: input.to_path_buf(),
            source,
        })?;

    let supercell = make_supercell(&structure, factors)?;
    let output = supercell_output_path(input, factors);
    let metadata = PoscarMetadata {
        comment: format!(
            "{} supercell {}x{}x{}",
            metadata.comment, factors[0], factors[1], factors[2]
        ),
        ..Default::default()
    };
    PoscarFile::write_to_path(&supercell, &metadata, &output).map_err(|source| {
        WorkflowError::WriteStructure {
            path: output.clone(),
            source,
        }
    })?;
    info!(
        "Wrote {}-site supercell to {:?}.",
        supercell.len(),
        output
    );
    Ok(output)
}
