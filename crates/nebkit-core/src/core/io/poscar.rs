use crate::core::io::traits::StructureFile;
use crate::core::models::structure::{Lattice, Structure, StructureError};
use crate::core::utils::elements::species_from_label;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Read, Write};
use thiserror::Error;
use vasp_poscar::{Builder, Coords, Poscar, RawPoscar, ScaleLine};

const DEFAULT_COMMENT: &str = "Generated by nebkit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoscarMetadata {
    pub comment: String,
    /// Whether the file carried a `Selective dynamics` block. The flags themselves are not kept.
    pub selective_dynamics: bool,
}

impl Default for PoscarMetadata {
    fn default() -> Self {
        Self {
            comment: DEFAULT_COMMENT.to_string(),
            selective_dynamics: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum PoscarError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed POSCAR: {0}")]
    Format(String),
    #[error("Cannot build POSCAR: {0}")]
    Invalid(String),
    #[error("Unknown species label '{0}'")]
    UnknownSpecies(String),
    #[error("No species names given for {counts} site groups (neither a species line nor names in the comment)")]
    MissingSpecies { counts: usize },
    #[error("Invalid cell: {0}")]
    Structure(#[from] StructureError),
}

fn parse_species<'a>(labels: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>, PoscarError> {
    labels
        .into_iter()
        .map(|label| {
            species_from_label(label)
                .map(str::to_string)
                .ok_or_else(|| PoscarError::UnknownSpecies(label.to_string()))
        })
        .collect()
}

/// VASP 6 allows three per-axis factors on the scale line; those cells are
/// not isotropically scaled and are refused rather than read with one factor.
fn check_scale_line(content: &str) -> Result<(), PoscarError> {
    let tokens = content
        .lines()
        .nth(1)
        .map(|line| line.split_whitespace().count())
        .unwrap_or(0);
    if tokens > 1 {
        return Err(PoscarError::Format(format!(
            "scale line has {} values; per-axis scale factors are not supported",
            tokens
        )));
    }
    Ok(())
}

/// Factor applied to the stored lattice vectors. A volume line (negative
/// scale in the file) is turned into the equivalent isotropic factor.
fn scale_factor(scale: ScaleLine, vectors: [[f64; 3]; 3]) -> Result<f64, PoscarError> {
    match scale {
        ScaleLine::Factor(factor) => Ok(factor),
        ScaleLine::Volume(volume) => {
            let unscaled = Lattice::new(vectors)?.volume();
            Ok((volume.abs() / unscaled).cbrt())
        }
    }
}

/// VASP POSCAR/CONTCAR format, read and written through `vasp_poscar`.
///
/// VASP 4 files without a species line are accepted when the comment line
/// names the species. Always writes VASP 5 with `Direct` coordinates and a
/// unit scale factor.
pub struct PoscarFile;

impl StructureFile for PoscarFile {
    type Metadata = PoscarMetadata;
    type Error = PoscarError;

    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        check_scale_line(&content)?;

        let poscar = Poscar::from_reader(content.as_bytes())
            .map_err(|e| PoscarError::Format(e.to_string()))?;
        let RawPoscar {
            comment,
            scale,
            lattice_vectors,
            positions,
            group_symbols,
            group_counts,
            dynamics,
            ..
        } = poscar.into_raw();
        let comment = comment.trim().to_string();

        let species = match &group_symbols {
            Some(symbols) => parse_species(symbols.iter().map(String::as_str))?,
            None => {
                let labels: Vec<&str> = comment.split_whitespace().take(group_counts.len()).collect();
                if labels.len() < group_counts.len() {
                    return Err(PoscarError::MissingSpecies {
                        counts: group_counts.len(),
                    });
                }
                parse_species(labels)?
            }
        };

        let factor = scale_factor(scale, lattice_vectors)?;
        let mut rows = lattice_vectors;
        for value in rows.iter_mut().flatten() {
            *value *= factor;
        }
        let lattice = Lattice::new(rows)?;

        let site_species = species
            .iter()
            .zip(&group_counts)
            .flat_map(|(symbol, &count)| std::iter::repeat(symbol.as_str()).take(count));
        let mut structure = Structure::new(lattice, Vec::new());
        match positions {
            Coords::Cart(carts) => {
                for (symbol, [x, y, z]) in site_species.zip(carts) {
                    structure.push_cartesian(symbol, Point3::new(x, y, z) * factor);
                }
            }
            Coords::Frac(fracs) => {
                for (symbol, [x, y, z]) in site_species.zip(fracs) {
                    structure.push_fractional(symbol, Vector3::new(x, y, z));
                }
            }
        }

        Ok((
            structure,
            PoscarMetadata {
                comment,
                selective_dynamics: dynamics.is_some(),
            },
        ))
    }

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let comment = metadata
            .comment
            .lines()
            .next()
            .filter(|line| !line.trim().is_empty())
            .unwrap_or(DEFAULT_COMMENT);

        let runs = structure.species_runs();
        let symbols: Vec<String> = runs.iter().map(|(species, _)| species.to_string()).collect();
        let counts: Vec<usize> = runs.iter().map(|&(_, count)| count).collect();
        let fracs: Vec<[f64; 3]> = (0..structure.len())
            .filter_map(|i| structure.fractional_coords(i))
            .map(|frac| [frac.x, frac.y, frac.z])
            .collect();

        let poscar = Builder::new()
            .comment(comment)
            .scale(ScaleLine::Factor(1.0))
            .lattice_vectors(&structure.lattice().rows())
            .group_symbols(symbols)
            .group_counts(counts)
            .positions(Coords::Frac(fracs))
            .build()
            .map_err(|e| PoscarError::Invalid(e.to_string()))?;

        write!(writer, "{}", poscar)?;
        Ok(())
    }
}
