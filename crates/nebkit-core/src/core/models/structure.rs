use nalgebra::{Matrix3, Point3, RowVector3, Vector3};
use thiserror::Error;

const SINGULAR_VOLUME_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("Lattice vectors are linearly dependent (cell volume {volume:.3e})")]
    SingularLattice { volume: f64 },
    #[error("Site index {index} is out of range for a structure with {len} sites")]
    SiteOutOfRange { index: usize, len: usize },
}

/// The periodic cell of a crystal structure.
///
/// The three lattice vectors are stored as the rows of a 3x3 matrix, in
/// Angstroms. A fractional coordinate `f` maps to the Cartesian point
/// `f[0] * a + f[1] * b + f[2] * c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    matrix: Matrix3<f64>,
    inverse_transpose: Matrix3<f64>,
}

impl Lattice {
    /// Builds a lattice from three row vectors.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::SingularLattice`] if the vectors span no volume.
    pub fn new(vectors: [[f64; 3]; 3]) -> Result<Self, StructureError> {
        let matrix = Matrix3::from_rows(&[
            RowVector3::from(vectors[0]),
            RowVector3::from(vectors[1]),
            RowVector3::from(vectors[2]),
        ]);
        let volume = matrix.determinant();
        if volume.abs() < SINGULAR_VOLUME_TOLERANCE {
            return Err(StructureError::SingularLattice { volume });
        }
        let inverse_transpose = matrix
            .transpose()
            .try_inverse()
            .ok_or(StructureError::SingularLattice { volume })?;
        Ok(Self {
            matrix,
            inverse_transpose,
        })
    }

    pub fn cubic(a: f64) -> Result<Self, StructureError> {
        Self::new([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    pub fn vector(&self, axis: usize) -> Vector3<f64> {
        self.matrix.row(axis).transpose()
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.matrix[(i, j)];
            }
        }
        rows
    }

    pub fn volume(&self) -> f64 {
        self.matrix.determinant().abs()
    }

    pub fn to_cartesian(&self, fractional: &Vector3<f64>) -> Point3<f64> {
        Point3::from(self.matrix.transpose() * fractional)
    }

    pub fn to_fractional(&self, cartesian: &Point3<f64>) -> Vector3<f64> {
        self.inverse_transpose * cartesian.coords
    }

    /// Returns the lattice with each vector multiplied by the matching factor.
    pub fn scaled(&self, factors: [usize; 3]) -> Result<Self, StructureError> {
        let mut rows = self.rows();
        for (row, &factor) in rows.iter_mut().zip(factors.iter()) {
            for value in row.iter_mut() {
                *value *= factor as f64;
            }
        }
        Self::new(rows)
    }
}

/// A single atomic site: a chemical species at a Cartesian position (Angstroms).
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub species: String,
    pub position: Point3<f64>,
}

impl Site {
    pub fn new(species: &str, position: Point3<f64>) -> Self {
        Self {
            species: species.to_string(),
            position,
        }
    }
}

/// An ordered list of sites inside a periodic lattice.
///
/// The site order is significant: two snapshots of the same system are
/// compared index by index when looking for a migrating ion.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    lattice: Lattice,
    sites: Vec<Site>,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self { lattice, sites }
    }

    /// Builds a structure from species and fractional coordinates.
    pub fn from_fractional<S: AsRef<str>>(
        lattice: Lattice,
        sites: impl IntoIterator<Item = (S, Vector3<f64>)>,
    ) -> Self {
        let sites = sites
            .into_iter()
            .map(|(species, frac)| Site::new(species.as_ref(), lattice.to_cartesian(&frac)))
            .collect();
        Self { lattice, sites }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn site(&self, index: usize) -> Option<&Site> {
        self.sites.get(index)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn fractional_coords(&self, index: usize) -> Option<Vector3<f64>> {
        self.sites
            .get(index)
            .map(|site| self.lattice.to_fractional(&site.position))
    }

    pub fn push_cartesian(&mut self, species: &str, position: Point3<f64>) {
        self.sites.push(Site::new(species, position));
    }

    pub fn push_fractional(&mut self, species: &str, fractional: Vector3<f64>) {
        let position = self.lattice.to_cartesian(&fractional);
        self.sites.push(Site::new(species, position));
    }

    /// Returns a copy of the structure with the given sites removed.
    ///
    /// Duplicate indices are ignored; the remaining sites keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::SiteOutOfRange`] if any index is past the end.
    pub fn without_sites(&self, indices: &[usize]) -> Result<Self, StructureError> {
        if let Some(&index) = indices.iter().find(|&&i| i >= self.sites.len()) {
            return Err(StructureError::SiteOutOfRange {
                index,
                len: self.sites.len(),
            });
        }
        let sites = self
            .sites
            .iter()
            .enumerate()
            .filter(|(i, _)| !indices.contains(i))
            .map(|(_, site)| site.clone())
            .collect();
        Ok(Self {
            lattice: self.lattice.clone(),
            sites,
        })
    }

    /// Groups consecutive sites of equal species, in site order.
    ///
    /// This is the grouping the POSCAR format needs on its species and count lines.
    pub fn species_runs(&self) -> Vec<(&str, usize)> {
        let mut runs: Vec<(&str, usize)> = Vec::new();
        for site in &self.sites {
            if let Some((species, count)) = runs.last_mut() {
                if *species == site.species {
                    *count += 1;
                    continue;
                }
            }
            runs.push((site.species.as_str(), 1));
        }
        runs
    }
}
