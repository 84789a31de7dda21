use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A crystal structure file format.
///
/// Implementors only provide stream-based parsing and serialization; the
/// path-based methods open, buffer and flush files on top of those.
pub trait StructureFile {
    /// Format-specific header data that does not belong in [`Structure`]
    /// (comment lines, flags). The default is used when writing without one.
    type Metadata: Default;

    type Error: Error + From<io::Error>;

    /// Parses one structure from `reader`.
    fn read_from(reader: &mut impl BufRead) -> Result<(Structure, Self::Metadata), Self::Error>;

    /// Serializes `structure` with the given header data.
    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Opens `path` and parses it with [`read_from`](Self::read_from).
    ///
    /// # Errors
    ///
    /// Open failures come back through `From<io::Error>`, so a missing file
    /// keeps its [`io::ErrorKind::NotFound`] kind.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }

    /// Creates (or truncates) `path` and writes `structure` to it.
    fn write_to_path<P: AsRef<Path>>(
        structure: &Structure,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_to(structure, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_structure_to_path<P: AsRef<Path>>(
        structure: &Structure,
        path: P,
    ) -> Result<(), Self::Error> {
        Self::write_to_path(structure, &Self::Metadata::default(), path)
    }
}
