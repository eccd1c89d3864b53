use crate::core::models::selection::AtomSelection;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Defines the interface for writing an atom collection in a file format.
///
/// Writers take the collection mutably because grouped output renumbers
/// residues and atoms in place.
pub trait StructureWriter {
    /// Format-specific output options.
    type Options;

    /// The error type for write operations.
    type Error: Error + From<io::Error>;

    /// Writes `selection` to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `writer` fails.
    fn write_to(
        selection: &mut AtomSelection,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes `selection` to a file, replacing any existing content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        selection: &mut AtomSelection,
        options: &Self::Options,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(selection, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
