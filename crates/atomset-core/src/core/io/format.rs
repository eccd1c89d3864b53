use super::error::WriteError;
use super::gro::{GroFile, GroOptions};
use super::pdb::{PdbFile, PdbOptions};
use super::traits::StructureWriter;
use crate::core::models::selection::AtomSelection;
use std::path::Path;
use std::process;
use tracing::{error, info, instrument};

/// The output formats selectable by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pdb,
    Gro,
}

impl Format {
    /// Resolves the format from the text after the last `.` of `path`.
    ///
    /// The match is case-sensitive and a path without a `.` is checked as a whole.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.rsplit('.').next() {
            Some("pdb") => Some(Format::Pdb),
            Some("gro") => Some(Format::Gro),
            _ => None,
        }
    }
}

impl AtomSelection {
    /// Writes the collection as a PDB model.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the file cannot be created or written.
    pub fn write_pdb<P: AsRef<Path>>(
        &mut self,
        path: P,
        title: &str,
        model_number: usize,
        by_residue: bool,
    ) -> Result<(), WriteError> {
        let options = PdbOptions {
            title: title.to_string(),
            model_number,
            by_residue,
        };
        PdbFile::write_to_path(self, &options, path)
    }

    /// Writes the collection as a GRO frame.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the file cannot be created or written.
    pub fn write_gro<P: AsRef<Path>>(
        &mut self,
        path: P,
        title: &str,
        by_residue: bool,
    ) -> Result<(), WriteError> {
        let options = GroOptions {
            title: title.to_string(),
            by_residue,
        };
        GroFile::write_to_path(self, &options, path)
    }

    /// Writes to `path` in the format named by its extension, without grouping.
    ///
    /// `model_number` is only used for PDB output.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::UnsupportedFormat`] before touching the file system
    /// if the extension is neither `pdb` nor `gro`, or [`WriteError::Io`] if
    /// writing fails.
    #[instrument(level = "info", skip(self, title), fields(atoms = self.len()))]
    pub fn try_write(
        &mut self,
        path: &str,
        title: &str,
        model_number: usize,
    ) -> Result<(), WriteError> {
        let format = Format::from_path(path).ok_or_else(|| WriteError::UnsupportedFormat {
            path: path.to_string(),
        })?;
        match format {
            Format::Pdb => self.write_pdb(path, title, model_number, false)?,
            Format::Gro => self.write_gro(path, title, false)?,
        }
        info!(?format, "Wrote structure file");
        Ok(())
    }

    /// Writes to `path` in the format named by its extension.
    ///
    /// An unsupported extension is a usage error: a diagnostic is printed to
    /// stderr and the process exits with status 1. No file is created.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Io`] if the file cannot be created or written.
    pub fn write(&mut self, path: &str, title: &str, model_number: usize) -> Result<(), WriteError> {
        match self.try_write(path, title, model_number) {
            Err(WriteError::UnsupportedFormat { path }) => {
                error!(%path, "Unsupported output format");
                eprintln!("Can only write pdb or gro!");
                process::exit(1);
            }
            result => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;
    use std::env;
    use std::fs;
    use std::process::Command;
    use tempfile::tempdir;

    const EXIT_CHILD_ENV: &str = "ATOMSET_WRITE_EXIT_CHILD";

    fn single_atom() -> AtomSelection {
        let mut selection = AtomSelection::new();
        selection.push(
            Atom::new("CA", Point3::new(1.0, 2.0, 3.0))
                .with_id(1)
                .with_residue("GLY", 1),
        );
        selection
    }

    #[test]
    fn format_is_taken_from_last_extension() {
        assert_eq!(Format::from_path("out.pdb"), Some(Format::Pdb));
        assert_eq!(Format::from_path("dir.gro/out.pdb"), Some(Format::Pdb));
        assert_eq!(Format::from_path("frame.1.gro"), Some(Format::Gro));
        assert_eq!(Format::from_path("out.PDB"), None);
        assert_eq!(Format::from_path("out.xyz"), None);
        assert_eq!(Format::from_path("pdb"), Some(Format::Pdb));
    }

    #[test]
    fn try_write_dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let pdb = dir.path().join("out.pdb");
        let gro = dir.path().join("out.gro");
        let mut selection = single_atom();

        selection.try_write(pdb.to_str().unwrap(), "t", 3).unwrap();
        selection.try_write(gro.to_str().unwrap(), "t", 3).unwrap();

        let pdb_text = fs::read_to_string(&pdb).unwrap();
        assert!(pdb_text.contains("MODEL    3"));
        assert!(pdb_text.ends_with("ENDMDL\n"));

        let gro_text = fs::read_to_string(&gro).unwrap();
        let lines: Vec<&str> = gro_text.lines().collect();
        assert_eq!(lines[..2], ["t", "    1"]);
        assert_eq!(&lines[2][20..44], "   0.100   0.200   0.300");
    }

    #[test]
    fn try_write_rejects_unknown_extension_without_creating_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        let mut selection = single_atom();

        let err = selection.try_write(path.to_str().unwrap(), "", 1).unwrap_err();
        assert!(matches!(err, WriteError::UnsupportedFormat { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn write_propagates_io_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdb");
        let mut selection = single_atom();

        let err = selection.write(path.to_str().unwrap(), "", 1).unwrap_err();
        assert!(matches!(err, WriteError::Io(_)));
    }

    #[test]
    fn write_exits_process_on_unsupported_extension() {
        if let Ok(path) = env::var(EXIT_CHILD_ENV) {
            let mut selection = single_atom();
            let _ = selection.write(&path, "", 1);
            unreachable!("write returned for an unsupported extension");
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xyz");
        let output = Command::new(env::current_exe().unwrap())
            .args([
                "--exact",
                "core::io::format::tests::write_exits_process_on_unsupported_extension",
                "--nocapture",
                "--test-threads=1",
            ])
            .env(EXIT_CHILD_ENV, &path)
            .output()
            .unwrap();

        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Can only write pdb or gro!"));
        assert!(!path.exists());
    }
}
