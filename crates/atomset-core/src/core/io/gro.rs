use super::error::WriteError;
use super::traits::StructureWriter;
use super::{NUMBER_WRAP, renumber_by_residue};
use crate::core::models::selection::AtomSelection;
use crate::core::models::simbox::{LengthUnit, SimBox};
use std::io::Write;
use tracing::{debug, instrument};

/// Output order of the box entries on a triclinic box line.
const TRICLINIC_ORDER: [(usize, usize); 9] = [
    (0, 0),
    (1, 1),
    (2, 2),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 2),
    (2, 0),
    (2, 1),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroOptions {
    /// Title line content; empty falls back to the collection's title.
    pub title: String,
    /// Renumber residues and atoms from 1 while writing.
    pub by_residue: bool,
}

/// Writer for the fixed-column coordinate/velocity format.
///
/// Positions and box entries are written in nanometer. Velocities are written
/// as stored.
///
/// With [`GroOptions::by_residue`] the residue and atom numbers written to the
/// file are also stored back on the atoms, exactly as the PDB writer does, so
/// both writers leave a collection numbered the same way after a grouped
/// write. Callers that need the old numbers should read `orig_id` or write
/// ungrouped.
pub struct GroFile;

impl StructureWriter for GroFile {
    type Options = GroOptions;
    type Error = WriteError;

    #[instrument(level = "debug", skip_all, fields(by_residue = options.by_residue))]
    fn write_to(
        selection: &mut AtomSelection,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let factor = selection.unit().factor_to(LengthUnit::Nanometer);

        writeln!(writer, "{}", selection.resolve_title(&options.title))?;
        writeln!(writer, "{:>5}", selection.len())?;

        if options.by_residue {
            renumber_by_residue(selection);
        }
        for atom in selection.iter() {
            let position = atom.position * factor;
            writeln!(
                writer,
                "{:>5}{:<5.5}{:>5.5}{:>5}{:>8.3}{:>8.3}{:>8.3}{:>8.4}{:>8.4}{:>8.4}",
                atom.resnr.rem_euclid(NUMBER_WRAP as isize),
                atom.resname,
                atom.name,
                atom.id % NUMBER_WRAP,
                position.x,
                position.y,
                position.z,
                atom.velocity.x,
                atom.velocity.y,
                atom.velocity.z
            )?;
        }

        writeln!(writer, "{}", box_line(&selection.sim_box().scaled(factor)))?;
        debug!(atoms = selection.len(), "Wrote GRO frame");
        Ok(())
    }
}

/// Formats the trailing box line: three diagonal entries, or all nine when
/// the box has off-diagonal components.
fn box_line(sim_box: &SimBox) -> String {
    let entries: Vec<f64> = if sim_box.has_off_diagonal() {
        TRICLINIC_ORDER
            .iter()
            .map(|&(row, col)| sim_box.get(row, col))
            .collect()
    } else {
        sim_box.diagonal().to_vec()
    };
    entries.iter().map(|v| format!("{v:>10.5}")).collect()
}
