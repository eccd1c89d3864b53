use super::error::WriteError;
use super::renumber_by_residue;
use super::traits::StructureWriter;
use crate::core::models::atom::Atom;
use crate::core::models::selection::AtomSelection;
use crate::core::models::simbox::{LengthUnit, SimBox};
use std::fmt;
use std::io::Write;
use tracing::{debug, instrument};

/// Longest atom name that fits the name columns of an atom record.
pub const MAX_ATOM_NAME_LEN: usize = 4;

/// A fixed-column `ATOM`/`HETATM` record for one atom.
///
/// The name is supplied separately so a shortened name can be written without
/// touching the atom. Coordinates are always written in Ångström.
pub struct AtomRecord<'a> {
    atom: &'a Atom,
    name: &'a str,
    /// Factor from the stored coordinate unit to Ångström.
    to_angstrom: f64,
}

impl<'a> AtomRecord<'a> {
    /// Creates a record that interprets the position in the atom's own unit.
    pub fn new(atom: &'a Atom, name: &'a str) -> Self {
        Self {
            atom,
            name,
            to_angstrom: atom.unit.factor_to(LengthUnit::Angstrom),
        }
    }

    /// Interprets the position in `unit` instead, typically the unit of the
    /// owning collection.
    pub fn in_unit(mut self, unit: LengthUnit) -> Self {
        self.to_angstrom = unit.factor_to(LengthUnit::Angstrom);
        self
    }
}

impl fmt::Display for AtomRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let atom = self.atom;
        let position = atom.position * self.to_angstrom;
        let name = if self.name.chars().count() < MAX_ATOM_NAME_LEN
            && !self.name.starts_with(|c: char| c.is_ascii_digit())
        {
            format!(" {:<3}", self.name)
        } else {
            format!("{:<4}", self.name)
        };

        write!(
            f,
            "{:<6}{:>5} {}{}{:<4}{}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            atom.record.as_str(),
            atom.id,
            name,
            atom.altloc,
            atom.resname,
            atom.chain_id,
            atom.resnr,
            position.x,
            position.y,
            position.z,
            atom.occupancy,
            atom.bfactor,
            atom.symbol
        )
    }
}

/// The first [`MAX_ATOM_NAME_LEN`] characters of `name`.
pub fn truncate_name(name: &str) -> &str {
    match name.char_indices().nth(MAX_ATOM_NAME_LEN) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}

/// Formats a `CRYST1` record for a box given in Ångström.
pub fn cryst1_record(sim_box: &SimBox) -> String {
    let p = sim_box.cell_parameters();
    format!(
        "CRYST1{:>9.3}{:>9.3}{:>9.3}{:>7.2}{:>7.2}{:>7.2} P 1           1",
        p.a, p.b, p.c, p.alpha, p.beta, p.gamma
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdbOptions {
    /// Title line content; empty falls back to the collection's title.
    pub title: String,
    pub model_number: usize,
    /// Renumber residues and atoms from 1 while writing.
    pub by_residue: bool,
}

impl Default for PdbOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            model_number: 1,
            by_residue: false,
        }
    }
}

pub struct PdbFile;

impl StructureWriter for PdbFile {
    type Options = PdbOptions;
    type Error = WriteError;

    #[instrument(level = "debug", skip_all, fields(model = options.model_number, by_residue = options.by_residue))]
    fn write_to(
        selection: &mut AtomSelection,
        options: &Self::Options,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        writeln!(writer, "TITLE    {}", selection.resolve_title(&options.title))?;
        writeln!(writer, "MODEL{:>5}", options.model_number)?;

        let unit = selection.unit();
        let sim_box = selection.sim_box();
        if !sim_box.is_empty() {
            let in_angstrom = sim_box.scaled(unit.factor_to(LengthUnit::Angstrom));
            writeln!(writer, "{}", cryst1_record(&in_angstrom))?;
        }

        if options.by_residue {
            renumber_by_residue(selection);
        }
        for atom in selection.iter() {
            let record = AtomRecord::new(atom, truncate_name(&atom.name)).in_unit(unit);
            writeln!(writer, "{record}")?;
        }

        writeln!(writer, "ENDMDL")?;
        debug!(atoms = selection.len(), "Wrote PDB model");
        Ok(())
    }
}
