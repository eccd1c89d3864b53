//! Provides output functionality for molecular file formats.
//!
//! This module contains writers for the fixed-column PDB format and the
//! coordinate/velocity GRO format, a trait-based interface shared by both, and
//! the extension-based dispatch used by [`AtomSelection::write`].

pub mod error;
pub mod format;
pub mod gro;
pub mod pdb;
pub mod traits;

use crate::core::models::selection::AtomSelection;

/// Residue and atom numbers written by the grouped writers cycle modulo this value.
pub const NUMBER_WRAP: usize = 100_000;

/// Renumbers residues and atoms with 1-based counters that wrap at [`NUMBER_WRAP`].
///
/// Residues are taken from [`AtomSelection::residues`] before any number is changed.
pub(crate) fn renumber_by_residue(selection: &mut AtomSelection) {
    let residues = selection.residues();
    let mut residue_id = 0;
    let mut atom_id = 0;
    for residue in residues {
        residue_id = (residue_id + 1) % NUMBER_WRAP;
        for key in residue.atoms {
            atom_id = (atom_id + 1) % NUMBER_WRAP;
            if let Some(atom) = selection.atom_mut(key) {
                atom.resnr = residue_id as isize;
                atom.id = atom_id;
            }
        }
    }
}
