use super::ids::AtomKey;
use super::simbox::LengthUnit;
use nalgebra::{Point3, Vector3};
use std::fmt;

/// The record keyword an atom is written with in the fixed-column format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordType {
    #[default]
    Atom,
    HetAtom,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Atom => "ATOM",
            RecordType::HetAtom => "HETATM",
        }
    }
}

/// A single particle of a molecular structure.
///
/// Bond partners and the derived 1-3/1-4 lists refer to other atoms of the
/// owning [`AtomSelection`](super::selection::AtomSelection) by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number, 1-based once the collection has been renumbered.
    pub id: usize,
    /// The serial number before the first renumbering, 0 if never renumbered.
    pub orig_id: usize,
    /// The atom name (e.g. "CA", "HG21").
    pub name: String,
    /// Name of the residue this atom belongs to.
    pub resname: String,
    /// Residue sequence number.
    pub resnr: isize,
    /// Single-character chain identifier, blank when unassigned.
    pub chain_id: char,
    /// Record keyword used in fixed-column output.
    pub record: RecordType,
    /// Alternate location indicator, blank for none.
    pub altloc: char,
    /// Occupancy written to fixed-column output.
    pub occupancy: f64,
    /// Temperature factor written to fixed-column output.
    pub bfactor: f64,
    /// Position, in the unit given by `unit`.
    pub position: Point3<f64>,
    /// Velocity in nm/ps; never rescaled by unit conversion.
    pub velocity: Vector3<f64>,
    /// Mass in atomic mass units.
    pub mass: f64,
    /// Element symbol; empty when unknown.
    pub symbol: String,
    /// Unit of `position`; replaced by the collection's unit when the atom is pushed.
    pub unit: LengthUnit,
    /// Directly bonded partners.
    pub bonds: Vec<AtomKey>,
    /// Atoms two bonds away.
    pub b13: Vec<AtomKey>,
    /// Atoms three bonds away that are neither 1-2 nor 1-3 partners.
    pub b14: Vec<AtomKey>,
}

impl Atom {
    /// Creates a new `Atom` at `position` with default values for the other fields.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            id: 0,
            orig_id: 0,
            name: name.to_string(),
            resname: String::new(),
            resnr: 1,
            chain_id: ' ',
            record: RecordType::default(),
            altloc: ' ',
            occupancy: 1.0,
            bfactor: 0.0,
            position,
            velocity: Vector3::zeros(),
            mass: 0.0,
            symbol: String::new(),
            unit: LengthUnit::default(),
            bonds: Vec::new(),
            b13: Vec::new(),
            b14: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    pub fn with_residue(mut self, resname: &str, resnr: isize) -> Self {
        self.resname = resname.to_string();
        self.resnr = resnr;
        self
    }

    pub fn with_chain(mut self, chain_id: char) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_symbol(mut self, symbol: &str) -> Self {
        self.symbol = symbol.to_string();
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3<f64>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_unit(mut self, unit: LengthUnit) -> Self {
        self.unit = unit;
        self
    }
}

impl fmt::Display for Atom {
    /// Formats the atom as a fixed-column `ATOM`/`HETATM` record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::core::io::pdb::AtomRecord::new(self, &self.name).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new("CA", Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.id, 0);
        assert_eq!(atom.orig_id, 0);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.velocity, Vector3::zeros());
        assert_eq!(atom.mass, 0.0);
        assert_eq!(atom.unit, LengthUnit::Angstrom);
        assert_eq!(atom.record, RecordType::Atom);
        assert!(atom.bonds.is_empty());
        assert!(atom.b13.is_empty());
        assert!(atom.b14.is_empty());
    }

    #[test]
    fn builder_methods_set_fields() {
        let atom = Atom::new("OW", Point3::origin())
            .with_id(7)
            .with_residue("SOL", 3)
            .with_chain('B')
            .with_mass(15.999)
            .with_symbol("O")
            .with_velocity(Vector3::new(0.1, 0.2, 0.3))
            .with_unit(LengthUnit::Nanometer);

        assert_eq!(atom.id, 7);
        assert_eq!(atom.resname, "SOL");
        assert_eq!(atom.resnr, 3);
        assert_eq!(atom.chain_id, 'B');
        assert_eq!(atom.mass, 15.999);
        assert_eq!(atom.symbol, "O");
        assert_eq!(atom.velocity, Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(atom.unit, LengthUnit::Nanometer);
    }

    #[test]
    fn record_type_keywords() {
        assert_eq!(RecordType::Atom.as_str(), "ATOM");
        assert_eq!(RecordType::HetAtom.as_str(), "HETATM");
    }

    #[test]
    fn display_writes_nanometer_atom_in_angstrom() {
        let atom = Atom::new("C", Point3::new(0.1, 0.2, 0.3))
            .with_residue("LIG", 1)
            .with_unit(LengthUnit::Nanometer);
        let line = atom.to_string();
        assert_eq!(&line[30..54], "   1.000   2.000   3.000");
    }

    #[test]
    fn display_produces_fixed_column_record() {
        let atom = Atom::new("CA", Point3::new(1.0, -2.5, 10.25))
            .with_id(12)
            .with_residue("ALA", 3)
            .with_chain('A')
            .with_symbol("C");
        let line = atom.to_string();
        assert!(line.starts_with("ATOM     12  CA  ALA A   3"));
        assert_eq!(&line[30..54], "   1.000  -2.500  10.250");
    }
}
