use crate::core::models::atom::Atom;
use crate::core::models::selection::AtomSelection;
use nalgebra::Point3;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::info;

/// Per-atom fields of a topology entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopologyAtom {
    pub id: usize,
    pub name: String,
    pub resname: String,
    pub resnr: isize,
    #[serde(default)]
    pub mass: f64,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub chain_id: Option<char>,
}

/// An index-keyed source of atom records, such as a parsed topology.
pub trait TopologySource {
    fn topology_atoms(&self) -> &BTreeMap<usize, TopologyAtom>;
}

impl TopologySource for BTreeMap<usize, TopologyAtom> {
    fn topology_atoms(&self) -> &BTreeMap<usize, TopologyAtom> {
        self
    }
}

impl From<&TopologyAtom> for Atom {
    fn from(entry: &TopologyAtom) -> Self {
        let mut atom = Atom::new(&entry.name, Point3::origin())
            .with_id(entry.id)
            .with_residue(&entry.resname, entry.resnr)
            .with_mass(entry.mass);
        if let Some(symbol) = &entry.symbol {
            atom.symbol = symbol.clone();
        }
        if let Some(chain_id) = entry.chain_id {
            atom.chain_id = chain_id;
        }
        atom
    }
}

impl AtomSelection {
    /// Replaces all atoms with those built from `source`, in index order.
    ///
    /// The new atoms sit at the origin and carry the collection's unit.
    pub fn atoms_from_topology(&mut self, source: &impl TopologySource) -> &mut Self {
        self.atoms.clear();
        self.order.clear();
        self.b13_current = false;
        for entry in source.topology_atoms().values() {
            self.push(Atom::from(entry));
        }
        info!(atoms = self.len(), "Built atoms from topology");
        self
    }
}
