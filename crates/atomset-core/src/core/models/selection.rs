use super::atom::Atom;
use super::ids::AtomKey;
use super::simbox::{LengthUnit, SimBox};
use crate::core::config::SelectionConfig;
use crate::core::utils::identifiers::element_symbol;
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, instrument};

/// Title written when neither the caller nor the configuration provides one.
pub const DEFAULT_TITLE: &str = "Generated by atomset";

/// Errors raised by id-based selection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid atom id key: '{0}'")]
    InvalidId(String),
    #[error("Atom id {id} is out of range for a selection of {len} atoms")]
    IdOutOfRange { id: usize, len: usize },
}

/// The attribute an atom is matched on by [`AtomSelection::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Match the atom name, exactly or as a substring with `wildcard`.
    ByName,
    /// Match the element symbol exactly.
    ByElement,
    /// Match the numeric atom id; keys must parse as integers.
    ById,
}

/// Matching modifiers for [`AtomSelection::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FetchOptions {
    /// Match names by substring instead of equality. Ignored for elements and ids.
    pub wildcard: bool,
    /// Return the atoms that match no key instead of the matches.
    pub invert: bool,
}

impl FetchOptions {
    /// Substring name matching, not inverted.
    pub fn wildcard() -> Self {
        Self {
            wildcard: true,
            invert: false,
        }
    }

    /// Exact matching, inverted.
    pub fn inverted() -> Self {
        Self {
            wildcard: false,
            invert: true,
        }
    }
}

/// A run of consecutive atoms sharing chain, residue number and residue name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    /// Chain identifier shared by the atoms of the run.
    pub chain_id: char,
    /// Residue sequence number shared by the atoms of the run.
    pub resnr: isize,
    /// Residue name shared by the atoms of the run.
    pub resname: String,
    /// Keys of the member atoms in stored order.
    pub atoms: Vec<AtomKey>,
}

/// An ordered, mutable collection of atoms with a unit system and an optional box.
///
/// The collection is the sole owner of its atoms. Selections, bond lists and
/// residue groupings all refer to atoms by [`AtomKey`], so a change made through
/// any of them is a change to the atom stored here.
#[derive(Debug, Clone, Default)]
pub struct AtomSelection {
    /// Primary storage for atoms using a slot map for stable keys.
    pub(crate) atoms: SlotMap<AtomKey, Atom>,
    /// Keys in stored order; defines iteration and output order.
    pub(crate) order: Vec<AtomKey>,
    /// Unit of every stored position and of the box.
    pub(crate) unit: LengthUnit,
    /// Periodic box, the zero matrix when there is none.
    pub(crate) sim_box: SimBox,
    /// Default title for written files.
    title: Option<String>,
    /// Whether the 1-3 lists reflect the current atoms and bonds.
    pub(crate) b13_current: bool,
}

impl AtomSelection {
    /// Creates an empty collection in Ångström with no box and no title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection from explicit settings.
    ///
    /// # Arguments
    ///
    /// * `config` - Unit, optional box rows and optional default title.
    pub fn with_config(config: SelectionConfig) -> Self {
        Self {
            unit: config.unit,
            sim_box: config.box_vectors.map(SimBox::from_rows).unwrap_or_default(),
            title: config.title,
            ..Self::default()
        }
    }

    /// Adds an atom at the end of the collection.
    ///
    /// The atom's `unit` is set to the collection's unit; its position is
    /// taken as already expressed in that unit.
    ///
    /// # Arguments
    ///
    /// * `atom` - The atom to take ownership of.
    ///
    /// # Return
    ///
    /// The key under which the atom is stored.
    pub fn push(&mut self, mut atom: Atom) -> AtomKey {
        atom.unit = self.unit;
        let key = self.atoms.insert(atom);
        self.order.push(key);
        self.b13_current = false;
        key
    }

    /// Retrieves an immutable reference to an atom by its key.
    ///
    /// # Arguments
    ///
    /// * `key` - The atom key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, key: AtomKey) -> Option<&Atom> {
        self.atoms.get(key)
    }

    /// Retrieves a mutable reference to an atom by its key.
    ///
    /// Bond edits made through this reference are not tracked; call
    /// [`expand_13`](Self::expand_13) again afterwards.
    ///
    /// # Arguments
    ///
    /// * `key` - The atom key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&mut Atom)` if the atom exists, otherwise `None`.
    pub fn atom_mut(&mut self, key: AtomKey) -> Option<&mut Atom> {
        self.atoms.get_mut(key)
    }

    /// Keys of all atoms in stored order.
    pub fn keys(&self) -> &[AtomKey] {
        &self.order
    }

    /// Iterates atoms in stored order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.order.iter().map(move |&key| &self.atoms[key])
    }

    /// Iterates `(key, atom)` pairs in stored order.
    pub fn iter_with_keys(&self) -> impl Iterator<Item = (AtomKey, &Atom)> {
        self.order.iter().map(move |&key| (key, &self.atoms[key]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn sim_box(&self) -> &SimBox {
        &self.sim_box
    }

    pub fn set_sim_box(&mut self, sim_box: SimBox) {
        self.sim_box = sim_box;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Picks the title for an output file: `explicit` if non-empty, then the
    /// configured title, then [`DEFAULT_TITLE`].
    pub fn resolve_title<'a>(&'a self, explicit: &'a str) -> &'a str {
        if !explicit.is_empty() {
            explicit
        } else {
            self.title.as_deref().unwrap_or(DEFAULT_TITLE)
        }
    }

    /// Registers a direct bond between two atoms on both sides.
    ///
    /// Adding an existing bond is a no-op.
    ///
    /// # Arguments
    ///
    /// * `a` - Key of the first atom.
    /// * `b` - Key of the second atom.
    ///
    /// # Return
    ///
    /// Returns `None` if either key is unknown or both keys are the same atom.
    pub fn add_bond(&mut self, a: AtomKey, b: AtomKey) -> Option<()> {
        if !self.atoms.contains_key(a) || !self.atoms.contains_key(b) || a == b {
            return None;
        }
        if self.atoms[a].bonds.contains(&b) {
            return Some(());
        }
        self.atoms[a].bonds.push(b);
        self.atoms[b].bonds.push(a);
        self.b13_current = false;
        Some(())
    }

    /// Assigns ids `start, start+1, ...` in stored order.
    ///
    /// The previous id is kept in `orig_id` unless one was already recorded.
    pub fn renumber_atoms(&mut self, start: usize) {
        for (i, &key) in self.order.iter().enumerate() {
            let atom = &mut self.atoms[key];
            if atom.orig_id == 0 {
                atom.orig_id = atom.id;
            }
            atom.id = start + i;
        }
    }

    /// Positions in stored order, in the collection's unit.
    pub fn coords(&self) -> Vec<Point3<f64>> {
        self.iter().map(|atom| atom.position).collect()
    }

    /// Per-axis `(min, max)` of atom positions, or `None` if the collection is empty.
    pub fn max_crd(&self) -> Option<[(f64, f64); 3]> {
        let mut atoms = self.iter();
        let first = atoms.next()?.position;
        let mut bounds = [(first.x, first.x), (first.y, first.y), (first.z, first.z)];
        for atom in atoms {
            for (axis, bound) in bounds.iter_mut().enumerate() {
                let value = atom.position[axis];
                bound.0 = bound.0.min(value);
                bound.1 = bound.1.max(value);
            }
        }
        Some(bounds)
    }

    /// Looks atoms up by 1-based position in stored order.
    ///
    /// # Arguments
    ///
    /// * `ids` - 1-based positions; the result follows this order.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::IdOutOfRange`] for 0 or a position past the end.
    pub fn get_by_id(&self, ids: &[usize]) -> Result<Vec<AtomKey>, SelectionError> {
        ids.iter()
            .map(|&id| {
                id.checked_sub(1)
                    .and_then(|index| self.order.get(index).copied())
                    .ok_or(SelectionError::IdOutOfRange {
                        id,
                        len: self.order.len(),
                    })
            })
            .collect()
    }

    /// Fills in missing element symbols from atom and residue names.
    pub fn assign_symbols(&mut self) {
        for &key in &self.order {
            let atom = &mut self.atoms[key];
            if atom.symbol.is_empty() {
                if let Some(symbol) = element_symbol(&atom.name, &atom.resname) {
                    atom.symbol = symbol;
                }
            }
        }
    }

    /// Groups consecutive atoms sharing chain, residue number and residue name.
    pub fn residues(&self) -> Vec<Residue> {
        let mut residues: Vec<Residue> = Vec::new();
        for (key, atom) in self.iter_with_keys() {
            match residues.last_mut() {
                Some(last)
                    if last.chain_id == atom.chain_id
                        && last.resnr == atom.resnr
                        && last.resname == atom.resname =>
                {
                    last.atoms.push(key);
                }
                _ => residues.push(Residue {
                    chain_id: atom.chain_id,
                    resnr: atom.resnr,
                    resname: atom.resname.clone(),
                    atoms: vec![key],
                }),
            }
        }
        residues
    }

    /// Selects atoms whose name, element or id matches any of `keys`.
    ///
    /// Matches are reported in scan order, once per matching key, so an atom
    /// matched by two keys appears twice. With `invert`, the atoms matched by
    /// no key are returned instead, in stored order.
    ///
    /// # Arguments
    ///
    /// * `keys` - Names, element symbols or decimal ids, depending on `selector`.
    /// * `selector` - The atom attribute to compare.
    /// * `options` - Wildcard and invert modifiers.
    ///
    /// # Return
    ///
    /// Keys of the selected atoms, usable with [`view_mut`](Self::view_mut).
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvalidId`] when `selector` is
    /// [`Selector::ById`] and a key is not an unsigned integer.
    #[instrument(level = "debug", skip_all, fields(selector = ?selector, keys = keys.len()))]
    pub fn fetch<K: AsRef<str>>(
        &self,
        keys: &[K],
        selector: Selector,
        options: FetchOptions,
    ) -> Result<Vec<AtomKey>, SelectionError> {
        let mut result = Vec::new();
        match selector {
            Selector::ByName => {
                for (key, atom) in self.iter_with_keys() {
                    for k in keys {
                        let k = k.as_ref();
                        let matched = if options.wildcard {
                            atom.name.contains(k)
                        } else {
                            atom.name == k
                        };
                        if matched {
                            result.push(key);
                        }
                    }
                }
            }
            Selector::ByElement => {
                for (key, atom) in self.iter_with_keys() {
                    for k in keys {
                        if atom.symbol == k.as_ref() {
                            result.push(key);
                        }
                    }
                }
            }
            Selector::ById => {
                let ids = keys
                    .iter()
                    .map(|k| {
                        let k = k.as_ref();
                        k.trim()
                            .parse::<usize>()
                            .map_err(|_| SelectionError::InvalidId(k.to_string()))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                result = self.fetch_ids(&ids, false);
            }
        }

        if options.invert {
            result = self.complement(&result);
        }
        debug!(selected = result.len(), "Fetched atoms");
        Ok(result)
    }

    /// Selects atoms by numeric id; see [`fetch`](Self::fetch).
    ///
    /// # Arguments
    ///
    /// * `ids` - Atom ids to match against [`Atom::id`].
    /// * `invert` - Return the atoms whose id is not listed instead.
    pub fn fetch_ids(&self, ids: &[usize], invert: bool) -> Vec<AtomKey> {
        let mut result = Vec::new();
        for (key, atom) in self.iter_with_keys() {
            for &id in ids {
                if atom.id == id {
                    result.push(key);
                }
            }
        }
        if invert {
            result = self.complement(&result);
        }
        result
    }

    /// Like [`fetch`](Self::fetch) but yields the atoms themselves.
    pub fn fetch_atoms<K: AsRef<str>>(
        &self,
        keys: &[K],
        selector: Selector,
        options: FetchOptions,
    ) -> Result<Vec<&Atom>, SelectionError> {
        Ok(self
            .fetch(keys, selector, options)?
            .into_iter()
            .map(|key| &self.atoms[key])
            .collect())
    }

    fn complement(&self, selected: &[AtomKey]) -> Vec<AtomKey> {
        let selected: HashSet<AtomKey> = selected.iter().copied().collect();
        self.order
            .iter()
            .copied()
            .filter(|key| !selected.contains(key))
            .collect()
    }

    /// A mutable view over a subset of this collection.
    ///
    /// # Arguments
    ///
    /// * `keys` - Atoms to include, usually the result of [`fetch`](Self::fetch).
    ///   Unknown keys are dropped.
    ///
    /// # Return
    ///
    /// A [`SelectionMut`] borrowing this collection mutably.
    pub fn view_mut(&mut self, keys: Vec<AtomKey>) -> SelectionMut<'_> {
        let keys = keys
            .into_iter()
            .filter(|&key| self.atoms.contains_key(key))
            .collect();
        SelectionMut { parent: self, keys }
    }
}

/// A borrowed, mutable view over some atoms of an [`AtomSelection`].
///
/// Transformations applied through the view act on the parent's atoms.
#[derive(Debug)]
pub struct SelectionMut<'a> {
    /// The collection that owns the atoms.
    pub(crate) parent: &'a mut AtomSelection,
    /// Keys of the atoms in the view, all present in `parent`.
    pub(crate) keys: Vec<AtomKey>,
}

impl SelectionMut<'_> {
    /// Keys of the atoms in the view, in selection order.
    pub fn keys(&self) -> &[AtomKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates the atoms in the view, in selection order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.keys.iter().map(move |&key| &self.parent.atoms[key])
    }
}
