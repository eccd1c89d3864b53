use crate::core::models::ids::AtomKey;
use crate::core::models::selection::AtomSelection;
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

impl AtomSelection {
    /// Rebuilds every atom's 1-3 list from the direct bond lists.
    ///
    /// For each atom A, bonded partner B of A and bonded partner C of B, the
    /// pair is registered on both A and C when `A.id > C.id`. The strict id
    /// comparison registers each unordered pair from one side only and skips
    /// A itself. Existing 1-3 lists are cleared first, so repeated calls give
    /// the same result, and a pair reached through two paths (as in a
    /// four-membered ring) is stored once.
    ///
    /// Bond lists must be symmetric and atom ids distinct.
    #[instrument(level = "debug", skip_all, fields(atoms = self.order.len()))]
    pub fn expand_13(&mut self) {
        self.warn_on_duplicate_ids();
        for &key in &self.order {
            self.atoms[key].b13.clear();
        }

        let mut pairs: Vec<(AtomKey, AtomKey)> = Vec::new();
        for &a in &self.order {
            let atom_a = &self.atoms[a];
            for &b in &atom_a.bonds {
                let Some(atom_b) = self.atoms.get(b) else {
                    continue;
                };
                for &c in &atom_b.bonds {
                    if let Some(atom_c) = self.atoms.get(c) {
                        if atom_a.id > atom_c.id {
                            pairs.push((a, c));
                        }
                    }
                }
            }
        }

        let mut registered = 0;
        for (a, c) in pairs {
            if self.atoms[a].b13.contains(&c) {
                continue;
            }
            self.atoms[a].b13.push(c);
            self.atoms[c].b13.push(a);
            registered += 1;
        }
        self.b13_current = true;
        debug!(pairs = registered, "Built 1-3 lists");
    }

    /// Rebuilds every atom's 1-4 list from the 1-3 and direct bond lists.
    ///
    /// For each atom A, 1-3 partner B of A and bonded partner C of B, the pair
    /// is registered on both A and C when `A.id > C.id` and C is neither a
    /// direct nor a 1-3 partner of A. The 1-3 lists are rebuilt first if bonds
    /// or atoms were added since they were last computed.
    #[instrument(level = "debug", skip_all, fields(atoms = self.order.len()))]
    pub fn expand_14(&mut self) {
        if !self.b13_current {
            self.expand_13();
        }
        for &key in &self.order {
            self.atoms[key].b14.clear();
        }

        let mut pairs: Vec<(AtomKey, AtomKey)> = Vec::new();
        for &a in &self.order {
            let atom_a = &self.atoms[a];
            for &b in &atom_a.b13 {
                let Some(atom_b) = self.atoms.get(b) else {
                    continue;
                };
                for &c in &atom_b.bonds {
                    let Some(atom_c) = self.atoms.get(c) else {
                        continue;
                    };
                    if atom_a.id > atom_c.id
                        && !atom_a.bonds.contains(&c)
                        && !atom_a.b13.contains(&c)
                    {
                        pairs.push((a, c));
                    }
                }
            }
        }

        let mut registered = 0;
        for (a, c) in pairs {
            if self.atoms[a].b14.contains(&c) {
                continue;
            }
            self.atoms[a].b14.push(c);
            self.atoms[c].b14.push(a);
            registered += 1;
        }
        debug!(pairs = registered, "Built 1-4 lists");
    }

    /// Every direct bond once, as `(lower id, higher id)`, in stored order of the lower atom.
    pub fn bond_pairs(&self) -> Vec<(AtomKey, AtomKey)> {
        let mut pairs = Vec::new();
        for &a in &self.order {
            let atom_a = &self.atoms[a];
            for &b in &atom_a.bonds {
                if self.atoms.get(b).is_some_and(|atom_b| atom_a.id < atom_b.id) {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }

    fn warn_on_duplicate_ids(&self) {
        let mut seen = HashSet::with_capacity(self.order.len());
        if let Some(atom) = self.iter().find(|atom| !seen.insert(atom.id)) {
            warn!(
                id = atom.id,
                "Duplicate atom id; neighbor expansion skips pairs with equal ids"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::models::atom::Atom;
    use crate::core::models::ids::AtomKey;
    use crate::core::models::selection::AtomSelection;
    use nalgebra::Point3;

    fn chain(n: usize) -> (AtomSelection, Vec<AtomKey>) {
        let mut selection = AtomSelection::new();
        let keys: Vec<AtomKey> = (1..=n)
            .map(|id| {
                selection.push(Atom::new(&format!("C{}", id), Point3::origin()).with_id(id))
            })
            .collect();
        for pair in keys.windows(2) {
            selection.add_bond(pair[0], pair[1]).unwrap();
        }
        (selection, keys)
    }

    fn b13(selection: &AtomSelection, key: AtomKey) -> Vec<AtomKey> {
        selection.atom(key).unwrap().b13.clone()
    }

    fn b14(selection: &AtomSelection, key: AtomKey) -> Vec<AtomKey> {
        selection.atom(key).unwrap().b14.clone()
    }

    #[test]
    fn three_atom_chain_links_the_ends() {
        let (mut selection, k) = chain(3);
        selection.expand_13();

        assert_eq!(b13(&selection, k[2]), vec![k[0]]);
        assert_eq!(b13(&selection, k[0]), vec![k[2]]);
        assert!(b13(&selection, k[1]).is_empty());
    }

    #[test]
    fn four_atom_chain_has_one_14_pair() {
        let (mut selection, k) = chain(4);
        selection.expand_13();
        selection.expand_14();

        assert_eq!(b13(&selection, k[0]), vec![k[2]]);
        assert_eq!(b13(&selection, k[1]), vec![k[3]]);
        assert_eq!(b14(&selection, k[3]), vec![k[0]]);
        assert_eq!(b14(&selection, k[0]), vec![k[3]]);
        assert!(b14(&selection, k[1]).is_empty());
        assert!(b14(&selection, k[2]).is_empty());
    }

    #[test]
    fn expansion_is_idempotent() {
        let (mut selection, k) = chain(5);
        selection.expand_13();
        selection.expand_14();
        selection.expand_13();
        selection.expand_14();

        assert_eq!(b13(&selection, k[2]), vec![k[0], k[4]]);
        assert_eq!(b14(&selection, k[0]), vec![k[3]]);
        assert_eq!(b14(&selection, k[4]), vec![k[1]]);
    }

    #[test]
    fn expand_14_computes_missing_13_lists() {
        let (mut selection, k) = chain(4);
        selection.expand_14();
        assert_eq!(b13(&selection, k[0]), vec![k[2]]);
        assert_eq!(b14(&selection, k[0]), vec![k[3]]);
    }

    #[test]
    fn four_membered_ring_registers_each_pair_once() {
        let (mut selection, k) = chain(4);
        selection.add_bond(k[3], k[0]).unwrap();
        selection.expand_13();
        selection.expand_14();

        assert_eq!(b13(&selection, k[0]), vec![k[2]]);
        assert_eq!(b13(&selection, k[2]), vec![k[0]]);
        assert_eq!(b13(&selection, k[1]), vec![k[3]]);
        for &key in &k {
            assert!(b14(&selection, key).is_empty());
        }
    }

    #[test]
    fn three_membered_ring_excludes_bonded_pairs_from_14() {
        let (mut selection, k) = chain(3);
        selection.add_bond(k[2], k[0]).unwrap();
        selection.expand_14();
        for &key in &k {
            assert!(b14(&selection, key).is_empty());
        }
    }

    #[test]
    fn branched_molecule() {
        // 1-2, 2-3, 2-4, 4-5
        let mut selection = AtomSelection::new();
        let k: Vec<AtomKey> = (1..=5)
            .map(|id| selection.push(Atom::new("C", Point3::origin()).with_id(id)))
            .collect();
        selection.add_bond(k[0], k[1]).unwrap();
        selection.add_bond(k[1], k[2]).unwrap();
        selection.add_bond(k[1], k[3]).unwrap();
        selection.add_bond(k[3], k[4]).unwrap();
        selection.expand_14();

        assert_eq!(b13(&selection, k[1]), vec![k[4]]);
        assert_eq!(b13(&selection, k[2]), vec![k[0], k[3]]);
        assert_eq!(b13(&selection, k[3]), vec![k[0], k[2]]);
        assert_eq!(b14(&selection, k[4]), vec![k[0], k[2]]);
        assert_eq!(b14(&selection, k[0]), vec![k[4]]);
        assert_eq!(b14(&selection, k[2]), vec![k[4]]);
    }

    #[test]
    fn bond_pairs_lists_each_bond_once() {
        let (selection, k) = chain(3);
        assert_eq!(selection.bond_pairs(), vec![(k[0], k[1]), (k[1], k[2])]);
    }
}
