use crate::core::models::ids::AtomKey;
use crate::core::models::selection::AtomSelection;
use crate::core::models::simbox::LengthUnit;
use nalgebra::Point3;
use tracing::{info, instrument};

/// Detects bonded atom pairs from coordinates.
///
/// Implementations receive positions in Ångström, in the collection's stored
/// order, and return index pairs into that slice.
pub trait BondFinder {
    fn find_bonds(&self, positions: &[Point3<f64>], cutoff: f64) -> Vec<(usize, usize)>;
}

/// Pairs every two atoms closer than the cutoff, by exhaustive comparison.
#[derive(Debug, Clone, Copy, Default)]
pub struct CutoffBondFinder;

impl BondFinder for CutoffBondFinder {
    fn find_bonds(&self, positions: &[Point3<f64>], cutoff: f64) -> Vec<(usize, usize)> {
        let cutoff_sq = cutoff * cutoff;
        let mut pairs = Vec::new();
        for (i, p1) in positions.iter().enumerate() {
            for (j, p2) in positions.iter().enumerate().skip(i + 1) {
                if (p1 - p2).norm_squared() < cutoff_sq {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

impl AtomSelection {
    /// Runs `finder` over the current coordinates and returns the detected pairs.
    ///
    /// Coordinates are converted to Ångström for the search if needed and
    /// converted back afterwards. When `build_bonds` is set the pairs are also
    /// registered as direct bonds.
    #[instrument(level = "debug", skip(self, finder))]
    pub fn search_bonds(
        &mut self,
        finder: &dyn BondFinder,
        cutoff: f64,
        build_bonds: bool,
    ) -> Vec<(AtomKey, AtomKey)> {
        let converted = self.unit == LengthUnit::Nanometer;
        if converted {
            self.unit_to_angstrom();
        }

        let positions = self.coords();
        let pairs: Vec<(AtomKey, AtomKey)> = finder
            .find_bonds(&positions, cutoff)
            .into_iter()
            .filter_map(|(i, j)| Some((*self.order.get(i)?, *self.order.get(j)?)))
            .collect();

        if build_bonds {
            for &(a, b) in &pairs {
                self.add_bond(a, b);
            }
        }

        if converted {
            self.unit_to_nm();
        }
        info!(pairs = pairs.len(), "Bond search finished");
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use std::cell::RefCell;

    struct RecordingFinder {
        seen: RefCell<Vec<Point3<f64>>>,
        pairs: Vec<(usize, usize)>,
    }

    impl BondFinder for RecordingFinder {
        fn find_bonds(&self, positions: &[Point3<f64>], _cutoff: f64) -> Vec<(usize, usize)> {
            *self.seen.borrow_mut() = positions.to_vec();
            self.pairs.clone()
        }
    }

    fn water() -> AtomSelection {
        let mut selection = AtomSelection::new();
        selection.push(Atom::new("OW", Point3::new(0.0, 0.0, 0.0)));
        selection.push(Atom::new("HW1", Point3::new(0.96, 0.0, 0.0)));
        selection.push(Atom::new("HW2", Point3::new(-0.24, 0.93, 0.0)));
        selection
    }

    #[test]
    fn cutoff_finder_pairs_close_atoms_only() {
        let positions = [
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
        ];
        assert_eq!(CutoffBondFinder.find_bonds(&positions, 1.5), vec![(0, 1)]);
        assert!(CutoffBondFinder.find_bonds(&positions, 0.5).is_empty());
    }

    #[test]
    fn search_bonds_builds_symmetric_bonds() {
        let mut selection = water();
        let keys = selection.keys().to_vec();
        let pairs = selection.search_bonds(&CutoffBondFinder, 1.2, true);

        assert_eq!(pairs, vec![(keys[0], keys[1]), (keys[0], keys[2])]);
        assert_eq!(selection.atom(keys[0]).unwrap().bonds, vec![keys[1], keys[2]]);
        assert_eq!(selection.atom(keys[1]).unwrap().bonds, vec![keys[0]]);
    }

    #[test]
    fn search_bonds_without_building_leaves_bonds_untouched() {
        let mut selection = water();
        let pairs = selection.search_bonds(&CutoffBondFinder, 1.2, false);
        assert_eq!(pairs.len(), 2);
        assert!(selection.iter().all(|a| a.bonds.is_empty()));
    }

    #[test]
    fn nanometer_selection_is_searched_in_angstrom_and_restored() {
        let mut selection = water();
        selection.unit_to_nm();
        let before = selection.coords();
        let finder = RecordingFinder {
            seen: RefCell::new(Vec::new()),
            pairs: vec![(0, 1), (7, 0)],
        };

        let pairs = selection.search_bonds(&finder, 1.2, true);

        assert_eq!(pairs.len(), 1);
        assert!((finder.seen.borrow()[1].x - 0.96).abs() < 1e-12);
        assert_eq!(selection.unit(), LengthUnit::Nanometer);
        for (a, b) in selection.coords().iter().zip(&before) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn angstrom_selection_is_not_converted() {
        let mut selection = water();
        selection.search_bonds(&CutoffBondFinder, 1.2, false);
        assert_eq!(selection.unit(), LengthUnit::Angstrom);
    }
}
