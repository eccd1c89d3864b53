//! Unit conversion and rigid-body transformations of atom collections.

use super::atom::Atom;
use super::ids::AtomKey;
use super::selection::{AtomSelection, SelectionMut};
use super::simbox::LengthUnit;
use crate::core::utils::geometry::AxisRotation;
use nalgebra::Vector3;
use rand::Rng;
use slotmap::SlotMap;
use tracing::{debug, instrument};

fn translate_atoms(atoms: &mut SlotMap<AtomKey, Atom>, keys: &[AtomKey], vector: &Vector3<f64>) {
    for &key in keys {
        atoms[key].position += *vector;
    }
}

/// Mass-weighted centroid of the atoms named by `keys`.
///
/// When the total mass is exactly zero every atom counts equally. An empty
/// key list yields the zero vector.
fn center_of_mass_of(atoms: &SlotMap<AtomKey, Atom>, keys: &[AtomKey]) -> Vector3<f64> {
    if keys.is_empty() {
        return Vector3::zeros();
    }

    let total_mass: f64 = keys.iter().map(|&key| atoms[key].mass).sum();
    if total_mass == 0.0 {
        let sum: Vector3<f64> = keys.iter().map(|&key| atoms[key].position.coords).sum();
        sum / keys.len() as f64
    } else {
        let weighted: Vector3<f64> = keys
            .iter()
            .map(|&key| atoms[key].position.coords * atoms[key].mass)
            .sum();
        weighted / total_mass
    }
}

fn center_atoms(
    atoms: &mut SlotMap<AtomKey, Atom>,
    keys: &[AtomKey],
    vector_only: bool,
) -> Vector3<f64> {
    let com = center_of_mass_of(atoms, keys);
    if !vector_only {
        translate_atoms(atoms, keys, &-com);
    }
    com
}

fn rotate_atoms(
    atoms: &mut SlotMap<AtomKey, Atom>,
    keys: &[AtomKey],
    rotation: &AxisRotation,
    angle_degrees: f64,
) {
    for &key in keys {
        let atom = &mut atoms[key];
        atom.position = rotation.apply(&atom.position, angle_degrees);
    }
}

/// Rotates about the center of mass by three uniformly drawn angles, one full
/// pass per axis in x, y, z order. Returns the angles in degrees.
fn randomly_rotate_atoms(
    atoms: &mut SlotMap<AtomKey, Atom>,
    keys: &[AtomKey],
    rng: &mut impl Rng,
) -> [f64; 3] {
    let com = center_atoms(atoms, keys, false);

    let mut angles = [0.0; 3];
    for (angle, rotation) in angles
        .iter_mut()
        .zip([AxisRotation::x(), AxisRotation::y(), AxisRotation::z()])
    {
        *angle = rng.gen_range(0.0..360.0);
        rotate_atoms(atoms, keys, &rotation, *angle);
    }

    translate_atoms(atoms, keys, &com);
    angles
}

impl AtomSelection {
    /// Converts all coordinates and the box from Ångström to nanometer.
    ///
    /// Does nothing if the collection is already in nanometer.
    pub fn unit_to_nm(&mut self) {
        self.convert_unit(LengthUnit::Nanometer);
    }

    /// Converts all coordinates and the box from nanometer to Ångström.
    ///
    /// Does nothing if the collection is already in Ångström.
    pub fn unit_to_angstrom(&mut self) {
        self.convert_unit(LengthUnit::Angstrom);
    }

    fn convert_unit(&mut self, target: LengthUnit) {
        if self.unit == target {
            return;
        }
        let factor = self.unit.factor_to(target);
        for &key in &self.order {
            let atom = &mut self.atoms[key];
            atom.position.coords *= factor;
            atom.unit = target;
        }
        self.sim_box.scale(factor);
        debug!(from = %self.unit, to = %target, "Converted length unit");
        self.unit = target;
    }

    /// Computes the center of mass and, unless `vector_only`, moves it to the origin.
    ///
    /// Atoms are weighted by mass. If the total mass is zero every atom counts
    /// equally, and an empty collection gives the zero vector.
    ///
    /// # Arguments
    ///
    /// * `vector_only` - Only compute the vector, leaving positions unchanged.
    ///
    /// # Return
    ///
    /// The center of mass as it was before any recentering, in the collection's unit.
    pub fn center_of_mass(&mut self, vector_only: bool) -> Vector3<f64> {
        center_atoms(&mut self.atoms, &self.order, vector_only)
    }

    /// The center of mass, without modifying the collection.
    pub fn com_vector(&self) -> Vector3<f64> {
        center_of_mass_of(&self.atoms, &self.order)
    }

    /// Moves every atom by `vector`.
    ///
    /// # Arguments
    ///
    /// * `vector` - Displacement in the collection's unit.
    pub fn translate(&mut self, vector: &Vector3<f64>) {
        translate_atoms(&mut self.atoms, &self.order, vector);
    }

    /// Rotates every atom about a Cartesian axis through the origin.
    ///
    /// # Arguments
    ///
    /// * `rotation` - The axis, see [`AxisRotation::x`] and friends.
    /// * `angle_degrees` - Rotation angle, right-hand rule.
    pub fn rotate(&mut self, rotation: &AxisRotation, angle_degrees: f64) {
        rotate_atoms(&mut self.atoms, &self.order, rotation, angle_degrees);
    }

    /// Applies a random rotation about the center of mass using the thread RNG.
    pub fn random_rotation(&mut self) -> [f64; 3] {
        self.random_rotation_with(&mut rand::thread_rng())
    }

    /// Applies a random rotation about the center of mass.
    ///
    /// The collection is recentered, rotated about x, then y, then z by angles
    /// drawn uniformly from `[0, 360)` degrees, and moved back. Each axis is a
    /// full pass over all atoms before the next one starts.
    ///
    /// # Arguments
    ///
    /// * `rng` - Source of the three angles.
    ///
    /// # Return
    ///
    /// The x, y and z angles in degrees, in application order.
    #[instrument(level = "debug", skip_all, fields(atoms = self.order.len()))]
    pub fn random_rotation_with(&mut self, rng: &mut impl Rng) -> [f64; 3] {
        let angles = randomly_rotate_atoms(&mut self.atoms, &self.order, rng);
        debug!(?angles, "Applied random rotation");
        angles
    }
}

/// The same operations restricted to the atoms of a view. Atoms outside the
/// view are neither weighted nor moved.
impl SelectionMut<'_> {
    /// See [`AtomSelection::center_of_mass`].
    pub fn center_of_mass(&mut self, vector_only: bool) -> Vector3<f64> {
        center_atoms(&mut self.parent.atoms, &self.keys, vector_only)
    }

    /// See [`AtomSelection::translate`].
    pub fn translate(&mut self, vector: &Vector3<f64>) {
        translate_atoms(&mut self.parent.atoms, &self.keys, vector);
    }

    /// See [`AtomSelection::rotate`].
    pub fn rotate(&mut self, rotation: &AxisRotation, angle_degrees: f64) {
        rotate_atoms(&mut self.parent.atoms, &self.keys, rotation, angle_degrees);
    }

    pub fn random_rotation(&mut self) -> [f64; 3] {
        self.random_rotation_with(&mut rand::thread_rng())
    }

    /// See [`AtomSelection::random_rotation_with`]. The view is rotated
    /// about its own center of mass.
    pub fn random_rotation_with(&mut self, rng: &mut impl Rng) -> [f64; 3] {
        randomly_rotate_atoms(&mut self.parent.atoms, &self.keys, rng)
    }
}
