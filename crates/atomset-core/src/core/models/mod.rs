//! # Core Models Module
//!
//! Data structures for an ordered collection of atoms and the operations that
//! act on it in place.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom with residue metadata, coordinates, velocity and bond lists
//! - [`selection`] - The owning [`AtomSelection`](selection::AtomSelection) and its selection queries
//! - [`simbox`] - Length units and the periodic simulation box
//! - [`transform`] - Unit conversion, translation, center of mass and rotations
//! - [`ids`] - Stable keys for atoms stored in a collection
//!
//! ## Usage
//!
//! ```ignore
//! use atomset::core::models::{atom::Atom, selection::{AtomSelection, FetchOptions, Selector}};
//!
//! let mut selection = AtomSelection::new();
//! selection.push(Atom::new("CA", Point3::new(0.0, 0.0, 0.0)).with_residue("ALA", 1));
//!
//! let keys = selection.fetch(&["CA"], Selector::ByName, FetchOptions::default())?;
//! selection.view_mut(keys).translate(&Vector3::new(1.0, 0.0, 0.0));
//! ```

pub mod atom;
pub mod ids;
pub mod selection;
pub mod simbox;
pub mod transform;
