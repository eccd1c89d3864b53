//! # Topology Module
//!
//! Bond-graph operations on an [`AtomSelection`](crate::core::models::selection::AtomSelection):
//!
//! - [`expansion`] derives 1-3 and 1-4 neighbor lists from direct bonds.
//! - [`neighbors`] defines the [`BondFinder`](neighbors::BondFinder) capability used
//!   to detect bonds from coordinates.
//! - [`source`] builds atoms from an index-keyed topology mapping.

pub mod expansion;
pub mod neighbors;
pub mod source;
