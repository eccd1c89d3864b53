//! # Core Module
//!
//! The building blocks of the library: the atom collection, its selection and
//! transform operations, bond topology derivation and structure file output.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, the owning collection, units and the simulation box
//! - **Bond Topology** ([`topology`]) - 1-3/1-4 expansion, bond detection and topology-driven construction
//! - **File Output** ([`io`]) - PDB and GRO writers and extension-based dispatch
//! - **Configuration** ([`config`]) - Collection settings loaded from TOML or built in code
//! - **Utilities** ([`utils`]) - Axis rotations and element symbol lookup

pub mod config;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
