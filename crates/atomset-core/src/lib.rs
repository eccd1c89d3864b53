//! # atomset
//!
//! An ordered, in-place editable collection of atoms for preparing molecular
//! structures.
//!
//! A collection owns its atoms and hands out keys. Selections by name, element
//! or id return those keys, and transforms applied through a selection view
//! change the atoms held by the collection. Once direct bonds are known the
//! topology expander derives 1-3 and 1-4 neighbor lists. The result can be
//! written as a PDB model or a GRO frame.

pub mod core;

pub use crate::core::config::SelectionConfig;
pub use crate::core::io::error::WriteError;
pub use crate::core::models::atom::Atom;
pub use crate::core::models::ids::AtomKey;
pub use crate::core::models::selection::{AtomSelection, FetchOptions, SelectionError, Selector};
pub use crate::core::models::simbox::{LengthUnit, SimBox};
