//! Common types, traits, and error definitions for state_lattice_graph
//!
//! This module provides the foundational building blocks shared by the
//! primitive loader, the motion table, and the lattice vertices.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
