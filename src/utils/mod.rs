//! Utility modules for state_lattice_graph

pub mod grid_map;

pub use grid_map::*;
