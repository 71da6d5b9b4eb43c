// Path planning building blocks for lattice search

pub mod dubins_path;
pub mod reeds_shepp_path;
pub mod state_lattice;

pub use dubins_path::Dubins;
pub use reeds_shepp_path::ReedsShepp;
