//! state_lattice_graph - search graph for state lattice planning
//!
//! This crate provides the pieces a lattice A* needs: a loader for
//! precomputed motion primitive libraries, a heading-indexed motion table,
//! and search vertices with successor generation, edge costs and heuristics.

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Coordinates, MotionPose, MotionPoses, MotionModelKind, CurveKind};
pub use common::{CollisionChecker, ObstacleHeuristic, CurveDistance};
pub use common::{LatticeError, LatticeResult};
pub use path_planning::state_lattice::{LatticeVertex, MotionTable, SearchConfig, VertexPool};
