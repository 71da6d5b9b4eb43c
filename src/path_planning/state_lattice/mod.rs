//! State lattice search graph
//!
//! Vertices of a lattice search over `(x, y, heading bin)`, connected by
//! precomputed kinematically feasible motion primitives.
//!
//! # Components
//!
//! - `primitive_parser`: loads a primitive library from its JSON document
//! - `motion_table`: indexes primitives by start heading, holds search penalties
//! - `distance_heuristic`: precomputed obstacle-free costs near the goal
//! - `lattice_node`: search vertex, successor generation and heuristics
//! - `vertex_pool`: preallocated vertices addressed by lattice index
//!
//! # Example
//!
//! ```no_run
//! use state_lattice_graph::common::{Coordinates, MotionModelKind};
//! use state_lattice_graph::path_planning::state_lattice::{LatticeVertex, SearchConfig, VertexPool};
//! use state_lattice_graph::utils::OccupancyGrid;
//!
//! let config = SearchConfig {
//!     lattice_filepath: "lattice.json".into(),
//!     ..Default::default()
//! };
//! let table = LatticeVertex::init_motion_model(MotionModelKind::StateLattice, 100, &config).unwrap();
//! let pool = VertexPool::for_grid(&table, 100);
//! let mut grid = OccupancyGrid::free(100, 100);
//!
//! let start = pool.get(table.index(10.0, 10.0, 0.0).unwrap()).unwrap();
//! start.set_pose(Coordinates::new(10.0, 10.0, 0.0));
//! let successors = start
//!     .get_neighbors(&table, |i| pool.get(i), &mut grid, table.allow_unknown())
//!     .unwrap();
//! ```
//!
//! # References
//!
//! - Pivtoraiko, Knepper & Kelly, "Differentially constrained mobile robot
//!   motion planning in state lattices" (2009)

pub mod distance_heuristic;
pub mod lattice_node;
pub mod motion_table;
pub mod primitive_parser;
pub mod vertex_pool;

pub use distance_heuristic::DistanceHeuristicTable;
pub use lattice_node::{LatticeVertex, Validity};
pub use motion_table::{HeadingWrap, MotionProjection, MotionTable, SearchConfig};
pub use primitive_parser::{LatticeMetadata, Primitive, Turn};
pub use vertex_pool::VertexPool;
