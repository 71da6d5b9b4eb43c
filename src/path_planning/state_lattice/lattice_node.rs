//! Lattice search vertex
//!
//! A vertex is identified by its flattened `(x, y, heading bin)` index and
//! lives in a pool owned by the search engine. Everything the search needs
//! to mutate during expansion goes through `&self`, so a pool can be shared
//! between threads expanding in parallel. The collision query for a vertex
//! runs at most once until `reset`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use log::trace;
use parking_lot::Mutex;

use crate::common::{
    CollisionChecker, Coordinates, LatticeError, LatticeResult, MotionModelKind, ObstacleHeuristic,
};

use super::motion_table::{MotionTable, SearchConfig};
use super::primitive_parser::Turn;

/// Highest cost a traversable cell can carry
const MAX_NON_OBSTACLE_COST: f64 = 252.0;

/// Memoized outcome of the first collision query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validity {
    Free { cost: f64 },
    Blocked,
}

#[derive(Debug, Clone, Copy)]
struct VertexState {
    pose: Coordinates,
    accumulated_cost: f64,
    parent: Option<u32>,
    motion_primitive_index: Option<usize>,
}

impl Default for VertexState {
    fn default() -> Self {
        Self {
            pose: Coordinates::origin(),
            accumulated_cost: f64::INFINITY,
            parent: None,
            motion_primitive_index: None,
        }
    }
}

#[derive(Debug)]
pub struct LatticeVertex {
    index: u32,
    state: Mutex<VertexState>,
    validity: OnceLock<Validity>,
    visited: AtomicBool,
}

impl LatticeVertex {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            state: Mutex::new(VertexState::default()),
            validity: OnceLock::new(),
            visited: AtomicBool::new(false),
        }
    }

    /// Check the motion model and build the shared motion table
    pub fn init_motion_model(
        motion_model: MotionModelKind,
        size_x: u32,
        config: &SearchConfig,
    ) -> LatticeResult<MotionTable> {
        if motion_model != MotionModelKind::StateLattice {
            return Err(LatticeError::Configuration(
                "Invalid motion model for Lattice node. Please select StateLattice \
                 and provide a valid lattice file."
                    .to_string(),
            ));
        }
        MotionTable::initialize(size_x, config)
    }

    /// Return to the unvisited state, keeping the index and allocation
    pub fn reset(&mut self) {
        *self.state.get_mut() = VertexState::default();
        self.validity.take();
        *self.visited.get_mut() = false;
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn pose(&self) -> Coordinates {
        self.state.lock().pose
    }

    pub fn set_pose(&self, pose: Coordinates) {
        self.state.lock().pose = pose;
    }

    pub fn accumulated_cost(&self) -> f64 {
        self.state.lock().accumulated_cost
    }

    pub fn set_accumulated_cost(&self, cost: f64) {
        self.state.lock().accumulated_cost = cost;
    }

    pub fn parent(&self) -> Option<u32> {
        self.state.lock().parent
    }

    pub fn set_parent(&self, parent: Option<u32>) {
        self.state.lock().parent = parent;
    }

    /// Primitive (index into `MotionTable::primitives`) that reached this vertex
    pub fn motion_primitive_index(&self) -> Option<usize> {
        self.state.lock().motion_primitive_index
    }

    pub fn set_motion_primitive_index(&self, index: usize) {
        self.state.lock().motion_primitive_index = Some(index);
    }

    pub fn was_visited(&self) -> bool {
        self.visited.load(Ordering::Acquire)
    }

    /// Mark as expanded by the search
    pub fn visited(&self) {
        self.visited.store(true, Ordering::Release);
    }

    /// Cached collision outcome, if the vertex has been checked
    pub fn validity(&self) -> Option<Validity> {
        self.validity.get().copied()
    }

    /// Cached traversal cost of the cell, present only for checked, free vertices
    pub fn cell_cost(&self) -> Option<f64> {
        match self.validity.get() {
            Some(Validity::Free { cost }) => Some(*cost),
            _ => None,
        }
    }

    /// Collision-check the current pose once and memoize the result
    pub fn is_valid(
        &self,
        traverse_unknown: bool,
        collision_checker: &mut dyn CollisionChecker,
        table: &MotionTable,
    ) -> bool {
        let validity = self.validity.get_or_init(|| {
            let pose = self.pose();
            if collision_checker.in_collision(
                pose.x,
                pose.y,
                pose.theta * table.bin_size(),
                traverse_unknown,
            ) {
                Validity::Blocked
            } else {
                Validity::Free { cost: collision_checker.cost() }
            }
        });
        matches!(validity, Validity::Free { .. })
    }

    /// Valid, unvisited successors reachable through the primitives of this heading
    pub fn get_neighbors<'a, F>(
        &self,
        table: &MotionTable,
        mut neighbor_getter: F,
        collision_checker: &mut dyn CollisionChecker,
        traverse_unknown: bool,
    ) -> LatticeResult<Vec<&'a LatticeVertex>>
    where
        F: FnMut(u32) -> Option<&'a LatticeVertex>,
    {
        let origin = self.pose();
        let bin = table.bin(origin.theta)?;
        let mut neighbors = Vec::with_capacity(bin.len());

        for projection in bin {
            let pose = table.project(&origin, projection);
            let Some(index) = table.index(pose.x, pose.y, pose.theta) else {
                continue;
            };
            // A short primitive can end in the cell it started from
            if index == self.index {
                continue;
            }
            let Some(neighbor) = neighbor_getter(index) else {
                continue;
            };
            if neighbor.was_visited() {
                continue;
            }
            // Poses are exact bin increments, but stay continuous for backtracing
            neighbor.set_pose(pose.into());
            if neighbor.is_valid(traverse_unknown, collision_checker, table) {
                neighbor.set_motion_primitive_index(projection.primitive);
                neighbors.push(neighbor);
            }
        }

        trace!("Vertex {} expanded into {} neighbors", self.index, neighbors.len());
        Ok(neighbors)
    }

    /// Cost of moving from this vertex to `child`. Never negative.
    pub fn get_traversal_cost(&self, table: &MotionTable, child: &LatticeVertex) -> f64 {
        let normalized_cost =
            (child.cell_cost().unwrap_or(0.0) / MAX_NON_OBSTACLE_COST).clamp(0.0, 1.0);
        let occupancy_factor = 1.0 + table.cost_penalty() * normalized_cost;

        let Some(primitive) = child.motion_primitive_index().and_then(|i| table.primitive(i)) else {
            return table.metadata().step_distance.max(0.0) * occupancy_factor;
        };

        // Library lengths share the unit of the projected offsets
        let mut cost = primitive.length() * occupancy_factor;

        let turn = primitive.turn();
        if turn != Turn::Straight {
            let parent_turn = self
                .motion_primitive_index()
                .and_then(|i| table.primitive(i))
                .map(|p| p.turn());
            let direction_change = matches!(
                (parent_turn, turn),
                (Some(Turn::Left), Turn::Right) | (Some(Turn::Right), Turn::Left)
            );
            cost *= if direction_change {
                table.non_straight_penalty() + table.change_penalty()
            } else {
                table.non_straight_penalty()
            };
        }

        if primitive.is_reverse() {
            cost *= table.reverse_penalty();
        }

        cost.max(0.0)
    }

    /// Admissible estimate of the remaining cost: the larger of the two lower bounds
    pub fn get_heuristic_cost<H>(
        table: &MotionTable,
        node_coords: &Coordinates,
        goal_coords: &Coordinates,
        obstacle_heuristic: &H,
    ) -> f64
    where
        H: ObstacleHeuristic + ?Sized,
    {
        let obstacle = obstacle_heuristic.obstacle_heuristic(node_coords, goal_coords);
        let distance = Self::get_distance_heuristic(table, node_coords, goal_coords, obstacle);
        obstacle.max(distance)
    }

    /// Kinematic lower bound ignoring obstacles.
    ///
    /// Near the goal the precomputed table answers; elsewhere the analytic
    /// curve distance is only evaluated while no obstacle heuristic is available.
    pub fn get_distance_heuristic(
        table: &MotionTable,
        node_coords: &Coordinates,
        goal_coords: &Coordinates,
        obstacle_heuristic: f64,
    ) -> f64 {
        let n = table.num_headings() as f64;
        let bin_size = table.bin_size();

        // Goal moved to the origin with zero heading. Rounding to whole cells
        // keeps the error under a cell.
        let relative = node_coords.relative_to(goal_coords, goal_coords.theta * bin_size);
        let rel_x = relative.x.round() as i32;
        let rel_y = relative.y.round() as i32;
        let mut rel_theta = (node_coords.theta - goal_coords.theta).rem_euclid(n).round();
        if rel_theta >= n {
            rel_theta -= n;
        }

        if let Some(lookup) = table.distance_heuristic_table() {
            if let Some(value) = lookup.lookup(rel_x, rel_y, rel_theta as u32) {
                return value;
            }
        }

        if obstacle_heuristic == 0.0 {
            return table.curve_distance().distance(
                (node_coords.x, node_coords.y, node_coords.theta * bin_size),
                (goal_coords.x, goal_coords.y, goal_coords.theta * bin_size),
            );
        }

        0.0
    }
}
