//! Common traits defining the collaborators a lattice search consumes

use crate::common::types::*;

/// Footprint collision query against an occupancy grid
pub trait CollisionChecker {
    /// Check the footprint at cell coordinates `(x, y)` and heading `theta` [rad]
    fn in_collision(&mut self, x: f64, y: f64, theta: f64, traverse_unknown: bool) -> bool;

    /// Cost of the cell checked by the most recent `in_collision` call
    fn cost(&self) -> f64;
}

/// Obstacle-aware lower bound on the remaining cost to the goal
pub trait ObstacleHeuristic {
    fn obstacle_heuristic(&self, node: &Coordinates, goal: &Coordinates) -> f64;
}

impl<F> ObstacleHeuristic for F
where
    F: Fn(&Coordinates, &Coordinates) -> f64,
{
    fn obstacle_heuristic(&self, node: &Coordinates, goal: &Coordinates) -> f64 {
        self(node, goal)
    }
}

/// Analytic shortest-path length between two full poses
pub trait CurveDistance: Send + Sync {
    /// Length of the shortest feasible curve from `from` to `to`.
    ///
    /// Poses are `(x, y, yaw)` with yaw in radians.
    fn distance(&self, from: (f64, f64, f64), to: (f64, f64, f64)) -> f64;
}
