// occupancy grid used as a collision checker for lattice expansion

use std::ops::Deref;
extern crate nalgebra as na;

use crate::common::CollisionChecker;

pub const FREE_SPACE: u8 = 0;
pub const INSCRIBED_INFLATED_OBSTACLE: u8 = 253;
pub const LETHAL_OBSTACLE: u8 = 254;
pub const NO_INFORMATION: u8 = 255;

/// Cost grid indexed as `(x, y)`: rows run along x, columns along y.
///
/// Collision checks treat the footprint as a single cell, which is enough
/// for exercising lattice expansion without a full footprint model.
pub struct OccupancyGrid {
    grid: na::DMatrix<u8>,
    last_cost: f64,
}

impl OccupancyGrid {
    pub fn new(costs: na::DMatrix<u8>) -> Self {
        Self { grid: costs, last_cost: 0.0 }
    }

    pub fn free(size_x: usize, size_y: usize) -> Self {
        Self::new(na::DMatrix::from_element(size_x, size_y, FREE_SPACE))
    }

    pub fn set_cost(&mut self, x: usize, y: usize, cost: u8) {
        self.grid[(x, y)] = cost;
    }

    pub fn size_x(&self) -> usize {
        self.grid.nrows()
    }

    pub fn size_y(&self) -> usize {
        self.grid.ncols()
    }

    fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let (ix, iy) = (x.floor() as usize, y.floor() as usize);
        if ix >= self.size_x() || iy >= self.size_y() {
            return None;
        }
        Some((ix, iy))
    }
}

impl CollisionChecker for OccupancyGrid {
    fn in_collision(&mut self, x: f64, y: f64, _theta: f64, traverse_unknown: bool) -> bool {
        let Some(cell) = self.cell(x, y) else {
            self.last_cost = LETHAL_OBSTACLE as f64;
            return true;
        };

        let cost = self.grid[cell];
        self.last_cost = cost as f64;

        match cost {
            NO_INFORMATION => !traverse_unknown,
            c => c >= INSCRIBED_INFLATED_OBSTACLE,
        }
    }

    fn cost(&self) -> f64 {
        self.last_cost
    }
}

impl Deref for OccupancyGrid {
    type Target = na::DMatrix<u8>;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_cell_reports_cost() {
        let mut grid = OccupancyGrid::free(10, 10);
        grid.set_cost(2, 3, 100);
        assert!(!grid.in_collision(2.5, 3.2, 0.0, false));
        assert_eq!(grid.cost(), 100.0);
    }

    #[test]
    fn test_lethal_and_out_of_bounds() {
        let mut grid = OccupancyGrid::free(4, 4);
        grid.set_cost(1, 1, LETHAL_OBSTACLE);
        assert!(grid.in_collision(1.0, 1.0, 0.0, false));
        assert!(grid.in_collision(-0.5, 1.0, 0.0, false));
        assert!(grid.in_collision(4.0, 0.0, 0.0, false));
    }

    #[test]
    fn test_unknown_traversal() {
        let mut grid = OccupancyGrid::free(4, 4);
        grid.set_cost(0, 0, NO_INFORMATION);
        assert!(grid.in_collision(0.0, 0.0, 0.0, false));
        assert!(!grid.in_collision(0.0, 0.0, 0.0, true));
    }
}
