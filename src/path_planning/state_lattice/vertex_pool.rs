//! Preallocated vertex storage indexed by flattened lattice index

use log::debug;

use crate::common::Coordinates;

use super::lattice_node::LatticeVertex;
use super::motion_table::MotionTable;

/// One vertex per `(x, y, heading bin)` cell of the search grid
#[derive(Debug)]
pub struct VertexPool {
    vertices: Vec<LatticeVertex>,
}

impl VertexPool {
    pub fn new(size: u32) -> Self {
        Self { vertices: (0..size).map(LatticeVertex::new).collect() }
    }

    /// Pool covering a `size_x * size_y` grid at every heading of `table`
    pub fn for_grid(table: &MotionTable, size_y: u32) -> Self {
        Self::new(table.size_x() * size_y * table.num_headings())
    }

    pub fn get(&self, index: u32) -> Option<&LatticeVertex> {
        self.vertices.get(index as usize)
    }

    pub fn get_mut(&mut self, index: u32) -> Option<&mut LatticeVertex> {
        self.vertices.get_mut(index as usize)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Prepare every vertex for a new search
    pub fn reset_all(&mut self) {
        self.vertices.iter_mut().for_each(LatticeVertex::reset);
        debug!("Reset {} vertices", self.vertices.len());
    }

    /// Poses from the root of the search tree down to `index`
    pub fn backtrace(&self, index: u32) -> Vec<Coordinates> {
        let mut path = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            let Some(vertex) = self.get(i) else {
                break;
            };
            path.push(vertex.pose());
            // A parent chain longer than the pool must contain a cycle
            if path.len() > self.vertices.len() {
                break;
            }
            current = vertex.parent();
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_indices_match_vertex_indices() {
        let pool = VertexPool::new(16);
        assert_eq!(pool.len(), 16);
        assert!(pool.get(16).is_none());
        assert!((0..16).all(|i| pool.get(i).map(|v| v.index()) == Some(i)));
    }

    #[test]
    fn test_backtrace_follows_parents() {
        let pool = VertexPool::new(8);
        for (i, parent) in [(0, None), (3, Some(0)), (5, Some(3))] {
            let vertex = pool.get(i).unwrap();
            vertex.set_pose(Coordinates::new(i as f64, 0.0, 0.0));
            vertex.set_parent(parent);
        }
        let xs: Vec<f64> = pool.backtrace(5).iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![0.0, 3.0, 5.0]);
    }

    #[test]
    fn test_backtrace_stops_on_cycle() {
        let pool = VertexPool::new(4);
        pool.get(1).unwrap().set_parent(Some(2));
        pool.get(2).unwrap().set_parent(Some(1));
        assert!(pool.backtrace(1).len() <= 5);
    }

    #[test]
    fn test_reset_all() {
        let mut pool = VertexPool::new(4);
        pool.get(2).unwrap().visited();
        pool.get(2).unwrap().set_accumulated_cost(3.0);
        pool.reset_all();
        let vertex = pool.get(2).unwrap();
        assert!(!vertex.was_visited());
        assert_eq!(vertex.accumulated_cost(), f64::INFINITY);
    }
}
