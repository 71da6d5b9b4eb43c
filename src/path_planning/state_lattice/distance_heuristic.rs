//! Precomputed distance-heuristic lookup table
//!
//! Holds obstacle-free travel costs for goal-relative offsets inside a square
//! window centred on the goal. Only the half-plane `y >= 0` is stored; queries
//! with negative `y` are mirrored across the x-axis.

use crate::common::{LatticeError, LatticeResult};

#[derive(Debug, Clone)]
pub struct DistanceHeuristicTable {
    size_lookup: u32,
    num_headings: u32,
    values: Vec<f64>,
}

impl DistanceHeuristicTable {
    /// Wrap externally generated values laid out as `[x][y][theta]`,
    /// with `size_lookup` x entries, `ceil(size_lookup / 2)` y entries and
    /// `num_headings` theta entries.
    pub fn new(size_lookup: u32, num_headings: u32, values: Vec<f64>) -> LatticeResult<Self> {
        if size_lookup == 0 || num_headings == 0 {
            return Err(LatticeError::Configuration(
                "distance heuristic table needs a positive window and heading count".to_string(),
            ));
        }
        let expected = Self::capacity(size_lookup, num_headings);
        if values.len() != expected {
            return Err(LatticeError::Configuration(format!(
                "distance heuristic table holds {} values, expected {}",
                values.len(),
                expected
            )));
        }
        Ok(Self { size_lookup, num_headings, values })
    }

    /// Fill a table by evaluating `f(x, y, theta)` over every stored offset
    pub fn from_fn<F>(size_lookup: u32, num_headings: u32, mut f: F) -> LatticeResult<Self>
    where
        F: FnMut(i32, i32, u32) -> f64,
    {
        let floored = (size_lookup / 2) as i32;
        let ceiling = (size_lookup + 1) / 2;
        let mut values = Vec::with_capacity(Self::capacity(size_lookup, num_headings));
        for x_pos in 0..size_lookup as i32 {
            for y in 0..ceiling as i32 {
                for theta in 0..num_headings {
                    values.push(f(x_pos - floored, y, theta));
                }
            }
        }
        Self::new(size_lookup, num_headings, values)
    }

    fn capacity(size_lookup: u32, num_headings: u32) -> usize {
        size_lookup as usize * ((size_lookup as usize + 1) / 2) * num_headings as usize
    }

    pub fn size_lookup(&self) -> u32 {
        self.size_lookup
    }

    pub fn num_headings(&self) -> u32 {
        self.num_headings
    }

    fn floored_size(&self) -> i32 {
        (self.size_lookup / 2) as i32
    }

    fn ceiling_size(&self) -> usize {
        (self.size_lookup as usize + 1) / 2
    }

    /// True when a goal-relative offset lies inside the lookup window
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let half = self.floored_size();
        x.abs() < half && y.abs() < half
    }

    /// Value for a goal-relative offset, or `None` outside the window.
    ///
    /// `theta` is the heading difference in bins and must lie in `[0, num_headings)`.
    pub fn lookup(&self, x: i32, y: i32, theta: u32) -> Option<f64> {
        if !self.contains(x, y) || theta >= self.num_headings {
            return None;
        }
        let n = self.num_headings;
        let theta_pos = if y < 0 { (n - theta) % n } else { theta };
        let x_pos = (x + self.floored_size()) as usize;
        let y_pos = y.unsigned_abs() as usize;
        let index = x_pos * self.ceiling_size() * n as usize + y_pos * n as usize + theta_pos as usize;
        self.values.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(size: u32, headings: u32) -> DistanceHeuristicTable {
        // Each entry encodes its own offset so lookups can be traced back
        DistanceHeuristicTable::from_fn(size, headings, |x, y, theta| {
            (x * 10_000 + y * 100) as f64 + theta as f64
        })
        .unwrap()
    }

    #[test]
    fn test_size_checked() {
        assert!(DistanceHeuristicTable::new(5, 4, vec![0.0; 5 * 3 * 4]).is_ok());
        assert!(DistanceHeuristicTable::new(5, 4, vec![0.0; 10]).is_err());
        assert!(DistanceHeuristicTable::new(0, 4, vec![]).is_err());
    }

    #[test]
    fn test_window_bounds() {
        let table = encoded(21, 16);
        assert!(table.contains(0, 0));
        assert!(table.contains(9, -9));
        assert!(!table.contains(10, 0));
        assert!(!table.contains(0, -10));
        assert_eq!(table.lookup(10, 0, 0), None);
        assert_eq!(table.lookup(0, 0, 16), None);
    }

    #[test]
    fn test_positive_half_plane_lookup() {
        let table = encoded(21, 16);
        assert_eq!(table.lookup(-3, 4, 5), Some(-30_000.0 + 400.0 + 5.0));
    }

    #[test]
    fn test_mirrored_lookup() {
        let table = encoded(21, 16);
        assert_eq!(table.lookup(2, -4, 5), table.lookup(2, 4, 11));
        // A zero heading mirrors onto itself instead of running past the last bin
        assert_eq!(table.lookup(2, -4, 0), Some(20_000.0 + 400.0));
    }
}
