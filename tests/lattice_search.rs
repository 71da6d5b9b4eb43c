// Lattice A* over a vertex pool, driven only through the public vertex API

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use state_lattice_graph::common::{Coordinates, LatticeResult};
use state_lattice_graph::path_planning::state_lattice::{
    primitive_parser, LatticeVertex, MotionTable, SearchConfig, VertexPool,
};
use state_lattice_graph::utils::grid_map::LETHAL_OBSTACLE;
use state_lattice_graph::utils::OccupancyGrid;

const LIBRARY: &str = include_str!("data/four_heading_lattice.json");
const GRID_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy)]
struct NodeWithPriority {
    index: u32,
    priority: f64,
}

impl Eq for NodeWithPriority {}

impl PartialEq for NodeWithPriority {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Ord for NodeWithPriority {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other.priority.partial_cmp(&self.priority).unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for NodeWithPriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn no_obstacles(_: &Coordinates, _: &Coordinates) -> f64 {
    0.0
}

fn table() -> MotionTable {
    let (metadata, primitives) = primitive_parser::parse_str(LIBRARY).unwrap();
    MotionTable::from_library(GRID_SIZE, &SearchConfig::default(), metadata, primitives).unwrap()
}

fn plan(
    table: &MotionTable,
    pool: &mut VertexPool,
    grid: &mut OccupancyGrid,
    start: Coordinates,
    goal: Coordinates,
) -> LatticeResult<Option<(Vec<Coordinates>, f64)>> {
    pool.reset_all();
    let pool = &*pool;

    let (Some(start_index), Some(goal_index)) = (
        table.index(start.x, start.y, start.theta),
        table.index(goal.x, goal.y, goal.theta),
    ) else {
        return Ok(None);
    };
    let Some(start_vertex) = pool.get(start_index) else {
        return Ok(None);
    };
    start_vertex.set_pose(start);
    start_vertex.set_accumulated_cost(0.0);
    if !start_vertex.is_valid(false, grid, table) {
        return Ok(None);
    }

    let mut open_set = BinaryHeap::new();
    open_set.push(NodeWithPriority { index: start_index, priority: 0.0 });

    while let Some(NodeWithPriority { index, .. }) = open_set.pop() {
        let Some(current) = pool.get(index) else {
            continue;
        };
        if current.was_visited() {
            continue;
        }
        current.visited();

        if index == goal_index {
            return Ok(Some((pool.backtrace(index), current.accumulated_cost())));
        }

        for neighbor in current.get_neighbors(table, |i| pool.get(i), grid, false)? {
            let g = current.accumulated_cost() + current.get_traversal_cost(table, neighbor);
            if g < neighbor.accumulated_cost() {
                neighbor.set_accumulated_cost(g);
                neighbor.set_parent(Some(index));
                let h = LatticeVertex::get_heuristic_cost(table, &neighbor.pose(), &goal, &no_obstacles);
                open_set.push(NodeWithPriority { index: neighbor.index(), priority: g + h });
            }
        }
    }

    Ok(None)
}

/// Two cells thick so no primitive can hop across it
fn walled_grid() -> OccupancyGrid {
    let mut grid = OccupancyGrid::free(GRID_SIZE as usize, GRID_SIZE as usize);
    for x in 8..=9 {
        for y in 5..GRID_SIZE as usize {
            grid.set_cost(x, y, LETHAL_OBSTACLE);
        }
    }
    grid
}

#[test]
fn test_straight_run_on_free_grid() {
    let table = table();
    let mut pool = VertexPool::for_grid(&table, GRID_SIZE);
    let mut grid = OccupancyGrid::free(GRID_SIZE as usize, GRID_SIZE as usize);

    let (path, cost) = plan(
        &table,
        &mut pool,
        &mut grid,
        Coordinates::new(2.0, 2.0, 0.0),
        Coordinates::new(12.0, 2.0, 0.0),
    )
    .unwrap()
    .expect("free grid must have a path");

    assert_eq!(path.len(), 6);
    assert_eq!(path.first(), Some(&Coordinates::new(2.0, 2.0, 0.0)));
    assert_eq!(path.last(), Some(&Coordinates::new(12.0, 2.0, 0.0)));
    assert!((cost - 10.0).abs() < 1e-9);
}

#[test]
fn test_detour_around_wall() {
    let table = table();
    let mut pool = VertexPool::for_grid(&table, GRID_SIZE);
    let mut grid = walled_grid();
    let start = Coordinates::new(2.0, 12.0, 0.0);
    let goal = Coordinates::new(13.0, 12.0, 1.0);

    let (path, cost) = plan(&table, &mut pool, &mut grid, start, goal)
        .unwrap()
        .expect("passage below the wall must be found");

    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    assert!(cost.is_finite() && cost > 11.0);
    for pose in &path {
        assert!(grid[(pose.x as usize, pose.y as usize)] < LETHAL_OBSTACLE);
        assert!(pose.x < 8.0 || pose.x > 9.0 || pose.y < 5.0);
    }
    // The only way past is under the wall
    assert!(path.iter().any(|pose| pose.y < 5.0));
}

#[test]
fn test_enclosed_goal_is_unreachable_and_pool_is_reusable() {
    let table = table();
    let mut pool = VertexPool::for_grid(&table, GRID_SIZE);
    let start = Coordinates::new(2.0, 2.0, 0.0);
    let goal = Coordinates::new(12.0, 2.0, 0.0);

    let mut enclosed = OccupancyGrid::free(GRID_SIZE as usize, GRID_SIZE as usize);
    for x in 9..=15 {
        for y in 0..=5 {
            if (11..=13).contains(&x) && (1..=3).contains(&y) {
                continue;
            }
            enclosed.set_cost(x, y, LETHAL_OBSTACLE);
        }
    }
    assert!(plan(&table, &mut pool, &mut enclosed, start, goal).unwrap().is_none());

    // Cached validity from the first search must not leak into the second
    let mut free = OccupancyGrid::free(GRID_SIZE as usize, GRID_SIZE as usize);
    let (_, cost) = plan(&table, &mut pool, &mut free, start, goal).unwrap().unwrap();
    assert!((cost - 10.0).abs() < 1e-9);
}
