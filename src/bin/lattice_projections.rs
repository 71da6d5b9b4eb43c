//! Lattice projection inspector
//!
//! Loads a primitive library and prints its heading bins, the successors
//! of a sample origin, and the result of expanding that origin on a free grid.
//!
//! Usage: lattice_projections <lattice.json> [config.json]

use std::env;
use std::fs;
use std::process;

use log::{error, info};

use state_lattice_graph::common::{Coordinates, LatticeError, LatticeResult, MotionModelKind};
use state_lattice_graph::path_planning::state_lattice::{LatticeVertex, SearchConfig, VertexPool};
use state_lattice_graph::utils::OccupancyGrid;

const GRID_SIZE: u32 = 100;

fn load_config(args: &[String]) -> LatticeResult<SearchConfig> {
    let mut config = match args.get(2) {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|source| LatticeError::File { path: path.into(), source })?;
            serde_json::from_str(&text)?
        }
        None => SearchConfig::default(),
    };
    if let Some(library) = args.get(1) {
        config.lattice_filepath = library.into();
    }
    Ok(config)
}

fn run(args: &[String]) -> LatticeResult<()> {
    let config = load_config(args)?;
    let table = LatticeVertex::init_motion_model(MotionModelKind::StateLattice, GRID_SIZE, &config)?;

    println!("Lattice Projections");
    println!("===================\n");
    println!("Library: {}", table.lattice_filepath().display());
    println!(
        "Headings: {}, turning radius: {:.3}, grid separation: {}",
        table.num_headings(),
        table.min_turning_radius(),
        table.metadata().grid_separation
    );

    let center = (GRID_SIZE / 2) as f64;
    for heading in table.heading_bins() {
        let origin = Coordinates::new(center, center, heading);
        let projections = table.get_projections(&origin)?;
        println!("\nBin {} ({} primitives)", heading, projections.len());
        for pose in &projections {
            println!("  -> ({:.3}, {:.3}, {})", pose.x - center, pose.y - center, pose.theta);
        }
    }

    let pool = VertexPool::for_grid(&table, GRID_SIZE);
    let mut grid = OccupancyGrid::free(GRID_SIZE as usize, GRID_SIZE as usize);
    let Some(first_heading) = table.heading_bins().first().copied() else {
        return Ok(());
    };
    let Some(start) = table.index(center, center, first_heading).and_then(|i| pool.get(i)) else {
        return Ok(());
    };
    start.set_pose(Coordinates::new(center, center, first_heading));
    start.visited();

    let neighbors = start.get_neighbors(&table, |i| pool.get(i), &mut grid, table.allow_unknown())?;
    println!("\nExpanded vertex {} into {} neighbors", start.index(), neighbors.len());
    for neighbor in neighbors {
        println!(
            "  vertex {:>8}  cost {:.3}",
            neighbor.index(),
            start.get_traversal_cost(&table, neighbor)
        );
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: {} <lattice.json> [config.json]", args[0]);
        process::exit(2);
    }

    info!("Loading lattice library {}", args[1]);
    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
