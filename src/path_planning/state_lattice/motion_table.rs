//! Lattice motion table
//!
//! Shared, read-only context for a lattice search: the loaded primitive
//! library, the start-heading → terminal-projection index used to generate
//! successors, the penalty weights used for edge costs, and the analytic
//! curve-distance oracle used by the distance heuristic.
//!
//! A table is built once per planning configuration and handed to every
//! vertex operation by reference. Reconfiguring means building a new table.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::common::{
    Coordinates, CurveDistance, CurveKind, GeometryWarning, LatticeError, LatticeResult,
    MotionPose, MotionPoses,
};
use crate::path_planning::{Dubins, ReedsShepp};

use super::distance_heuristic::DistanceHeuristicTable;
use super::primitive_parser::{self, LatticeMetadata, Primitive};

/// What to do with projected headings that leave `[0, number_of_headings)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeadingWrap {
    /// Wrap into `[0, number_of_headings)`
    #[default]
    Canonical,
    /// Keep the raw sum and log a geometry warning
    Preserve,
}

/// Search parameters consumed by the motion table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Primitive library file
    pub lattice_filepath: PathBuf,
    /// Added to the turning multiplier when the turn direction flips
    pub change_penalty: f64,
    /// Multiplier for turning primitives
    pub non_straight_penalty: f64,
    /// Multiplier for primitives driven in reverse
    pub reverse_penalty: f64,
    /// Weight of the normalized cell cost
    pub cost_penalty: f64,
    /// Permit expansion through unknown cells
    pub allow_unknown: bool,
    /// Kinematics of the analytic curve-distance oracle
    pub curve_kind: CurveKind,
    pub heading_wrap: HeadingWrap,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lattice_filepath: PathBuf::new(),
            change_penalty: 0.05,
            non_straight_penalty: 1.05,
            reverse_penalty: 2.1,
            cost_penalty: 2.0,
            allow_unknown: true,
            curve_kind: CurveKind::ForwardOnly,
            heading_wrap: HeadingWrap::Canonical,
        }
    }
}

impl SearchConfig {
    fn validate(&self) -> LatticeResult<()> {
        let additive = [("change_penalty", self.change_penalty), ("cost_penalty", self.cost_penalty)];
        for (name, value) in additive {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LatticeError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        // Multipliers must not shrink an edge below its own length
        let multipliers = [
            ("non_straight_penalty", self.non_straight_penalty),
            ("reverse_penalty", self.reverse_penalty),
        ];
        for (name, value) in multipliers {
            if !(value.is_finite() && value >= 1.0) {
                return Err(LatticeError::Configuration(format!(
                    "{} must be a number >= 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Terminal pose of a primitive relative to its origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProjection {
    pub dx: f64,
    pub dy: f64,
    pub dtheta: f64,
    /// Index into `MotionTable::primitives`
    pub primitive: usize,
}

pub struct MotionTable {
    size_x: u32,
    num_headings: u32,
    bin_size: f64,
    change_penalty: f64,
    non_straight_penalty: f64,
    reverse_penalty: f64,
    cost_penalty: f64,
    allow_unknown: bool,
    heading_wrap: HeadingWrap,
    min_turning_radius: f64,
    lattice_filepath: PathBuf,
    metadata: LatticeMetadata,
    primitives: Vec<Primitive>,
    projections: BTreeMap<OrderedFloat<f64>, Vec<MotionProjection>>,
    curve: Box<dyn CurveDistance>,
    distance_table: Option<DistanceHeuristicTable>,
}

impl MotionTable {
    /// Load `config.lattice_filepath` and index its primitives by start heading
    pub fn initialize(size_x: u32, config: &SearchConfig) -> LatticeResult<Self> {
        let (metadata, primitives) = primitive_parser::parse(&config.lattice_filepath)?;
        Self::from_library(size_x, config, metadata, primitives)
    }

    /// Build a table from an already parsed library
    pub fn from_library(
        size_x: u32,
        config: &SearchConfig,
        metadata: LatticeMetadata,
        primitives: Vec<Primitive>,
    ) -> LatticeResult<Self> {
        if size_x == 0 {
            return Err(LatticeError::Configuration(
                "grid width must be positive".to_string(),
            ));
        }
        config.validate()?;

        let mut projections: BTreeMap<OrderedFloat<f64>, Vec<MotionProjection>> = BTreeMap::new();
        for (start_angle, run) in primitive_parser::start_angle_runs(&primitives) {
            let bin = projections.entry(OrderedFloat(start_angle)).or_default();
            if !bin.is_empty() {
                debug!("Start angle {} reappears, extending its bin", start_angle);
            }
            for i in run {
                let primitive = &primitives[i];
                let terminal = primitive.terminal_pose().ok_or_else(|| {
                    LatticeError::Format(format!(
                        "primitive {} has no poses",
                        primitive.trajectory_id
                    ))
                })?;
                bin.push(MotionProjection {
                    dx: terminal.x,
                    dy: terminal.y,
                    dtheta: primitive.end_angle,
                    primitive: i,
                });
            }
        }

        let num_headings = metadata.number_of_headings;
        // Offsets are added to search coordinates as-is, so the radius is used as-is too
        let min_turning_radius = metadata.turning_radius;
        let curve: Box<dyn CurveDistance> = match config.curve_kind {
            CurveKind::ForwardOnly => Box::new(Dubins::new(min_turning_radius)),
            CurveKind::ForwardReverse => Box::new(ReedsShepp::new(min_turning_radius)),
        };

        info!(
            "Motion table ready: {} primitives in {} heading bins from {}",
            primitives.len(),
            projections.len(),
            config.lattice_filepath.display()
        );

        Ok(Self {
            size_x,
            num_headings,
            bin_size: 2.0 * PI / num_headings as f64,
            change_penalty: config.change_penalty,
            non_straight_penalty: config.non_straight_penalty,
            reverse_penalty: config.reverse_penalty,
            cost_penalty: config.cost_penalty,
            allow_unknown: config.allow_unknown,
            heading_wrap: config.heading_wrap,
            min_turning_radius,
            lattice_filepath: config.lattice_filepath.clone(),
            metadata,
            primitives,
            projections,
            curve,
            distance_table: None,
        })
    }

    /// Attach the precomputed distance-heuristic table
    pub fn set_distance_heuristic_table(&mut self, table: DistanceHeuristicTable) -> LatticeResult<()> {
        if table.num_headings() != self.num_headings {
            return Err(LatticeError::Configuration(format!(
                "distance heuristic table has {} headings, library has {}",
                table.num_headings(),
                self.num_headings
            )));
        }
        self.distance_table = Some(table);
        Ok(())
    }

    /// Replace the analytic curve-distance oracle
    pub fn set_curve_distance(&mut self, curve: Box<dyn CurveDistance>) {
        self.curve = curve;
    }

    /// Projections recorded for an exact start heading
    pub fn bin(&self, heading: f64) -> LatticeResult<&[MotionProjection]> {
        self.projections
            .get(&OrderedFloat(heading))
            .map(Vec::as_slice)
            .ok_or(LatticeError::Lookup { heading })
    }

    /// Absolute successor poses of `origin`, one per primitive starting at its heading
    pub fn get_projections(&self, origin: &Coordinates) -> LatticeResult<MotionPoses> {
        Ok(self
            .bin(origin.theta)?
            .iter()
            .map(|projection| self.project(origin, projection))
            .collect())
    }

    pub(crate) fn project(&self, origin: &Coordinates, projection: &MotionProjection) -> MotionPose {
        let heading = self.wrap_heading(origin.theta + projection.dtheta);
        MotionPose::new(origin.x + projection.dx, origin.y + projection.dy, heading)
    }

    fn wrap_heading(&self, heading: f64) -> f64 {
        let n = self.num_headings as f64;
        match self.heading_wrap {
            HeadingWrap::Canonical => {
                let wrapped = heading.rem_euclid(n);
                // rem_euclid may round a tiny negative up to n itself
                if wrapped >= n {
                    0.0
                } else {
                    wrapped
                }
            }
            HeadingWrap::Preserve => {
                if !(0.0..n).contains(&heading) {
                    warn!(
                        "{}",
                        GeometryWarning {
                            heading,
                            number_of_headings: self.num_headings,
                        }
                    );
                }
                heading
            }
        }
    }

    /// Read only the metadata section of a library file
    pub fn get_library_metadata(path: impl AsRef<Path>) -> LatticeResult<LatticeMetadata> {
        primitive_parser::parse_metadata(path)
    }

    /// Flattened vertex index, or `None` when the coordinates fall off the grid
    pub fn index(&self, x: f64, y: f64, theta: f64) -> Option<u32> {
        if x < 0.0 || y < 0.0 || theta < 0.0 {
            return None;
        }
        let (ix, iy, it) = (x.floor() as u64, y.floor() as u64, theta.floor() as u64);
        let n = self.num_headings as u64;
        if ix >= self.size_x as u64 || it >= n {
            return None;
        }
        let index = it + ix * n + iy * self.size_x as u64 * n;
        u32::try_from(index).ok()
    }

    /// Grid coordinates `(x, y, heading bin)` of a flattened index
    pub fn coordinates(&self, index: u32) -> (u32, u32, u32) {
        let n = self.num_headings;
        let theta = index % n;
        let cell = index / n;
        (cell % self.size_x, cell / self.size_x, theta)
    }

    /// Start headings that have at least one primitive, in ascending order
    pub fn heading_bins(&self) -> Vec<f64> {
        self.projections.keys().map(|k| k.into_inner()).collect()
    }

    pub fn metadata(&self) -> &LatticeMetadata {
        &self.metadata
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive(&self, index: usize) -> Option<&Primitive> {
        self.primitives.get(index)
    }

    pub fn heading_angles(&self) -> &[f64] {
        &self.metadata.heading_angles
    }

    pub fn lattice_filepath(&self) -> &Path {
        &self.lattice_filepath
    }

    pub fn num_headings(&self) -> u32 {
        self.num_headings
    }

    /// Width of one heading bin [rad]
    pub fn bin_size(&self) -> f64 {
        self.bin_size
    }

    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Minimum turning radius, in the library's length unit
    pub fn min_turning_radius(&self) -> f64 {
        self.min_turning_radius
    }

    pub fn allow_unknown(&self) -> bool {
        self.allow_unknown
    }

    pub fn change_penalty(&self) -> f64 {
        self.change_penalty
    }

    pub fn non_straight_penalty(&self) -> f64 {
        self.non_straight_penalty
    }

    pub fn reverse_penalty(&self) -> f64 {
        self.reverse_penalty
    }

    pub fn cost_penalty(&self) -> f64 {
        self.cost_penalty
    }

    pub fn curve_distance(&self) -> &dyn CurveDistance {
        self.curve.as_ref()
    }

    pub fn distance_heuristic_table(&self) -> Option<&DistanceHeuristicTable> {
        self.distance_table.as_ref()
    }
}
