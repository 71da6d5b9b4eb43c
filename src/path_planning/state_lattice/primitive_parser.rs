//! Motion primitive library loader
//!
//! Reads the JSON document produced by the lattice primitive generator:
//!
//! ```json
//! {
//!   "latticeMetadata": { "turningRadius": 0.4, "numberOfHeadings": 16, ... },
//!   "primitives": [ { "trajectoryId": 0, "startAngle": 0.0, "poses": [[0, 0, 0], ...] }, ... ]
//! }
//! ```

use std::f64::consts::PI;
use std::ops::Range;
use std::path::Path;

use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Deserializer};

use crate::common::{LatticeError, LatticeResult, MotionPose};

/// Primitives shorter than this arc length count as straight
const STRAIGHT_ARC_EPSILON: f64 = 1e-3;

/// Library-wide properties of a primitive set
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatticeMetadata {
    /// Minimum turning radius [m]
    pub turning_radius: f64,
    /// Distance between consecutive poses of a primitive [m]
    pub step_distance: f64,
    /// Grid cell size the primitives were generated for [m]
    pub grid_separation: f64,
    /// Longest primitive in the library [m]
    pub max_length: f64,
    pub number_of_headings: u32,
    pub output_file: String,
    /// Heading bins [deg]
    pub heading_angles: Vec<f64>,
    pub number_of_trajectories: u32,
}

/// One precomputed, kinematically feasible path segment
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub trajectory_id: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    pub radius: f64,
    pub trajectory_length: f64,
    pub arc_length: f64,
    pub straight_length: f64,
    #[serde(deserialize_with = "deserialize_poses")]
    pub poses: Vec<MotionPose>,
}

/// Turning direction of a primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Straight,
    Left,
    Right,
}

impl Primitive {
    /// Last sampled pose, relative to the primitive origin
    pub fn terminal_pose(&self) -> Option<&MotionPose> {
        self.poses.last()
    }

    /// Path length, falling back to the sampled polyline when the stored length is zero
    pub fn length(&self) -> f64 {
        if self.trajectory_length > 0.0 {
            return self.trajectory_length;
        }
        self.poses
            .iter()
            .tuple_windows()
            .map(|(a, b)| ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt())
            .sum()
    }

    pub fn turn(&self) -> Turn {
        if self.arc_length.abs() < STRAIGHT_ARC_EPSILON {
            return Turn::Straight;
        }
        let (Some(first), Some(last)) = (self.poses.first(), self.poses.last()) else {
            return Turn::Straight;
        };
        let delta = normalize_angle(last.theta - first.theta);
        if delta > 0.0 {
            Turn::Left
        } else if delta < 0.0 {
            Turn::Right
        } else {
            Turn::Straight
        }
    }

    /// True when the first move goes against the starting heading
    pub fn is_reverse(&self) -> bool {
        let Some(origin) = self.poses.first() else {
            return false;
        };
        self.poses
            .iter()
            .skip(1)
            .map(|p| (p.x - origin.x, p.y - origin.y))
            .find(|(dx, dy)| dx.abs() > f64::EPSILON || dy.abs() > f64::EPSILON)
            .map_or(false, |(dx, dy)| dx * origin.theta.cos() + dy * origin.theta.sin() < 0.0)
    }
}

/// Normalize angle to [-PI, PI]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a < -PI {
        a += 2.0 * PI;
    }
    a
}

fn deserialize_poses<'de, D>(deserializer: D) -> Result<Vec<MotionPose>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<f64>> = Vec::deserialize(deserializer)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, pose)| match pose.as_slice() {
            [x, y, theta, ..] => Ok(MotionPose::new(*x, *y, *theta)),
            _ => Err(serde::de::Error::custom(format!(
                "pose {} has {} components, expected [x, y, theta]",
                i,
                pose.len()
            ))),
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatticeDocument {
    lattice_metadata: LatticeMetadata,
    primitives: Vec<Primitive>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataDocument {
    lattice_metadata: LatticeMetadata,
}

fn read_document(path: &Path) -> LatticeResult<String> {
    std::fs::read_to_string(path).map_err(|source| LatticeError::File {
        path: path.to_path_buf(),
        source,
    })
}

fn validate_metadata(metadata: &LatticeMetadata) -> LatticeResult<()> {
    if metadata.number_of_headings == 0 {
        return Err(LatticeError::Format(
            "numberOfHeadings must be positive".to_string(),
        ));
    }
    if metadata.heading_angles.len() != metadata.number_of_headings as usize {
        return Err(LatticeError::Format(format!(
            "headingAngles has {} entries but numberOfHeadings is {}",
            metadata.heading_angles.len(),
            metadata.number_of_headings
        )));
    }
    Ok(())
}

/// Parse a primitive library document held in memory
pub fn parse_str(document: &str) -> LatticeResult<(LatticeMetadata, Vec<Primitive>)> {
    let doc: LatticeDocument = serde_json::from_str(document)?;
    validate_metadata(&doc.lattice_metadata)?;

    if let Some(p) = doc.primitives.iter().find(|p| p.poses.is_empty()) {
        return Err(LatticeError::Format(format!(
            "primitive {} has no poses",
            p.trajectory_id
        )));
    }

    if doc.primitives.len() != doc.lattice_metadata.number_of_trajectories as usize {
        warn!(
            "numberOfTrajectories is {} but the library holds {} primitives",
            doc.lattice_metadata.number_of_trajectories,
            doc.primitives.len()
        );
    }

    debug!("Parsed {} motion primitives", doc.primitives.len());
    Ok((doc.lattice_metadata, doc.primitives))
}

/// Parse a primitive library file into metadata and primitives in source order
pub fn parse(path: impl AsRef<Path>) -> LatticeResult<(LatticeMetadata, Vec<Primitive>)> {
    let document = read_document(path.as_ref())?;
    parse_str(&document)
}

/// Read only the metadata section of a primitive library file
pub fn parse_metadata(path: impl AsRef<Path>) -> LatticeResult<LatticeMetadata> {
    let document = read_document(path.as_ref())?;
    let doc: MetadataDocument = serde_json::from_str(&document)?;
    validate_metadata(&doc.lattice_metadata)?;
    Ok(doc.lattice_metadata)
}

/// Contiguous runs of primitives sharing exactly the same start angle.
///
/// A start angle may appear in more than one run if the library is not sorted.
pub fn start_angle_runs(primitives: &[Primitive]) -> Vec<(f64, Range<usize>)> {
    let groups = primitives
        .iter()
        .enumerate()
        .group_by(|(_, p)| OrderedFloat(p.start_angle));

    let runs = groups
        .into_iter()
        .filter_map(|(angle, run)| {
            let indices: Vec<usize> = run.map(|(i, _)| i).collect();
            let first = *indices.first()?;
            let last = *indices.last()?;
            Some((angle.into_inner(), first..last + 1))
        })
        .collect();
    runs
}
