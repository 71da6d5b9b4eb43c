//! Common types used throughout state_lattice_graph

use nalgebra::{Rotation2, Vector2};

/// Continuous search coordinates: cell-space position and a heading bin.
///
/// `theta` is expressed in heading bins, not radians. It stays a float so
/// that projected poses can carry sub-bin values if a library requires it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Coordinates {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, theta: 0.0 }
    }

    pub fn position(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Express `self` in the frame of `frame`, whose heading is `frame_yaw` radians
    pub fn relative_to(&self, frame: &Coordinates, frame_yaw: f64) -> Vector2<f64> {
        Rotation2::new(-frame_yaw) * (self.position() - frame.position())
    }
}

/// Relative pose sample along a motion primitive
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionPose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl MotionPose {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

impl From<MotionPose> for Coordinates {
    fn from(pose: MotionPose) -> Self {
        Coordinates::new(pose.x, pose.y, pose.theta)
    }
}

/// Ordered sequence of motion poses
pub type MotionPoses = Vec<MotionPose>;

/// Motion model selected by the host planner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionModelKind {
    TwoD,
    Dubins,
    ReedsShepp,
    StateLattice,
}

/// Kinematic model used by the analytic curve-distance oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum CurveKind {
    /// Forward motion only (Dubins curves)
    #[default]
    ForwardOnly,
    /// Forward and reverse motion (Reeds-Shepp curves)
    ForwardReverse,
}
