// Reeds-Shepp curve distance
//
// Shortest path length between two poses for a vehicle that may drive
// forward and in reverse with a bounded turning radius.
// Path words follow Reeds & Shepp (1990) with the CCSC/CCSCC families
// added by Videh Patel for PythonRobotics.

use std::f64::consts::PI;

use crate::common::CurveDistance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steering {
    Left,
    Straight,
    Right,
}

use Steering::{Left as L, Right as R, Straight as S};

/// Candidate path in unit-curvature space. Negative lengths drive in reverse.
#[derive(Debug, Clone)]
pub struct ReedsSheppPath {
    pub lengths: Vec<f64>,
    pub steering: Vec<Steering>,
    pub total: f64,
}

impl ReedsSheppPath {
    fn new(lengths: Vec<f64>, steering: Vec<Steering>) -> Self {
        let total = lengths.iter().map(|l| l.abs()).sum();
        Self { lengths, steering, total }
    }

    pub fn has_reverse(&self) -> bool {
        self.lengths.iter().any(|&l| l < 0.0)
    }
}

type Word = fn(f64, f64, f64) -> Option<(Vec<f64>, Vec<Steering>)>;

fn mod2pi(x: f64) -> f64 {
    let v = x % (2.0 * PI);
    if v < -PI {
        v + 2.0 * PI
    } else if v > PI {
        v - 2.0 * PI
    } else {
        v
    }
}

fn polar(x: f64, y: f64) -> (f64, f64) {
    let r = (x * x + y * y).sqrt();
    let theta = y.atan2(x);
    (r, theta)
}

fn left_straight_left(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u, t) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if (0.0..=PI).contains(&t) {
        let v = mod2pi(phi - t);
        if (0.0..=PI).contains(&v) {
            return Some((vec![t, u, v], vec![L, S, L]));
        }
    }
    None
}

fn left_straight_right(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, t1) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u1_sq = u1 * u1;
    if u1_sq >= 4.0 {
        let u = (u1_sq - 4.0).sqrt();
        let theta = 2.0_f64.atan2(u);
        let t = mod2pi(t1 + theta);
        let v = mod2pi(t - phi);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, u, v], vec![L, S, R]));
        }
    }
    None
}

fn left_x_right_x_left(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 <= 4.0 {
        let a = (0.25 * u1).acos();
        let t = mod2pi(a + theta + PI / 2.0);
        let u = mod2pi(PI - 2.0 * a);
        let v = mod2pi(phi - t - u);
        return Some((vec![t, -u, v], vec![L, R, L]));
    }
    None
}

fn left_x_right_left(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 <= 4.0 {
        let a = (0.25 * u1).acos();
        let t = mod2pi(a + theta + PI / 2.0);
        let u = mod2pi(PI - 2.0 * a);
        let v = mod2pi(-phi + t + u);
        return Some((vec![t, -u, -v], vec![L, R, L]));
    }
    None
}

fn left_right_x_left(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 <= 4.0 {
        let u = (1.0 - u1 * u1 * 0.125).acos();
        let a = (2.0 * u.sin() / u1).asin();
        let t = mod2pi(-a + theta + PI / 2.0);
        let v = mod2pi(t - u - phi);
        return Some((vec![t, u, -v], vec![L, R, L]));
    }
    None
}

fn left_right_x_left_right(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 <= 2.0 {
        let a = ((u1 + 2.0) * 0.25).acos();
        let t = mod2pi(theta + a + PI / 2.0);
        let u = mod2pi(a);
        let v = mod2pi(phi - t + 2.0 * u);
        if t >= 0.0 && u >= 0.0 && v >= 0.0 {
            return Some((vec![t, u, -u, -v], vec![L, R, L, R]));
        }
    }
    None
}

fn left_x_right_left_x_right(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    let u2 = (20.0 - u1 * u1) / 16.0;
    if (0.0..=1.0).contains(&u2) {
        let u = u2.acos();
        let a = (2.0 * u.sin() / u1).asin();
        let t = mod2pi(theta + a + PI / 2.0);
        let v = mod2pi(t - phi);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, -u, -u, v], vec![L, R, L, R]));
        }
    }
    None
}

fn left_x_right90_straight_left(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 >= 2.0 {
        let u = (u1 * u1 - 4.0).sqrt() - 2.0;
        let a = 2.0_f64.atan2((u1 * u1 - 4.0).sqrt());
        let t = mod2pi(theta + a + PI / 2.0);
        let v = mod2pi(t - phi + PI / 2.0);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, -PI / 2.0, -u, -v], vec![L, R, S, L]));
        }
    }
    None
}

fn left_straight_right90_x_left(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x - phi.sin(), y - 1.0 + phi.cos());
    if u1 >= 2.0 {
        let u = (u1 * u1 - 4.0).sqrt() - 2.0;
        let a = (u1 * u1 - 4.0).sqrt().atan2(2.0);
        let t = mod2pi(theta - a + PI / 2.0);
        let v = mod2pi(t - phi - PI / 2.0);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, u, PI / 2.0, -v], vec![L, S, R, L]));
        }
    }
    None
}

fn left_x_right90_straight_right(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 >= 2.0 {
        let t = mod2pi(theta + PI / 2.0);
        let u = u1 - 2.0;
        let v = mod2pi(phi - t - PI / 2.0);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, -PI / 2.0, -u, -v], vec![L, R, S, R]));
        }
    }
    None
}

fn left_straight_left90_x_right(x: f64, y: f64, phi: f64) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 >= 2.0 {
        let t = mod2pi(theta);
        let u = u1 - 2.0;
        let v = mod2pi(phi - t - PI / 2.0);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, u, PI / 2.0, -v], vec![L, S, L, R]));
        }
    }
    None
}

fn left_x_right90_straight_left90_x_right(
    x: f64,
    y: f64,
    phi: f64,
) -> Option<(Vec<f64>, Vec<Steering>)> {
    let (u1, theta) = polar(x + phi.sin(), y - 1.0 - phi.cos());
    if u1 >= 4.0 {
        let u = (u1 * u1 - 4.0).sqrt() - 4.0;
        let a = 2.0_f64.atan2((u1 * u1 - 4.0).sqrt());
        let t = mod2pi(theta + a + PI / 2.0);
        let v = mod2pi(t - phi);
        if t >= 0.0 && v >= 0.0 {
            return Some((vec![t, -PI / 2.0, -u, -PI / 2.0, v], vec![L, R, S, L, R]));
        }
    }
    None
}

const WORDS: [Word; 12] = [
    left_straight_left,
    left_straight_right,
    left_x_right_x_left,
    left_x_right_left,
    left_right_x_left,
    left_right_x_left_right,
    left_x_right_left_x_right,
    left_x_right90_straight_left,
    left_x_right90_straight_right,
    left_straight_right90_x_left,
    left_straight_left90_x_right,
    left_x_right90_straight_left90_x_right,
];

fn timeflip(lengths: Vec<f64>) -> Vec<f64> {
    lengths.into_iter().map(|l| -l).collect()
}

fn reflect(steering: Vec<Steering>) -> Vec<Steering> {
    steering
        .into_iter()
        .map(|s| match s {
            L => R,
            R => L,
            S => S,
        })
        .collect()
}

/// All candidate paths from the origin to `(x, y, phi)` in unit-curvature space
pub fn candidate_paths(x: f64, y: f64, phi: f64) -> Vec<ReedsSheppPath> {
    let mut paths = Vec::new();

    for word in WORDS.iter() {
        if let Some((lengths, steering)) = word(x, y, phi) {
            paths.push(ReedsSheppPath::new(lengths, steering));
        }
        if let Some((lengths, steering)) = word(-x, y, -phi) {
            paths.push(ReedsSheppPath::new(timeflip(lengths), steering));
        }
        if let Some((lengths, steering)) = word(x, -y, -phi) {
            paths.push(ReedsSheppPath::new(lengths, reflect(steering)));
        }
        if let Some((lengths, steering)) = word(-x, -y, phi) {
            paths.push(ReedsSheppPath::new(timeflip(lengths), reflect(steering)));
        }
    }

    paths.retain(|p| p.total.is_finite());
    paths
}

/// Shortest path from `start` to `goal` (both `(x, y, yaw)`), lengths scaled back to world units
pub fn shortest_path(
    start: (f64, f64, f64),
    goal: (f64, f64, f64),
    turning_radius: f64,
) -> Option<ReedsSheppPath> {
    let max_curvature = 1.0 / turning_radius;
    let dx = goal.0 - start.0;
    let dy = goal.1 - start.1;
    let (c, s) = (start.2.cos(), start.2.sin());
    let x = (c * dx + s * dy) * max_curvature;
    let y = (-s * dx + c * dy) * max_curvature;
    let phi = goal.2 - start.2;

    let best = candidate_paths(x, y, phi)
        .into_iter()
        .min_by(|a, b| a.total.total_cmp(&b.total))?;

    Some(ReedsSheppPath {
        lengths: best.lengths.iter().map(|l| l * turning_radius).collect(),
        steering: best.steering,
        total: best.total * turning_radius,
    })
}

/// Forward/reverse curve-distance oracle
#[derive(Debug, Clone, Copy)]
pub struct ReedsShepp {
    pub turning_radius: f64,
}

impl ReedsShepp {
    pub fn new(turning_radius: f64) -> Self {
        Self { turning_radius }
    }
}

impl CurveDistance for ReedsShepp {
    fn distance(&self, from: (f64, f64, f64), to: (f64, f64, f64)) -> f64 {
        match shortest_path(from, to, self.turning_radius) {
            Some(path) => path.total,
            // Euclidean distance still bounds the curve length from below
            None => ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_ahead() {
        let rs = ReedsShepp::new(1.0);
        let d = rs.distance((0.0, 0.0, 0.0), (5.0, 0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_straight_behind_uses_reverse() {
        let path = shortest_path((0.0, 0.0, 0.0), (-3.0, 0.0, 0.0), 1.0).unwrap();
        assert!((path.total - 3.0).abs() < 1e-6);
        assert!(path.has_reverse());
    }

    #[test]
    fn test_same_pose_is_zero() {
        let rs = ReedsShepp::new(2.0);
        assert!(rs.distance((1.0, 2.0, 0.3), (1.0, 2.0, 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_distance_at_least_euclidean() {
        let rs = ReedsShepp::new(1.5);
        let goals = [(4.0, 3.0, 1.0), (-2.0, 5.0, -2.0), (0.5, -0.5, 3.0)];
        for g in goals {
            let d = rs.distance((0.0, 0.0, 0.0), g);
            let euclid = (g.0 * g.0 + g.1 * g.1).sqrt();
            assert!(d + 1e-9 >= euclid);
        }
    }

    #[test]
    fn test_scales_with_turning_radius() {
        let small = ReedsShepp::new(1.0).distance((0.0, 0.0, 0.0), (0.0, 2.0, PI));
        let large = ReedsShepp::new(2.0).distance((0.0, 0.0, 0.0), (0.0, 4.0, PI));
        assert!((large - 2.0 * small).abs() < 1e-6);
    }
}
