//! Dubins curve distance
//!
//! Shortest forward-only path between two poses with a bounded turning
//! radius. Evaluates the six Dubins words (LSL, RSR, LSR, RSL, RLR, LRL)
//! in normalized coordinates and keeps the shortest.
//!
//! Reference: Shkel & Lumelsky, "Classification of the Dubins set" (2001)

use std::f64::consts::PI;

use crate::common::CurveDistance;

use super::reeds_shepp_path::Steering::{self, Left as L, Right as R, Straight as S};

const ANGLE_EPSILON: f64 = 1e-10;
/// Squared circle-centre distances below this are treated as zero
const DEGENERATE_EPSILON: f64 = 1e-10;

/// Wrap to [0, 2pi). Values a rounding error short of a full turn collapse to 0.
fn mod2pi(theta: f64) -> f64 {
    let v = theta.rem_euclid(2.0 * PI);
    if 2.0 * PI - v < ANGLE_EPSILON {
        0.0
    } else {
        v
    }
}

struct Trig {
    sin_a: f64,
    sin_b: f64,
    cos_a: f64,
    cos_b: f64,
    cos_ab: f64,
}

impl Trig {
    fn new(alpha: f64, beta: f64) -> Self {
        Self {
            sin_a: alpha.sin(),
            sin_b: beta.sin(),
            cos_a: alpha.cos(),
            cos_b: beta.cos(),
            cos_ab: (alpha - beta).cos(),
        }
    }
}

type Word = fn(f64, f64, f64, &Trig) -> Option<[f64; 3]>;

fn lsl(alpha: f64, beta: f64, d: f64, t: &Trig) -> Option<[f64; 3]> {
    // p_sq is the squared distance between the two left turning circles
    let p_sq = 2.0 + d * d - 2.0 * t.cos_ab + 2.0 * d * (t.sin_a - t.sin_b);
    if p_sq < DEGENERATE_EPSILON {
        // Same circle: a single arc, the direction between centres is undefined
        return Some([0.0, 0.0, mod2pi(beta - alpha)]);
    }
    let tmp = (t.cos_b - t.cos_a).atan2(d + t.sin_a - t.sin_b);
    Some([mod2pi(-alpha + tmp), p_sq.sqrt(), mod2pi(beta - tmp)])
}

fn rsr(alpha: f64, beta: f64, d: f64, t: &Trig) -> Option<[f64; 3]> {
    let p_sq = 2.0 + d * d - 2.0 * t.cos_ab + 2.0 * d * (t.sin_b - t.sin_a);
    if p_sq < DEGENERATE_EPSILON {
        return Some([0.0, 0.0, mod2pi(alpha - beta)]);
    }
    let tmp = (t.cos_a - t.cos_b).atan2(d - t.sin_a + t.sin_b);
    Some([mod2pi(alpha - tmp), p_sq.sqrt(), mod2pi(-beta + tmp)])
}

fn lsr(alpha: f64, beta: f64, d: f64, t: &Trig) -> Option<[f64; 3]> {
    let p_sq = -2.0 + d * d + 2.0 * t.cos_ab + 2.0 * d * (t.sin_a + t.sin_b);
    if p_sq < -DEGENERATE_EPSILON {
        return None;
    }
    let d2 = p_sq.max(0.0).sqrt();
    let tmp = (-t.cos_a - t.cos_b).atan2(d + t.sin_a + t.sin_b) - (-2.0_f64).atan2(d2);
    Some([mod2pi(-alpha + tmp), d2, mod2pi(-mod2pi(beta) + tmp)])
}

fn rsl(alpha: f64, beta: f64, d: f64, t: &Trig) -> Option<[f64; 3]> {
    let p_sq = d * d - 2.0 + 2.0 * t.cos_ab - 2.0 * d * (t.sin_a + t.sin_b);
    if p_sq < -DEGENERATE_EPSILON {
        return None;
    }
    let d2 = p_sq.max(0.0).sqrt();
    let tmp = (t.cos_a + t.cos_b).atan2(d - t.sin_a - t.sin_b) - 2.0_f64.atan2(d2);
    Some([mod2pi(alpha - tmp), d2, mod2pi(beta - tmp)])
}

fn rlr(alpha: f64, beta: f64, d: f64, t: &Trig) -> Option<[f64; 3]> {
    let tmp = (6.0 - d * d + 2.0 * t.cos_ab + 2.0 * d * (t.sin_a - t.sin_b)) / 8.0;
    if tmp.abs() > 1.0 + DEGENERATE_EPSILON {
        return None;
    }
    let d2 = mod2pi(2.0 * PI - tmp.clamp(-1.0, 1.0).acos());
    let d1 = mod2pi(alpha - (t.cos_a - t.cos_b).atan2(d - t.sin_a + t.sin_b) + d2 / 2.0);
    let d3 = mod2pi(alpha - beta - d1 + d2);
    Some([d1, d2, d3])
}

fn lrl(alpha: f64, beta: f64, d: f64, t: &Trig) -> Option<[f64; 3]> {
    let tmp = (6.0 - d * d + 2.0 * t.cos_ab + 2.0 * d * (-t.sin_a + t.sin_b)) / 8.0;
    if tmp.abs() > 1.0 + DEGENERATE_EPSILON {
        return None;
    }
    let d2 = mod2pi(2.0 * PI - tmp.clamp(-1.0, 1.0).acos());
    let d1 = mod2pi(-alpha - (t.cos_a - t.cos_b).atan2(d + t.sin_a - t.sin_b) + d2 / 2.0);
    let d3 = mod2pi(mod2pi(beta) - alpha - d1 + mod2pi(d2));
    Some([d1, d2, d3])
}

const WORDS: [(Word, [Steering; 3]); 6] = [
    (lsl, [L, S, L]),
    (rsr, [R, S, R]),
    (lsr, [L, S, R]),
    (rsl, [R, S, L]),
    (rlr, [R, L, R]),
    (lrl, [L, R, L]),
];

/// Shortest Dubins word from `start` to `goal`: segment lengths in world units and steering
pub fn shortest_path(
    start: (f64, f64, f64),
    goal: (f64, f64, f64),
    turning_radius: f64,
) -> Option<([f64; 3], [Steering; 3])> {
    let curvature = 1.0 / turning_radius;
    let dx = goal.0 - start.0;
    let dy = goal.1 - start.1;
    let (c, s) = (start.2.cos(), start.2.sin());
    let local_x = c * dx + s * dy;
    let local_y = -s * dx + c * dy;
    let local_yaw = goal.2 - start.2;

    let d = local_x.hypot(local_y) * curvature;
    let theta = mod2pi(local_y.atan2(local_x));
    let alpha = mod2pi(-theta);
    let beta = mod2pi(local_yaw - theta);
    let trig = Trig::new(alpha, beta);

    WORDS
        .iter()
        .filter_map(|(word, steering)| word(alpha, beta, d, &trig).map(|l| (l, *steering)))
        .filter(|(l, _)| l.iter().all(|v| v.is_finite()))
        .min_by(|a, b| a.0.iter().sum::<f64>().total_cmp(&b.0.iter().sum::<f64>()))
        .map(|(l, steering)| (l.map(|v| v * turning_radius), steering))
}

/// Forward-only curve-distance oracle
#[derive(Debug, Clone, Copy)]
pub struct Dubins {
    pub turning_radius: f64,
}

impl Dubins {
    pub fn new(turning_radius: f64) -> Self {
        Self { turning_radius }
    }
}

impl CurveDistance for Dubins {
    fn distance(&self, from: (f64, f64, f64), to: (f64, f64, f64)) -> f64 {
        match shortest_path(from, to, self.turning_radius) {
            Some((lengths, _)) => lengths.iter().sum(),
            None => ((to.0 - from.0).powi(2) + (to.1 - from.1).powi(2)).sqrt(),
        }
    }
}
