//! Deterministic per-player shot clouds for the heatmap overlay.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::court::{distance_from_basket, is_within_court_bounds, BasketSide};
use crate::models::{CourtDimensions, CourtPosition, HeatmapPoint};

/// League make rate by shot distance in feet.
pub fn league_percentage_at(distance: f64) -> f64 {
    if distance <= 3.0 {
        0.68
    } else if distance <= 10.0 {
        0.52
    } else if distance <= 16.0 {
        0.42
    } else if distance <= 23.0 {
        0.38
    } else {
        0.35
    }
}

const MAX_SKILL_OFFSET: f64 = 0.06;
const SHOT_NOISE: f64 = 0.05;
const MAX_SHOT_DISTANCE_FT: f64 = 30.0;

/// FNV-1a over the name, so the same player always gets the same cloud.
fn seed_for(player: &str) -> u64 {
    player.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

/// Generate `count` weighted points in half-court feet around the left basket.
pub fn synthetic_shot_cloud(player: &str, count: usize) -> Vec<HeatmapPoint> {
    let mut rng = StdRng::seed_from_u64(seed_for(player));
    let skill = rng.gen_range(-MAX_SKILL_OFFSET..=MAX_SKILL_OFFSET);
    let court = CourtDimensions::half_court(1.0, 1.0);
    let basket = BasketSide::Left.anchor();

    let mut points = Vec::with_capacity(count);
    // Rejection sampling; the attempt cap keeps a pathological seed bounded.
    let mut attempts = 0;
    while points.len() < count && attempts < count * 20 {
        attempts += 1;

        // Square the uniform draw so shots cluster near the rim.
        let r: f64 = rng.gen::<f64>().sqrt() * MAX_SHOT_DISTANCE_FT;
        let theta = rng.gen_range(-std::f64::consts::FRAC_PI_2..=std::f64::consts::FRAC_PI_2);
        let pos = CourtPosition {
            x: basket.x + r * theta.cos(),
            y: basket.y + r * theta.sin(),
        };
        if !is_within_court_bounds(pos, &court) {
            continue;
        }

        let distance = distance_from_basket(pos, BasketSide::Left);
        let noise = rng.gen_range(-SHOT_NOISE..=SHOT_NOISE);
        let weight = (league_percentage_at(distance) + skill + noise).clamp(0.0, 1.0);
        points.push(HeatmapPoint {
            x: pos.x,
            y: pos.y,
            weight: Some(weight),
        });
    }
    points
}
