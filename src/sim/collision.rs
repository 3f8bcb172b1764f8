//! Collision rules for an axis-aligned arena
//!
//! Balls rebound off the walls by mirroring their overshoot back inside,
//! the player is clamped flush to the walls, and a hit is a plain
//! circle-circle overlap.

use glam::Vec2;

use super::balls::Balls;
use super::player::Player;

/// Rebound one axis of a ball against the walls at `0` and `bound`.
///
/// If the leading edge (center ± radius) crossed a wall, the center is moved
/// back inside by exactly the overshoot distance and the velocity component
/// flips sign. Returns the corrected `(position, velocity)`.
///
/// ```text
///   wall            wall
///    |   o->   -->   |  <-o    overshoot d past the wall lands d inside
/// ```
#[inline]
pub fn rebound_axis(pos: f32, vel: f32, radius: f32, bound: f32) -> (f32, f32) {
    let low = pos - radius;
    let high = pos + radius;

    if low < 0.0 {
        let rebound = -low;
        (radius + rebound, -vel)
    } else if high > bound {
        let rebound = high - bound;
        (bound - radius - rebound, -vel)
    } else {
        (pos, vel)
    }
}

/// Clamp one axis so that a circle's leading edge stays within `[0, bound]`.
#[inline]
pub fn clamp_axis(pos: f32, radius: f32, bound: f32) -> f32 {
    if pos - radius < 0.0 {
        radius
    } else if pos + radius > bound {
        bound - radius
    } else {
        pos
    }
}

/// Check whether two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, radius_sum: f32) -> bool {
    a.distance_squared(b) < radius_sum * radius_sum
}

/// Check whether any active ball touches the player.
///
/// Stops at the first overlapping ball.
pub fn player_hit(balls: &Balls, player: &Player) -> bool {
    let radius_sum = balls.radius() as f32 + player.radius() as f32;
    balls
        .iter()
        .any(|ball| circles_overlap(ball.pos, player.pos, radius_sum))
}
