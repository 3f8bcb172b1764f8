//! The player-controlled unit
//!
//! Moves at a fixed speed in whichever direction the arrow keys point, with
//! no inertia, and is clamped flush to the arena walls.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::clamp_axis;
use super::state::Color;
use crate::Settings;

/// Arrow keys held down this frame (level-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// An arrow key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

impl DirectionKeys {
    /// Record a key press or release
    pub fn set(&mut self, key: ArrowKey, pressed: bool) {
        match key {
            ArrowKey::Up => self.up = pressed,
            ArrowKey::Down => self.down = pressed,
            ArrowKey::Left => self.left = pressed,
            ArrowKey::Right => self.right = pressed,
        }
    }

    /// Desired direction in screen space (y grows downward).
    ///
    /// Opposite keys held together cancel out on that axis only.
    pub fn direction(&self) -> IVec2 {
        IVec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

#[inline]
fn axis(negative: bool, positive: bool) -> i32 {
    match (negative, positive) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    }
}

/// The player's unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    /// Displacement applied on the last step
    pub vel: Vec2,
    /// Desired direction, each component in {-1, 0, 1}
    direction: IVec2,
    radius: u32,
    speed: f32,
    start: Vec2,
    /// Gradient colors (top-left, bottom-right)
    pub colors: (Color, Color),
}

impl Default for Player {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let start = settings.player_start();
        Self {
            pos: start,
            vel: Vec2::ZERO,
            direction: IVec2::ZERO,
            radius: settings.player_radius,
            speed: settings.player_speed,
            start,
            colors: (Color::BLUE, Color::YELLOW),
        }
    }

    /// Put the unit back at its start position, at rest
    pub fn initial_launch(&mut self) {
        self.pos = self.start;
        self.vel = Vec2::ZERO;
        self.direction = IVec2::ZERO;
    }

    /// Set the desired direction; any magnitude collapses to its sign
    pub fn set_direction(&mut self, direction: IVec2) {
        self.direction = direction.signum();
    }

    pub fn direction(&self) -> IVec2 {
        self.direction
    }

    /// Move one step in the desired direction, then clamp inside the arena
    pub fn advance(&mut self, arena_width: u32, arena_height: u32) {
        self.vel = self.direction.as_vec2() * self.speed;
        self.pos += self.vel;

        let radius = self.radius as f32;
        self.pos.x = clamp_axis(self.pos.x, radius, arena_width as f32);
        self.pos.y = clamp_axis(self.pos.y, radius, arena_height as f32);
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn diameter(&self) -> u32 {
        self.radius * 2
    }

    /// Top-left corner of the bounding box, truncated to pixels
    pub fn corner(&self) -> IVec2 {
        let radius = self.radius as f32;
        IVec2::new((self.pos.x - radius) as i32, (self.pos.y - radius) as i32)
    }
}
