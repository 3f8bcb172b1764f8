//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::balls::Balls;
use super::player::Player;
use crate::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start button
    #[default]
    NotStarted,
    /// Active gameplay
    Playing,
    /// Player was hit, waiting for the restart button
    Ended,
}

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Read-only copy of the entities, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub balls: Balls,
    pub player: Player,
}

impl Snapshot {
    /// Number of balls in play
    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }
}

/// Everything the simulation mutates: the entities and their RNG
#[derive(Debug, Clone)]
pub struct World {
    pub arena_width: u32,
    pub arena_height: u32,
    pub balls: Balls,
    pub player: Player,
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
}

impl World {
    /// Create an empty world; balls only appear once a game starts
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            arena_width: settings.arena_width,
            arena_height: settings.arena_height,
            balls: Balls::new(settings),
            player: Player::new(settings),
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Put the initial batch of balls and the player in their launch state
    pub fn launch(&mut self) {
        self.balls.initial_launch(&mut self.rng);
        self.player.initial_launch();
    }

    /// Launch one more ball if there is room
    pub fn spawn_ball(&mut self) -> bool {
        self.balls.spawn_one(&mut self.rng)
    }

    /// Copy the entities for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balls: self.balls.clone(),
            player: self.player.clone(),
        }
    }
}
