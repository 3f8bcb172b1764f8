//! Game settings
//!
//! Every tunable of the simulation, loaded from an optional JSON file.
//! Defaults reproduce the classic 640x480 arena.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: u32,
    pub arena_height: u32,

    // === Timing ===
    /// Target frames per second while playing
    pub fps: u32,
    /// Start/restart poll interval (ms)
    pub poll_interval_ms: u64,
    /// Time between automatic ball launches (ms)
    pub spawn_interval_ms: i64,

    // === Balls ===
    pub ball_capacity: usize,
    pub initial_balls: usize,
    pub ball_radius: u32,
    pub ball_min_speed: f32,
    pub ball_max_speed: f32,

    // === Player ===
    pub player_radius: u32,
    pub player_speed: f32,

    /// Fixed RNG seed; `None` seeds from the wall clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            fps: FRAMES_PER_SECOND,
            poll_interval_ms: POLL_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,

            ball_capacity: BALL_CAPACITY,
            initial_balls: INITIAL_BALLS,
            ball_radius: BALL_RADIUS,
            ball_min_speed: BALL_MIN_SPEED,
            ball_max_speed: BALL_MAX_SPEED,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,

            seed: None,
        }
    }
}

impl Settings {
    /// Default settings file looked up by the launcher
    pub const DEFAULT_PATH: &'static str = "bouncing-ball.json";

    /// Target frame period in ms, integer-truncated
    pub fn frame_period_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }

    /// Where new balls appear: horizontally centered, near the top
    pub fn ball_launch_point(&self) -> Vec2 {
        Vec2::new(self.arena_width as f32 / 2.0, BALL_LAUNCH_Y)
    }

    /// Where the player starts each game: horizontally centered, near the bottom
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.arena_width as f32 / 2.0,
            self.arena_height as f32 - PLAYER_START_OFFSET_Y,
        )
    }

    /// Check that the settings describe a playable game
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.arena_width == 0 || self.arena_height == 0 {
            return Err(SettingsError::Invalid(format!(
                "arena must be non-empty, got {}x{}",
                self.arena_width, self.arena_height
            )));
        }
        let narrowest = self.arena_width.min(self.arena_height);
        let widest_unit = self.ball_radius.max(self.player_radius);
        if narrowest < widest_unit.saturating_mul(2) {
            return Err(SettingsError::Invalid(format!(
                "arena {}x{} cannot fit a unit of radius {}",
                self.arena_width, self.arena_height, widest_unit
            )));
        }
        if self.fps == 0 {
            return Err(SettingsError::Invalid("fps must be positive".into()));
        }
        if self.spawn_interval_ms <= 0 {
            return Err(SettingsError::Invalid(format!(
                "spawn interval must be positive, got {} ms",
                self.spawn_interval_ms
            )));
        }
        if self.ball_capacity == 0 {
            return Err(SettingsError::Invalid("ball capacity must be positive".into()));
        }
        if self.initial_balls > self.ball_capacity {
            return Err(SettingsError::Invalid(format!(
                "initial balls ({}) exceed capacity ({})",
                self.initial_balls, self.ball_capacity
            )));
        }
        if !(self.ball_min_speed >= 0.0 && self.ball_min_speed < self.ball_max_speed) {
            return Err(SettingsError::Invalid(format!(
                "ball speed range [{}, {}) is empty",
                self.ball_min_speed, self.ball_max_speed
            )));
        }
        // A rebound mirrors at most one step of overshoot, so a step must fit
        // in the room a ball has to travel
        let room = (narrowest - 2 * self.ball_radius) as f32;
        if self.ball_max_speed > room {
            return Err(SettingsError::Invalid(format!(
                "ball speed {} exceeds the {} px a ball can travel",
                self.ball_max_speed, room
            )));
        }
        Ok(())
    }

    /// Parse and validate settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
