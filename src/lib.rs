//! Bouncing Ball - dodge a growing swarm of balls in a fixed arena
//!
//! Core modules:
//! - `sim`: Simulation core (entities, wall physics, spawning, per-frame step)
//! - `game_loop`: Phase state machine, frame pacing and timing
//! - `platform`: Presentation/input boundary and clocks
//! - `hud`: Game clock label and FPS counter
//! - `settings`: Tunable constants loaded from JSON

pub mod error;
pub mod game_loop;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{LoopError, SettingsError};
pub use game_loop::GameLoop;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Target frame rate
    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Target frame period in ms (integer-truncated 1000 / 60)
    pub const FRAME_PERIOD_MS: u64 = 1000 / FRAMES_PER_SECOND as u64;
    /// Start/restart button poll interval
    pub const POLL_INTERVAL_MS: u64 = 100;
    /// A new ball is launched every 5 seconds
    pub const SPAWN_INTERVAL_MS: i64 = 5000;

    /// Arena dimensions
    pub const ARENA_WIDTH: u32 = 640;
    pub const ARENA_HEIGHT: u32 = 480;

    /// Ball defaults
    pub const BALL_CAPACITY: usize = 50;
    pub const INITIAL_BALLS: usize = 5;
    pub const BALL_RADIUS: u32 = 8;
    /// Launch point distance from the top wall
    pub const BALL_LAUNCH_Y: f32 = 30.0;
    /// Per-axis speed range, [min, max)
    pub const BALL_MIN_SPEED: f32 = 1.0;
    pub const BALL_MAX_SPEED: f32 = 3.0;

    /// Player defaults
    pub const PLAYER_RADIUS: u32 = 8;
    pub const PLAYER_SPEED: f32 = 6.0;
    /// Start position distance from the bottom wall
    pub const PLAYER_START_OFFSET_Y: f32 = 20.0;
}
