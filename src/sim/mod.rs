//! Simulation core
//!
//! Pure game logic with no clocks or I/O: the ball set, the player,
//! wall physics, the spawn countdown and the per-frame step.

mod balls;
mod collision;
mod player;
mod spawn;
mod state;
mod tick;

pub use balls::{Ball, Balls};
pub use collision::{circles_overlap, clamp_axis, player_hit, rebound_axis};
pub use player::{ArrowKey, DirectionKeys, Player};
pub use spawn::SpawnTimer;
pub use state::{Color, GamePhase, Snapshot, World};
pub use tick::{FrameInput, FrameOutcome, move_entities, resolve_frame, tick};
