//! One simulation frame
//!
//! A playing frame is split in two halves so the caller can publish the
//! moved entities before spawning and hit detection run:
//! [`move_entities`] then [`resolve_frame`]. [`tick`] runs both back to back.

use super::collision::player_hit;
use super::player::DirectionKeys;
use super::spawn::SpawnTimer;
use super::state::World;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Arrow keys held this frame
    pub keys: DirectionKeys,
    /// Wall time since the spawn countdown was last updated (ms)
    pub elapsed_ms: i64,
}

/// What happened during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// A new ball was launched
    pub spawned: bool,
    /// A ball touched the player; the game is over
    pub player_hit: bool,
}

/// Advance every ball, steer the player from the held keys, then move it
pub fn move_entities(world: &mut World, keys: &DirectionKeys) {
    world.balls.advance(world.arena_width, world.arena_height);

    world.player.set_direction(keys.direction());
    world.player.advance(world.arena_width, world.arena_height);
}

/// Run the spawn countdown and test the player against every ball
pub fn resolve_frame(world: &mut World, spawn: &mut SpawnTimer, elapsed_ms: i64) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();

    if spawn.update(elapsed_ms) {
        // Once full, the countdown keeps running but launches nothing
        outcome.spawned = world.spawn_ball();
        if outcome.spawned {
            log::debug!("Ball launched ({} in play)", world.balls.len());
        }
    }

    outcome.player_hit = player_hit(&world.balls, &world.player);
    outcome
}

/// Advance the world by one full frame
pub fn tick(world: &mut World, spawn: &mut SpawnTimer, input: &FrameInput) -> FrameOutcome {
    move_entities(world, &input.keys);
    resolve_frame(world, spawn, input.elapsed_ms)
}
