//! Platform abstraction layer
//!
//! The game loop talks to the outside world through two seams:
//! - [`Presenter`]: rendering, HUD and input (buttons and arrow keys)
//! - [`Clock`]: wall time and frame pacing sleeps
//!
//! The loop is the only mutator of simulation state. Presenters receive
//! owned [`Snapshot`] copies, never live references.

use std::time::{Duration, Instant};

use crate::error::LoopError;
use crate::sim::{DirectionKeys, Snapshot};

mod channel;
mod console;

pub use channel::{ChannelPresenter, Command, Frame, FrontendHandle, Update, channel};
pub use console::ConsoleFrontend;

/// Buttons the loop waits on outside of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The start button (before the first game)
    Start,
    /// The restart button (after a game over)
    Restart,
}

/// Presentation and input collaborator of the game loop
pub trait Presenter {
    /// Whether the button for `signal` has been pushed (level-triggered)
    fn is_requested(&mut self, signal: Signal) -> bool;

    /// Wait up to `timeout` for the button behind `signal`.
    ///
    /// The default sleeps for the whole timeout and then polls. Presenters
    /// backed by an event queue should block on it instead, and report a
    /// vanished front-end as [`LoopError::FrontendDisconnected`].
    fn wait_for_signal(&mut self, signal: Signal, timeout: Duration) -> Result<bool, LoopError> {
        std::thread::sleep(timeout);
        Ok(self.is_requested(signal))
    }

    /// Arrow keys currently held
    fn direction_keys(&mut self) -> DirectionKeys;

    /// Hand over the latest entity state for drawing
    fn publish(&mut self, snapshot: Snapshot) -> Result<(), LoopError>;

    /// Time since the current game started (ms)
    fn report_elapsed(&mut self, elapsed_ms: u64);

    /// Redraw the screen
    fn refresh(&mut self);

    /// A game is starting; hide the start/restart buttons
    fn enter_playing(&mut self);

    /// The player was hit; show the restart button
    fn enter_ended(&mut self);

    /// Route keyboard input to the arena
    fn request_focus(&mut self) {}

    /// Forget every held arrow key
    fn reset_direction_keys(&mut self);
}

/// Source of wall time in milliseconds, and the only place the loop sleeps
pub trait Clock {
    fn now_ms(&self) -> u64;

    fn sleep_ms(&mut self, ms: u64);
}

/// Monotonic wall clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}
