//! HUD helpers shared by front-ends
//!
//! The game clock label and a once-per-second FPS counter.

/// How often the FPS readout is refreshed (ms)
pub const FPS_WINDOW_MS: i64 = 1000;

/// Format elapsed game time as `MM:SS`
pub fn format_game_time(elapsed_ms: u64) -> String {
    let seconds = elapsed_ms / 1000;
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Counts refreshed frames and publishes a rate once per window.
///
/// The window countdown carries overshoot the same way the spawn countdown
/// does, so the readout does not drift.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    countdown_ms: i64,
    last_ms: u64,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now_ms: u64) -> Self {
        let mut counter = Self::default();
        counter.reset(now_ms);
        counter
    }

    /// Start counting from scratch (on every entry to a new game)
    pub fn reset(&mut self, now_ms: u64) {
        self.countdown_ms = FPS_WINDOW_MS;
        self.last_ms = now_ms;
        self.frames = 0;
        self.fps = 0;
    }

    /// Record one refreshed frame.
    ///
    /// Returns the new readout when a window has just closed.
    pub fn frame(&mut self, now_ms: u64) -> Option<u32> {
        self.frames += 1;
        self.countdown_ms -= now_ms.saturating_sub(self.last_ms) as i64;
        self.last_ms = now_ms;

        if self.countdown_ms <= 0 {
            self.countdown_ms += FPS_WINDOW_MS;
            self.fps = (self.frames as i64 * 1000 / FPS_WINDOW_MS) as u32;
            self.frames = 0;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Last published readout
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
