//! Text front-end
//!
//! Drives a [`FrontendHandle`] from its own thread: pushes the start button,
//! logs a HUD line once per second while playing, and pushes restart after
//! every game over. It never touches the arrow keys.

use std::time::{Duration, Instant};

use crossbeam_channel::{RecvTimeoutError, select};

use super::channel::{Command, Frame, FrontendHandle, Update};
use crate::hud::{FpsCounter, format_game_time};
use crate::sim::GamePhase;

/// Either queue of the handle
enum Incoming {
    Update(Update),
    Frame(Frame),
}

/// Minimal terminal front-end
#[derive(Debug)]
pub struct ConsoleFrontend {
    handle: FrontendHandle,
    origin: Instant,
    fps: FpsCounter,
    phase: GamePhase,
    elapsed_ms: u64,
    ball_count: usize,
    games_finished: u32,
    max_games: Option<u32>,
    restart_delay: Duration,
}

impl ConsoleFrontend {
    pub fn new(handle: FrontendHandle) -> Self {
        Self {
            handle,
            origin: Instant::now(),
            fps: FpsCounter::default(),
            phase: GamePhase::NotStarted,
            elapsed_ms: 0,
            ball_count: 0,
            games_finished: 0,
            max_games: None,
            restart_delay: Duration::from_secs(1),
        }
    }

    /// Stop (and hang up on the loop) after this many games
    pub fn with_max_games(mut self, games: u32) -> Self {
        self.max_games = Some(games);
        self
    }

    /// Pause between a game over and pushing restart
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    /// Number of games that ended while this front-end was attached
    pub fn games_finished(&self) -> u32 {
        self.games_finished
    }

    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    /// Run until the loop goes away or `max_games` have been played.
    ///
    /// Returns the number of finished games.
    pub fn run(mut self) -> u32 {
        if !self.handle.send(Command::Start) {
            return 0;
        }

        loop {
            let incoming = select! {
                recv(self.handle.updates()) -> msg => msg.map(Incoming::Update),
                recv(self.handle.frames()) -> msg => msg.map(Incoming::Frame),
            };
            let keep_going = match incoming {
                Ok(Incoming::Update(update)) => self.handle_update(update),
                Ok(Incoming::Frame(frame)) => {
                    self.handle_frame(frame);
                    true
                }
                Err(_) => {
                    log::info!("Game loop gone, front-end exiting");
                    false
                }
            };
            if !keep_going {
                break;
            }
        }

        self.games_finished
    }

    /// Returns `false` when the front-end is done
    fn handle_update(&mut self, update: Update) -> bool {
        match update {
            Update::Phase(GamePhase::Playing) => {
                self.phase = GamePhase::Playing;
                self.fps.reset(self.now_ms());
            }
            Update::Phase(GamePhase::Ended) => {
                self.phase = GamePhase::Ended;
                self.games_finished += 1;
                // The frame with the hit is queued ahead of the phase change
                if let Some(frame) = self.handle.latest_frame() {
                    self.note_frame(&frame);
                }
                log::info!(
                    "GAME OVER after {} with {} balls",
                    format_game_time(self.elapsed_ms),
                    self.ball_count
                );

                if self.max_games.is_some_and(|max| self.games_finished >= max) {
                    return false;
                }
                return self.push_restart();
            }
            Update::Phase(GamePhase::NotStarted) => self.phase = GamePhase::NotStarted,
            Update::Focus => {}
        }
        true
    }

    fn note_frame(&mut self, frame: &Frame) {
        self.ball_count = frame.snapshot.ball_count();
        self.elapsed_ms = frame.elapsed_ms;
    }

    fn handle_frame(&mut self, frame: Frame) {
        self.note_frame(&frame);
        if self.phase != GamePhase::Playing {
            return;
        }
        if let Some(fps) = self.fps.frame(self.now_ms()) {
            log::info!(
                "time {}  balls {:2}  {} fps",
                format_game_time(self.elapsed_ms),
                self.ball_count,
                fps
            );
        }
    }

    /// Wait out the restart delay, still draining updates, then push restart
    fn push_restart(&mut self) -> bool {
        let deadline = Instant::now() + self.restart_delay;
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                break;
            }
            match self.handle.updates().recv_timeout(left) {
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        self.handle.send(Command::Restart)
    }
}
