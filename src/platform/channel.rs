//! Channel-backed presenter
//!
//! Lets the front-end (window, terminal, test harness) run on its own
//! thread. Input travels to the loop as [`Command`]s; state travels back as
//! [`Update`]s carrying owned snapshots.
//!
//! ```text
//!   FrontendHandle ──Command──> ChannelPresenter ──> GameLoop
//!        ^                              │
//!        └──────────Update──────────────┘
//! ```

use std::time::Duration;

use crossbeam_channel::{
    Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError, bounded, unbounded,
};

use super::{Presenter, Signal};
use crate::error::LoopError;
use crate::sim::{ArrowKey, DirectionKeys, GamePhase, Snapshot};

/// Upper bound on commands applied per drain
const MAX_COMMANDS_PER_DRAIN: usize = 100;

/// Input sent from the front-end to the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start button pushed
    Start,
    /// Restart button pushed
    Restart,
    /// Arrow key pressed or released
    Key { key: ArrowKey, pressed: bool },
}

/// Entities to draw, with the game clock as of this frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub snapshot: Snapshot,
    /// Time since the game started (ms)
    pub elapsed_ms: u64,
}

/// Rare state changes sent from the loop to the front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Update {
    /// The loop changed phase
    Phase(GamePhase),
    /// Keyboard focus should move to the arena
    Focus,
}

/// Create a connected presenter/front-end pair.
///
/// At most `frame_capacity` frames queue up for a slow front-end; when the
/// queue is full the oldest frame gives way, so the newest one always gets
/// through. Phase changes are never dropped.
pub fn channel(frame_capacity: usize) -> (ChannelPresenter, FrontendHandle) {
    let (command_tx, command_rx) = unbounded();
    let (frame_tx, frame_rx) = bounded(frame_capacity.max(1));
    let (update_tx, update_rx) = unbounded();

    let presenter = ChannelPresenter {
        commands: command_rx,
        frames: frame_tx,
        stale_frames: frame_rx.clone(),
        updates: update_tx,
        keys: DirectionKeys::default(),
        phase: GamePhase::NotStarted,
        elapsed_ms: 0,
        start: false,
        restart: false,
        disconnected: false,
    };
    let handle = FrontendHandle {
        commands: command_tx,
        frames: frame_rx,
        updates: update_rx,
    };
    (presenter, handle)
}

/// Loop-side end of [`channel`]
#[derive(Debug)]
pub struct ChannelPresenter {
    commands: Receiver<Command>,
    frames: Sender<Frame>,
    /// Loop-side reader of the frame queue, used to evict the oldest frame
    stale_frames: Receiver<Frame>,
    updates: Sender<Update>,
    keys: DirectionKeys,
    phase: GamePhase,
    elapsed_ms: u64,
    start: bool,
    restart: bool,
    disconnected: bool,
}

impl ChannelPresenter {
    fn apply(&mut self, command: Command) {
        match command {
            // Each button only exists in the phase that waits on it
            Command::Start if self.phase == GamePhase::NotStarted => self.start = true,
            Command::Restart if self.phase == GamePhase::Ended => self.restart = true,
            Command::Start | Command::Restart => {
                log::debug!("Ignoring {:?} while {:?}", command, self.phase);
            }
            Command::Key { key, pressed } => self.keys.set(key, pressed),
        }
    }

    /// Apply pending commands without blocking
    fn drain(&mut self) {
        for _ in 0..MAX_COMMANDS_PER_DRAIN {
            match self.commands.try_recv() {
                Ok(command) => self.apply(command),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    return;
                }
            }
        }
        log::warn!("Command backlog: applied {} commands", MAX_COMMANDS_PER_DRAIN);
    }

    fn flag(&self, signal: Signal) -> bool {
        match signal {
            Signal::Start => self.start,
            Signal::Restart => self.restart,
        }
    }

    /// Whether the front-end has hung up
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    fn notify(&mut self, update: Update) {
        if self.updates.send(update).is_err() {
            self.disconnected = true;
        }
    }
}

impl Presenter for ChannelPresenter {
    fn is_requested(&mut self, signal: Signal) -> bool {
        self.drain();
        self.flag(signal)
    }

    fn wait_for_signal(&mut self, signal: Signal, timeout: Duration) -> Result<bool, LoopError> {
        self.drain();
        if self.flag(signal) {
            return Ok(true);
        }
        if self.disconnected {
            return Err(LoopError::FrontendDisconnected);
        }

        match self.commands.recv_timeout(timeout) {
            Ok(command) => {
                self.apply(command);
                self.drain();
                Ok(self.flag(signal))
            }
            Err(RecvTimeoutError::Timeout) => Ok(false),
            Err(RecvTimeoutError::Disconnected) => {
                self.disconnected = true;
                Err(LoopError::FrontendDisconnected)
            }
        }
    }

    fn direction_keys(&mut self) -> DirectionKeys {
        self.drain();
        self.keys
    }

    fn publish(&mut self, snapshot: Snapshot) -> Result<(), LoopError> {
        // The frame queue never disconnects while we hold `stale_frames`;
        // a hang-up shows on the command queue instead
        self.drain();
        if self.disconnected {
            return Err(LoopError::FrontendDisconnected);
        }

        let frame = Frame {
            snapshot,
            elapsed_ms: self.elapsed_ms,
        };
        if let Err(TrySendError::Full(frame)) = self.frames.try_send(frame) {
            // Only this side sends, so evicting one frame always makes room
            let _ = self.stale_frames.try_recv();
            let _ = self.frames.try_send(frame);
        }
        Ok(())
    }

    fn report_elapsed(&mut self, elapsed_ms: u64) {
        self.elapsed_ms = elapsed_ms;
    }

    fn refresh(&mut self) {
        // Every published frame is already a redraw request
    }

    fn enter_playing(&mut self) {
        self.phase = GamePhase::Playing;
        self.elapsed_ms = 0;
        self.start = false;
        self.restart = false;
        self.notify(Update::Phase(GamePhase::Playing));
    }

    fn enter_ended(&mut self) {
        self.phase = GamePhase::Ended;
        self.restart = false;
        self.notify(Update::Phase(GamePhase::Ended));
    }

    fn request_focus(&mut self) {
        self.notify(Update::Focus);
    }

    fn reset_direction_keys(&mut self) {
        self.keys = DirectionKeys::default();
    }
}

/// Front-end side of [`channel`]
#[derive(Debug)]
pub struct FrontendHandle {
    commands: Sender<Command>,
    frames: Receiver<Frame>,
    updates: Receiver<Update>,
}

impl FrontendHandle {
    /// Send a command; returns `false` once the loop has gone away
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn press(&self, key: ArrowKey) -> bool {
        self.send(Command::Key { key, pressed: true })
    }

    pub fn release(&self, key: ArrowKey) -> bool {
        self.send(Command::Key {
            key,
            pressed: false,
        })
    }

    /// Phase changes and focus requests, in order
    pub fn updates(&self) -> &Receiver<Update> {
        &self.updates
    }

    /// Published frames; may skip older frames under load
    pub fn frames(&self) -> &Receiver<Frame> {
        &self.frames
    }

    /// Latest queued frame, discarding older ones
    pub fn latest_frame(&self) -> Option<Frame> {
        self.frames.try_iter().last()
    }
}
