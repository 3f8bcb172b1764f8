//! Game loop and phase state machine
//!
//! ```text
//!   NotStarted ──start──> Playing ──hit──> Ended ──restart──┐
//!                            ^                              │
//!                            └──────────────────────────────┘
//! ```
//!
//! Outside of gameplay the loop waits on the presenter in bounded polls.
//! While playing it runs one frame per period and sleeps off whatever is
//! left of the period; an overrunning frame is neither skipped nor caught up.

use std::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Settings;
use crate::error::LoopError;
use crate::platform::{Clock, Presenter, Signal, SystemClock};
use crate::sim::{GamePhase, SpawnTimer, World, move_entities, resolve_frame};

/// Owns all simulation state and drives it through the game phases
pub struct GameLoop<P: Presenter, C: Clock = SystemClock> {
    settings: Settings,
    presenter: P,
    clock: C,
    phase: GamePhase,
    world: World,
    spawn: SpawnTimer,
    /// Wall time at which the current game started
    game_begin_ms: u64,
    /// Wall time of the last spawn countdown update
    last_check_ms: u64,
    elapsed_ms: u64,
    games_started: u32,
}

impl<P: Presenter> GameLoop<P, SystemClock> {
    /// Build a loop running on the wall clock
    pub fn with_system_clock(settings: Settings, presenter: P) -> Result<Self, LoopError> {
        Self::new(settings, presenter, SystemClock::new())
    }
}

impl<P: Presenter, C: Clock> GameLoop<P, C> {
    /// Build a loop waiting for the start button.
    ///
    /// The entities are created empty and handed to the presenter once, so
    /// the arena can be drawn before the first game.
    pub fn new(settings: Settings, mut presenter: P, clock: C) -> Result<Self, LoopError> {
        settings.validate()?;

        let seed = settings.seed.unwrap_or_else(wall_clock_seed);
        let world = World::new(&settings, seed);
        presenter.publish(world.snapshot())?;

        log::info!(
            "Arena {}x{}, {} fps, seed {}",
            settings.arena_width,
            settings.arena_height,
            settings.fps,
            seed
        );

        Ok(Self {
            spawn: SpawnTimer::new(settings.spawn_interval_ms),
            settings,
            presenter,
            clock,
            phase: GamePhase::NotStarted,
            world,
            game_begin_ms: 0,
            last_check_ms: 0,
            elapsed_ms: 0,
            games_started: 0,
        })
    }

    /// Run forever.
    ///
    /// Only returns when the presenter side fails, e.g. the front-end hung up.
    pub fn run(&mut self) -> Result<(), LoopError> {
        loop {
            self.step()?;
        }
    }

    /// Run the handler for the current phase once: one poll while waiting,
    /// one frame while playing
    pub fn step(&mut self) -> Result<(), LoopError> {
        match self.phase {
            GamePhase::NotStarted => self.wait_to_play(Signal::Start),
            GamePhase::Playing => self.play_frame(),
            GamePhase::Ended => self.wait_to_play(Signal::Restart),
        }
    }

    fn wait_to_play(&mut self, signal: Signal) -> Result<(), LoopError> {
        let poll = Duration::from_millis(self.settings.poll_interval_ms);
        if self.presenter.wait_for_signal(signal, poll)? {
            self.enter_playing()?;
        }
        Ok(())
    }

    fn play_frame(&mut self) -> Result<(), LoopError> {
        let frame_begin_ms = self.clock.now_ms();

        self.elapsed_ms = frame_begin_ms.saturating_sub(self.game_begin_ms);
        self.presenter.report_elapsed(self.elapsed_ms);

        let keys = self.presenter.direction_keys();
        move_entities(&mut self.world, &keys);
        self.presenter.publish(self.world.snapshot())?;

        let now = self.clock.now_ms();
        let since_check = now.saturating_sub(self.last_check_ms) as i64;
        self.last_check_ms = now;
        let outcome = resolve_frame(&mut self.world, &mut self.spawn, since_check);
        if outcome.player_hit {
            self.enter_ended();
        }

        self.presenter.refresh();

        let frame_end_ms = self.clock.now_ms();
        let spent = frame_end_ms.saturating_sub(frame_begin_ms);
        let period = self.settings.frame_period_ms();
        if spent < period {
            self.clock.sleep_ms(period - spent);
        } else {
            log::debug!("Frame overran: {} ms (period {} ms)", spent, period);
        }
        Ok(())
    }

    /// Start a fresh game (from either NotStarted or Ended)
    fn enter_playing(&mut self) -> Result<(), LoopError> {
        self.presenter.enter_playing();

        self.world.launch();
        self.presenter.publish(self.world.snapshot())?;
        self.presenter.request_focus();
        self.presenter.refresh();

        // Give the front-end a frame to draw the fresh arena
        self.clock.sleep_ms(self.settings.frame_period_ms());

        self.game_begin_ms = self.clock.now_ms();
        self.last_check_ms = self.game_begin_ms;
        self.elapsed_ms = 0;
        self.spawn.reset();

        self.games_started += 1;
        self.phase = GamePhase::Playing;
        log::info!("Game {} started with {} balls", self.games_started, self.world.balls.len());
        Ok(())
    }

    fn enter_ended(&mut self) {
        self.presenter.enter_ended();
        // Keys held at the moment of the hit must not leak into the next game
        self.presenter.reset_direction_keys();

        self.phase = GamePhase::Ended;
        log::info!(
            "Game {} over after {} ms with {} balls",
            self.games_started,
            self.elapsed_ms,
            self.world.balls.len()
        );
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn spawn_timer(&self) -> &SpawnTimer {
        &self.spawn
    }

    /// Time since the current game started, as of the last frame (ms)
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DirectionKeys, Snapshot};
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock that only moves when slept on or advanced by the test
    #[derive(Clone, Default)]
    struct ManualClock {
        now: Rc<Cell<u64>>,
        sleeps: Rc<Cell<u32>>,
    }

    impl ManualClock {
        fn advance(&self, ms: u64) {
            self.now.set(self.now.get() + ms);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now.get()
        }

        fn sleep_ms(&mut self, ms: u64) {
            self.sleeps.set(self.sleeps.get() + 1);
            self.advance(ms);
        }
    }

    /// Presenter whose buttons and keys are set by the test
    #[derive(Default)]
    struct ScriptedPresenter {
        start: bool,
        restart: bool,
        keys: DirectionKeys,
        published: Vec<Snapshot>,
        elapsed: Vec<u64>,
        refreshes: u32,
        events: Vec<&'static str>,
    }

    impl Presenter for ScriptedPresenter {
        fn is_requested(&mut self, signal: Signal) -> bool {
            match signal {
                Signal::Start => self.start,
                Signal::Restart => self.restart,
            }
        }

        fn wait_for_signal(&mut self, signal: Signal, _timeout: Duration) -> Result<bool, LoopError> {
            Ok(self.is_requested(signal))
        }

        fn direction_keys(&mut self) -> DirectionKeys {
            self.keys
        }

        fn publish(&mut self, snapshot: Snapshot) -> Result<(), LoopError> {
            self.published.push(snapshot);
            Ok(())
        }

        fn report_elapsed(&mut self, elapsed_ms: u64) {
            self.elapsed.push(elapsed_ms);
        }

        fn refresh(&mut self) {
            self.refreshes += 1;
        }

        fn enter_playing(&mut self) {
            self.start = false;
            self.restart = false;
            self.events.push("playing");
        }

        fn enter_ended(&mut self) {
            self.events.push("ended");
        }

        fn request_focus(&mut self) {
            self.events.push("focus");
        }

        fn reset_direction_keys(&mut self) {
            self.keys = DirectionKeys::default();
            self.events.push("keys reset");
        }
    }

    fn settings() -> Settings {
        Settings {
            seed: Some(2024),
            ..Settings::default()
        }
    }

    fn new_loop() -> (GameLoop<ScriptedPresenter, ManualClock>, ManualClock) {
        let clock = ManualClock::default();
        let game = GameLoop::new(settings(), ScriptedPresenter::default(), clock.clone()).unwrap();
        (game, clock)
    }

    fn started_loop() -> (GameLoop<ScriptedPresenter, ManualClock>, ManualClock) {
        let (mut game, clock) = new_loop();
        game.presenter_mut().start = true;
        game.step().unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        (game, clock)
    }

    /// Put a motionless ball right on top of the player
    fn drop_ball_on_player(game: &mut GameLoop<ScriptedPresenter, ManualClock>) {
        let pos = game.world.player.pos;
        game.world.balls.push(pos, Vec2::ZERO);
    }

    #[test]
    fn test_waits_until_start() {
        let (mut game, _clock) = new_loop();
        assert_eq!(game.presenter().published.len(), 1);
        assert!(game.presenter().published[0].balls.is_empty());

        for _ in 0..5 {
            game.step().unwrap();
        }
        assert_eq!(game.phase(), GamePhase::NotStarted);
        assert_eq!(game.games_started(), 0);
    }

    #[test]
    fn test_start_launches_fresh_game() {
        let (mut game, clock) = new_loop();
        clock.advance(1000);
        game.presenter_mut().start = true;
        game.step().unwrap();

        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.world().balls.len(), 5);
        assert_eq!(game.world().player.pos, Vec2::new(320.0, 460.0));
        assert_eq!(game.presenter().events, vec!["playing", "focus"]);
        // One frame period is waited before the game clock starts
        assert_eq!(clock.now_ms(), 1016);
        assert_eq!(game.spawn_timer().remaining_ms(), 5000);

        // The first frame reports zero elapsed time
        game.step().unwrap();
        assert_eq!(game.presenter().elapsed, vec![0]);
        assert_eq!(game.elapsed_ms(), 0);
    }

    #[test]
    fn test_frames_are_paced_to_period() {
        let (mut game, clock) = started_loop();
        let begin = clock.now_ms();
        for _ in 0..10 {
            game.step().unwrap();
        }
        assert_eq!(clock.now_ms() - begin, 160);
        assert_eq!(clock.sleeps.get(), 11);
        assert_eq!(game.presenter().elapsed.last(), Some(&144));
    }

    /// Clock where every read costs 10 ms, so each frame overruns
    struct SlowClock(ManualClock);

    impl Clock for SlowClock {
        fn now_ms(&self) -> u64 {
            self.0.advance(10);
            self.0.now_ms()
        }

        fn sleep_ms(&mut self, ms: u64) {
            self.0.sleep_ms(ms);
        }
    }

    #[test]
    fn test_overrunning_frame_does_not_sleep() {
        let clock = ManualClock::default();
        let mut game =
            GameLoop::new(settings(), ScriptedPresenter::default(), SlowClock(clock.clone()))
                .unwrap();
        game.presenter_mut().start = true;
        game.step().unwrap();
        let sleeps = clock.sleeps.get();

        for _ in 0..3 {
            game.step().unwrap();
        }
        assert_eq!(clock.sleeps.get(), sleeps);
        assert_eq!(game.presenter().refreshes, 4);
    }

    #[test]
    fn test_arrow_keys_steer_player() {
        let (mut game, _clock) = started_loop();
        game.presenter_mut().keys = DirectionKeys {
            up: true,
            down: true,
            left: true,
            right: false,
        };
        game.step().unwrap();
        assert_eq!(game.world().player.pos, Vec2::new(314.0, 460.0));
    }

    #[test]
    fn test_spawn_overshoot_is_carried() {
        let (mut game, clock) = started_loop();
        // Move the player out of the launch lanes
        game.world.player.pos = Vec2::new(8.0, 472.0);

        clock.advance(5200);
        game.step().unwrap();

        assert_eq!(game.world().balls.len(), 6);
        assert_eq!(game.spawn_timer().remaining_ms(), 4800);
    }

    #[test]
    fn test_hit_ends_game_and_clears_keys() {
        let (mut game, _clock) = started_loop();
        game.presenter_mut().keys.left = true;
        drop_ball_on_player(&mut game);

        game.step().unwrap();

        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.presenter().keys, DirectionKeys::default());
        assert!(game.presenter().events.ends_with(&["ended", "keys reset"]));

        // Waiting for restart leaves the world alone
        let balls = game.world().balls.len();
        game.step().unwrap();
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.world().balls.len(), balls);
    }

    #[test]
    fn test_restart_resets_entities() {
        let (mut game, clock) = started_loop();
        game.world.player.pos = Vec2::new(8.0, 472.0);
        clock.advance(5200);
        game.step().unwrap();
        assert_eq!(game.world().balls.len(), 6);

        drop_ball_on_player(&mut game);
        game.step().unwrap();
        assert_eq!(game.phase(), GamePhase::Ended);

        game.presenter_mut().restart = true;
        game.step().unwrap();

        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.games_started(), 2);
        assert_eq!(game.world().balls.len(), 5);
        assert_eq!(game.world().player.pos, Vec2::new(320.0, 460.0));
        assert_eq!(game.spawn_timer().remaining_ms(), 5000);

        game.step().unwrap();
        assert_eq!(game.presenter().elapsed.last(), Some(&0));
    }

    #[test]
    fn test_start_button_is_ignored_after_game_over() {
        let (mut game, _clock) = started_loop();
        drop_ball_on_player(&mut game);
        game.step().unwrap();

        game.presenter_mut().start = true;
        game.step().unwrap();
        assert_eq!(game.phase(), GamePhase::Ended);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let bad = Settings {
            ball_capacity: 0,
            ..Settings::default()
        };
        let result = GameLoop::new(bad, ScriptedPresenter::default(), ManualClock::default());
        assert!(matches!(result, Err(LoopError::InvalidSettings(_))));
    }
}
