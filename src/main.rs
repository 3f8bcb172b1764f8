//! Bouncing Ball entry point
//!
//! Loads settings, starts the console front-end on its own thread and runs
//! the game loop on the main thread.

use std::process::ExitCode;
use std::thread;

use bouncing_ball::platform::{ConsoleFrontend, channel};
use bouncing_ball::{GameLoop, Settings};

/// Frames allowed to queue up for the front-end
const FRAME_QUEUE: usize = 4;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bouncing Ball starting...");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| Settings::DEFAULT_PATH.to_string());
    let settings = Settings::load_or_default(&path);

    let (presenter, handle) = channel(FRAME_QUEUE);
    let frontend = thread::spawn(move || ConsoleFrontend::new(handle).run());

    let result = GameLoop::with_system_clock(settings, presenter).and_then(|mut game| game.run());

    // The loop only comes back on failure; its presenter is dropped by now,
    // which lets the front-end thread wind down
    let code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Game loop stopped: {}", e);
            ExitCode::FAILURE
        }
    };

    match frontend.join() {
        Ok(games) => log::info!("{} games played", games),
        Err(e) => log::error!("Front-end thread panicked: {:?}", e),
    }
    code
}
