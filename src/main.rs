//! Brick Breaker headless runner
//!
//! Plays the game with the built-in autopilot into an in-memory RGBA buffer.
//!
//! Usage: `brick-breaker [settings.json] [frames]`
//! Set `BRICK_BREAKER_PACE` to sleep the configured frame delay between frames.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use brick_breaker::sim::{GameEvent, autopilot};
use brick_breaker::{Game, Result, Settings};

const DEFAULT_FRAMES: u64 = 3600;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Brick Breaker (headless) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse().unwrap_or_else(|_| {
            log::warn!("Invalid frame count '{n}', using {DEFAULT_FRAMES}");
            DEFAULT_FRAMES
        }),
        None => DEFAULT_FRAMES,
    };
    let pace = std::env::var_os("BRICK_BREAKER_PACE").is_some();
    let delay = Duration::from_millis(settings.frame_delay_ms);

    let mut game = Game::new(settings)?;
    let mut buffer = game.new_buffer();
    let started = Instant::now();
    let mut played = 0;
    let mut bricks_broken = 0;

    for _ in 0..frames {
        let input = autopilot(game.session());
        let events = game.frame(&input, &mut buffer);
        played += 1;
        bricks_broken += events
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickBroken { .. }))
            .count();

        if game.is_finished() {
            break;
        }
        if pace {
            std::thread::sleep(delay);
        }
    }

    let elapsed = started.elapsed();
    log::info!(
        "{} frames in {:.2?} ({:.0} fps)",
        played,
        elapsed,
        played as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    log::info!(
        "Final state {:?}: score {}, lives {}, {} bricks broken, {} standing",
        game.current_state(),
        game.score(),
        game.lives(),
        bricks_broken,
        game.session().wall.remaining()
    );
    Ok(())
}
