//! Cyber Snake entry point
//!
//! Runs the game headless: the autopilot plays one round through the same
//! frame loop a windowed host would drive, then the result is logged.
//!
//! Usage: `cyber-snake [DATA_DIR]`
//! - `DATA_DIR` holds `settings.json`, `hiscores.json` and optionally a
//!   `levels/` directory of `levelNN.map` files (defaults to the current directory)
//! - `CYBER_SNAKE_SEED` fixes the random seed

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use cyber_snake::audio::LogAudio;
    use cyber_snake::platform::{FileStorage, FrameHandler, InputEvent, Key};
    use cyber_snake::renderer::NullRenderer;
    use cyber_snake::sim::{BuiltinLevels, LevelSource, MapDirectory};
    use cyber_snake::{Game, Phase};

    /// Frames before the driver gives up (ten minutes of play at 60 fps)
    const FRAME_LIMIT: u32 = 60 * 60 * 10;
    const FRAME_SECS: f32 = 1.0 / 60.0;

    env_logger::init();
    log::info!("Cyber Snake (headless) starting...");

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let seed = std::env::var("CYBER_SNAKE_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Game initialized with seed: {seed}");

    let level_dir = data_dir.join("levels");
    let levels: Box<dyn LevelSource> = if level_dir.join("level01.map").exists() {
        log::info!("Loading levels from {}", level_dir.display());
        Box::new(MapDirectory::new(level_dir))
    } else {
        Box::new(BuiltinLevels)
    };

    let mut game = Game::new(
        Box::new(FileStorage::new(&data_dir)),
        levels,
        Box::new(LogAudio),
        seed,
    );
    game.set_demo(true);
    let mut renderer = NullRenderer;

    for _ in 0..FRAME_LIMIT {
        // Confirm every menu with its default choice; the autopilot steers
        // once play starts.
        match game.phase() {
            Phase::GameIntro | Phase::TitleScreen | Phase::PlayIntro | Phase::ScoresAdd => {
                game.handle_input(InputEvent::KeyDown(Key::Enter));
                game.handle_input(InputEvent::KeyUp(Key::Enter));
            }
            Phase::ScoresView => break,
            _ => {}
        }
        game.update(FRAME_SECS);
        game.render(&mut renderer);
        if game.should_quit() {
            break;
        }
    }

    match game.round() {
        Some(round) => {
            let state = round.state();
            log::info!(
                "{} game finished at {} with {} points",
                state.mode.label(),
                state.level_label(),
                state.score
            );
        }
        None => log::warn!("No round was played"),
    }
    log::info!("Best score on record: {}", game.hiscores().top_score());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm host drives `Game` through `FrameHandler` directly
}
