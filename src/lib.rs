//! Cyber Snake - A tile-based snake arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake, rat, level grid, round rules)
//! - `game`: Game progress state machine (intro, title, options, play, hiscores)
//! - `platform`: Input buffering, fixed-step timing, storage backends
//! - `audio`: Sound cue ids and volume/mute mixer over an audio sink
//! - `renderer`: Draw calls the core produces for an external renderer

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, Phase};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (movement timers are driven at this rate)
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Milliseconds represented by one tick
    pub const TICK_MS: f32 = 1000.0 / TICKS_PER_SECOND;

    /// Internal resolution everything is laid out in
    pub const INTERNAL_WIDTH: i32 = 960;
    pub const INTERNAL_HEIGHT: i32 = 540;

    /// Grid cell size in pixels (one movement step)
    pub const TILE_SIZE: i32 = 16;
    /// Level grid dimensions
    pub const LEVEL_ROWS: usize = 30;
    pub const LEVEL_COLS: usize = 60;
    /// Play area covered by the level grid (origin bottom-left, y-up)
    pub const PLAY_AREA_WIDTH: i32 = LEVEL_COLS as i32 * TILE_SIZE;
    pub const PLAY_AREA_HEIGHT: i32 = LEVEL_ROWS as i32 * TILE_SIZE;

    /// Tile id marking a passable cell
    pub const CLEAR_TILE_ID: u16 = 0;
    pub const MIN_LEVEL: u32 = 1;
    pub const MAX_LEVEL: u32 = 10;

    /// Snake defaults
    pub const SNAKE_MAX_LENGTH: usize = 200;
    pub const SNAKE_START_LENGTH: usize = 2;
    pub const SNAKE_MIN_INTERVAL: u32 = 10;
    pub const SNAKE_MAX_INTERVAL: u32 = 100;
    pub const SNAKE_SPEEDUP_STEP: u32 = 5;
    /// Ticks the death burst and fade take before the snake is declared dead
    pub const SNAKE_DEATH_TICKS: u32 = 46;

    /// Rat defaults
    pub const RAT_MIN_INTERVAL: u32 = 100;
    pub const RAT_MAX_INTERVAL: u32 = 500;
    pub const RAT_SPEEDUP_STEP: u32 = 30;
    /// Random placement attempts before falling back to a grid scan
    pub const RESPAWN_ATTEMPTS: u32 = 10_000;

    /// Round rules
    pub const RATS_PER_LEVEL: u32 = 10;
    pub const BASE_SCORE: u64 = 10;
    pub const DEFAULT_LIVES: i32 = 5;
    /// Segments added for every rat eaten
    pub const GROWTH_PER_RAT: usize = 16;
    /// Extra speed-ups applied at every level start in hard mode
    pub const HARD_MODE_SPEEDUPS: u32 = 3;
}

/// Report a non-fatal error with a context label.
///
/// The game keeps running in a degraded mode after every reported error.
pub fn report_error(context: &str, message: &str) {
    log::error!("[{context}] {message}");
}
