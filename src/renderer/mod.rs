//! Rendering interface
//!
//! The core decides what is on screen and with which alpha; the host decides
//! how it looks. Only the play-field calls are required, overlay calls
//! default to doing nothing.

use crate::game::menu::Menu;
use crate::game::name_entry::NameEntry;
use crate::highscores::HighScores;
use crate::settings::DisplaySettings;
use crate::sim::{Level, Rat, RoundState, Snake};

pub trait Renderer {
    fn render_level(&mut self, level: &Level, alpha: f32);
    /// Draw every segment at its current position
    fn render_snake(&mut self, snake: &Snake, alpha: f32);
    fn render_rat(&mut self, rat: &Rat, alpha: f32);

    /// Score, lives, world and level
    fn render_hud(&mut self, _round: &RoundState, _alpha: f32) {}
    fn render_menu(&mut self, _menu: &Menu, _alpha: f32) {}
    /// Centred text such as the logo, "GET READY" or "PAUSED"
    fn render_caption(&mut self, _text: &str, _alpha: f32) {}
    fn render_scores(&mut self, _scores: &HighScores, _highlight: Option<usize>, _alpha: f32) {}
    fn render_name_entry(&mut self, _entry: &NameEntry, _alpha: f32) {}
    /// Window size, mode and vsync changed
    fn apply_display(&mut self, _display: &DisplaySettings) {}
}

/// Renderer that draws nothing (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render_level(&mut self, _level: &Level, _alpha: f32) {}
    fn render_snake(&mut self, _snake: &Snake, _alpha: f32) {}
    fn render_rat(&mut self, _rat: &Rat, _alpha: f32) {}
}
