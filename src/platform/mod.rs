//! Platform abstraction layer
//!
//! Handles the host side of the frame loop:
//! - Input events (buffered keys, held keys, pointer)
//! - Fixed-step timing
//! - Storage (settings and hiscores)
//!
//! The host owns the window and the frame loop and drives anything that
//! implements [`FrameHandler`] once per frame.

pub mod input;
pub mod storage;
pub mod time;

pub use input::{InputEvent, InputState, Key};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use time::FixedStep;

use crate::renderer::Renderer;

/// Contract between the host frame loop and the game
pub trait FrameHandler {
    fn handle_input(&mut self, event: InputEvent);
    /// Advance by one rendered frame of `frame_secs` seconds
    fn update(&mut self, frame_secs: f32);
    fn render(&mut self, renderer: &mut dyn Renderer);
    /// The game asked the process to exit
    fn should_quit(&self) -> bool;
}
