//! Input buffering
//!
//! Raw device polling happens upstream; controller buttons arrive already
//! mapped onto [`Key`] values (d-pad to arrows, A to Enter, B to Escape).

use std::collections::{HashSet, VecDeque};

use glam::IVec2;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
    Back,
    Delete,
    Space,
    /// Printable character, stored upper-case
    Char(char),
}

impl Key {
    /// Letter or digit key, case folded
    pub fn char(c: char) -> Self {
        Key::Char(c.to_ascii_uppercase())
    }
}

/// Events delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer position in internal-resolution pixels, y-up
    PointerMoved { x: i32, y: i32 },
    PointerButton { down: bool },
    FocusLost,
    FocusGained,
    TogglePause,
}

/// Most keys kept in the buffer; older presses are dropped
const BUFFER_LIMIT: usize = 16;

#[derive(Debug, Default)]
pub struct InputState {
    buffer: VecDeque<Key>,
    held: HashSet<Key>,
    pointer: IVec2,
    pointer_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press: buffered once, held until released
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            if self.buffer.len() == BUFFER_LIMIT {
                self.buffer.pop_front();
            }
            self.buffer.push_back(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Next buffered key press, oldest first
    pub fn take_key(&mut self) -> Option<Key> {
        self.buffer.pop_front()
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// First of `keys` currently held
    pub fn first_held(&self, keys: &[Key]) -> Option<Key> {
        keys.iter().copied().find(|k| self.held.contains(k))
    }

    pub fn all_released(&self, keys: &[Key]) -> bool {
        keys.iter().all(|k| !self.held.contains(k))
    }

    pub fn set_pointer(&mut self, x: i32, y: i32) {
        self.pointer = IVec2::new(x, y);
    }

    pub fn set_pointer_down(&mut self, down: bool) {
        self.pointer_down = down;
    }

    pub fn pointer(&self) -> IVec2 {
        self.pointer
    }

    pub fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Forget everything held (focus loss)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pointer_down = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_repeat_is_not_buffered_twice() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Up);
        assert_eq!(input.take_key(), Some(Key::Up));
        assert_eq!(input.take_key(), None);
        assert!(input.is_held(Key::Up));

        input.key_up(Key::Up);
        input.key_down(Key::Up);
        assert_eq!(input.take_key(), Some(Key::Up));
    }

    #[test]
    fn test_buffer_keeps_newest() {
        let mut input = InputState::new();
        for c in "ABCDEFGHIJKLMNOPQRST".chars() {
            input.key_down(Key::char(c));
            input.key_up(Key::char(c));
        }
        assert_eq!(input.take_key(), Some(Key::Char('E')));
    }

    #[test]
    fn test_held_queries() {
        let mut input = InputState::new();
        input.key_down(Key::char('y'));
        assert_eq!(input.first_held(&[Key::Enter, Key::Char('Y')]), Some(Key::Char('Y')));
        assert!(!input.all_released(&[Key::Char('Y')]));
        input.release_all();
        assert!(input.all_released(&[Key::Char('Y')]));
    }
}
