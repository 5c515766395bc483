//! Hiscore name editor
//!
//! A fixed ten-character field. `.` is the blank character; Up/Down cycle a
//! slot through `.`, `0-9`, `A-Z`.

use crate::highscores::NAME_LENGTH;

const BLANK: char = '.';
/// Name stored when the player leaves every slot blank
pub const DEFAULT_NAME: &str = "PLAYER.1..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    chars: [char; NAME_LENGTH],
    cursor: usize,
}

impl Default for NameEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl NameEntry {
    pub fn new() -> Self {
        Self {
            chars: [BLANK; NAME_LENGTH],
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Field contents, blanks included
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Name to store
    pub fn name(&self) -> String {
        if self.chars.iter().all(|c| *c == BLANK) {
            DEFAULT_NAME.to_string()
        } else {
            self.text()
        }
    }

    pub fn cycle_up(&mut self) {
        let c = &mut self.chars[self.cursor];
        *c = match *c {
            BLANK => '0',
            '9' => 'A',
            'Z' => BLANK,
            other => char::from_u32(other as u32 + 1).unwrap_or(BLANK),
        };
    }

    pub fn cycle_down(&mut self) {
        let c = &mut self.chars[self.cursor];
        *c = match *c {
            BLANK => 'Z',
            'A' => '9',
            '0' => BLANK,
            other => char::from_u32(other as u32 - 1).unwrap_or(BLANK),
        };
    }

    pub fn move_left(&mut self) {
        self.cursor = (self.cursor + NAME_LENGTH - 1) % NAME_LENGTH;
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1) % NAME_LENGTH;
    }

    /// Remove the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.remove_at(self.cursor);
        }
    }

    /// Remove the character under the cursor
    pub fn delete(&mut self) {
        self.remove_at(self.cursor);
    }

    fn remove_at(&mut self, index: usize) {
        self.chars.copy_within(index + 1.., index);
        self.chars[NAME_LENGTH - 1] = BLANK;
    }

    /// Write a letter or digit and advance; anything else is ignored
    pub fn type_char(&mut self, c: char) -> bool {
        if !c.is_ascii_alphanumeric() {
            return false;
        }
        self.put(c.to_ascii_uppercase());
        true
    }

    /// Write a blank and advance
    pub fn blank(&mut self) {
        self.put(BLANK);
    }

    fn put(&mut self, c: char) {
        self.chars[self.cursor] = c;
        self.cursor = (self.cursor + 1).min(NAME_LENGTH - 1);
    }
}
