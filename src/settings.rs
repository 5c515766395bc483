//! Game settings and preferences
//!
//! Persisted separately from the hiscore table. Section and key names match
//! the classic `[Display]` / `[Sound]` layout.

use serde::{Deserialize, Serialize};

/// Window mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WindowMode {
    Fullscreen,
    #[default]
    Windowed,
}

impl WindowMode {
    pub fn toggled(self) -> Self {
        match self {
            WindowMode::Fullscreen => WindowMode::Windowed,
            WindowMode::Windowed => WindowMode::Fullscreen,
        }
    }
}

/// Frame cap used when capping is switched on
pub const DEFAULT_FRAME_CAP: f32 = 60.0;
/// Volume step for the options screen
pub const VOLUME_STEP: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplaySettings {
    pub display_width: u32,
    pub display_height: u32,
    pub color_depth: u32,
    pub window_mode: WindowMode,
    #[serde(rename = "EnableVSync")]
    pub enable_vsync: bool,
    pub enable_aliasing: bool,
    /// Frames per second; 0 means uncapped
    pub frame_cap: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            display_width: 960,
            display_height: 540,
            color_depth: 32,
            window_mode: WindowMode::Windowed,
            enable_vsync: false,
            enable_aliasing: false,
            frame_cap: DEFAULT_FRAME_CAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SoundSettings {
    /// 0 - 255
    pub music_volume: u8,
    /// 0 - 255
    pub effects_volume: u8,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            music_volume: 255,
            effects_volume: 255,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "Display")]
    pub display: DisplaySettings,
    #[serde(rename = "Sound")]
    pub sound: SoundSettings,
}

impl Settings {
    pub fn toggle_window_mode(&mut self) {
        self.display.window_mode = self.display.window_mode.toggled();
    }

    /// Switch between uncapped and the default cap
    pub fn toggle_frame_cap(&mut self) {
        self.display.frame_cap = if self.display.frame_cap > 0.0 {
            0.0
        } else {
            DEFAULT_FRAME_CAP
        };
    }

    pub fn toggle_vsync(&mut self) {
        self.display.enable_vsync = !self.display.enable_vsync;
    }

    /// Step the music volume, wrapping past either end
    pub fn step_music_volume(&mut self, up: bool) {
        self.sound.music_volume = step_volume(self.sound.music_volume, up);
    }

    /// Step the effects volume, wrapping past either end
    pub fn step_effects_volume(&mut self, up: bool) {
        self.sound.effects_volume = step_volume(self.sound.effects_volume, up);
    }
}

/// One volume step; running off the top lands on 0, off the bottom on 255.
pub fn step_volume(volume: u8, up: bool) -> u8 {
    let next = if up {
        i32::from(volume) + VOLUME_STEP
    } else {
        i32::from(volume) - VOLUME_STEP
    };
    match next {
        n if n > 255 => 0,
        n if n < 0 => 255,
        n => n as u8,
    }
}
