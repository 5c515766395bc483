//! Audio cues and volume mixing
//!
//! The game never touches an audio device itself. It names cues and tracks,
//! and a [`Mixer`] applies volume and mute state before handing them to an
//! [`AudioSink`] supplied by the host.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Menu highlight moved
    MenuMove,
    /// Menu option chosen
    MenuSelect,
    /// Snake head changed direction
    SnakeTurn,
    /// Snake grew after a meal
    SnakeGrow,
    /// Snake crashed
    SnakeDie,
    /// Rat took a step
    RatMove,
    /// Rat was eaten
    RatDie,
}

/// Looping music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Title,
    Game,
}

/// Centre of the stereo field
pub const PAN_CENTER: u8 = 128;

/// Device-side audio output, implemented by the host
pub trait AudioSink {
    /// Fire a one-shot effect. `volume` and `pan` are 0 - 255.
    fn play_effect(&mut self, effect: SoundEffect, volume: u8, pan: u8);
    fn start_music(&mut self, track: MusicTrack, volume: u8);
    fn stop_music(&mut self);
    fn set_music_volume(&mut self, volume: u8);
    /// Suspend or resume all output (window focus)
    fn set_paused(&mut self, _paused: bool) {}
}

/// Sink that only logs cues
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play_effect(&mut self, effect: SoundEffect, volume: u8, pan: u8) {
        log::debug!("sfx {effect:?} vol={volume} pan={pan}");
    }

    fn start_music(&mut self, track: MusicTrack, volume: u8) {
        log::debug!("music start {track:?} vol={volume}");
    }

    fn stop_music(&mut self) {
        log::debug!("music stop");
    }

    fn set_music_volume(&mut self, volume: u8) {
        log::debug!("music volume {volume}");
    }
}

/// Audio manager for the game
pub struct Mixer {
    sink: Box<dyn AudioSink>,
    music_volume: u8,
    effects_volume: u8,
    music_muted: bool,
    effects_muted: bool,
    track: Option<MusicTrack>,
}

impl Mixer {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            music_volume: 255,
            effects_volume: 255,
            music_muted: false,
            effects_muted: false,
            track: None,
        }
    }

    pub fn set_effects_volume(&mut self, volume: u8) {
        self.effects_volume = volume;
    }

    /// Set the music volume and apply it to the playing track
    pub fn set_music_volume(&mut self, volume: u8) {
        self.music_volume = volume;
        if self.track.is_some() {
            self.sink.set_music_volume(self.effective_music_volume());
        }
    }

    /// Scale the playing track without changing the stored volume (fades)
    pub fn fade_music(&mut self, factor: f32) {
        if self.track.is_some() {
            let scaled = f32::from(self.effective_music_volume()) * factor.clamp(0.0, 1.0);
            self.sink.set_music_volume(scaled as u8);
        }
    }

    pub fn toggle_music_mute(&mut self) {
        self.music_muted = !self.music_muted;
        if self.track.is_some() {
            self.sink.set_music_volume(self.effective_music_volume());
        }
    }

    pub fn toggle_effects_mute(&mut self) {
        self.effects_muted = !self.effects_muted;
    }

    fn effective_music_volume(&self) -> u8 {
        if self.music_muted { 0 } else { self.music_volume }
    }

    fn effective_effects_volume(&self) -> u8 {
        if self.effects_muted { 0 } else { self.effects_volume }
    }

    /// Play a centred sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        self.play_at(effect, 255, PAN_CENTER);
    }

    /// Play a sound effect at a relative volume (0 - 255) and pan
    pub fn play_at(&mut self, effect: SoundEffect, volume: u8, pan: u8) {
        let volume = (u32::from(volume) * u32::from(self.effective_effects_volume()) / 255) as u8;
        if volume == 0 {
            return;
        }
        self.sink.play_effect(effect, volume, pan);
    }

    pub fn play_music(&mut self, track: MusicTrack) {
        self.track = Some(track);
        self.sink.start_music(track, self.effective_music_volume());
    }

    pub fn stop_music(&mut self) {
        if self.track.take().is_some() {
            self.sink.stop_music();
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.track.is_some()
    }

    pub fn current_track(&self) -> Option<MusicTrack> {
        self.track
    }

    pub fn music_muted(&self) -> bool {
        self.music_muted
    }

    pub fn effects_muted(&self) -> bool {
        self.effects_muted
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.sink.set_paused(paused);
    }
}

/// Stereo pan for an x position inside `0..width`
pub fn pan_for(x: i32, width: i32) -> u8 {
    if width <= 0 {
        return PAN_CENTER;
    }
    (x.clamp(0, width) as f32 / width as f32 * 255.0).round() as u8
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// What a sink was asked to do, in order
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Cue {
        Effect(SoundEffect, u8),
        Start(MusicTrack, u8),
        Stop,
        Volume(u8),
    }

    /// Sink recording every call into a shared log
    #[derive(Default, Clone)]
    pub(crate) struct Recorder(pub Rc<RefCell<Vec<Cue>>>);

    impl AudioSink for Recorder {
        fn play_effect(&mut self, effect: SoundEffect, volume: u8, _pan: u8) {
            self.0.borrow_mut().push(Cue::Effect(effect, volume));
        }

        fn start_music(&mut self, track: MusicTrack, volume: u8) {
            self.0.borrow_mut().push(Cue::Start(track, volume));
        }

        fn stop_music(&mut self) {
            self.0.borrow_mut().push(Cue::Stop);
        }

        fn set_music_volume(&mut self, volume: u8) {
            self.0.borrow_mut().push(Cue::Volume(volume));
        }
    }

    #[test]
    fn test_effects_scale_and_mute() {
        let recorder = Recorder::default();
        let mut mixer = Mixer::new(Box::new(recorder.clone()));
        mixer.set_effects_volume(128);
        mixer.play_at(SoundEffect::RatMove, 255, PAN_CENTER);
        mixer.toggle_effects_mute();
        mixer.play(SoundEffect::SnakeTurn);
        assert_eq!(
            *recorder.0.borrow(),
            vec![Cue::Effect(SoundEffect::RatMove, 128)]
        );
    }

    #[test]
    fn test_music_mute_and_stop() {
        let recorder = Recorder::default();
        let mut mixer = Mixer::new(Box::new(recorder.clone()));
        mixer.play_music(MusicTrack::Game);
        mixer.toggle_music_mute();
        mixer.stop_music();
        mixer.stop_music();
        assert!(!mixer.is_music_playing());
        assert_eq!(
            *recorder.0.borrow(),
            vec![Cue::Start(MusicTrack::Game, 255), Cue::Volume(0), Cue::Stop]
        );
    }

    #[test]
    fn test_pan() {
        assert_eq!(pan_for(0, 960), 0);
        assert_eq!(pan_for(960, 960), 255);
        assert_eq!(pan_for(480, 960), 128);
    }
}
