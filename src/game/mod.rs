//! Game progress state machine
//!
//! [`Game`] is the context object the host drives once per frame. It owns the
//! current/previous/next phase slots, the scratch state of the running phase,
//! the round in progress, and the collaborators (storage, audio, levels).
//!
//! Every phase follows the same contract each frame:
//! 1. entry work when `PhaseState::initialized` is false
//! 2. the phase's own logic, which may set a new current phase
//! 3. exit work, exactly once, when the current phase changed

pub mod menu;
pub mod name_entry;
pub mod phase;


pub use phase::{Phase, PhaseFamily, PhaseState};

use crate::audio::{AudioSink, Mixer, MusicTrack, SoundEffect, pan_for};
use crate::consts::{PLAY_AREA_WIDTH, TICKS_PER_SECOND};
use crate::highscores::{HighScoreEntry, HighScores};
use crate::platform::{FixedStep, FrameHandler, InputEvent, InputState, Key, Storage};
use crate::renderer::Renderer;
use crate::settings::{Settings, WindowMode};
use crate::sim::{Direction, GameMode, LevelSource, Round, RoundEvent, autopilot};
use menu::{Menu, PointerAction};
use name_entry::NameEntry;

const TITLE_ITEMS: [&str; 4] = ["PLAY GAME", "VIEW HISCORES", "SET OPTIONS", "QUIT GAME"];
const TITLE_QUIT: usize = 3;
/// Idle actions on the title screen before the hiscores are shown
const TITLE_ATTRACT_ACTIONS: f32 = 1200.0;

const OPT_FULLSCREEN: usize = 0;
const OPT_FRAME_CAP: usize = 1;
const OPT_VSYNC: usize = 2;
const OPT_MUSIC: usize = 4;
const OPT_EFFECTS: usize = 5;
const OPT_DONE: usize = 7;

const MODE_ITEMS: [(&str, GameMode); 3] = [
    ("CLASSIC", GameMode::Easy),
    ("REMIX", GameMode::Normal),
    ("HARD", GameMode::Hard),
];

const EXIT_YES: usize = 0;
const EXIT_NO: usize = 1;
const EXIT_KEYS: [Key; 6] = [
    Key::Up,
    Key::Down,
    Key::Enter,
    Key::Escape,
    Key::Char('Y'),
    Key::Char('N'),
];

const GET_READY_STEPS: u32 = 3;
const PLAY_OUTRO_ACTIONS: u32 = 125;
const SCORES_VIEW_ACTIONS: f32 = 900.0;
/// Actions between repeats of a held Up/Down in the name editor
const NAME_REPEAT_ACTIONS: f32 = 5.0;

const LOGO: &str = "CYBER SNAKE";

pub struct Game {
    phase: Phase,
    previous: Phase,
    next: Phase,
    state: PhaseState,

    paused: bool,
    quit: bool,
    demo: bool,

    input: InputState,
    settings: Settings,
    hiscores: HighScores,
    /// Row the last score went to (highlighted in the hiscore view)
    score_index: Option<usize>,

    mode: GameMode,
    round: Option<Round>,
    events: Vec<RoundEvent>,
    clock: FixedStep,
    seed: u64,
    rounds_started: u64,

    levels: Box<dyn LevelSource>,
    storage: Box<dyn Storage>,
    audio: Mixer,
    /// Display settings changed since the renderer last saw them
    display_dirty: bool,
}

impl Game {
    pub fn new(
        storage: Box<dyn Storage>,
        levels: Box<dyn LevelSource>,
        audio: Box<dyn AudioSink>,
        seed: u64,
    ) -> Self {
        let settings = storage.load_settings().unwrap_or_else(|e| {
            log::info!("Using default settings ({e})");
            Settings::default()
        });
        let hiscores = storage.load_scores().unwrap_or_else(|e| {
            log::info!("No high scores found, starting fresh ({e})");
            HighScores::new()
        });

        let mut audio = Mixer::new(audio);
        audio.set_music_volume(settings.sound.music_volume);
        audio.set_effects_volume(settings.sound.effects_volume);

        Self {
            phase: Phase::GameIntro,
            previous: Phase::GameIntro,
            next: Phase::TitleIntro,
            state: PhaseState::default(),
            paused: false,
            quit: false,
            demo: false,
            input: InputState::new(),
            settings,
            hiscores,
            score_index: None,
            mode: GameMode::default(),
            round: None,
            events: Vec::new(),
            clock: FixedStep::new(TICKS_PER_SECOND),
            seed,
            rounds_started: 0,
            levels,
            storage,
            audio,
            display_dirty: true,
        }
    }

    /// Let the autopilot steer during play
    pub fn set_demo(&mut self, demo: bool) {
        self.demo = demo;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn previous_phase(&self) -> Phase {
        self.previous
    }

    pub fn next_phase(&self) -> Phase {
        self.next
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hiscores(&self) -> &HighScores {
        &self.hiscores
    }

    pub fn score_index(&self) -> Option<usize> {
        self.score_index
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn audio(&self) -> &Mixer {
        &self.audio
    }

    fn goto(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn enter(&mut self, phase: Phase) {
        self.state = PhaseState::entered(self.input.pointer());
        match phase {
            Phase::GameIntro => {
                self.input.clear_buffer();
                self.next = Phase::TitleIntro;
            }
            Phase::GameOutro => {
                self.input.clear_buffer();
                self.state.alpha = 1.0;
                self.audio.stop_music();
            }
            Phase::TitleIntro => self.next = Phase::TitleScreen,
            Phase::TitleScreen => {
                self.state.menu = Some(Menu::new(None, &TITLE_ITEMS));
                self.state.alpha = 1.0;
                self.state.glow = 1.0;
                if !self.audio.is_music_playing() {
                    self.audio.play_music(MusicTrack::Title);
                }
            }
            Phase::TitleOutro => self.state.alpha = 1.0,
            Phase::OptionsScreen => {
                let mut menu = Menu::new(
                    Some("OPTIONS"),
                    &["", "", "", "", "", "", "", "DONE"],
                );
                self.refresh_option_labels(&mut menu);
                menu.set_highlight(OPT_FULLSCREEN);
                self.state.menu = Some(menu);
                self.state.alpha = 1.0;
            }
            Phase::PlayIntro => {
                self.audio.stop_music();
                let labels = MODE_ITEMS.map(|(label, _)| label);
                let mut menu = Menu::new(Some("SELECT GAME MODE"), &labels);
                menu.set_highlight(1);
                self.state.menu = Some(menu);
                self.state.alpha = 1.0;
                self.next = Phase::PlayGame;
            }
            Phase::PlayGame => {
                self.state.alpha = 1.0;
                self.input.clear_buffer();
                self.clock.reset();
                if self.previous == Phase::PlayIntro || self.round.is_none() {
                    self.start_round();
                    self.goto(Phase::PlayUpdate);
                }
            }
            Phase::PlayUpdate => {
                self.state.alpha = 1.0;
                self.state.countdown = GET_READY_STEPS;
            }
            Phase::PlayPause => {
                self.state.alpha = 1.0;
                self.audio.play(SoundEffect::MenuMove);
            }
            Phase::PlayExit => {
                self.state.menu = Some(Menu::new(Some("END GAME?"), &["YES", "NO"]));
                self.state.alpha = 1.0;
            }
            Phase::PlayOutro => self.state.alpha = 1.0,
            Phase::ScoresView => {
                self.input.clear_buffer();
                self.state.alpha = 1.0;
                self.next = Phase::ScoresOutro;
            }
            Phase::ScoresAdd => {
                self.input.clear_buffer();
                self.state.alpha = 1.0;
                self.state.name = Some(NameEntry::new());
                if self.score_index.is_none() {
                    self.score_index = self.hiscores.insertion_index(self.final_score());
                }
                if self.score_index.is_none() {
                    self.goto(Phase::ScoresOutro);
                }
            }
            Phase::OptionsIntro
            | Phase::OptionsOutro
            | Phase::ScoresIntro
            | Phase::ScoresOutro => {}
        }
    }

    fn exit(&mut self, phase: Phase) {
        if !phase.can_transition_to(self.phase) {
            log::warn!("Unexpected transition {phase:?} -> {:?}", self.phase);
        }
        log::info!("Phase {phase:?} -> {:?}", self.phase);
        self.previous = phase;
        self.state = PhaseState::default();

        match phase {
            Phase::GameIntro => {
                if !self.audio.is_music_playing() {
                    self.audio.play_music(MusicTrack::Title);
                }
            }
            Phase::OptionsScreen => {
                if let Err(e) = self.storage.save_settings(&self.settings) {
                    log::warn!("Settings not saved: {e}");
                }
                self.display_dirty = true;
            }
            Phase::PlayIntro if self.phase == Phase::PlayGame => {
                self.audio.play_music(MusicTrack::Game);
            }
            Phase::PlayOutro => {
                self.audio.set_music_volume(self.settings.sound.music_volume);
                self.audio.set_effects_volume(self.settings.sound.effects_volume);
                self.audio.stop_music();
            }
            Phase::ScoresView => self.score_index = None,
            Phase::ScoresAdd => {
                if let Err(e) = self.storage.save_scores(&self.hiscores) {
                    log::warn!("High scores not saved: {e}");
                }
            }
            _ => {}
        }
    }

    fn start_round(&mut self) {
        let seed = self.seed.wrapping_add(self.rounds_started);
        self.rounds_started += 1;
        self.round = Some(Round::new(self.mode, seed, self.levels.as_ref()));
        self.score_index = None;
    }

    fn final_score(&self) -> u64 {
        self.round.as_ref().map(|r| r.state().score).unwrap_or(0)
    }

    // === Game ===

    fn game_intro(&mut self, frame_secs: f32) {
        for _ in 0..self.state.actions(frame_secs) {
            self.state.counter += 1;
            match self.state.counter {
                50..150 => self.state.alpha += 0.025,
                150..250 => self.state.alpha -= 0.025,
                _ => {}
            }
            if self.state.counter >= 250 {
                self.goto(self.next);
                return;
            }
        }
        self.state.alpha = self.state.alpha.clamp(0.0, 1.0);
        if self.input.take_key().is_some() {
            self.goto(self.next);
        }
    }

    fn game_outro(&mut self, frame_secs: f32) {
        if self.input.take_key().is_some() {
            self.request_quit();
            return;
        }
        for _ in 0..self.state.actions(frame_secs) {
            self.state.counter += 1;
            if (350..400).contains(&self.state.counter) {
                self.state.alpha = (self.state.alpha - 0.025).max(0.0);
            }
            if self.state.counter >= 400 {
                self.request_quit();
                return;
            }
        }
    }

    fn request_quit(&mut self) {
        if !self.quit {
            log::info!("Quit requested");
        }
        self.quit = true;
    }

    // === Title ===

    fn title_intro(&mut self, frame_secs: f32) {
        self.state.alpha += 0.025 * frame_secs * TICKS_PER_SECOND;
        if self.state.alpha >= 1.0 {
            self.state.alpha = 1.0;
            self.goto(self.next);
        }
    }

    fn title_screen(&mut self, frame_secs: f32) {
        let actions = self.state.actions(frame_secs);
        for _ in 0..actions {
            self.state.pulse_glow();
        }
        self.state.idle += actions as f32;
        if self.state.idle >= TITLE_ATTRACT_ACTIONS {
            self.next = Phase::ScoresIntro;
            self.goto(Phase::TitleOutro);
            return;
        }

        let Some(mut menu) = self.state.menu.take() else {
            return;
        };
        let mut chosen = match self.poll_pointer(&menu) {
            PointerAction::Select(index) => Some(index),
            PointerAction::Hover(index) => {
                menu.set_highlight(index);
                self.audio.play(SoundEffect::MenuMove);
                None
            }
            PointerAction::None => None,
        };

        if let Some(key) = self.input.take_key() {
            self.state.idle = 0.0;
            match key {
                Key::Up => {
                    menu.highlight_prev();
                    self.audio.play(SoundEffect::MenuMove);
                }
                Key::Down => {
                    menu.highlight_next();
                    self.audio.play(SoundEffect::MenuMove);
                }
                Key::Enter => chosen = Some(menu.highlight()),
                Key::Escape => {
                    if menu.highlight() == TITLE_QUIT {
                        chosen = Some(TITLE_QUIT);
                    } else {
                        menu.set_highlight(TITLE_QUIT);
                        self.audio.play(SoundEffect::MenuMove);
                    }
                }
                _ => {}
            }
        }

        if let Some(index) = chosen {
            self.audio.play(SoundEffect::MenuSelect);
            self.next = match index {
                0 => Phase::PlayIntro,
                1 => Phase::ScoresIntro,
                2 => Phase::OptionsIntro,
                _ => Phase::GameOutro,
            };
            self.goto(Phase::TitleOutro);
        }
        self.state.menu = Some(menu);
    }

    fn title_outro(&mut self, frame_secs: f32) {
        self.state.alpha -= 0.025 * frame_secs * TICKS_PER_SECOND;
        if self.state.alpha <= 0.0 {
            self.state.alpha = 0.0;
            self.goto(self.next);
        }
    }

    fn poll_pointer(&mut self, menu: &Menu) -> PointerAction {
        let pointer = self.input.pointer();
        let down = self.input.pointer_down();
        self.state.pointer.poll(menu, pointer, down)
    }

    // === Options ===

    fn refresh_option_labels(&self, menu: &mut Menu) {
        let on_off = |on: bool| if on { "ON" } else { "OFF" };
        let display = &self.settings.display;
        let fullscreen = display.window_mode == WindowMode::Fullscreen;
        menu.set_item(OPT_FULLSCREEN, format!("FULLSCREEN: {}", on_off(fullscreen)));
        menu.set_item(
            OPT_FRAME_CAP,
            format!("FRAME CAP: {}", on_off(display.frame_cap > 0.0)),
        );
        menu.set_item(OPT_VSYNC, format!("VSYNC: {}", on_off(display.enable_vsync)));
        menu.set_item(
            OPT_MUSIC,
            format!("MUSIC VOLUME: {:03}", self.settings.sound.music_volume),
        );
        menu.set_item(
            OPT_EFFECTS,
            format!("SOUND FX VOLUME: {:03}", self.settings.sound.effects_volume),
        );
    }

    fn step_volume(&mut self, item: usize, up: bool) {
        if item == OPT_MUSIC {
            self.settings.step_music_volume(up);
            self.audio.set_music_volume(self.settings.sound.music_volume);
        } else {
            self.settings.step_effects_volume(up);
            self.audio.set_effects_volume(self.settings.sound.effects_volume);
            self.audio.play(SoundEffect::MenuMove);
        }
    }

    fn activate_option(&mut self, item: usize) {
        match item {
            OPT_FULLSCREEN => self.settings.toggle_window_mode(),
            OPT_FRAME_CAP => self.settings.toggle_frame_cap(),
            OPT_VSYNC => self.settings.toggle_vsync(),
            OPT_MUSIC | OPT_EFFECTS => self.step_volume(item, true),
            OPT_DONE => {
                self.goto(Phase::OptionsOutro);
                return;
            }
            _ => return,
        }
        self.audio.play(SoundEffect::MenuSelect);
    }

    fn options_screen(&mut self) {
        let Some(mut menu) = self.state.menu.take() else {
            return;
        };
        match self.poll_pointer(&menu) {
            PointerAction::Select(index) => {
                menu.set_highlight(index);
                self.activate_option(index);
            }
            PointerAction::Hover(index) => {
                menu.set_highlight(index);
                self.audio.play(SoundEffect::MenuMove);
            }
            PointerAction::None => {}
        }

        if let Some(key) = self.input.take_key() {
            let item = menu.highlight();
            match key {
                Key::Up => {
                    menu.highlight_prev();
                    self.audio.play(SoundEffect::MenuMove);
                }
                Key::Down => {
                    menu.highlight_next();
                    self.audio.play(SoundEffect::MenuMove);
                }
                Key::Left | Key::Right if item == OPT_MUSIC || item == OPT_EFFECTS => {
                    self.step_volume(item, key == Key::Right);
                }
                Key::Enter => self.activate_option(item),
                Key::Escape => self.goto(Phase::OptionsOutro),
                _ => {}
            }
        }

        self.refresh_option_labels(&mut menu);
        self.state.menu = Some(menu);
    }

    // === Play ===

    fn play_intro(&mut self) {
        let Some(mut menu) = self.state.menu.take() else {
            return;
        };
        let mut chosen = match self.poll_pointer(&menu) {
            PointerAction::Select(index) => Some(index),
            PointerAction::Hover(index) => {
                menu.set_highlight(index);
                self.audio.play(SoundEffect::MenuMove);
                None
            }
            PointerAction::None => None,
        };

        match self.input.take_key() {
            Some(Key::Up) => {
                menu.highlight_prev();
                self.audio.play(SoundEffect::MenuMove);
            }
            Some(Key::Down) => {
                menu.highlight_next();
                self.audio.play(SoundEffect::MenuMove);
            }
            Some(Key::Enter) => chosen = Some(menu.highlight()),
            Some(Key::Escape) => {
                self.goto(Phase::TitleIntro);
                return;
            }
            _ => {}
        }

        if let Some(index) = chosen {
            self.mode = MODE_ITEMS[index.min(MODE_ITEMS.len() - 1)].1;
            self.audio.play(SoundEffect::MenuSelect);
            self.goto(self.next);
        }
        self.state.menu = Some(menu);
    }

    fn play_game(&mut self, frame_secs: f32) {
        if self.paused {
            self.goto(Phase::PlayPause);
            return;
        }

        match self.input.take_key() {
            Some(Key::Up) => self.steer(Direction::Up),
            Some(Key::Down) => self.steer(Direction::Down),
            Some(Key::Left) => self.steer(Direction::Left),
            Some(Key::Right) => self.steer(Direction::Right),
            Some(Key::Char('M')) => self.audio.toggle_music_mute(),
            Some(Key::Char('S')) => self.audio.toggle_effects_mute(),
            Some(Key::Escape) => {
                self.goto(Phase::PlayExit);
                return;
            }
            Some(_) => self.input.clear_buffer(),
            None => {}
        }

        if self.demo {
            if let Some(direction) = self.round.as_ref().and_then(autopilot::steer) {
                self.steer(direction);
            }
        }

        self.clock.advance(frame_secs);
        while self.clock.consume() {
            let Some(round) = self.round.as_mut() else {
                break;
            };
            round.tick(self.levels.as_ref(), &mut self.events);

            let mut events = std::mem::take(&mut self.events);
            for event in events.drain(..) {
                self.on_round_event(event);
            }
            self.events = events;

            if self.phase != Phase::PlayGame {
                break;
            }
        }
    }

    fn steer(&mut self, direction: Direction) {
        if let Some(round) = self.round.as_mut() {
            round.steer(direction);
        }
    }

    fn on_round_event(&mut self, event: RoundEvent) {
        match event {
            RoundEvent::SnakeTurned => self.audio.play(SoundEffect::SnakeTurn),
            RoundEvent::SnakeDied => self.audio.play(SoundEffect::SnakeDie),
            RoundEvent::SnakeGrew => self.audio.play(SoundEffect::SnakeGrow),
            RoundEvent::RatEaten { pos, .. } => {
                self.audio
                    .play_at(SoundEffect::RatDie, 255, pan_for(pos.x, PLAY_AREA_WIDTH));
            }
            RoundEvent::RatMoved { pos } => {
                self.audio
                    .play_at(SoundEffect::RatMove, 63, pan_for(pos.x, PLAY_AREA_WIDTH));
            }
            RoundEvent::LifeLost { .. } | RoundEvent::LevelAdvanced { .. } => {
                self.input.clear_buffer();
                self.goto(Phase::PlayUpdate);
            }
            RoundEvent::RoundOver => self.goto(Phase::PlayOutro),
        }
    }

    fn play_update(&mut self, frame_secs: f32) {
        if self.paused {
            self.goto(Phase::PlayPause);
            return;
        }
        self.state.alpha -= 0.02 * frame_secs * TICKS_PER_SECOND;
        if self.state.alpha <= 0.0 {
            self.state.countdown = self.state.countdown.saturating_sub(1);
            if self.state.countdown == 0 {
                self.goto(Phase::PlayGame);
            } else {
                self.state.alpha = 1.0;
            }
        }
    }

    fn play_pause(&mut self) {
        if !self.paused {
            self.audio.play(SoundEffect::MenuSelect);
            self.goto(self.previous);
        }
    }

    fn play_exit(&mut self) {
        self.input.clear_buffer();
        let Some(mut menu) = self.state.menu.take() else {
            return;
        };

        let mut chosen = match self.poll_pointer(&menu) {
            PointerAction::Select(index) => Some(index),
            PointerAction::Hover(index) => {
                menu.set_highlight(index);
                self.audio.play(SoundEffect::MenuMove);
                None
            }
            PointerAction::None => None,
        };

        if !self.state.keys_released {
            self.state.keys_released = self.input.all_released(&EXIT_KEYS);
        } else if let Some(key) = self.input.first_held(&EXIT_KEYS) {
            self.state.keys_released = false;
            match key {
                Key::Up => {
                    menu.highlight_prev();
                    self.audio.play(SoundEffect::MenuMove);
                }
                Key::Down => {
                    menu.highlight_next();
                    self.audio.play(SoundEffect::MenuMove);
                }
                Key::Char('Y') => chosen = Some(EXIT_YES),
                Key::Char('N') | Key::Escape => chosen = Some(EXIT_NO),
                _ => chosen = Some(menu.highlight()),
            }
        }

        if let Some(index) = chosen {
            self.audio.play(SoundEffect::MenuSelect);
            self.goto(if index == EXIT_YES {
                Phase::PlayOutro
            } else {
                Phase::PlayGame
            });
        }
        self.state.menu = Some(menu);
    }

    fn play_outro(&mut self, frame_secs: f32) {
        for _ in 0..self.state.actions(frame_secs) {
            if self.state.counter < PLAY_OUTRO_ACTIONS {
                self.state.counter += 1;
                self.state.alpha = (self.state.alpha - 0.01).max(0.0);
                self.audio.fade_music(self.state.alpha);
                continue;
            }
            let score = self.final_score();
            self.next = if self.hiscores.qualifies(score) {
                self.score_index = self.hiscores.insertion_index(score);
                Phase::ScoresAdd
            } else {
                Phase::ScoresView
            };
            self.goto(Phase::ScoresIntro);
            return;
        }
    }

    // === Scores ===

    fn scores_intro(&mut self) {
        if self.next != Phase::ScoresAdd {
            self.next = Phase::ScoresView;
        }
        self.goto(self.next);
    }

    fn scores_view(&mut self, frame_secs: f32) {
        self.state.idle += self.state.actions(frame_secs) as f32;
        if self.state.idle >= SCORES_VIEW_ACTIONS || self.input.take_key().is_some() {
            self.goto(self.next);
        }
    }

    fn scores_add(&mut self, frame_secs: f32) {
        let Some(mut entry) = self.state.name.take() else {
            return;
        };
        let actions = self.state.actions(frame_secs) as f32;

        let key = match self.input.take_key() {
            Some(key) => {
                self.state.idle = 0.0;
                Some(key)
            }
            None => match self.input.first_held(&[Key::Up, Key::Down]) {
                Some(held) => {
                    self.state.idle += actions;
                    if self.state.idle >= NAME_REPEAT_ACTIONS {
                        self.state.idle = 0.0;
                        Some(held)
                    } else {
                        None
                    }
                }
                None => {
                    self.state.idle = 0.0;
                    None
                }
            },
        };

        match key {
            Some(Key::Up) => entry.cycle_up(),
            Some(Key::Down) => entry.cycle_down(),
            Some(Key::Left) => entry.move_left(),
            Some(Key::Right) => entry.move_right(),
            Some(Key::Back) => entry.backspace(),
            Some(Key::Delete) => entry.delete(),
            Some(Key::Space) | Some(Key::Char('.')) => entry.blank(),
            Some(Key::Char(c)) => {
                entry.type_char(c);
            }
            Some(Key::Enter) => {
                self.commit_score(&entry);
                self.audio.play(SoundEffect::MenuSelect);
                self.goto(Phase::ScoresOutro);
            }
            Some(Key::Escape) => {
                self.score_index = None;
                self.goto(Phase::ScoresOutro);
            }
            None => {}
        }
        if matches!(key, Some(Key::Up | Key::Down)) {
            self.audio.play(SoundEffect::MenuMove);
        }
        self.state.name = Some(entry);
    }

    fn commit_score(&mut self, entry: &NameEntry) {
        let Some(index) = self.score_index else {
            return;
        };
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let state = round.state();
        self.hiscores.insert(
            index,
            HighScoreEntry {
                name: entry.name(),
                mode: state.mode.label().to_string(),
                level: state.level_label(),
                score: state.score,
            },
        );
        log::info!("New high score {} at rank {}", state.score, index + 1);
    }

    fn scores_outro(&mut self) {
        if self.previous == Phase::ScoresAdd {
            self.next = Phase::ScoresView;
            self.goto(Phase::ScoresIntro);
        } else {
            self.goto(Phase::TitleIntro);
        }
    }

    // === Rendering ===

    fn render_play_field(&self, renderer: &mut dyn Renderer, alpha: f32) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        renderer.render_level(round.level(), alpha);
        renderer.render_rat(round.rat(), alpha * round.rat().alpha());
        renderer.render_snake(round.snake(), alpha * round.snake().alpha());
        renderer.render_hud(round.state(), alpha);
    }
}

impl FrameHandler for Game {
    fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.input.key_down(key),
            InputEvent::KeyUp(key) => self.input.key_up(key),
            InputEvent::PointerMoved { x, y } => self.input.set_pointer(x, y),
            InputEvent::PointerButton { down } => self.input.set_pointer_down(down),
            InputEvent::FocusLost => {
                self.paused = true;
                self.input.release_all();
                self.audio.set_paused(true);
            }
            InputEvent::FocusGained => self.audio.set_paused(false),
            InputEvent::TogglePause => self.paused = !self.paused,
        }
    }

    fn update(&mut self, frame_secs: f32) {
        let phase = self.phase;
        if !phase.observes_pause() {
            self.paused = false;
        }
        if !self.state.initialized {
            self.enter(phase);
        }

        if self.phase == phase {
            match phase {
                Phase::GameIntro => self.game_intro(frame_secs),
                Phase::GameOutro => self.game_outro(frame_secs),
                Phase::TitleIntro => self.title_intro(frame_secs),
                Phase::TitleScreen => self.title_screen(frame_secs),
                Phase::TitleOutro => self.title_outro(frame_secs),
                Phase::OptionsIntro => self.goto(Phase::OptionsScreen),
                Phase::OptionsScreen => self.options_screen(),
                Phase::OptionsOutro => self.goto(Phase::TitleIntro),
                Phase::PlayIntro => self.play_intro(),
                Phase::PlayGame => self.play_game(frame_secs),
                Phase::PlayUpdate => self.play_update(frame_secs),
                Phase::PlayPause => self.play_pause(),
                Phase::PlayExit => self.play_exit(),
                Phase::PlayOutro => self.play_outro(frame_secs),
                Phase::ScoresIntro => self.scores_intro(),
                Phase::ScoresView => self.scores_view(frame_secs),
                Phase::ScoresAdd => self.scores_add(frame_secs),
                Phase::ScoresOutro => self.scores_outro(),
            }
        }

        if self.phase != phase {
            self.exit(phase);
        }
    }

    fn render(&mut self, renderer: &mut dyn Renderer) {
        if self.display_dirty {
            renderer.apply_display(&self.settings.display);
            self.display_dirty = false;
        }

        let alpha = self.state.alpha;
        match self.phase {
            Phase::GameIntro | Phase::GameOutro => renderer.render_caption(LOGO, alpha),
            Phase::TitleIntro | Phase::TitleOutro => renderer.render_caption(LOGO, alpha),
            Phase::TitleScreen => {
                renderer.render_caption(LOGO, self.state.glow);
                if let Some(menu) = &self.state.menu {
                    renderer.render_menu(menu, alpha);
                }
            }
            Phase::OptionsScreen | Phase::PlayIntro => {
                if let Some(menu) = &self.state.menu {
                    renderer.render_menu(menu, alpha);
                }
            }
            Phase::PlayGame => self.render_play_field(renderer, 1.0),
            Phase::PlayUpdate => {
                self.render_play_field(renderer, 1.0);
                renderer.render_caption("GET READY", alpha);
            }
            Phase::PlayPause => {
                self.render_play_field(renderer, 0.5);
                renderer.render_caption("PAUSED", 1.0);
            }
            Phase::PlayExit => {
                self.render_play_field(renderer, 0.5);
                if let Some(menu) = &self.state.menu {
                    renderer.render_menu(menu, 1.0);
                }
            }
            Phase::PlayOutro => {
                self.render_play_field(renderer, alpha);
                renderer.render_caption("GAME OVER", 1.0 - alpha);
            }
            Phase::ScoresView => renderer.render_scores(&self.hiscores, self.score_index, alpha),
            Phase::ScoresAdd => {
                renderer.render_scores(&self.hiscores, None, alpha);
                if let Some(entry) = &self.state.name {
                    renderer.render_name_entry(entry, alpha);
                }
            }
            Phase::OptionsIntro
            | Phase::OptionsOutro
            | Phase::ScoresIntro
            | Phase::ScoresOutro => {}
        }
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}
