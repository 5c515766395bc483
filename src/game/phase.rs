//! Game phases, the transition table, and per-phase scratch state

use glam::IVec2;

use super::menu::{Menu, PointerTracker};
use super::name_entry::NameEntry;
use crate::consts::TICKS_PER_SECOND;

/// One screen of the outer state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    GameIntro,
    GameOutro,
    TitleIntro,
    TitleScreen,
    TitleOutro,
    OptionsIntro,
    OptionsScreen,
    OptionsOutro,
    PlayIntro,
    PlayGame,
    PlayUpdate,
    PlayPause,
    PlayExit,
    PlayOutro,
    ScoresIntro,
    ScoresView,
    ScoresAdd,
    ScoresOutro,
}

/// Phase groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFamily {
    Game,
    Title,
    Options,
    Play,
    Scores,
}

impl Phase {
    pub const ALL: [Phase; 18] = [
        Phase::GameIntro,
        Phase::GameOutro,
        Phase::TitleIntro,
        Phase::TitleScreen,
        Phase::TitleOutro,
        Phase::OptionsIntro,
        Phase::OptionsScreen,
        Phase::OptionsOutro,
        Phase::PlayIntro,
        Phase::PlayGame,
        Phase::PlayUpdate,
        Phase::PlayPause,
        Phase::PlayExit,
        Phase::PlayOutro,
        Phase::ScoresIntro,
        Phase::ScoresView,
        Phase::ScoresAdd,
        Phase::ScoresOutro,
    ];

    pub fn family(self) -> PhaseFamily {
        use Phase::*;
        match self {
            GameIntro | GameOutro => PhaseFamily::Game,
            TitleIntro | TitleScreen | TitleOutro => PhaseFamily::Title,
            OptionsIntro | OptionsScreen | OptionsOutro => PhaseFamily::Options,
            PlayIntro | PlayGame | PlayUpdate | PlayPause | PlayExit | PlayOutro => {
                PhaseFamily::Play
            }
            ScoresIntro | ScoresView | ScoresAdd | ScoresOutro => PhaseFamily::Scores,
        }
    }

    /// Phases this one may hand over to. `GameOutro` ends the process instead.
    pub fn successors(self) -> &'static [Phase] {
        use Phase::*;
        match self {
            GameIntro => &[TitleIntro],
            GameOutro => &[],
            TitleIntro => &[TitleScreen],
            TitleScreen => &[TitleOutro],
            TitleOutro => &[PlayIntro, ScoresIntro, OptionsIntro, GameOutro],
            OptionsIntro => &[OptionsScreen],
            OptionsScreen => &[OptionsOutro],
            OptionsOutro => &[TitleIntro],
            PlayIntro => &[PlayGame, TitleIntro],
            PlayGame => &[PlayPause, PlayUpdate, PlayExit, PlayOutro],
            PlayUpdate => &[PlayGame, PlayPause],
            PlayPause => &[PlayGame, PlayUpdate],
            PlayExit => &[PlayOutro, PlayGame],
            PlayOutro => &[ScoresIntro],
            ScoresIntro => &[ScoresView, ScoresAdd],
            ScoresView => &[ScoresOutro],
            ScoresAdd => &[ScoresOutro],
            ScoresOutro => &[TitleIntro, ScoresIntro],
        }
    }

    pub fn can_transition_to(self, next: Phase) -> bool {
        self.successors().contains(&next)
    }

    /// Phases that honour the pause flag instead of clearing it
    pub fn observes_pause(self) -> bool {
        matches!(self, Phase::PlayGame | Phase::PlayUpdate | Phase::PlayPause)
    }
}

/// Scratch state of the running phase; reset on entry, dropped on exit
#[derive(Debug, Default)]
pub struct PhaseState {
    /// Entry work has been done
    pub initialized: bool,
    /// Whole actions counted since entry
    pub counter: u32,
    /// Fractional action carry
    interval: f32,
    /// Fade alpha
    pub alpha: f32,
    /// Title glow pulse
    pub glow: f32,
    pub glow_rising: bool,
    /// Idle actions (attract timeout, auto advance, key repeat)
    pub idle: f32,
    /// "Get ready" steps left
    pub countdown: u32,
    pub menu: Option<Menu>,
    pub pointer: PointerTracker,
    /// Held keys have been let go since entry
    pub keys_released: bool,
    pub name: Option<NameEntry>,
}

impl PhaseState {
    /// Fresh state for a phase being entered
    pub fn entered(pointer: IVec2) -> Self {
        Self {
            initialized: true,
            pointer: PointerTracker::new(pointer),
            ..Self::default()
        }
    }

    /// Whole 60 Hz actions elapsed this frame; the remainder carries over
    pub fn actions(&mut self, frame_secs: f32) -> u32 {
        self.interval += frame_secs.max(0.0) * TICKS_PER_SECOND;
        let whole = self.interval.floor();
        self.interval -= whole;
        whole as u32
    }

    /// Advance the title glow by one action
    pub fn pulse_glow(&mut self) {
        if self.glow_rising {
            self.glow += 0.03;
            if self.glow >= 1.0 {
                self.glow = 1.0;
                self.glow_rising = false;
            }
        } else {
            self.glow -= 0.03;
            if self.glow <= 0.0 {
                self.glow = 0.0;
                self.glow_rising = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    #[test]
    fn test_every_phase_reachable_from_intro() {
        let mut seen = HashSet::from([Phase::GameIntro]);
        let mut queue = VecDeque::from([Phase::GameIntro]);
        while let Some(phase) = queue.pop_front() {
            for next in phase.successors() {
                if seen.insert(*next) {
                    queue.push_back(*next);
                }
            }
        }
        assert_eq!(seen.len(), Phase::ALL.len());
    }

    #[test]
    fn test_only_game_outro_is_a_dead_end() {
        for phase in Phase::ALL {
            assert_eq!(phase.successors().is_empty(), phase == Phase::GameOutro);
            assert!(!phase.can_transition_to(phase));
        }
    }

    #[test]
    fn test_selected_edges() {
        assert!(Phase::GameIntro.can_transition_to(Phase::TitleIntro));
        assert!(Phase::PlayIntro.can_transition_to(Phase::PlayGame));
        assert!(Phase::PlayGame.can_transition_to(Phase::PlayPause));
        assert!(Phase::PlayGame.can_transition_to(Phase::PlayExit));
        assert!(Phase::PlayGame.can_transition_to(Phase::PlayUpdate));
        assert_eq!(Phase::PlayOutro.successors(), &[Phase::ScoresIntro]);
        assert!(!Phase::PlayGame.can_transition_to(Phase::TitleIntro));
    }

    #[test]
    fn test_actions_carry_fraction() {
        let mut state = PhaseState::entered(IVec2::ZERO);
        assert_eq!(state.actions(0.5), 30);
        // 1/128 s is 0.46875 actions
        assert_eq!(state.actions(1.0 / 128.0), 0);
        assert_eq!(state.actions(1.0 / 128.0), 0);
        assert_eq!(state.actions(1.0 / 128.0), 1);
    }

    #[test]
    fn test_families() {
        assert_eq!(Phase::PlayPause.family(), PhaseFamily::Play);
        assert_eq!(Phase::ScoresAdd.family(), PhaseFamily::Scores);
        assert_eq!(
            Phase::ALL.iter().filter(|p| p.family() == PhaseFamily::Title).count(),
            3
        );
    }
}
