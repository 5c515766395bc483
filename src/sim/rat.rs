//! Rat entity: a single-tile actor with a random-walk AI

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, wrap_position};
use super::direction::Direction;
use crate::consts::{RAT_MAX_INTERVAL, RAT_MIN_INTERVAL, TILE_SIZE};

/// Rat life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatState {
    /// Sits still (easy mode)
    Static,
    Moving,
    /// Fading out after being caught
    Eaten,
    /// Waiting to be respawned
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rat {
    pos: IVec2,
    state: RatState,
    interval_ms: u32,
    timer_ms: f32,
    direction: Direction,
    /// Every direction was blocked when the AI last looked
    cornered: bool,
    area: Rect,
    burst: f32,
    fade: f32,
}

impl Rat {
    pub fn new(area: Rect, pos: IVec2) -> Self {
        let mut rat = Self {
            pos,
            state: RatState::Static,
            interval_ms: RAT_MAX_INTERVAL,
            timer_ms: 0.0,
            direction: Direction::Left,
            cornered: false,
            area,
            burst: 1.5,
            fade: 1.0,
        };
        rat.reset(pos, None);
        rat
    }

    /// Place the rat at `pos`, static and facing left.
    pub fn reset(&mut self, pos: IVec2, interval: Option<u32>) {
        self.pos = pos;
        self.state = RatState::Static;
        self.direction = Direction::Left;
        self.cornered = false;
        self.timer_ms = 0.0;
        self.burst = 1.5;
        self.fade = 1.0;
        if let Some(interval) = interval {
            self.interval_ms = interval.clamp(RAT_MIN_INTERVAL, RAT_MAX_INTERVAL);
        }
    }

    /// Footprint one step ahead in `direction`, after wrapping
    pub fn candidate_rect(&self, direction: Direction) -> Rect {
        let stepped = self.pos + direction.delta() * TILE_SIZE;
        Rect::tile(wrap_position(stepped, &self.area))
    }

    /// Pick the next direction: one random try, then the rest in fixed order.
    ///
    /// If `is_blocked` rejects all four, the direction is kept and the rat
    /// stays put on its next step.
    pub fn think<R, F>(&mut self, rng: &mut R, is_blocked: F)
    where
        R: Rng + ?Sized,
        F: Fn(&Rect) -> bool,
    {
        let first = Direction::from_index(rng.random_range(0..4));
        let choice = std::iter::once(first)
            .chain(Direction::ALL.into_iter().filter(|d| *d != first))
            .find(|d| !is_blocked(&self.candidate_rect(*d)));

        match choice {
            Some(direction) => {
                self.direction = direction;
                self.cornered = false;
            }
            None => self.cornered = true,
        }
    }

    /// Advance timers and visuals by `dt_ms`; returns true if the rat stepped.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        match self.state {
            RatState::Eaten => {
                if self.burst <= 2.0 {
                    self.burst += 0.1;
                } else {
                    self.fade -= 0.05;
                    if self.fade <= 0.0 {
                        self.fade = 0.0;
                        self.state = RatState::Dead;
                    }
                }
                false
            }
            RatState::Moving => {
                self.timer_ms += dt_ms;
                if self.timer_ms < self.interval_ms as f32 {
                    return false;
                }
                self.timer_ms = 0.0;
                if self.cornered {
                    return false;
                }
                let stepped = self.pos + self.direction.delta() * TILE_SIZE;
                self.pos = wrap_position(stepped, &self.area);
                true
            }
            RatState::Static | RatState::Dead => false,
        }
    }

    pub fn speed_up(&mut self, step: u32) {
        self.interval_ms = self.interval_ms.saturating_sub(step).max(RAT_MIN_INTERVAL);
    }

    /// Switch state; entering `Eaten` restarts the fade.
    pub fn set_state(&mut self, state: RatState) {
        if state == RatState::Eaten && self.state != RatState::Eaten {
            self.burst = 1.5;
            self.fade = 1.0;
        }
        self.state = state;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn state(&self) -> RatState {
        self.state
    }

    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    pub fn rect(&self) -> Rect {
        Rect::tile(self.pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_cornered(&self) -> bool {
        self.cornered
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Render alpha
    pub fn alpha(&self) -> f32 {
        match self.state {
            RatState::Eaten | RatState::Dead => self.fade,
            RatState::Static | RatState::Moving => 1.0,
        }
    }

    pub fn burst(&self) -> f32 {
        self.burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rat_at(x: i32, y: i32) -> Rat {
        Rat::new(Rect::play_area(), IVec2::new(x, y))
    }

    #[test]
    fn test_reset_defaults() {
        let rat = rat_at(720, 240);
        assert_eq!(rat.state(), RatState::Static);
        assert_eq!(rat.direction(), Direction::Left);
        assert_eq!(rat.interval_ms(), RAT_MAX_INTERVAL);
    }

    #[test]
    fn test_static_rat_never_moves() {
        let mut rat = rat_at(720, 240);
        for _ in 0..100 {
            assert!(!rat.update(100.0));
        }
        assert_eq!(rat.pos(), IVec2::new(720, 240));
    }

    #[test]
    fn test_moving_rat_steps_on_interval() {
        let mut rat = rat_at(720, 240);
        rat.set_state(RatState::Moving);
        assert!(!rat.update(499.0));
        assert!(rat.update(1.0));
        assert_eq!(rat.pos(), IVec2::new(704, 240));
    }

    #[test]
    fn test_think_avoids_blocked_directions() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut rat = rat_at(480, 240);
        let open = rat.candidate_rect(Direction::Down);
        for _ in 0..20 {
            rat.think(&mut rng, |r| *r != open);
            assert_eq!(rat.direction(), Direction::Down);
            assert!(!rat.is_cornered());
        }
    }

    #[test]
    fn test_cornered_rat_keeps_direction_and_stays() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut rat = rat_at(480, 240);
        rat.set_state(RatState::Moving);
        rat.set_direction(Direction::Up);
        rat.think(&mut rng, |_| true);
        assert!(rat.is_cornered());
        assert_eq!(rat.direction(), Direction::Up);
        assert!(!rat.update(500.0));
        assert_eq!(rat.pos(), IVec2::new(480, 240));
        // Timer was consumed even though the rat stayed
        assert!(!rat.update(250.0));
    }

    #[test]
    fn test_eaten_decays_to_dead() {
        let mut rat = rat_at(480, 240);
        rat.set_state(RatState::Eaten);
        let mut ticks = 0;
        while rat.state() == RatState::Eaten {
            rat.update(16.0);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(rat.state(), RatState::Dead);
        assert!(ticks > 20);
        assert_eq!(rat.alpha(), 0.0);
    }

    #[test]
    fn test_speed_up_clamps() {
        let mut rat = rat_at(480, 240);
        for _ in 0..20 {
            rat.speed_up(30);
        }
        assert_eq!(rat.interval_ms(), RAT_MIN_INTERVAL);
    }
}
