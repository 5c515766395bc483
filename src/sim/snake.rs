//! Snake entity: a chain of grid-aligned segments following the head
//!
//! Segment 0 is the head. Every movement step each segment moves one tile in
//! its own direction, then directions ripple one segment toward the tail.
//! Freshly grown segments sit on the tail with no direction until the ripple
//! reaches them; until then they neither move nor collide.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{Rect, wrap_position};
use super::direction::Direction;
use crate::consts::{
    SNAKE_MAX_INTERVAL, SNAKE_MAX_LENGTH, SNAKE_MIN_INTERVAL, SNAKE_START_LENGTH, TILE_SIZE,
};

/// Snake life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeState {
    Moving,
    /// Grown segments are still waiting for a direction
    Growing,
    /// Death animation running; the round controller decides when it ends
    Dying,
    Dead,
}

impl SnakeState {
    /// Moving or growing
    pub fn is_alive(self) -> bool {
        matches!(self, SnakeState::Moving | SnakeState::Growing)
    }
}

/// Result of testing a rectangle against the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeCollision {
    None,
    Head,
    Body,
}

/// One grid cell of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Bottom-left pixel corner
    pub pos: IVec2,
    /// `None` until direction propagation reaches a grown segment
    pub direction: Option<Direction>,
}

impl Segment {
    pub fn rect(&self) -> Rect {
        Rect::tile(self.pos)
    }

    pub fn is_active(&self) -> bool {
        self.direction.is_some()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrowError {
    #[error("growing by {requested} would exceed the maximum length (current {length})")]
    CapacityExceeded { length: usize, requested: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    segments: Vec<Segment>,
    state: SnakeState,
    /// Milliseconds between movement steps
    interval_ms: u32,
    timer_ms: f32,
    /// Direction the head takes on the next step
    pending: Direction,
    area: Rect,
    /// Display colour, re-picked when a growth spurt completes
    color: [f32; 3],
    /// Pulsing brightness while alive
    glow: f32,
    glow_rising: bool,
    /// Death burst scale, then fade
    burst: f32,
    fade: f32,
}

impl Snake {
    pub fn new(area: Rect, spawn: IVec2) -> Self {
        let mut snake = Self {
            segments: Vec::with_capacity(SNAKE_MAX_LENGTH),
            state: SnakeState::Moving,
            interval_ms: SNAKE_MAX_INTERVAL,
            timer_ms: 0.0,
            pending: Direction::Right,
            area,
            color: [0.0, 1.0, 0.0],
            glow: 1.0,
            glow_rising: false,
            burst: 1.5,
            fade: 1.0,
        };
        snake.reset(spawn, None);
        snake
    }

    /// Back to the starting length at `spawn`, heading right.
    ///
    /// `interval` replaces the movement interval when given; otherwise the
    /// current speed is kept.
    pub fn reset(&mut self, spawn: IVec2, interval: Option<u32>) {
        self.segments.clear();
        self.segments.push(Segment {
            pos: spawn,
            direction: Some(Direction::Right),
        });
        for _ in 1..SNAKE_START_LENGTH {
            self.segments.push(Segment {
                pos: spawn,
                direction: None,
            });
        }
        if let Some(interval) = interval {
            self.interval_ms = interval.clamp(SNAKE_MIN_INTERVAL, SNAKE_MAX_INTERVAL);
        }
        self.pending = Direction::Right;
        self.timer_ms = 0.0;
        self.state = SnakeState::Moving;
        self.glow = 1.0;
        self.burst = 1.5;
        self.fade = 1.0;
    }

    /// Queue a direction for the head. Reversing onto the neck is refused.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.head().direction == Some(direction.opposite()) {
            return false;
        }
        self.pending = direction;
        true
    }

    /// Advance timers and visuals by `dt_ms`; returns true if the snake stepped.
    pub fn update<R: Rng + ?Sized>(&mut self, dt_ms: f32, rng: &mut R) -> bool {
        match self.state {
            SnakeState::Moving | SnakeState::Growing => {
                if self.glow_rising {
                    self.glow += 0.01;
                    if self.glow >= 1.0 {
                        self.glow = 1.0;
                        self.glow_rising = false;
                    }
                } else {
                    self.glow -= 0.01;
                    if self.glow <= 0.5 {
                        self.glow_rising = true;
                    }
                }
            }
            SnakeState::Dying => {
                if self.burst <= 2.0 {
                    self.burst += 0.1;
                } else {
                    self.fade = (self.fade - 0.05).max(-1.0);
                }
                return false;
            }
            SnakeState::Dead => return false,
        }

        self.timer_ms += dt_ms;
        if self.timer_ms < self.interval_ms as f32 {
            return false;
        }
        self.step(rng);
        true
    }

    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.segments[0].direction = Some(self.pending);

        for segment in &mut self.segments {
            if let Some(direction) = segment.direction {
                let stepped = segment.pos + direction.delta() * TILE_SIZE;
                segment.pos = wrap_position(stepped, &self.area);
            }
        }

        // Tail first so each segment reads its leader's direction from this step
        for i in (1..self.segments.len()).rev() {
            self.segments[i].direction = self.segments[i - 1].direction;
        }

        if self.state == SnakeState::Growing && self.tail().is_active() {
            self.state = SnakeState::Moving;
            self.color = [rng.random(), rng.random(), rng.random()];
        }

        self.timer_ms = 0.0;
    }

    /// Append `count` inactive segments on top of the tail.
    pub fn grow(&mut self, count: usize) -> Result<(), GrowError> {
        let length = self.segments.len();
        if length + count > SNAKE_MAX_LENGTH {
            return Err(GrowError::CapacityExceeded {
                length,
                requested: count,
            });
        }
        let tail = self.tail().pos;
        self.segments.extend(std::iter::repeat_n(
            Segment {
                pos: tail,
                direction: None,
            },
            count,
        ));
        self.state = SnakeState::Growing;
        Ok(())
    }

    /// Test `rect` against the active segments, head first.
    pub fn check_collision(&self, rect: &Rect, exclude_head: bool) -> SnakeCollision {
        let skip = usize::from(exclude_head);
        for (i, segment) in self
            .segments
            .iter()
            .enumerate()
            .take_while(|(_, s)| s.is_active())
            .skip(skip)
        {
            if segment.rect().overlaps(rect) {
                return if i == 0 {
                    SnakeCollision::Head
                } else {
                    SnakeCollision::Body
                };
            }
        }
        SnakeCollision::None
    }

    /// Shorten the movement interval by `step`, never below the minimum.
    pub fn speed_up(&mut self, step: u32) {
        self.interval_ms = self.interval_ms.saturating_sub(step).max(SNAKE_MIN_INTERVAL);
    }

    pub fn set_state(&mut self, state: SnakeState) {
        self.state = state;
    }

    pub fn state(&self) -> SnakeState {
        self.state
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    /// Render alpha: glow pulse while alive, fade while dying (clamped to 0..=1)
    pub fn alpha(&self) -> f32 {
        match self.state {
            SnakeState::Moving | SnakeState::Growing => self.glow,
            SnakeState::Dying | SnakeState::Dead => self.fade.clamp(0.0, 1.0),
        }
    }

    /// Death burst scale for particle effects
    pub fn burst(&self) -> f32 {
        self.burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn snake_at(x: i32, y: i32) -> Snake {
        Snake::new(Rect::play_area(), IVec2::new(x, y))
    }

    /// Run ticks until the snake steps once
    fn step(snake: &mut Snake, rng: &mut Pcg32) {
        for _ in 0..1000 {
            if snake.update(10.0, rng) {
                return;
            }
        }
        panic!("snake never stepped");
    }

    #[test]
    fn test_reset_layout() {
        let snake = snake_at(16, 240);
        assert_eq!(snake.len(), SNAKE_START_LENGTH);
        assert_eq!(snake.head().direction, Some(Direction::Right));
        assert_eq!(snake.segments()[1].direction, None);
        assert_eq!(snake.segments()[1].pos, IVec2::new(16, 240));
        assert_eq!(snake.interval_ms(), SNAKE_MAX_INTERVAL);
        assert_eq!(snake.state(), SnakeState::Moving);
    }

    #[test]
    fn test_moves_only_after_interval() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snake = snake_at(16, 240);
        assert!(!snake.update(50.0, &mut rng));
        assert_eq!(snake.head().pos, IVec2::new(16, 240));
        assert!(snake.update(50.0, &mut rng));
        assert_eq!(snake.head().pos, IVec2::new(32, 240));
        // Second segment only picks up the direction this step
        assert_eq!(snake.segments()[1].pos, IVec2::new(16, 240));
        assert_eq!(snake.segments()[1].direction, Some(Direction::Right));
    }

    #[test]
    fn test_reversal_is_rejected() {
        let mut snake = snake_at(16, 240);
        assert!(!snake.set_direction(Direction::Left));
        assert_eq!(snake.pending_direction(), Direction::Right);
        assert!(snake.set_direction(Direction::Up));
        assert_eq!(snake.pending_direction(), Direction::Up);
        // Head is still moving right, so left stays illegal this step
        assert!(!snake.set_direction(Direction::Left));
        assert_eq!(snake.pending_direction(), Direction::Up);
    }

    #[test]
    fn test_wraps_at_right_edge() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snake = snake_at(944, 64);
        step(&mut snake, &mut rng);
        assert_eq!(snake.head().pos, IVec2::new(0, 64));
    }

    #[test]
    fn test_grow_then_catch_up() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut snake = snake_at(16, 240);
        step(&mut snake, &mut rng);
        snake.grow(3).unwrap();
        assert_eq!(snake.state(), SnakeState::Growing);
        assert_eq!(snake.len(), 5);
        assert!(snake.segments()[2..].iter().all(|s| s.direction.is_none()));

        step(&mut snake, &mut rng);
        step(&mut snake, &mut rng);
        assert_eq!(snake.state(), SnakeState::Growing);
        step(&mut snake, &mut rng);
        assert_eq!(snake.state(), SnakeState::Moving);
        assert!(snake.segments().iter().all(Segment::is_active));
    }

    #[test]
    fn test_inactive_tail_does_not_collide() {
        let mut snake = snake_at(16, 240);
        snake.grow(4).unwrap();
        let tail_rect = Rect::tile(IVec2::new(16, 240));
        // Only the head covers the spawn tile among active segments
        assert_eq!(snake.check_collision(&tail_rect, false), SnakeCollision::Head);
        assert_eq!(snake.check_collision(&tail_rect, true), SnakeCollision::None);
    }

    #[test]
    fn test_self_collision_after_loop() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut snake = snake_at(160, 160);
        snake.grow(6).unwrap();
        for _ in 0..8 {
            step(&mut snake, &mut rng);
        }
        for dir in [Direction::Up, Direction::Left, Direction::Down] {
            snake.set_direction(dir);
            step(&mut snake, &mut rng);
        }
        let head = snake.head().rect();
        assert_eq!(snake.check_collision(&head, true), SnakeCollision::Body);
    }

    #[test]
    fn test_speed_up_clamps() {
        let mut snake = snake_at(16, 240);
        for _ in 0..100 {
            snake.speed_up(7);
        }
        assert_eq!(snake.interval_ms(), SNAKE_MIN_INTERVAL);
    }

    #[test]
    fn test_dying_fades_out() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut snake = snake_at(16, 240);
        snake.set_state(SnakeState::Dying);
        let head = snake.head().pos;
        for _ in 0..50 {
            assert!(!snake.update(100.0, &mut rng));
        }
        assert_eq!(snake.head().pos, head);
        assert_eq!(snake.alpha(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_no_instant_reversal(commands in proptest::collection::vec(0usize..5, 1..60)) {
            let mut rng = Pcg32::seed_from_u64(11);
            let mut snake = snake_at(480, 240);
            for command in commands {
                if command == 4 {
                    step(&mut snake, &mut rng);
                    continue;
                }
                let dir = Direction::from_index(command);
                let current = snake.head().direction;
                let pending = snake.pending_direction();
                snake.set_direction(dir);
                if current == Some(dir.opposite()) {
                    prop_assert_eq!(snake.pending_direction(), pending);
                }
                prop_assert_ne!(Some(snake.pending_direction()), current.map(Direction::opposite));
            }
        }

        #[test]
        fn prop_segments_lag_one_step(
            grow in 0usize..20,
            commands in proptest::collection::vec(0usize..4, 1..40),
        ) {
            let mut rng = Pcg32::seed_from_u64(5);
            let mut snake = snake_at(480, 240);
            snake.grow(grow).unwrap();
            for command in commands {
                snake.set_direction(Direction::from_index(command));
                let mut before: Vec<Option<Direction>> =
                    snake.segments().iter().map(|s| s.direction).collect();
                before[0] = Some(snake.pending_direction());
                step(&mut snake, &mut rng);
                for i in 1..snake.len() {
                    prop_assert_eq!(snake.segments()[i].direction, before[i - 1]);
                }
            }
        }

        #[test]
        fn prop_growth_bound(first in 0usize..200, second in 0usize..200) {
            let mut snake = snake_at(16, 240);
            let first_ok = SNAKE_START_LENGTH + first <= SNAKE_MAX_LENGTH;
            prop_assert_eq!(snake.grow(first).is_ok(), first_ok);
            let length = snake.len();
            let result = snake.grow(second);
            if length + second > SNAKE_MAX_LENGTH {
                prop_assert!(result.is_err());
                prop_assert_eq!(snake.len(), length);
            } else {
                prop_assert!(result.is_ok());
                prop_assert_eq!(snake.len(), length + second);
                prop_assert!(snake.segments()[length..].iter().all(|s| s.direction.is_none()));
            }
        }
    }
}
