//! Round controller: one play session from new game until the lives run out
//!
//! Owns the snake, the rat and the level grid and drives their interaction
//! one fixed tick at a time. Everything that other layers need to react to
//! (sound cues, phase changes) is reported as a [`RoundEvent`].

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::direction::Direction;
use super::level::{Level, LevelSource};
use super::rat::{Rat, RatState};
use super::snake::{Snake, SnakeCollision, SnakeState};
use crate::consts::*;
use crate::report_error;

/// Difficulty, chosen before the round starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Static rat, half points
    Easy,
    #[default]
    Normal,
    /// Faster start, one and a half points
    Hard,
}

impl GameMode {
    /// Label stored in the hiscore table
    pub fn label(self) -> &'static str {
        match self {
            GameMode::Easy => "CLASSIC",
            GameMode::Normal => "REMIX",
            GameMode::Hard => "HARD",
        }
    }

    /// The state a live, catchable rat is in
    pub fn edible_rat_state(self) -> RatState {
        match self {
            GameMode::Easy => RatState::Static,
            GameMode::Normal | GameMode::Hard => RatState::Moving,
        }
    }

    /// Points for one rat
    pub fn points(self, level: u32, world: u32) -> u64 {
        let level_score = BASE_SCORE * u64::from(level);
        let world = u64::from(world);
        match self {
            GameMode::Easy => (level_score / 2) * world,
            GameMode::Normal => level_score * world,
            GameMode::Hard => (level_score + level_score / 2) * world,
        }
    }
}

/// Progress and score of the current round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub world: u32,
    pub level: u32,
    pub rats_eaten: u32,
    pub lives: i32,
    pub score: u64,
    pub mode: GameMode,
}

impl RoundState {
    pub fn new(mode: GameMode) -> Self {
        Self {
            world: 1,
            level: MIN_LEVEL,
            rats_eaten: 0,
            lives: DEFAULT_LIVES,
            score: 0,
            mode,
        }
    }

    /// "world-level", as shown in the hiscore table
    pub fn level_label(&self) -> String {
        format!("{}-{}", self.world, self.level)
    }
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    SnakeTurned,
    SnakeDied,
    RatEaten { points: u64, pos: IVec2 },
    SnakeGrew,
    RatMoved { pos: IVec2 },
    /// Snake and rat were put back on the grid after a death
    LifeLost { lives: i32 },
    LevelAdvanced { world: u32, level: u32 },
    /// No lives left; further ticks do nothing
    RoundOver,
}

/// Where the rat waits at the start of a new game
pub fn rat_start() -> IVec2 {
    let width = PLAY_AREA_WIDTH - PLAY_AREA_WIDTH % TILE_SIZE;
    let rows = PLAY_AREA_HEIGHT / TILE_SIZE;
    IVec2::new(width - width / 4, rows / 2 * TILE_SIZE)
}

#[derive(Debug, Clone)]
pub struct Round {
    state: RoundState,
    snake: Snake,
    rat: Rat,
    level: Level,
    rng: Pcg32,
    /// Ticks spent in the snake's death animation
    dying_ticks: u32,
    /// Respawn found no free tile; retried on the next reset
    rat_stranded: bool,
    over: bool,
}

impl Round {
    /// Start a new game at world 1, level 1.
    pub fn new(mode: GameMode, seed: u64, levels: &dyn LevelSource) -> Self {
        let mut level = Level::new();
        if let Err(e) = level.load(MIN_LEVEL, levels) {
            report_error("round", &e.to_string());
        }
        let area = *level.area();
        let snake = Snake::new(area, level.spawn());
        let rat = Rat::new(area, rat_start());

        let mut round = Self {
            state: RoundState::new(mode),
            snake,
            rat,
            level,
            rng: Pcg32::seed_from_u64(seed),
            dying_ticks: 0,
            rat_stranded: false,
            over: false,
        };

        let start = round.rat.rect();
        if round.is_occupied(&start) {
            round.respawn_rat(Some(RAT_MAX_INTERVAL));
        } else {
            round.rat.set_state(mode.edible_rat_state());
        }
        round.apply_level_speedups();
        log::info!("New {} game (seed {seed})", mode.label());
        round
    }

    /// Queue a direction for the snake; false if it would reverse the head.
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.snake.set_direction(direction)
    }

    /// Run one fixed tick.
    pub fn tick(&mut self, levels: &dyn LevelSource, events: &mut Vec<RoundEvent>) {
        if self.over {
            return;
        }

        let heading = self.snake.head().direction;
        if self.snake.update(TICK_MS, &mut self.rng) && self.snake.head().direction != heading {
            events.push(RoundEvent::SnakeTurned);
        }

        match self.snake.state() {
            SnakeState::Moving | SnakeState::Growing => {
                let head = self.snake.head().rect();
                if self.snake.check_collision(&head, true) == SnakeCollision::Body
                    || self.level.is_blocked(&head)
                {
                    self.kill_snake(events);
                }
            }
            SnakeState::Dying => {
                self.dying_ticks += 1;
                if self.dying_ticks >= SNAKE_DEATH_TICKS {
                    self.snake.set_state(SnakeState::Dead);
                }
            }
            SnakeState::Dead => {}
        }

        if self.snake.state() == SnakeState::Dead {
            self.state.lives -= 1;
            if self.state.lives <= 0 {
                log::info!("Round over with {} points", self.state.score);
                self.over = true;
                events.push(RoundEvent::RoundOver);
                return;
            }
            self.snake.reset(self.level.spawn(), None);
            self.rat_stranded = false;
            self.respawn_rat(None);
            events.push(RoundEvent::LifeLost {
                lives: self.state.lives,
            });
        }

        let edible = self.state.mode.edible_rat_state();
        if self.rat.state() == edible {
            if self.snake.check_collision(&self.rat.rect(), false) == SnakeCollision::Head {
                self.eat_rat(events);
            }
        } else if self.rat.state() == RatState::Dead
            && self.state.rats_eaten < RATS_PER_LEVEL
            && self.snake.state().is_alive()
            && !self.rat_stranded
        {
            self.respawn_rat(None);
        }

        if self.rat.state() == RatState::Moving {
            let snake = &self.snake;
            let level = &self.level;
            self.rat.think(&mut self.rng, |rect| {
                snake.check_collision(rect, false) != SnakeCollision::None || level.is_blocked(rect)
            });
        }
        if self.rat.update(TICK_MS) {
            events.push(RoundEvent::RatMoved {
                pos: self.rat.pos(),
            });
        }

        if self.state.rats_eaten >= RATS_PER_LEVEL {
            self.advance_level(levels, events);
        }
    }

    /// Snake death drags the rat down with it.
    fn kill_snake(&mut self, events: &mut Vec<RoundEvent>) {
        log::debug!("Snake died at {:?}", self.snake.head().pos);
        self.snake.set_state(SnakeState::Dying);
        self.dying_ticks = 0;
        self.rat.set_state(RatState::Eaten);
        events.push(RoundEvent::SnakeDied);
    }

    fn eat_rat(&mut self, events: &mut Vec<RoundEvent>) {
        let points = self.state.mode.points(self.state.level, self.state.world);
        self.state.score += points;
        self.state.rats_eaten += 1;
        self.rat.set_state(RatState::Eaten);
        events.push(RoundEvent::RatEaten {
            points,
            pos: self.rat.pos(),
        });

        match self.snake.grow(GROWTH_PER_RAT) {
            Ok(()) => events.push(RoundEvent::SnakeGrew),
            Err(e) => log::debug!("{e}"),
        }
        self.snake.speed_up(SNAKE_SPEEDUP_STEP);
        self.rat.speed_up(RAT_SPEEDUP_STEP);
    }

    fn advance_level(&mut self, levels: &dyn LevelSource, events: &mut Vec<RoundEvent>) {
        self.state.level += 1;
        if self.state.level > MAX_LEVEL {
            self.state.level = MIN_LEVEL;
            self.state.world += 1;
        }
        if let Err(e) = self.level.load(self.state.level, levels) {
            report_error("round", &e.to_string());
        }

        self.snake.reset(self.level.spawn(), Some(SNAKE_MAX_INTERVAL));
        self.state.rats_eaten = 0;
        self.rat_stranded = false;
        self.respawn_rat(Some(RAT_MAX_INTERVAL));
        self.apply_level_speedups();

        log::info!(
            "Advanced to world {} level {}",
            self.state.world,
            self.state.level
        );
        events.push(RoundEvent::LevelAdvanced {
            world: self.state.world,
            level: self.state.level,
        });
    }

    /// Hard mode bonus plus one speed-up per world
    fn apply_level_speedups(&mut self) {
        let mut count = self.state.world;
        if self.state.mode == GameMode::Hard {
            count += HARD_MODE_SPEEDUPS;
        }
        for _ in 0..count {
            self.snake.speed_up(SNAKE_SPEEDUP_STEP);
            self.rat.speed_up(RAT_SPEEDUP_STEP);
        }
    }

    /// A tile is taken if an active snake segment or a blocked level tile covers it
    fn is_occupied(&self, rect: &Rect) -> bool {
        self.snake.check_collision(rect, false) != SnakeCollision::None
            || self.level.is_blocked(rect)
    }

    fn find_rat_spot(&mut self) -> Option<IVec2> {
        let area = *self.level.area();
        for _ in 0..RESPAWN_ATTEMPTS {
            let pos = IVec2::new(
                area.left + self.rng.random_range(0..LEVEL_COLS as i32) * TILE_SIZE,
                area.bottom + self.rng.random_range(0..LEVEL_ROWS as i32) * TILE_SIZE,
            );
            if !self.is_occupied(&Rect::tile(pos)) {
                return Some(pos);
            }
        }
        self.level
            .clear_tiles()
            .find(|pos| self.snake.check_collision(&Rect::tile(*pos), false) == SnakeCollision::None)
    }

    /// Put the rat on a free tile in its edible state, or leave it dead if
    /// the grid has no room.
    fn respawn_rat(&mut self, interval: Option<u32>) {
        match self.find_rat_spot() {
            Some(pos) => {
                self.rat.reset(pos, interval);
                self.rat.set_state(self.state.mode.edible_rat_state());
            }
            None => {
                report_error("round", "no free tile left to respawn the rat");
                self.rat.set_state(RatState::Dead);
                self.rat_stranded = true;
            }
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn rat(&self) -> &Rat {
        &self.rat
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RoundState {
        &mut self.state
    }

    #[cfg(test)]
    pub(crate) fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    #[cfg(test)]
    pub(crate) fn rat_mut(&mut self) -> &mut Rat {
        &mut self.rat
    }
}
