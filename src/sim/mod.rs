//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only (one call per consumed tick)
//! - Seeded RNG only
//! - Stable iteration order (head to tail, fixed direction order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod direction;
pub mod level;
pub mod rat;
pub mod round;
pub mod snake;

pub use collision::{Rect, rect_overlap, wrap_position};
pub use direction::Direction;
pub use level::{BuiltinLevels, Level, LevelData, LevelError, LevelSource, MapDirectory};
pub use rat::{Rat, RatState};
pub use round::{GameMode, Round, RoundEvent, RoundState};
pub use snake::{GrowError, Segment, Snake, SnakeCollision, SnakeState};
