//! Demo-mode steering
//!
//! Greedy: close the longer axis gap to the rat first, never reverse, and
//! never step onto the body or a wall if any other way is open.

use super::collision::{Rect, wrap_position};
use super::direction::Direction;
use super::round::Round;
use super::snake::SnakeCollision;
use crate::consts::TILE_SIZE;

/// Direction the autopilot wants next, or `None` if every move is fatal.
pub fn steer(round: &Round) -> Option<Direction> {
    let snake = round.snake();
    let head = snake.head();
    let current = head.direction;
    let delta = round.rat().pos() - head.pos;

    let horizontal = match delta.x {
        x if x > 0 => Some(Direction::Right),
        x if x < 0 => Some(Direction::Left),
        _ => None,
    };
    let vertical = match delta.y {
        y if y > 0 => Some(Direction::Up),
        y if y < 0 => Some(Direction::Down),
        _ => None,
    };
    let (first, second) = if delta.x.abs() >= delta.y.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };

    let is_safe = |direction: Direction| {
        let next = wrap_position(head.pos + direction.delta() * TILE_SIZE, round.level().area());
        let rect = Rect::tile(next);
        snake.check_collision(&rect, true) != SnakeCollision::Body && !round.level().is_blocked(&rect)
    };

    [first, second, current]
        .into_iter()
        .flatten()
        .chain(Direction::ALL)
        .filter(|d| current != Some(d.opposite()))
        .find(|d| is_safe(*d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::BuiltinLevels;
    use crate::sim::round::{GameMode, RoundEvent};

    #[test]
    fn test_heads_for_the_rat() {
        let round = Round::new(GameMode::Normal, 1, &BuiltinLevels);
        // Rat starts on the snake's row, to the right
        assert_eq!(steer(&round), Some(Direction::Right));
    }

    #[test]
    fn test_autopilot_eats_in_easy_mode() {
        let mut round = Round::new(GameMode::Easy, 5, &BuiltinLevels);
        let mut events = Vec::new();
        for _ in 0..5000 {
            if let Some(direction) = steer(&round) {
                round.steer(direction);
            }
            round.tick(&BuiltinLevels, &mut events);
            if round.state().rats_eaten > 0 {
                break;
            }
        }
        assert!(events.iter().any(|e| matches!(e, RoundEvent::RatEaten { .. })));
    }
}
