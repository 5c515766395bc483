//! Rectangle overlap and toroidal wrap
//!
//! Everything on the grid is an axis-aligned rectangle in y-up pixel space:
//! `bottom <= top`, `left <= right`. Entity rectangles use inclusive edges
//! (a 16px tile at x spans `x..=x+15`), play areas use exclusive top/right.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{PLAY_AREA_HEIGHT, PLAY_AREA_WIDTH, TILE_SIZE};

/// Axis-aligned rectangle (y-up)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Footprint of the tile whose bottom-left corner is `pos`
    pub fn tile(pos: IVec2) -> Self {
        Self {
            left: pos.x,
            top: pos.y + TILE_SIZE - 1,
            right: pos.x + TILE_SIZE - 1,
            bottom: pos.y,
        }
    }

    /// Play area covered by the level grid
    pub fn play_area() -> Self {
        Self::new(0, PLAY_AREA_HEIGHT, PLAY_AREA_WIDTH, 0)
    }

    /// Standard AABB test, edges inclusive
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left <= other.right
            && self.right >= other.left
            && self.bottom <= other.top
            && self.top >= other.bottom
    }

    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }
}

/// Free-function form of [`Rect::overlaps`]
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Wrap a tile position that stepped out of `area` back onto the opposite edge.
///
/// Only one edge is corrected per call, checked top, right, bottom, left; a
/// single grid step can only cross one edge. The re-entry position is snapped
/// to the last whole tile inside the area.
pub fn wrap_position(pos: IVec2, area: &Rect) -> IVec2 {
    let mut out = pos;
    if pos.y + TILE_SIZE > area.top {
        out.y = area.bottom;
    } else if pos.x + TILE_SIZE > area.right {
        out.x = area.left;
    } else if pos.y < area.bottom {
        out.y = area.top - area.top % TILE_SIZE - TILE_SIZE;
    } else if pos.x < area.left {
        out.x = area.right - area.right % TILE_SIZE - TILE_SIZE;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;
    use proptest::prelude::*;

    #[test]
    fn test_tile_rect_is_inclusive() {
        let a = Rect::tile(IVec2::new(0, 0));
        let b = Rect::tile(IVec2::new(16, 0));
        let c = Rect::tile(IVec2::new(15, 15));
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert_eq!(a.right, 15);
        assert_eq!(a.top, 15);
    }

    #[test]
    fn test_wrap_each_edge() {
        let area = Rect::play_area();
        assert_eq!(wrap_position(IVec2::new(32, 480), &area), IVec2::new(32, 0));
        assert_eq!(wrap_position(IVec2::new(960, 64), &area), IVec2::new(0, 64));
        assert_eq!(wrap_position(IVec2::new(32, -16), &area), IVec2::new(32, 464));
        assert_eq!(wrap_position(IVec2::new(-16, 64), &area), IVec2::new(944, 64));
        // Inside positions are untouched
        assert_eq!(wrap_position(IVec2::new(944, 464), &area), IVec2::new(944, 464));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100i32..100, ay in -100i32..100, aw in 0i32..50, ah in 0i32..50,
            bx in -100i32..100, by in -100i32..100, bw in 0i32..50, bh in 0i32..50,
        ) {
            let a = Rect::new(ax, ay + ah, ax + aw, ay);
            let b = Rect::new(bx, by + bh, bx + bw, by);
            prop_assert_eq!(rect_overlap(&a, &b), rect_overlap(&b, &a));
        }

        #[test]
        fn prop_step_and_wrap_stays_in_area(col in 0i32..60, row in 0i32..30, dir in 0usize..4) {
            let area = Rect::play_area();
            let pos = IVec2::new(col * TILE_SIZE, row * TILE_SIZE);
            let stepped = pos + Direction::from_index(dir).delta() * TILE_SIZE;
            let wrapped = wrap_position(stepped, &area);
            prop_assert!(wrapped.x >= area.left && wrapped.x < area.right);
            prop_assert!(wrapped.y >= area.bottom && wrapped.y < area.top);
            prop_assert_eq!(wrapped.x % TILE_SIZE, 0);
            prop_assert_eq!(wrapped.y % TILE_SIZE, 0);
        }
    }
}
