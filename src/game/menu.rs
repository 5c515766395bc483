//! Vertical text menus
//!
//! Items are laid out top to bottom, centred in the internal resolution.
//! Empty items are spacers: drawn as gaps, skipped by navigation and the
//! pointer.

use glam::IVec2;

use crate::consts::{INTERNAL_HEIGHT, INTERNAL_WIDTH};
use crate::sim::Rect;

/// Glyph cell size used for layout
pub const CHAR_WIDTH: i32 = 16;
pub const LINE_HEIGHT: i32 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    title: Option<String>,
    items: Vec<String>,
    highlight: usize,
}

impl Menu {
    /// Menu with the first selectable item highlighted
    pub fn new(title: Option<&str>, items: &[&str]) -> Self {
        let items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        let highlight = items.iter().position(|s| !s.is_empty()).unwrap_or(0);
        Self {
            title: title.map(str::to_string),
            items,
            highlight,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.items.get(index).is_some_and(|s| !s.is_empty())
    }

    /// Move the highlight to `index` if it is selectable
    pub fn set_highlight(&mut self, index: usize) -> bool {
        if self.is_selectable(index) {
            self.highlight = index;
            true
        } else {
            false
        }
    }

    pub fn set_item(&mut self, index: usize, text: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            *item = text.into();
        }
    }

    /// Next selectable item below, wrapping to the top
    pub fn highlight_next(&mut self) {
        self.step(1);
    }

    /// Next selectable item above, wrapping to the bottom
    pub fn highlight_prev(&mut self) {
        self.step(self.items.len().saturating_sub(1));
    }

    fn step(&mut self, by: usize) {
        let len = self.items.len();
        let mut index = self.highlight;
        for _ in 0..len {
            index = (index + by) % len;
            if self.is_selectable(index) {
                self.highlight = index;
                return;
            }
        }
    }

    fn title_rows(&self) -> i32 {
        if self.title.is_some() { 2 } else { 0 }
    }

    fn top(&self) -> i32 {
        let rows = self.items.len() as i32 + self.title_rows();
        (INTERNAL_HEIGHT + rows * LINE_HEIGHT) / 2
    }

    /// Screen rectangle of item `index` (y-up)
    pub fn item_rect(&self, index: usize) -> Rect {
        let widest = self
            .items
            .iter()
            .map(|s| s.chars().count())
            .chain(self.title.iter().map(|s| s.chars().count()))
            .max()
            .unwrap_or(0) as i32;
        let width = widest * CHAR_WIDTH;
        let left = (INTERNAL_WIDTH - width) / 2;
        let top = self.top() - (self.title_rows() + index as i32) * LINE_HEIGHT;
        Rect::new(left, top, left + width - 1, top - LINE_HEIGHT + 1)
    }

    /// Selectable item under `point`
    pub fn item_at(&self, point: IVec2) -> Option<usize> {
        (0..self.items.len()).find(|i| self.is_selectable(*i) && self.item_rect(*i).contains_point(point))
    }
}

/// What the pointer did to a menu this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    None,
    /// Moved onto a different item
    Hover(usize),
    /// Clicked an item
    Select(usize),
}

/// Pointer state for menus: hover on movement, select on a fresh click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerTracker {
    last: IVec2,
    /// Button has been up since entry or the last click
    armed: bool,
}

impl PointerTracker {
    pub fn new(pointer: IVec2) -> Self {
        Self {
            last: pointer,
            armed: false,
        }
    }

    pub fn poll(&mut self, menu: &Menu, pointer: IVec2, down: bool) -> PointerAction {
        let moved = pointer != self.last;
        self.last = pointer;
        let hit = menu.item_at(pointer);

        if !down {
            self.armed = true;
        } else if self.armed {
            if let Some(index) = hit {
                self.armed = false;
                return PointerAction::Select(index);
            }
        }

        match hit {
            Some(index) if moved && index != menu.highlight() => PointerAction::Hover(index),
            _ => PointerAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Menu {
        Menu::new(Some("OPTIONS"), &["ONE", "TWO", "", "THREE", "", "DONE"])
    }

    #[test]
    fn test_navigation_skips_spacers_and_wraps() {
        let mut menu = options();
        assert_eq!(menu.highlight(), 0);
        menu.highlight_next();
        menu.highlight_next();
        assert_eq!(menu.highlight(), 3);
        menu.highlight_next();
        assert_eq!(menu.highlight(), 5);
        menu.highlight_next();
        assert_eq!(menu.highlight(), 0);
        menu.highlight_prev();
        assert_eq!(menu.highlight(), 5);
        assert!(!menu.set_highlight(2));
    }

    #[test]
    fn test_items_stack_downwards() {
        let menu = options();
        let first = menu.item_rect(0);
        let second = menu.item_rect(1);
        assert_eq!(first.bottom - 1, second.top);
        assert!(!first.overlaps(&second));
        let centre = IVec2::new((second.left + second.right) / 2, (second.top + second.bottom) / 2);
        assert_eq!(menu.item_at(centre), Some(1));
        let gap = menu.item_rect(2);
        assert_eq!(menu.item_at(IVec2::new(centre.x, gap.top - 2)), None);
    }

    #[test]
    fn test_pointer_needs_release_before_click() {
        let menu = options();
        let rect = menu.item_rect(3);
        let over = IVec2::new(rect.left + 2, rect.bottom + 2);
        let mut tracker = PointerTracker::new(IVec2::ZERO);

        assert_eq!(tracker.poll(&menu, over, true), PointerAction::Hover(3));
        assert_eq!(tracker.poll(&menu, over, false), PointerAction::None);
        assert_eq!(tracker.poll(&menu, over, true), PointerAction::Select(3));
        assert_eq!(tracker.poll(&menu, over, true), PointerAction::None);
    }
}
