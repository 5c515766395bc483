//! High score table
//!
//! Always exactly ten rows, best first. Empty rows hold placeholder text and
//! a zero score, so a new score qualifies by beating the bottom row.

use serde::{Deserialize, Serialize};

/// Number of rows in the table
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest player name
pub const NAME_LENGTH: usize = 10;

const EMPTY_NAME: &str = "..........";
const EMPTY_MODE: &str = ".......";
const EMPTY_LEVEL: &str = "0-0";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HighScoreEntry {
    /// Up to ten characters
    pub name: String,
    /// Mode label (CLASSIC, REMIX, HARD)
    pub mode: String,
    /// "world-level" reached
    pub level: String,
    pub score: u64,
}

impl Default for HighScoreEntry {
    fn default() -> Self {
        Self {
            name: EMPTY_NAME.to_string(),
            mode: EMPTY_MODE.to_string(),
            level: EMPTY_LEVEL.to_string(),
            score: 0,
        }
    }
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Table of placeholder rows
    pub fn new() -> Self {
        Self {
            entries: vec![HighScoreEntry::default(); MAX_HIGH_SCORES],
        }
    }

    /// Restore the fixed row count after loading foreign data
    pub fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.resize_with(MAX_HIGH_SCORES, HighScoreEntry::default);
        for entry in &mut self.entries {
            entry.name = entry.name.chars().take(NAME_LENGTH).collect();
        }
    }

    /// Check if a score beats the bottom row
    pub fn qualifies(&self, score: u64) -> bool {
        self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Row a score would be written to (0-indexed)
    pub fn insertion_index(&self, score: u64) -> Option<usize> {
        self.entries.iter().position(|e| score > e.score)
    }

    /// Insert at `index`, pushing lower rows down and dropping the last one.
    pub fn insert(&mut self, index: usize, mut entry: HighScoreEntry) {
        if index >= MAX_HIGH_SCORES {
            return;
        }
        entry.name = entry.name.chars().take(NAME_LENGTH).collect();
        self.entries.insert(index, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Get the top score
    pub fn top_score(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            mode: "REMIX".to_string(),
            level: "1-2".to_string(),
            score,
        }
    }

    #[test]
    fn test_placeholder_table() {
        let scores = HighScores::new();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[0].name, "..........");
        assert_eq!(scores.entries[0].level, "0-0");
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_insert_shifts_down() {
        let mut scores = HighScores::new();
        scores.insert(0, entry("FIRST", 100));
        scores.insert(1, entry("SECOND", 50));
        let index = scores.insertion_index(70).unwrap();
        assert_eq!(index, 1);
        scores.insert(index, entry("MIDDLE", 70));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[1].name, "MIDDLE");
        assert_eq!(scores.entries[0].name, "FIRST");
        assert_eq!(scores.entries[2].name, "SECOND");
    }

    #[test]
    fn test_full_table_rejects_low_score() {
        let mut scores = HighScores::new();
        for i in 0..MAX_HIGH_SCORES {
            scores.insert(i, entry("P", 1000 - i as u64 * 10));
        }
        assert!(!scores.qualifies(900));
        assert!(scores.qualifies(911));
        assert_eq!(scores.insertion_index(905), None);
        assert_eq!(scores.top_score(), 1000);
    }

    #[test]
    fn test_normalize_truncates() {
        let mut scores = HighScores {
            entries: vec![entry("AVERYLONGNAMEINDEED", 5)],
        };
        scores.normalize();
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries[0].name, "AVERYLONGN");
    }
}
