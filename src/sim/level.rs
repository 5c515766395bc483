//! Level grid: a fixed rows x cols tile mask loaded per level number
//!
//! Row 0 of the tile data is the top row of the play area; positions are
//! y-up pixels with the play area's bottom-left corner at the origin.

use std::ops::Range;
use std::path::PathBuf;

use glam::IVec2;
use thiserror::Error;

use super::collision::Rect;
use crate::consts::{CLEAR_TILE_ID, LEVEL_COLS, LEVEL_ROWS, MAX_LEVEL, MIN_LEVEL, TILE_SIZE};

/// Tile id used for walls by the built-in level set
pub const WALL_TILE_ID: u16 = 1;

/// Errors raised while loading level content
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level {0} is outside 1..=10")]
    OutOfRange(u32),
    #[error("level {number} could not be read from {path}: {source}")]
    Missing {
        number: u32,
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("level {number} is malformed at line {line}: {reason}")]
    Malformed {
        number: u32,
        line: usize,
        reason: String,
    },
}

/// Raw content for one level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelData {
    /// Tile ids, row-major, `LEVEL_ROWS * LEVEL_COLS` long
    pub tiles: Vec<u16>,
    /// Snake spawn position in pixels
    pub spawn: IVec2,
}

/// Provider of level content keyed by level number
pub trait LevelSource {
    fn level_data(&self, number: u32) -> Result<LevelData, LevelError>;
}

/// Canonical snake spawn tile for a level
pub fn spawn_tile(number: u32) -> IVec2 {
    match number {
        2 => IVec2::new(1, 16),
        4 => IVec2::new(1, 14),
        _ => IVec2::new(1, 15),
    }
}

/// The active level grid
#[derive(Debug, Clone)]
pub struct Level {
    number: u32,
    tiles: Vec<u16>,
    spawn: IVec2,
    area: Rect,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// An all-clear grid not yet bound to a level number
    pub fn new() -> Self {
        Self {
            number: 0,
            tiles: vec![CLEAR_TILE_ID; LEVEL_ROWS * LEVEL_COLS],
            spawn: spawn_tile(MIN_LEVEL) * TILE_SIZE,
            area: Rect::play_area(),
        }
    }

    /// Replace the grid with the content for `number`.
    ///
    /// On any error the current grid, number and spawn stay untouched.
    pub fn load(&mut self, number: u32, source: &dyn LevelSource) -> Result<(), LevelError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&number) {
            return Err(LevelError::OutOfRange(number));
        }
        let data = source.level_data(number)?;
        if data.tiles.len() != LEVEL_ROWS * LEVEL_COLS {
            return Err(LevelError::Malformed {
                number,
                line: 0,
                reason: format!(
                    "expected {} tiles, found {}",
                    LEVEL_ROWS * LEVEL_COLS,
                    data.tiles.len()
                ),
            });
        }

        self.number = number;
        self.tiles = data.tiles;
        self.spawn = data.spawn;
        log::info!("Loaded level {number}");
        Ok(())
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Snake spawn position in pixels
    pub fn spawn(&self) -> IVec2 {
        self.spawn
    }

    pub fn area(&self) -> &Rect {
        &self.area
    }

    /// Tile id at `(col, row)`, row 0 at the top
    pub fn tile(&self, col: usize, row: usize) -> Option<u16> {
        if col >= LEVEL_COLS || row >= LEVEL_ROWS {
            return None;
        }
        Some(self.tiles[row * LEVEL_COLS + col])
    }

    /// True if any tile under `rect` is not clear. Cells outside the grid are ignored.
    pub fn is_blocked(&self, rect: &Rect) -> bool {
        let col_start = (rect.left - self.area.left).div_euclid(TILE_SIZE).max(0);
        let col_end = (rect.right - self.area.left).div_euclid(TILE_SIZE);
        let up_start = (rect.bottom - self.area.bottom).div_euclid(TILE_SIZE).max(0);
        let up_end = (rect.top - self.area.bottom).div_euclid(TILE_SIZE);

        for up in up_start..=up_end.min(LEVEL_ROWS as i32 - 1) {
            let row = LEVEL_ROWS - 1 - up as usize;
            for col in col_start..=col_end.min(LEVEL_COLS as i32 - 1) {
                if self.tiles[row * LEVEL_COLS + col as usize] != CLEAR_TILE_ID {
                    return true;
                }
            }
        }
        false
    }

    /// Bottom-left pixel positions of every clear tile, bottom row first
    pub fn clear_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..LEVEL_ROWS).flat_map(move |up| {
            (0..LEVEL_COLS).filter_map(move |col| {
                let row = LEVEL_ROWS - 1 - up;
                (self.tiles[row * LEVEL_COLS + col] == CLEAR_TILE_ID).then(|| {
                    IVec2::new(
                        self.area.left + col as i32 * TILE_SIZE,
                        self.area.bottom + up as i32 * TILE_SIZE,
                    )
                })
            })
        })
    }
}

/// Parse the text map format: one line per row, whitespace separated tile ids.
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_map(number: u32, text: &str) -> Result<Vec<u16>, LevelError> {
    let mut tiles = Vec::with_capacity(LEVEL_ROWS * LEVEL_COLS);
    let mut rows = 0;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = |reason: String| LevelError::Malformed {
            number,
            line: index + 1,
            reason,
        };

        if rows == LEVEL_ROWS {
            return Err(malformed(format!("more than {LEVEL_ROWS} rows")));
        }
        let before = tiles.len();
        for token in line.split_whitespace() {
            let id = token
                .parse::<u16>()
                .map_err(|e| malformed(format!("bad tile id {token:?}: {e}")))?;
            tiles.push(id);
        }
        let found = tiles.len() - before;
        if found != LEVEL_COLS {
            return Err(malformed(format!("expected {LEVEL_COLS} columns, found {found}")));
        }
        rows += 1;
    }

    if rows != LEVEL_ROWS {
        return Err(LevelError::Malformed {
            number,
            line: text.lines().count(),
            reason: format!("expected {LEVEL_ROWS} rows, found {rows}"),
        });
    }
    Ok(tiles)
}

/// Level files on disk: `<dir>/levelNN.map`
#[derive(Debug, Clone)]
pub struct MapDirectory {
    dir: PathBuf,
}

impl MapDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LevelSource for MapDirectory {
    fn level_data(&self, number: u32) -> Result<LevelData, LevelError> {
        let path = self.dir.join(format!("level{number:02}.map"));
        let text = std::fs::read_to_string(&path).map_err(|source| LevelError::Missing {
            number,
            path: path.display().to_string(),
            source,
        })?;
        Ok(LevelData {
            tiles: parse_map(number, &text)?,
            spawn: spawn_tile(number) * TILE_SIZE,
        })
    }
}

/// Ten layouts generated in code, so the game runs without level files
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLevels;

/// Rows (from the top) kept clear in every built-in layout; covers all spawn rows
const SPAWN_CORRIDOR: Range<usize> = 12..17;

fn hline(tiles: &mut [u16], row: usize, cols: Range<usize>) {
    for col in cols {
        tiles[row * LEVEL_COLS + col] = WALL_TILE_ID;
    }
}

fn vline(tiles: &mut [u16], col: usize, rows: Range<usize>) {
    for row in rows {
        tiles[row * LEVEL_COLS + col] = WALL_TILE_ID;
    }
}

fn border(tiles: &mut [u16]) {
    hline(tiles, 0, 0..LEVEL_COLS);
    hline(tiles, LEVEL_ROWS - 1, 0..LEVEL_COLS);
    vline(tiles, 0, 0..LEVEL_ROWS);
    vline(tiles, LEVEL_COLS - 1, 0..LEVEL_ROWS);
}

fn comb(tiles: &mut [u16]) {
    for col in (6..54).step_by(8) {
        vline(tiles, col, 2..11);
        vline(tiles, col + 4, 19..28);
    }
}

impl BuiltinLevels {
    pub fn tiles(number: u32) -> Vec<u16> {
        let mut tiles = vec![CLEAR_TILE_ID; LEVEL_ROWS * LEVEL_COLS];
        let t = tiles.as_mut_slice();
        match number {
            2 => border(t),
            3 => {
                hline(t, 7, 10..50);
                hline(t, 22, 10..50);
            }
            4 => {
                border(t);
                vline(t, 30, 3..27);
            }
            5 => {
                hline(t, 0, 0..LEVEL_COLS);
                hline(t, LEVEL_ROWS - 1, 0..LEVEL_COLS);
                for col in [15, 44] {
                    vline(t, col, 3..11);
                    vline(t, col, 19..27);
                }
            }
            6 => {
                for (rows, cols) in [(4..10, 8..22), (4..10, 38..52), (20..26, 8..22), (20..26, 38..52)] {
                    hline(t, rows.start, cols.clone());
                    hline(t, rows.end - 1, cols.clone());
                    vline(t, cols.start, rows.clone());
                    vline(t, cols.end - 1, rows);
                }
            }
            7 => comb(t),
            8 => {
                border(t);
                hline(t, 7, 10..50);
                hline(t, 22, 10..50);
            }
            9 => {
                border(t);
                hline(t, 5, 5..55);
                hline(t, 24, 5..55);
                vline(t, 5, 5..25);
                vline(t, 54, 5..25);
            }
            10 => {
                border(t);
                comb(t);
                hline(t, 18, 20..40);
            }
            _ => {}
        }
        for row in SPAWN_CORRIDOR {
            for col in 0..LEVEL_COLS {
                t[row * LEVEL_COLS + col] = CLEAR_TILE_ID;
            }
        }
        tiles
    }
}

impl LevelSource for BuiltinLevels {
    fn level_data(&self, number: u32) -> Result<LevelData, LevelError> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&number) {
            return Err(LevelError::OutOfRange(number));
        }
        Ok(LevelData {
            tiles: Self::tiles(number),
            spawn: spawn_tile(number) * TILE_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_text(wall_at: Option<(usize, usize)>) -> String {
        let mut out = String::from("# test map\n");
        for row in 0..LEVEL_ROWS {
            let line: Vec<&str> = (0..LEVEL_COLS)
                .map(|col| if wall_at == Some((col, row)) { "7" } else { "0" })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_load_rejects_out_of_range_without_mutation() {
        let mut level = Level::new();
        level.load(2, &BuiltinLevels).unwrap();
        let before = level.clone();

        assert!(matches!(level.load(0, &BuiltinLevels), Err(LevelError::OutOfRange(0))));
        assert!(matches!(level.load(11, &BuiltinLevels), Err(LevelError::OutOfRange(11))));
        assert_eq!(level.number(), 2);
        assert_eq!(level.tiles, before.tiles);
        assert_eq!(level.spawn(), before.spawn());
    }

    #[test]
    fn test_spawn_table() {
        let mut level = Level::new();
        for number in MIN_LEVEL..=MAX_LEVEL {
            level.load(number, &BuiltinLevels).unwrap();
            let expected_y = match number {
                2 => 16,
                4 => 14,
                _ => 15,
            };
            assert_eq!(level.spawn(), IVec2::new(16, expected_y * 16));
            assert!(!level.is_blocked(&Rect::tile(level.spawn())));
        }
    }

    #[test]
    fn test_is_blocked_maps_rows_top_down() {
        let tiles = parse_map(3, &map_text(Some((2, 0)))).unwrap();
        struct One(Vec<u16>);
        impl LevelSource for One {
            fn level_data(&self, _number: u32) -> Result<LevelData, LevelError> {
                Ok(LevelData {
                    tiles: self.0.clone(),
                    spawn: IVec2::ZERO,
                })
            }
        }
        let mut level = Level::new();
        level.load(3, &One(tiles)).unwrap();

        // Row 0 is the top row of the play area
        assert!(level.is_blocked(&Rect::tile(IVec2::new(32, 464))));
        assert!(!level.is_blocked(&Rect::tile(IVec2::new(32, 0))));
        assert!(!level.is_blocked(&Rect::tile(IVec2::new(48, 464))));
        // A rect straddling the wall tile is blocked too
        assert!(level.is_blocked(&Rect::tile(IVec2::new(40, 456))));
    }

    #[test]
    fn test_parse_map_errors() {
        assert!(parse_map(1, &map_text(None)).is_ok());

        let short = map_text(None).lines().take(20).collect::<Vec<_>>().join("\n");
        assert!(matches!(parse_map(1, &short), Err(LevelError::Malformed { .. })));

        let bad = map_text(None).replacen("0 0", "0 x", 1);
        assert!(matches!(parse_map(1, &bad), Err(LevelError::Malformed { line: 2, .. })));
    }

    #[test]
    fn test_missing_map_file() {
        let source = MapDirectory::new("/nonexistent/cyber-snake-levels");
        let mut level = Level::new();
        assert!(matches!(level.load(1, &source), Err(LevelError::Missing { number: 1, .. })));
        assert_eq!(level.number(), 0);
    }

    #[test]
    fn test_builtin_border_blocks_edges() {
        let mut level = Level::new();
        level.load(2, &BuiltinLevels).unwrap();
        assert!(level.is_blocked(&Rect::tile(IVec2::new(0, 0))));
        assert!(level.is_blocked(&Rect::tile(IVec2::new(944, 464))));
        // Corridor rows stay open even through the border
        assert!(!level.is_blocked(&Rect::tile(IVec2::new(0, 240))));
        assert!(level.clear_tiles().count() < LEVEL_ROWS * LEVEL_COLS);
    }
}
