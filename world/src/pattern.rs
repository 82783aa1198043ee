//! Textual labyrinth patterns and the grid parsed from them.

use std::{
    borrow::Cow,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use labyrinth_core::{Cell, GridSize, Neighborhood, Position};
use log::{debug, warn};
use thiserror::Error;

/// File name read when no explicit pattern source is configured.
pub const DEFAULT_PATTERN_FILE: &str = "LabyrinthPattern.txt";

/// Built-in labyrinth substituted whenever the pattern source cannot be read.
///
/// Ten columns by eleven rows with the origin at (1, 1) and the goal at (8, 9),
/// joined by a single winding corridor.
pub const FALLBACK_PATTERN: &str = concat!(
    "##########\n",
    "#O       #\n",
    "######## #\n",
    "#        #\n",
    "# ########\n",
    "#        #\n",
    "######## #\n",
    "#        #\n",
    "# ########\n",
    "#       E#\n",
    "##########\n",
);

/// Where the labyrinth pattern text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatternSource {
    /// Pattern read from a text file each time the grid is (re)loaded.
    File(PathBuf),
    /// Pattern held in memory.
    Text(String),
}

impl PatternSource {
    /// Creates a source that reads the provided file.
    #[must_use]
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }

    /// Creates a source backed by the provided text.
    #[must_use]
    pub fn text(pattern: impl Into<String>) -> Self {
        Self::Text(pattern.into())
    }

    /// Retrieves the raw pattern bytes.
    ///
    /// File contents are not required to be UTF-8; only I/O failures are errors.
    pub fn read(&self) -> Result<Cow<'_, [u8]>, PatternError> {
        match self {
            Self::File(path) => fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| PatternError::Unavailable {
                    path: path.clone(),
                    source,
                }),
            Self::Text(text) => Ok(Cow::Borrowed(text.as_bytes())),
        }
    }
}

impl Default for PatternSource {
    fn default() -> Self {
        Self::file(DEFAULT_PATTERN_FILE)
    }
}

/// Failures raised while obtaining pattern text.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern file could not be read.
    #[error("unable to read labyrinth pattern at {}: {source}", .path.display())]
    Unavailable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}

/// Rectangular labyrinth parsed from a pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
    origin: Option<Position>,
    goal: Option<Position>,
    fallback: bool,
}

impl Grid {
    /// Loads the grid from `source`, substituting [`FALLBACK_PATTERN`] when the
    /// source is unavailable.
    #[must_use]
    pub fn load(source: &PatternSource) -> Self {
        let grid = match source.read() {
            Ok(text) => Self::parse(&text),
            Err(error) => {
                warn!("{error}; using the built-in labyrinth instead");
                Self {
                    fallback: true,
                    ..Self::parse(FALLBACK_PATTERN)
                }
            }
        };

        let origin = grid.origin();
        if grid.origin.is_none() {
            warn!(
                "labyrinth pattern has no origin marker; players start at ({}, {})",
                origin.x(),
                origin.y()
            );
        }
        debug!(
            "loaded {}x{} labyrinth with origin at ({}, {})\n{grid}",
            grid.size.width(),
            grid.size.height(),
            origin.x(),
            origin.y()
        );
        grid
    }

    /// Parses a pattern.
    ///
    /// Every byte is one column: `#` is a wall, `o`/`O` marks the origin,
    /// `e`/`E` marks the goal and any other byte, including each byte of a
    /// multi-byte character, is an empty cell. When a marker appears more than
    /// once the last occurrence wins. Rows shorter than the longest row are
    /// padded with walls on the right.
    #[must_use]
    pub fn parse(pattern: impl AsRef<[u8]>) -> Self {
        let mut lines: Vec<&[u8]> = pattern.as_ref().split(|&byte| byte == b'\n').collect();
        if lines.last().is_some_and(|line| line.is_empty()) {
            let _ = lines.pop();
        }

        let mut origin = None;
        let mut goal = None;
        let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(lines.len());

        for (row, line) in lines.into_iter().enumerate() {
            let line = match line {
                [rest @ .., b'\r'] => rest,
                _ => line,
            };
            let mut cells = Vec::with_capacity(line.len());
            for (column, &symbol) in line.iter().enumerate() {
                let here = Position::new(coordinate(column), coordinate(row));
                let cell = match symbol {
                    b'o' | b'O' => {
                        origin = Some(here);
                        Cell::Empty
                    }
                    b'e' | b'E' => {
                        goal = Some(here);
                        Cell::Empty
                    }
                    b'#' => Cell::Wall,
                    _ => Cell::Empty,
                };
                cells.push(cell);
            }
            rows.push(cells);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let height = rows.len();
        let mut cells = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, Cell::Wall);
            cells.extend(row);
        }

        Self {
            size: GridSize::new(dimension(width), dimension(height)),
            cells,
            origin,
            goal,
            fallback: false,
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Spawn cell; `(0, 0)` when the pattern has no origin marker.
    #[must_use]
    pub fn origin(&self) -> Position {
        self.origin.unwrap_or_default()
    }

    /// Cell marked as origin in the pattern, if there was one.
    #[must_use]
    pub const fn origin_marker(&self) -> Option<Position> {
        self.origin
    }

    /// Lap cell, if the pattern has a goal marker.
    #[must_use]
    pub const fn goal(&self) -> Option<Position> {
        self.goal
    }

    /// Reports whether the built-in pattern replaced an unavailable source.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// Cell stored at `position`; anything outside the grid is a wall.
    #[must_use]
    pub fn cell_at(&self, position: Position) -> Cell {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Cell::Wall)
    }

    /// Traversability of the four cells around `position`.
    #[must_use]
    pub fn neighborhood(&self, position: Position) -> Neighborhood {
        Neighborhood::around(position, |cell| self.cell_at(cell))
    }

    /// Iterates over the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        let width = usize::try_from(self.size.width()).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !self.size.contains(position) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.size.width()).ok()?;
        Some(row * width + column)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.rows().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                let here = Position::new(coordinate(column), coordinate(row));
                let symbol = if Some(here) == self.goal {
                    'E'
                } else if Some(here) == self.origin {
                    'O'
                } else if cell.is_wall() {
                    '#'
                } else {
                    ' '
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn coordinate(index: usize) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}

fn dimension(length: usize) -> u32 {
    u32::try_from(length).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_pattern_matches_expected_layout() {
        let grid = Grid::parse(FALLBACK_PATTERN);
        assert_eq!(grid.size(), GridSize::new(10, 11));
        assert_eq!(grid.origin(), Position::new(1, 1));
        assert_eq!(grid.goal(), Some(Position::new(8, 9)));
        assert_eq!(grid.cell_at(Position::new(2, 1)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(9, 1)), Cell::Wall);
        assert_eq!(grid.to_string(), FALLBACK_PATTERN);
    }

    #[test]
    fn missing_file_substitutes_fallback() {
        let source = PatternSource::file("definitely/not/here/LabyrinthPattern.txt");
        let grid = Grid::load(&source);
        assert!(grid.is_fallback());
        assert_eq!(
            Grid {
                fallback: false,
                ..grid
            },
            Grid::parse(FALLBACK_PATTERN)
        );
    }

    #[test]
    fn in_memory_source_is_not_a_fallback() {
        let grid = Grid::load(&PatternSource::text("#O#\n"));
        assert!(!grid.is_fallback());
        assert_eq!(grid.size(), GridSize::new(3, 1));
    }

    #[test]
    fn ragged_rows_are_padded_with_walls() {
        let grid = Grid::parse("O \n\n   E\n#");
        assert_eq!(grid.size(), GridSize::new(4, 4));
        for row in grid.rows() {
            assert_eq!(row.len(), 4);
        }
        assert_eq!(grid.cell_at(Position::new(1, 0)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(2, 0)), Cell::Wall);
        assert_eq!(grid.cell_at(Position::new(3, 0)), Cell::Wall);
        assert_eq!(grid.cell_at(Position::new(0, 1)), Cell::Wall);
        assert_eq!(grid.cell_at(Position::new(3, 2)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(0, 3)), Cell::Wall);
        assert_eq!(grid.cell_at(Position::new(1, 3)), Cell::Wall);
    }

    #[test]
    fn last_marker_occurrence_wins() {
        let grid = Grid::parse("o  e\n O E\n");
        assert_eq!(grid.origin(), Position::new(1, 1));
        assert_eq!(grid.goal(), Some(Position::new(3, 1)));
        assert_eq!(grid.cell_at(Position::new(0, 0)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(3, 0)), Cell::Empty);
    }

    #[test]
    fn unknown_symbols_are_empty() {
        let grid = Grid::parse("#x.~#\n");
        assert_eq!(grid.cell_at(Position::new(1, 0)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(2, 0)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(3, 0)), Cell::Empty);
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        assert_eq!(Grid::parse("##\n##\n").size(), GridSize::new(2, 2));
        assert_eq!(Grid::parse("##\n##").size(), GridSize::new(2, 2));
    }

    #[test]
    fn carriage_returns_are_ignored() {
        let unix = Grid::parse("#O#\n#E#\n");
        let windows = Grid::parse("#O#\r\n#E#\r\n");
        assert_eq!(unix, windows);
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let grid = Grid::parse("   \n   \n");
        let size = grid.size();
        let width = size.width() as i32;
        let height = size.height() as i32;
        for y in -2..height + 2 {
            for x in -2..width + 2 {
                let inside = (0..width).contains(&x) && (0..height).contains(&y);
                let expected = if inside { Cell::Empty } else { Cell::Wall };
                assert_eq!(grid.cell_at(Position::new(x, y)), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn empty_pattern_yields_empty_grid() {
        let grid = Grid::parse("");
        assert_eq!(grid.size(), GridSize::new(0, 0));
        assert_eq!(grid.rows().count(), 0);
        assert_eq!(grid.cell_at(Position::new(0, 0)), Cell::Wall);
    }

    #[test]
    fn non_utf8_file_is_parsed_not_replaced() {
        let path = std::env::temp_dir().join(format!(
            "labyrinth-latin1-{}.txt",
            std::process::id()
        ));
        fs::write(&path, b"#O \xe9E#\n").expect("write latin-1 pattern");
        let grid = Grid::load(&PatternSource::file(&path));
        let _ = fs::remove_file(&path);

        assert!(!grid.is_fallback());
        assert_eq!(grid.size(), GridSize::new(6, 1));
        assert_eq!(grid.origin(), Position::new(1, 0));
        assert_eq!(grid.goal(), Some(Position::new(4, 0)));
        assert_eq!(grid.cell_at(Position::new(3, 0)), Cell::Empty);
    }

    #[test]
    fn multi_byte_characters_span_one_column_per_byte() {
        let grid = Grid::parse("#é#\n");
        assert_eq!(grid.size(), GridSize::new(4, 1));
        assert_eq!(grid.cell_at(Position::new(1, 0)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(2, 0)), Cell::Empty);
        assert_eq!(grid.cell_at(Position::new(3, 0)), Cell::Wall);
    }

    #[test]
    fn missing_origin_marker_is_not_drawn() {
        let grid = Grid::parse("  \n#E\n");
        assert_eq!(grid.origin_marker(), None);
        assert_eq!(grid.origin(), Position::new(0, 0));
        assert_eq!(grid.to_string(), "  \n#E\n");
    }

    #[test]
    fn border_neighbors_read_as_walls() {
        let grid = Grid::parse("O \n  \n");
        let neighbors = grid.neighborhood(Position::new(0, 0));
        assert_eq!(neighbors.up, Cell::Wall);
        assert_eq!(neighbors.left, Cell::Wall);
        assert_eq!(neighbors.down, Cell::Empty);
        assert_eq!(neighbors.right, Cell::Empty);
    }
}
