//! The authoritative character grid.
//!
//! The grid is a passive service: it answers bounds and road queries,
//! reads and writes symbols, and enumerates cells by symbol. It does no
//! locking of its own; the controller owns it behind its monitor lock, which
//! is what makes these operations atomic from the agents' point of view.

use crate::error::{ChaseError, Result};
use crate::legend::Legend;
use crate::types::Position;

/// The operations the controller needs from a grid.
pub trait GridService: Send {
    /// Number of rows.
    fn rows(&self) -> usize;

    /// Number of columns.
    fn cols(&self) -> usize;

    /// Whether the position lies inside the grid.
    fn is_valid(&self, pos: Position) -> bool;

    /// Whether the position is inside the grid and traversable.
    fn is_road(&self, pos: Position) -> bool;

    /// Symbol currently shown at a position, `None` when out of bounds.
    fn symbol(&self, pos: Position) -> Option<char>;

    /// Overwrite the symbol shown at a road position.
    fn set_symbol(&mut self, pos: Position, symbol: char);

    /// All positions currently showing a symbol, in row-major order.
    fn positions_of(&self, symbol: char) -> Vec<Position>;

    /// Text rendering, one line per row.
    fn render(&self) -> String;
}

/// In-memory grid parsed from a text map.
#[derive(Debug, Clone)]
pub struct CharGrid {
    cells: Vec<Vec<char>>,
    /// Road mask fixed at load time; writes never turn road into wall.
    road: Vec<Vec<bool>>,
    legend: Legend,
}

impl CharGrid {
    /// Parse a rectangular text map. Blank trailing lines are ignored.
    pub fn parse(text: &str, legend: Legend) -> Result<Self> {
        let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while lines.last().map_or(false, |l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return Err(ChaseError::EmptyMap);
        }

        let cells: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
        let width = cells[0].len();
        if width == 0 {
            return Err(ChaseError::EmptyMap);
        }
        for (row, line) in cells.iter().enumerate() {
            if line.len() != width {
                return Err(ChaseError::RaggedMap {
                    row,
                    expected: width,
                    found: line.len(),
                });
            }
        }

        let road = cells
            .iter()
            .map(|line| line.iter().map(|&c| legend.is_road_symbol(c)).collect())
            .collect();

        Ok(Self { cells, road, legend })
    }

    /// Read and parse a map file.
    pub fn load(path: &std::path::Path, legend: Legend) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, legend)
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    fn index(&self, pos: Position) -> Option<(usize, usize)> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        (r < self.cells.len() && c < self.cells[0].len()).then_some((r, c))
    }
}

impl GridService for CharGrid {
    fn rows(&self) -> usize {
        self.cells.len()
    }

    fn cols(&self) -> usize {
        self.cells[0].len()
    }

    fn is_valid(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn is_road(&self, pos: Position) -> bool {
        self.index(pos).map_or(false, |(r, c)| self.road[r][c])
    }

    fn symbol(&self, pos: Position) -> Option<char> {
        self.index(pos).map(|(r, c)| self.cells[r][c])
    }

    fn set_symbol(&mut self, pos: Position, symbol: char) {
        let (r, c) = self
            .index(pos)
            .unwrap_or_else(|| panic!("set_symbol outside the grid at {pos}"));
        assert!(self.road[r][c], "set_symbol on a wall at {pos}");
        self.cells[r][c] = symbol;
    }

    fn positions_of(&self, symbol: char) -> Vec<Position> {
        let mut found = Vec::new();
        for (r, line) in self.cells.iter().enumerate() {
            for (c, &cell) in line.iter().enumerate() {
                if cell == symbol {
                    found.push(Position::new(r as i32, c as i32));
                }
            }
        }
        found
    }

    fn render(&self) -> String {
        self.cells
            .iter()
            .map(|line| line.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "#######\n#X..$ #\n# ##%R#\n#######\n";

    fn grid() -> CharGrid {
        CharGrid::parse(MAP, Legend::default()).unwrap()
    }

    #[test]
    fn parses_dimensions() {
        let g = grid();
        assert_eq!(g.rows(), 4);
        assert_eq!(g.cols(), 7);
    }

    #[test]
    fn walls_and_roads() {
        let g = grid();
        assert!(!g.is_road(Position::new(0, 0)));
        assert!(g.is_road(Position::new(1, 1)));
        assert!(g.is_road(Position::new(2, 4)), "cage gate is road");
        assert!(!g.is_road(Position::new(-1, 3)));
        assert!(!g.is_valid(Position::new(4, 0)));
        assert!(g.is_valid(Position::new(3, 6)));
    }

    #[test]
    fn positions_are_row_major() {
        let g = grid();
        assert_eq!(
            g.positions_of('.'),
            vec![Position::new(1, 2), Position::new(1, 3)]
        );
        assert_eq!(g.positions_of('R'), vec![Position::new(2, 5)]);
        assert!(g.positions_of('G').is_empty());
    }

    #[test]
    fn set_symbol_keeps_road_mask() {
        let mut g = grid();
        let p = Position::new(1, 2);
        g.set_symbol(p, 'C');
        assert_eq!(g.symbol(p), Some('C'));
        g.set_symbol(p, ' ');
        assert!(g.is_road(p));
        assert!(g.positions_of('.').len() == 1);
    }

    #[test]
    #[should_panic(expected = "wall")]
    fn set_symbol_on_wall_panics() {
        let mut g = grid();
        g.set_symbol(Position::new(0, 0), 'X');
    }

    #[test]
    fn rejects_ragged_and_empty_maps() {
        let err = CharGrid::parse("###\n#X\n###", Legend::default()).unwrap_err();
        assert_eq!(err, ChaseError::RaggedMap { row: 1, expected: 3, found: 2 });
        assert_eq!(
            CharGrid::parse("\n\n", Legend::default()).unwrap_err(),
            ChaseError::EmptyMap
        );
    }

    #[test]
    fn render_round_trips_the_text() {
        assert_eq!(grid().render(), MAP.trim_end());
    }
}
