//! The fixed table of reserved grid symbols.
//!
//! The legend is built once and never mutated. Every character it names is
//! a road character; anything else on a map is a wall.

use serde::{Deserialize, Serialize};

/// Symbol table shared by the grid, the controller and every agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legend {
    /// Open road.
    pub road: char,
    /// Collectible point.
    pub point: char,
    /// Bonus that opens an attack window.
    pub bonus: char,
    /// Portal entry; exactly two cells carry it when portals exist.
    pub portal_entry: char,
    /// Portal exit; paired with the entries.
    pub portal_exit: char,
    /// Cage gate, passable by hunters only.
    pub cage_gate: char,
    /// Seeker identity symbol.
    pub seeker: char,
    /// Named hunter identity symbols.
    pub hunters: Vec<char>,
    /// Identity symbol shared by generic hunters.
    pub generic_hunter: char,
    /// The two symbols a hunter alternates between while under attack.
    pub blink: [char; 2],
    /// Path mark: the cell is on the agent's current walk.
    pub current_mark: char,
    /// Path mark: the cell was walked and backtracked from.
    pub visited_mark: char,
    /// Path mark: the agent's own spawn cell.
    pub start_mark: char,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            road: ' ',
            point: '.',
            bonus: '$',
            portal_entry: '?',
            portal_exit: '!',
            cage_gate: '%',
            seeker: 'X',
            hunters: vec!['C', 'P', 'O', 'R'],
            generic_hunter: 'G',
            blink: ['b', 'w'],
            current_mark: 'o',
            visited_mark: '+',
            start_mark: '*',
        }
    }
}

impl Legend {
    /// Whether the symbol belongs to an agent (identity or blink symbol).
    pub fn is_agent_symbol(&self, symbol: char) -> bool {
        symbol == self.seeker
            || symbol == self.generic_hunter
            || self.hunters.contains(&symbol)
            || self.blink.contains(&symbol)
    }

    /// Whether a map character is traversable road (as opposed to a wall).
    pub fn is_road_symbol(&self, symbol: char) -> bool {
        symbol == self.road
            || symbol == self.point
            || symbol == self.bonus
            || symbol == self.portal_entry
            || symbol == self.portal_exit
            || symbol == self.cage_gate
            || self.is_agent_symbol(symbol)
    }

    /// Whether the symbol is one of the path marks agents keep in their
    /// private caches. Marks never reach the shared grid.
    pub fn is_path_mark(&self, symbol: char) -> bool {
        symbol == self.current_mark || symbol == self.visited_mark || symbol == self.start_mark
    }

    /// Whether any agent may step onto a cell showing this symbol.
    ///
    /// Cells showing another agent count as free: occupancy is resolved by
    /// the controller, not by the walker.
    pub fn is_open(&self, symbol: char) -> bool {
        symbol == self.road
            || symbol == self.point
            || symbol == self.bonus
            || symbol == self.portal_entry
            || symbol == self.portal_exit
            || self.is_agent_symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_symbols() {
        let legend = Legend::default();
        for c in ['X', 'C', 'P', 'O', 'R', 'G', 'b', 'w'] {
            assert!(legend.is_agent_symbol(c), "{c} should be an agent symbol");
        }
        for c in [' ', '.', '$', '%', '?', '!', '#', 'o', '+', '*'] {
            assert!(!legend.is_agent_symbol(c), "{c} should not be an agent symbol");
        }
    }

    #[test]
    fn walls_are_everything_else() {
        let legend = Legend::default();
        assert!(legend.is_road_symbol('%'));
        assert!(legend.is_road_symbol(' '));
        assert!(!legend.is_road_symbol('#'));
        assert!(!legend.is_road_symbol('|'));
    }

    #[test]
    fn marks_and_gate_are_not_open() {
        let legend = Legend::default();
        assert!(!legend.is_open('%'));
        assert!(!legend.is_open('o'));
        assert!(!legend.is_open('+'));
        assert!(!legend.is_open('*'));
        assert!(legend.is_open('R'));
        assert!(legend.is_open('?'));
        assert!(legend.is_path_mark('*'));
    }
}
