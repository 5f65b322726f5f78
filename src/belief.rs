use tracing::debug;

use crate::error::AgentError;
use crate::observation::Observation;
use crate::types::{Direction, Position};

/// The agent's classification of one maze cell. `Barrier` never reflects
/// ground truth: it is the agent's own reversible pruning overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Unknown,
    Free,
    Wall,
    Start,
    Gold,
    Barrier,
}

/// What the agent believes about every cell of the maze, accumulated from
/// observations. Dimensions are fixed at construction; the start and gold
/// coordinates are known from the outset even though unobserved.
#[derive(Debug, Clone)]
pub struct BeliefMap {
    pub rows: i32,
    pub cols: i32,
    start: Position,
    gold: Position,
    tiles: Vec<Tile>,
}

impl BeliefMap {
    pub fn new(rows: i32, cols: i32, start: Position, gold: Position) -> Self {
        let mut map = Self {
            rows,
            cols,
            start,
            gold,
            tiles: vec![Tile::Unknown; (rows * cols) as usize],
        };
        map.set(start, Tile::Start);
        map.set(gold, Tile::Gold);
        map
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn gold(&self) -> Position {
        self.gold
    }

    pub fn in_bounds(&self, pos: &Position) -> bool {
        pos.row >= 0 && pos.row < self.rows && pos.col >= 0 && pos.col < self.cols
    }

    pub fn get(&self, pos: &Position) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[(pos.row * self.cols + pos.col) as usize])
    }

    fn set(&mut self, pos: Position, tile: Tile) {
        self.tiles[(pos.row * self.cols + pos.col) as usize] = tile;
    }

    /// A cell the search may pass through: in bounds and not believed to
    /// be a wall or pruned behind a barrier. `Unknown` counts as walkable.
    pub fn is_walkable(&self, pos: &Position) -> bool {
        !matches!(self.get(pos), None | Some(Tile::Wall) | Some(Tile::Barrier))
    }

    /// Fold one observation into the map: along each ray the seen cells
    /// become `Free` (a barrier is never downgraded implicitly) and the
    /// cell just beyond, when in bounds, becomes `Wall`. Every ray is
    /// bounds-checked before anything is mutated.
    pub fn integrate(&mut self, observation: &Observation) -> Result<(), AgentError> {
        let origin = observation.position;
        if !self.in_bounds(&origin) {
            return Err(AgentError::OutOfBounds { position: origin });
        }

        for direction in Direction::ALL {
            let range = observation.vision.get(direction);
            let (dr, dc) = direction.delta();
            let farthest = Position::new(origin.row + range * dr, origin.col + range * dc);
            if range < 0 || !self.in_bounds(&farthest) {
                return Err(AgentError::OutOfBounds { position: farthest });
            }
        }

        for direction in Direction::ALL {
            let range = observation.vision.get(direction);
            let mut cell = origin;
            for _ in 0..range {
                cell = cell.step(direction);
                if self.get(&cell) != Some(Tile::Barrier) {
                    self.set(cell, Tile::Free);
                }
            }
            let beyond = cell.step(direction);
            if self.in_bounds(&beyond) {
                self.set(beyond, Tile::Wall);
            }
        }

        // Gold is always re-asserted; the start cell keeps a barrier that
        // exploration placed on it.
        let (start, gold) = (self.start, self.gold);
        if self.get(&start) != Some(Tile::Barrier) {
            self.set(start, Tile::Start);
        }
        self.set(gold, Tile::Gold);
        Ok(())
    }

    /// Prune the given cell out of future searches.
    pub fn place_barrier(&mut self, pos: Position) {
        debug!("placing barrier at ({}, {})", pos.row, pos.col);
        self.set(pos, Tile::Barrier);
    }

    /// Revert the dead-end overlay: every `Barrier` becomes `Free` again.
    pub fn remove_barriers(&mut self) {
        for tile in &mut self.tiles {
            if *tile == Tile::Barrier {
                *tile = Tile::Free;
            }
        }
        let (start, gold) = (self.start, self.gold);
        self.set(start, Tile::Start);
        self.set(gold, Tile::Gold);
    }

    /// Exclude unexplored territory: every `Unknown` becomes `Barrier`,
    /// with the start and gold classifications restored afterwards.
    pub fn seal_unknown(&mut self) {
        for tile in &mut self.tiles {
            if *tile == Tile::Unknown {
                *tile = Tile::Barrier;
            }
        }
        let (start, gold) = (self.start, self.gold);
        self.set(start, Tile::Start);
        self.set(gold, Tile::Gold);
    }

    pub fn count_of(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }

    pub fn draw_ascii(&self, agent: Position) -> String {
        const RESET: &str = "\x1b[0m";
        const AGENT: &str = "\x1b[1;33m"; // Bright yellow
        const WALL: &str = "\x1b[90m"; // Dark gray
        const UNKNOWN: &str = "\x1b[90m"; // Dark gray
        const BARRIER: &str = "\x1b[96m"; // Bright cyan
        const START: &str = "\x1b[1;32m"; // Bright green
        const GOLD: &str = "\x1b[1;33m"; // Bright yellow

        let mut output = String::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = Position::new(row, col);
                if pos == agent {
                    output.push_str(&format!("{}@{}", AGENT, RESET));
                    continue;
                }
                let tile_str = match self.get(&pos) {
                    Some(Tile::Unknown) => format!("{}·{}", UNKNOWN, RESET),
                    Some(Tile::Free) => " ".to_string(),
                    Some(Tile::Wall) => format!("{}█{}", WALL, RESET),
                    Some(Tile::Start) => format!("{}S{}", START, RESET),
                    Some(Tile::Gold) => format!("{}G{}", GOLD, RESET),
                    Some(Tile::Barrier) => format!("{}░{}", BARRIER, RESET),
                    None => "?".to_string(),
                };
                output.push_str(&tile_str);
            }
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Vision;

    fn open_map() -> BeliefMap {
        BeliefMap::new(5, 5, Position::new(0, 0), Position::new(4, 4))
    }

    #[test]
    fn test_observation_marks_free_and_wall() {
        let mut map = open_map();
        // Standing at (2, 2), seeing one cell north and two east before a wall.
        let observation = Observation::new(Position::new(2, 2), Vision::new(1, 0, 0, 2));
        map.integrate(&observation).unwrap();

        assert_eq!(map.get(&Position::new(1, 2)), Some(Tile::Free));
        assert_eq!(map.get(&Position::new(0, 2)), Some(Tile::Wall));
        assert_eq!(map.get(&Position::new(3, 2)), Some(Tile::Wall));
        assert_eq!(map.get(&Position::new(2, 3)), Some(Tile::Free));
        assert_eq!(map.get(&Position::new(2, 4)), Some(Tile::Free));
        assert_eq!(map.get(&Position::new(2, 1)), Some(Tile::Wall));
        // The cell beyond the full-length east ray is outside the maze.
        assert_eq!(map.get(&Position::new(2, 5)), None);
    }

    #[test]
    fn test_classification_never_regresses_to_unknown() {
        let mut map = open_map();
        let observation = Observation::new(Position::new(2, 2), Vision::new(1, 1, 1, 1));
        map.integrate(&observation).unwrap();
        let before: Vec<Tile> = (0..5)
            .flat_map(|row| (0..5).map(move |col| Position::new(row, col)))
            .map(|pos| map.get(&pos).unwrap())
            .collect();

        // A later, narrower observation must not erase what is known.
        let observation = Observation::new(Position::new(2, 2), Vision::new(0, 0, 0, 0));
        map.integrate(&observation).unwrap();
        for (index, pos) in (0..5)
            .flat_map(|row| (0..5).map(move |col| Position::new(row, col)))
            .enumerate()
        {
            if before[index] != Tile::Unknown {
                assert_ne!(map.get(&pos), Some(Tile::Unknown), "regressed at {:?}", pos);
            }
        }
    }

    #[test]
    fn test_barrier_not_downgraded_by_observation() {
        let mut map = open_map();
        map.place_barrier(Position::new(2, 3));
        let observation = Observation::new(Position::new(2, 2), Vision::new(0, 0, 0, 2));
        map.integrate(&observation).unwrap();
        assert_eq!(map.get(&Position::new(2, 3)), Some(Tile::Barrier));
        assert_eq!(map.get(&Position::new(2, 4)), Some(Tile::Free));
    }

    #[test]
    fn test_start_kept_as_barrier_but_gold_always_restored() {
        let mut map = open_map();
        map.place_barrier(Position::new(0, 0));
        // A ray that sweeps across both the start and the gold cells.
        let observation = Observation::new(Position::new(0, 4), Vision::new(0, 4, 4, 0));
        map.integrate(&observation).unwrap();

        assert_eq!(map.get(&Position::new(0, 0)), Some(Tile::Barrier));
        assert_eq!(map.get(&Position::new(4, 4)), Some(Tile::Gold));

        // Without the barrier the start classification is re-asserted.
        let mut map = open_map();
        map.integrate(&observation).unwrap();
        assert_eq!(map.get(&Position::new(0, 0)), Some(Tile::Start));
    }

    #[test]
    fn test_out_of_bounds_vision_rejected_before_mutation() {
        let mut map = open_map();
        let observation = Observation::new(Position::new(2, 2), Vision::new(1, 9, 0, 0));
        let result = map.integrate(&observation);
        assert!(matches!(result, Err(AgentError::OutOfBounds { .. })));
        // The valid north ray must not have been applied either.
        assert_eq!(map.get(&Position::new(1, 2)), Some(Tile::Unknown));
    }

    #[test]
    fn test_remove_barriers_clears_all() {
        let mut map = open_map();
        map.place_barrier(Position::new(1, 1));
        map.place_barrier(Position::new(3, 2));
        map.place_barrier(Position::new(0, 0));
        map.remove_barriers();
        assert_eq!(map.count_of(Tile::Barrier), 0);
        assert_eq!(map.get(&Position::new(0, 0)), Some(Tile::Start));
        assert_eq!(map.get(&Position::new(1, 1)), Some(Tile::Free));
    }

    #[test]
    fn test_seal_unknown_preserves_start_and_gold() {
        let mut map = open_map();
        map.seal_unknown();
        assert_eq!(map.count_of(Tile::Unknown), 0);
        assert_eq!(map.get(&Position::new(0, 0)), Some(Tile::Start));
        assert_eq!(map.get(&Position::new(4, 4)), Some(Tile::Gold));
        assert_eq!(map.count_of(Tile::Barrier), 23);
    }
}
