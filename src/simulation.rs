use std::time::Instant;

use tracing::warn;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::keeper::MazeKeeper;
use crate::layout::{Layout, LayoutError};
use crate::observer::EpisodeObserver;
use crate::types::Position;

#[derive(Debug, Clone)]
pub struct EpisodeReport {
    pub success: bool,
    pub steps: i32,
    pub trace: Vec<Position>,
}

/// Drives one episode: the environment and the agent alternate strictly,
/// one observation in and one move out per turn, until the episode
/// finishes or the step ceiling is hit.
pub struct Simulation {
    keeper: MazeKeeper,
    agent: Agent,
    observer: Box<dyn EpisodeObserver>,
}

impl Simulation {
    pub fn new(
        layout: Layout,
        step_limit: i32,
        observer: impl EpisodeObserver + 'static,
    ) -> Result<Self, LayoutError> {
        let keeper = MazeKeeper::new(layout)?;
        let agent = Agent::new(
            keeper.layout().rows,
            keeper.layout().cols,
            step_limit,
            keeper.start_position(),
            keeper.gold_position(),
        );
        Ok(Self {
            keeper,
            agent,
            observer: Box::new(observer),
        })
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn run(&mut self) -> Result<EpisodeReport, AgentError> {
        self.observer.on_episode_start(
            self.keeper.layout(),
            self.keeper.start_position(),
            self.keeper.gold_position(),
            self.agent.step_limit,
        );

        let mut observation = self.keeper.observation();
        let mut trace = Vec::new();
        let mut step = 0;

        while !self.keeper.finished() && step < self.agent.step_limit {
            let turn_start = Instant::now();

            let direction = match self.agent.select_action(&observation) {
                Ok(direction) => direction,
                Err(AgentError::NoPath) => {
                    warn!("no further progress possible, ending episode");
                    break;
                }
                Err(error) => return Err(error),
            };

            step += 1;
            observation = self.keeper.apply(direction);
            trace.push(observation.position);
            self.observer.on_step(step, direction, &observation, &self.agent);

            let turn_duration = turn_start.elapsed();
            if turn_duration.as_millis() > 100 {
                warn!(
                    "step {} took {:.2}ms (move: {:?})",
                    step,
                    turn_duration.as_secs_f64() * 1000.0,
                    direction
                );
            }
        }

        let success = self.keeper.finished();
        self.observer.on_episode_finished(success, step);
        Ok(EpisodeReport {
            success,
            steps: step,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::belief::Tile;
    use crate::generator::generate_empty;
    use crate::layout::Cell;
    use crate::types::Direction;

    struct NullObserver;

    impl EpisodeObserver for NullObserver {}

    #[test]
    fn test_open_grid_episode_takes_sixteen_moves() {
        let mut simulation = Simulation::new(generate_empty(5, 5), 1000, NullObserver).unwrap();
        let report = simulation.run().unwrap();

        assert!(report.success);
        assert_eq!(report.steps, 16);
        // Tie-break order puts South before East on the open grid.
        assert_eq!(report.trace[0], Position::new(1, 0));
        assert_eq!(*report.trace.last().unwrap(), Position::new(0, 0));
        // No barrier ever persists past the end of the episode.
        assert_eq!(simulation.agent().belief().count_of(Tile::Barrier), 0);
    }

    #[test]
    fn test_straight_corridor_trace_is_twice_its_length() {
        let mut layout = Layout::new(1, 5);
        layout.set(Position::new(0, 0), Cell::Start);
        layout.set(Position::new(0, 4), Cell::Gold);

        let mut simulation = Simulation::new(layout, 1000, NullObserver).unwrap();
        let report = simulation.run().unwrap();

        assert!(report.success);
        assert_eq!(report.steps, 8);
        assert_eq!(report.trace.len(), 8);
    }

    #[test]
    fn test_dead_end_episode_recovers_and_returns() {
        // The short way south turns out walled; the agent must back out
        // of the dead end, go around, and still replay a three-move
        // return route.
        let layout = Layout::from_rows(vec![
            vec![Cell::Start, Cell::Empty, Cell::Empty],
            vec![Cell::Empty, Cell::Obstacle, Cell::Gold],
        ]);

        let mut simulation = Simulation::new(layout, 1000, NullObserver).unwrap();
        let report = simulation.run().unwrap();

        assert!(report.success);
        assert_eq!(report.steps, 8);
        assert_eq!(
            simulation.agent().return_route(),
            Some(
                [Direction::North, Direction::West, Direction::West].as_slice()
            )
        );
        assert_eq!(simulation.agent().belief().count_of(Tile::Barrier), 0);
    }

    #[test]
    fn test_step_ceiling_halts_episode() {
        let mut simulation = Simulation::new(generate_empty(5, 5), 3, NullObserver).unwrap();
        let report = simulation.run().unwrap();
        assert!(!report.success);
        assert_eq!(report.steps, 3);
    }

    #[test]
    fn test_unreachable_gold_ends_as_failure() {
        let layout = Layout::from_rows(vec![vec![
            Cell::Start,
            Cell::Obstacle,
            Cell::Gold,
        ]]);

        let mut simulation = Simulation::new(layout, 1000, NullObserver).unwrap();
        let report = simulation.run().unwrap();
        assert!(!report.success);
        assert_eq!(report.steps, 0);
    }
}
