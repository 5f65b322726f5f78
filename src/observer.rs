use std::io::{self, Write};

use tracing::info;

use crate::agent::Agent;
use crate::layout::Layout;
use crate::observation::Observation;
use crate::types::{Direction, Position};

/// Callbacks for following an episode while it runs. All hooks default to
/// no-ops so observers only implement what they care about.
pub trait EpisodeObserver {
    fn on_episode_start(
        &mut self,
        layout: &Layout,
        start: Position,
        gold: Position,
        step_limit: i32,
    ) {
        let _ = (layout, start, gold, step_limit);
    }

    /// Called after every executed move with the resulting observation.
    fn on_step(&mut self, step: i32, direction: Direction, observation: &Observation, agent: &Agent) {
        let _ = (step, direction, observation, agent);
    }

    fn on_episode_finished(&mut self, success: bool, steps: i32) {
        let _ = (success, steps);
    }
}

/// Console observer: structured logging plus the agent's belief map.
pub struct DefaultObserver;

impl EpisodeObserver for DefaultObserver {
    fn on_episode_start(
        &mut self,
        layout: &Layout,
        start: Position,
        gold: Position,
        step_limit: i32,
    ) {
        info!("episode started");
        info!("- maze size: {}x{}", layout.rows, layout.cols);
        info!("- start: ({}, {})", start.row, start.col);
        info!("- gold: ({}, {})", gold.row, gold.col);
        info!("- step limit: {}", step_limit);
    }

    fn on_step(&mut self, step: i32, direction: Direction, observation: &Observation, agent: &Agent) {
        info!(
            "step: {}, move: {:?}, pos: ({}, {}), phase: {:?}",
            step, direction, observation.position.row, observation.position.col, agent.phase()
        );

        let map = agent.belief().draw_ascii(observation.position);
        let _ = writeln!(io::stdout(), "{}", map);
    }

    fn on_episode_finished(&mut self, success: bool, steps: i32) {
        if success {
            info!("agent brought the gold back to the start in {} steps", steps);
        } else {
            info!("agent failed to bring the gold back, gave up after {} steps", steps);
        }
    }
}

/// Fans every callback out to a list of observers.
pub struct CompositeObserver {
    observers: Vec<Box<dyn EpisodeObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Box<dyn EpisodeObserver>>) -> Self {
        Self { observers }
    }
}

impl EpisodeObserver for CompositeObserver {
    fn on_episode_start(
        &mut self,
        layout: &Layout,
        start: Position,
        gold: Position,
        step_limit: i32,
    ) {
        for observer in &mut self.observers {
            observer.on_episode_start(layout, start, gold, step_limit);
        }
    }

    fn on_step(&mut self, step: i32, direction: Direction, observation: &Observation, agent: &Agent) {
        for observer in &mut self.observers {
            observer.on_step(step, direction, observation, agent);
        }
    }

    fn on_episode_finished(&mut self, success: bool, steps: i32) {
        for observer in &mut self.observers {
            observer.on_episode_finished(success, steps);
        }
    }
}
