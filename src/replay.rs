use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use time::{OffsetDateTime, format_description};
use tracing::warn;

use crate::agent::Agent;
use crate::layout::Layout;
use crate::observation::Observation;
use crate::observer::EpisodeObserver;
use crate::types::{Direction, Position};

/// Records an episode to a timestamped text file in the traces folder:
/// a header line, one line per executed move, and a summary line.
pub struct TraceFileObserver {
    file: File,
}

impl TraceFileObserver {
    pub fn new(traces_folder: &str) -> io::Result<Self> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let date_time_str = now
            .format(
                &format_description::parse("[year][month][day]-[hour][minute][second]")
                    .map_err(io::Error::other)?,
            )
            .map_err(io::Error::other)?;

        let filename = Path::new(traces_folder).join(format!("{}.trace", date_time_str));
        if let Some(parent) = filename.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(filename)?;
        Ok(Self { file })
    }

    fn write_line(&mut self, line: String) {
        if let Err(error) = writeln!(self.file, "{}", line).and_then(|_| self.file.flush()) {
            warn!("trace file write failed: {}", error);
        }
    }
}

impl EpisodeObserver for TraceFileObserver {
    fn on_episode_start(
        &mut self,
        layout: &Layout,
        start: Position,
        gold: Position,
        step_limit: i32,
    ) {
        self.write_line(format!(
            "maze {}x{} start ({}, {}) gold ({}, {}) limit {}",
            layout.rows, layout.cols, start.row, start.col, gold.row, gold.col, step_limit
        ));
    }

    fn on_step(&mut self, step: i32, direction: Direction, observation: &Observation, _agent: &Agent) {
        self.write_line(format!(
            "{} {:?} ({}, {})",
            step, direction, observation.position.row, observation.position.col
        ));
    }

    fn on_episode_finished(&mut self, success: bool, steps: i32) {
        let outcome = if success { "success" } else { "failure" };
        self.write_line(format!("result {} after {} steps", outcome, steps));
    }
}
