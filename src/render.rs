use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use crate::layout::{Cell, Layout};
use crate::types::Position;

/// Console rendering of the true maze with the agent overlaid, and
/// step-by-step playback of a finished episode's trace.
pub struct TraceViewer {
    layout: Layout,
    speed: Duration,
}

impl TraceViewer {
    pub fn new(layout: Layout, speed: Duration) -> Self {
        Self { layout, speed }
    }

    pub fn render(&self, agent: Option<Position>) -> String {
        const RESET: &str = "\x1b[0m";
        const AGENT: &str = "\x1b[1;33m"; // Bright yellow
        const WALL: &str = "\x1b[90m"; // Dark gray
        const START: &str = "\x1b[1;32m"; // Bright green
        const GOLD: &str = "\x1b[1;33m"; // Bright yellow

        let mut output = String::new();
        for row in 0..self.layout.rows {
            for col in 0..self.layout.cols {
                let pos = Position::new(row, col);
                if agent == Some(pos) {
                    output.push_str(&format!("{}@{}", AGENT, RESET));
                    continue;
                }
                let cell_str = match self.layout.get(&pos) {
                    Some(Cell::Empty) => " ".to_string(),
                    Some(Cell::Obstacle) => format!("{}█{}", WALL, RESET),
                    Some(Cell::Start) => format!("{}S{}", START, RESET),
                    Some(Cell::Gold) => format!("{}G{}", GOLD, RESET),
                    None => "?".to_string(),
                };
                output.push_str(&cell_str);
            }
            output.push('\n');
        }
        output
    }

    /// Replay the trace on the console, clearing the screen between steps.
    pub fn play(&self, trace: &[Position]) {
        let mut stdout = io::stdout();
        for (step, position) in trace.iter().enumerate() {
            let _ = write!(stdout, "\x1b[2J\x1b[1;1H");
            let _ = writeln!(stdout, "step: {}", step + 1);
            let _ = writeln!(stdout, "{}", self.render(Some(*position)));
            let _ = stdout.flush();
            thread::sleep(self.speed);
        }
    }
}
