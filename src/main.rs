use std::env;
use std::time::Duration;

use dotenv::dotenv;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use goldbot::generator::{self, DEFAULT_WALL_CHANCE};
use goldbot::observer::{CompositeObserver, DefaultObserver, EpisodeObserver};
use goldbot::render::TraceViewer;
use goldbot::replay::TraceFileObserver;
use goldbot::simulation::Simulation;

fn get_env_var_i32(key: &str) -> Option<i32> {
    env::var(key).ok().and_then(|val| val.parse::<i32>().ok())
}

fn get_env_var_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|val| val.parse::<u64>().ok())
}

fn get_env_var_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|val| val.parse::<f64>().ok())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goldbot=debug,info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    let rows = get_env_var_i32("MAZE_ROWS").unwrap_or(30);
    let cols = get_env_var_i32("MAZE_COLS").unwrap_or(50);
    let step_limit = get_env_var_i32("MAZE_STEP_LIMIT").unwrap_or(5000);
    let seed = get_env_var_u64("MAZE_SEED");
    let wall_chance = get_env_var_f64("MAZE_WALL_CHANCE")
        .unwrap_or(DEFAULT_WALL_CHANCE)
        .clamp(0.0, 1.0);
    let traces_folder = env::var("MAZE_TRACES_FOLDER").ok();
    let enable_viz = env::var("MAZE_VISUALIZER")
        .ok()
        .and_then(|v| v.parse::<bool>().ok())
        .unwrap_or(false);
    let viz_speed = get_env_var_i32("MAZE_VISUALIZER_SPEED_MS").unwrap_or(100);

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    tracing::info!("generating {}x{} maze (wall chance {})", rows, cols, wall_chance);
    let layout = generator::generate(&mut rng, rows, cols, wall_chance)?;

    let mut observers: Vec<Box<dyn EpisodeObserver>> = vec![Box::new(DefaultObserver)];
    if let Some(folder) = traces_folder {
        observers.push(Box::new(TraceFileObserver::new(&folder)?));
    }

    let mut simulation =
        Simulation::new(layout.clone(), step_limit, CompositeObserver::new(observers))?;
    let report = simulation.run()?;

    if report.success {
        tracing::info!("simulation finished: gold retrieved in {} steps", report.steps);
    } else {
        tracing::info!("simulation finished: agent failed after {} steps", report.steps);
    }

    if enable_viz {
        let viewer = TraceViewer::new(layout, Duration::from_millis(viz_speed.max(0) as u64));
        viewer.play(&report.trace);
    }

    Ok(())
}
