// Lattice planner demo
//
// Usage: lattice_planner [CONFIG] [--random SEED]
//
// Runs the planning loop on its own thread, publishes a goal and a scene,
// waits for the path and plots it to img/path_planning/lattice_planner.png.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::unbounded;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use lattice_planner::utils::{PathStyle, Visualizer};
use lattice_planner::{OccupancyGrid, PlannerConfig, PlannerResult, PlanningLoop, Pose2D, SearchOutcome};

const DEFAULT_CONFIG: &str = "config/planner.json";
const OUTPUT_DIR: &str = "img/path_planning";

const SCENE: [&str; 10] = [
    "..........",
    "..........",
    "...####...",
    "......#...",
    "......#...",
    "..#...#...",
    "..#.......",
    "..#####...",
    "..........",
    "..........",
];

fn build_scene(seed: Option<u64>) -> PlannerResult<OccupancyGrid> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid =
                OccupancyGrid::random_clutter(10, 10, 1.0, Pose2D::origin(), 0.15, &mut rng)?;
            // keep start and goal corners clear
            for (i, j) in [(0, 0), (1, 0), (0, 1), (8, 9), (9, 9), (9, 8)] {
                grid.set_occupied(i, j, false);
            }
            Ok(grid)
        }
        None => OccupancyGrid::from_rows(&SCENE, 1.0, Pose2D::origin()),
    }
}

fn run() -> PlannerResult<()> {
    let mut config_path = DEFAULT_CONFIG.to_string();
    let mut seed = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--random" {
            seed = args.next().and_then(|s| s.parse().ok());
        } else {
            config_path = arg;
        }
    }

    info!("Loading config from {}", config_path);
    let config = PlannerConfig::from_json_file(&config_path)?.validate()?;
    let start = config.initial;
    let goal = Pose2D::new(9.5, 9.5, std::f64::consts::FRAC_PI_2);
    let scene = Arc::new(build_scene(seed)?);

    let (tx, rx) = unbounded();
    let planning = PlanningLoop::new(&config, tx);
    let footprint = planning.planner().footprint().clone();
    let handle = planning.spawn()?;

    handle.inputs().publish_goal(goal);
    handle.inputs().publish_scene(Arc::clone(&scene));

    let planned = rx.recv_timeout(Duration::from_secs(30));
    handle.shutdown();
    if handle.join().is_err() {
        error!("Planner thread panicked");
    }

    let planned = match planned {
        Ok(planned) => planned,
        Err(e) => {
            warn!("No path received: {}", e);
            return Ok(());
        }
    };

    match planned.outcome {
        SearchOutcome::Found => info!(
            "Path #{}: {} poses, cost {:.2}, length {:.2} m",
            planned.sequence,
            planned.poses.len(),
            planned.cost.unwrap_or_default(),
            planned.length()
        ),
        SearchOutcome::NotFound => warn!("Path #{}: no path to goal", planned.sequence),
    }

    let mut vis = Visualizer::new();
    vis.set_title("Lattice Planner").fit_grid(&scene).plot_grid(&scene);
    for pose in &planned.poses {
        vis.plot_footprint(&footprint, pose);
    }
    vis.plot_poses(&planned.poses, &PathStyle::default())
        .plot_start(&start)
        .plot_goal(&goal);

    std::fs::create_dir_all(OUTPUT_DIR)?;
    let output = format!("{}/lattice_planner.png", OUTPUT_DIR);
    match vis.save_png(&output, 800, 800) {
        Ok(()) => info!("Plot saved to {}", output),
        Err(e) => warn!("Could not save plot: {}", e),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
