//! Headless maze simulator.
//!
//! Drives the navigation core against a ground-truth maze the way the
//! firmware drives it against the real world: boot-time command
//! window, persisted-state restore, one decision per tick with
//! per-action rewards, and the goal handshake that saves both records.
//!
//! Usage:
//!   vyuha_sim --seed 42 --episodes 2
//!   vyuha_sim --scenario maze/maze_8x8.yaml
//!   vyuha_sim --console        # RESET / STATUS before running

use clap::Parser;
use log::{debug, info, warn};
use std::io::BufRead;
use std::path::{Path, PathBuf};

use vyuha_nav::config::VyuhaConfig;
use vyuha_nav::core::{Action, Heading, Point};
use vyuha_nav::harness::scenario::MazeScenario;
use vyuha_nav::harness::{
    carve_entrance_exit, generate_perfect_maze, sensor_read_at, EpisodeReport, Pose,
};
use vyuha_nav::io::{FileStore, MemoryStore, RamSector, SectorStore};
use vyuha_nav::{GridMap, Navigator, Result, Strategy};

/// Headless maze navigation simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "vyuha.toml")]
    config: String,

    /// Maze scenario YAML to load (generates a maze when omitted)
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Seed for maze generation
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of episodes to run back to back
    #[arg(short, long, default_value_t = 2)]
    episodes: u32,

    /// Save the maze as a scenario YAML before running
    #[arg(long)]
    save_scenario: Option<PathBuf>,

    /// Persistent storage directory override
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Open an entrance and an exit on the maze borders instead of
    /// using the configured goal cell
    #[arg(long)]
    carve_borders: bool,

    /// Open the boot command window (RESET / STATUS) on stdin
    #[arg(long)]
    console: bool,

    /// Pace ticks at the configured simulator period
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if Path::new(&args.config).exists() {
        info!("Loading configuration from {}", args.config);
        VyuhaConfig::load(Path::new(&args.config))?
    } else {
        info!("Using default configuration");
        VyuhaConfig::default()
    };

    info!("vyuha_sim v{}", env!("CARGO_PKG_VERSION"));

    let mut store = open_store(&args, &config);

    if args.console {
        boot_console(store.as_mut());
    }

    // Ground truth: a loaded scenario, or a fresh perfect maze with
    // one opening on each of two opposite borders.
    let (world, entrance, goal) = match &args.scenario {
        Some(path) => {
            info!("Loading scenario {:?}", path);
            let scenario = MazeScenario::load(path)?;
            let world = scenario.to_map()?;
            (world, scenario.entrance_pose(), scenario.goal_point())
        }
        None => {
            let (w, h) = (config.maze.width, config.maze.height);
            let mut world = generate_perfect_maze(w, h, args.seed);
            let (entrance, goal) = if args.carve_borders {
                let (cell, goal, heading) = carve_entrance_exit(&mut world, args.seed);
                (Pose::new(cell, heading), goal)
            } else {
                // Firmware layout: start in the corner, goal from config.
                let start = Pose::new(Point::new(0, 0), Heading::East);
                (start, Point::new(config.maze.goal_x, config.maze.goal_y))
            };
            info!(
                "Generated {}x{} maze (seed {}): entrance ({},{}), goal ({},{})",
                w, h, args.seed, entrance.cell.x, entrance.cell.y, goal.x, goal.y
            );
            (world, entrance, goal)
        }
    };

    if let Some(path) = &args.save_scenario {
        let name = format!("maze_{}x{}_{}", world.width(), world.height(), args.seed);
        MazeScenario::from_map(name, &world, entrance, goal).save(path)?;
        info!("Scenario saved to {:?}", path);
    }

    let mut nav = Navigator::new();
    nav.set_strategy(Strategy::RightHand);
    nav.set_map_dimensions(world.width(), world.height());
    nav.set_start_goal(entrance.cell, goal);

    if let Some(h) = store.load_heuristics() {
        info!(
            "Heuristics restored: r={:.2} f={:.2} l={:.2} b={:.2}",
            h.w_right, h.w_front, h.w_left, h.w_back
        );
        nav.set_heuristics(h);
    } else {
        info!("Heuristics at defaults");
    }
    if store.load_map_snapshot(nav.map_mut()) {
        info!("Map snapshot restored");
    } else {
        info!("Map empty");
    }

    let tick = if args.realtime {
        Some(std::time::Duration::from_millis(config.control.sim_period_ms))
    } else {
        None
    };

    for episode in 1..=args.episodes {
        let report = run_episode(&world, &mut nav, entrance, goal, &config, store.as_mut(), tick);
        info!(
            "Episode {}: reached={} steps={} collisions={} cost={}",
            episode,
            report.reached,
            report.steps,
            report.collisions,
            report.cost()
        );
        if !report.reached {
            warn!("Episode {} hit the step budget without reaching the goal", episode);
        }
    }

    Ok(())
}

/// Pick the persistence backend: home-directory files when a home
/// exists, otherwise a RAM-backed sector (state lives for this
/// process only).
fn open_store(args: &Args, config: &VyuhaConfig) -> Box<dyn MemoryStore> {
    let dir = args
        .store_dir
        .clone()
        .or_else(|| config.persistence.dir.as_ref().map(PathBuf::from))
        .or_else(FileStore::default_dir);
    match dir {
        Some(dir) => {
            info!("Persistent store: {:?}", dir);
            Box::new(FileStore::new(dir))
        }
        None => {
            warn!("No home directory; persistence is RAM only");
            Box::new(SectorStore::new(RamSector::new()))
        }
    }
}

/// Boot-time command window: line commands on stdin until `RUN` or
/// end of input.
fn boot_console(store: &mut dyn MemoryStore) {
    println!("BOOT: command window open (RESET/STATUS, RUN to continue)");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        match line.trim() {
            "" => continue,
            "RUN" => break,
            "RESET" | "R" => {
                let ok = store.erase_all();
                println!("OK RESET {}", if ok { "done" } else { "fail" });
            }
            "STATUS" => {
                let st = store.status();
                println!("STATUS saved={} profile={}", st.saved_count, st.active_profile);
            }
            _ => println!("ERR cmd"),
        }
    }
}

/// One episode with the firmware's per-action reward shaping.
fn run_episode(
    world: &GridMap,
    nav: &mut Navigator,
    start: Pose,
    goal: Point,
    config: &VyuhaConfig,
    store: &mut dyn MemoryStore,
    tick: Option<std::time::Duration>,
) -> EpisodeReport {
    let rewards = &config.learning;
    let max_steps = (world.width() * world.height()) as u32 * 8;

    let mut pose = start;
    let mut report = EpisodeReport {
        steps: 0,
        collisions: 0,
        reached: false,
    };
    let mut planned = nav.plan_route();

    for _ in 0..max_steps {
        if let Some(period) = tick {
            std::thread::sleep(period);
        }

        let sr = sensor_read_at(world, pose);
        nav.observe(pose.cell, &sr, pose.heading);
        if !planned {
            planned = nav.plan_route();
        }

        let decision = if planned {
            nav.decide_planned(pose.cell, pose.heading, &sr)
        } else {
            nav.decide(&sr)
        };
        debug!(
            "tick: pos=({},{}) heading={:?} action={} score={} good={}",
            pose.cell.x,
            pose.cell.y,
            pose.heading,
            decision.action,
            decision.score,
            decision.score >= 6
        );

        match decision.action {
            Action::Right | Action::Left => {
                pose.apply(decision.action);
                report.steps += 1;
                nav.apply_reward(decision.action, rewards.turn_reward);
            }
            Action::Back => {
                pose.apply(Action::Back);
                report.steps += 1;
                nav.apply_reward(Action::Back, rewards.back_penalty);
            }
            Action::Forward => {
                if world.can_move(pose.cell, pose.heading) {
                    pose.apply(Action::Forward);
                    report.steps += 1;
                    nav.apply_reward(Action::Forward, rewards.forward_reward);
                } else {
                    // Plan disagrees with the world here: take the
                    // penalty, refresh the route, fall back for one tick.
                    report.collisions += 1;
                    nav.apply_reward(Action::Forward, rewards.blocked_penalty);
                    planned = nav.plan_route();
                    let fallback = nav.decide(&sr);
                    if fallback.action != Action::Forward {
                        pose.apply(fallback.action);
                        report.steps += 1;
                    } else if world.can_move(pose.cell, pose.heading) {
                        pose.apply(Action::Forward);
                        report.steps += 1;
                    }
                }
            }
        }

        if pose.cell == goal {
            report.reached = true;
            // Goal handshake: persist both records, heuristics first
            // (the sector backend's erase covers both pages). The next
            // episode replans from scratch.
            if !store.save_heuristics(&nav.heuristics()) {
                warn!("Heuristics save failed");
            }
            if !store.save_map_snapshot(nav.map()) {
                warn!("Map snapshot save failed");
            }
            break;
        }
    }
    report
}
