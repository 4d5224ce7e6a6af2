//! # Vyuha-Nav: Grid-Maze Navigation Core
//!
//! The decision core of a small maze-solving robot. Given a
//! discretized three-way proximity reading per control tick, it learns
//! the maze's wall topology, plans shortest routes over what it knows,
//! and emits one discrete action that trades plan-following against
//! exploration of unseen cells. Learned walls and action preferences
//! persist across power cycles, so a maze's second traversal inherits
//! everything the first one paid for.
//!
//! Motor actuation, analog sensor acquisition, and visualization are
//! external collaborators; this crate covers the navigation core and
//! the contracts those collaborators plug into.
//!
//! ## Quick Start
//!
//! ```rust
//! use vyuha_nav::core::{Heading, Point, SensorRead};
//! use vyuha_nav::Navigator;
//!
//! let mut nav = Navigator::new();
//! nav.set_map_dimensions(8, 8);
//! nav.set_start_goal(Point::new(0, 0), Point::new(7, 7));
//! nav.plan_route();
//!
//! // One control tick: observe, then decide.
//! let sr = SensorRead { left_free: true, front_free: true, right_free: false };
//! nav.observe(Point::new(0, 0), &sr, Heading::East);
//! let decision = nav.decide_planned(Point::new(0, 0), Heading::East, &sr);
//! println!("action={} score={}", decision.action, decision.score);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: fundamental types (cells, headings, actions, sensor
//!   readings)
//! - [`grid`]: the wall-knowledge map and visit counters
//! - [`planner`]: BFS shortest-route search over the known map
//! - [`learning`]: bounded reward-driven action weights
//! - [`navigator`]: the per-tick decision policy tying it together
//! - [`io`]: persistence of both records behind one store interface
//! - [`config`]: TOML configuration with reference-robot defaults
//! - [`harness`]: maze generation, scenarios, and the episode runner
//!   used by the simulator and the integration tests
//!
//! ## Control Flow Per Tick
//!
//! ```text
//!   read sensors ──► Navigator::observe ──► (replan if needed)
//!                          │
//!                          ▼
//!            Navigator::decide_planned ──► Decision ──► actuate
//!                          │
//!                          ▼
//!            Navigator::apply_reward (after execution)
//! ```
//!
//! The whole core runs single-threaded inside the control task; no
//! operation blocks or yields, and persistence writes happen only from
//! that task (on goal arrival).

pub mod config;
pub mod core;
pub mod error;
pub mod grid;
pub mod harness;
pub mod io;
pub mod learning;
pub mod navigator;
pub mod planner;

// Re-export main types at crate root
pub use config::VyuhaConfig;
pub use error::{Result, VyuhaError};
pub use grid::GridMap;
pub use learning::Heuristics;
pub use navigator::{Decision, Navigator, Strategy};
