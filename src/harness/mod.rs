//! Ground-truth world support: maze generation, synthetic sensing,
//! pose bookkeeping, and an episode runner.
//!
//! Nothing here is part of the on-robot decision path; the simulator
//! binary and the integration tests drive the [`crate::Navigator`]
//! through these helpers against a maze the robot itself cannot see.

pub mod scenario;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::core::{Action, Heading, Point, SensorRead};
use crate::grid::GridMap;
use crate::navigator::Navigator;

/// Discrete robot pose: grid cell plus absolute heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pose {
    /// Occupied cell
    pub cell: Point,
    /// Facing direction
    pub heading: Heading,
}

impl Pose {
    /// Pose at a cell with the given heading.
    pub fn new(cell: Point, heading: Heading) -> Self {
        Self { cell, heading }
    }

    /// Apply one action to the pose.
    ///
    /// Turns rotate in place (`Back` is a pure 180-degree rotation);
    /// `Forward` translates one cell along the heading. Wall checking
    /// is the caller's job.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Forward => self.cell = self.heading.step(self.cell),
            turn => self.heading = turn.rotate(self.heading),
        }
    }
}

/// Generate a perfect maze (spanning tree) of `w x h` cells.
///
/// Starts fully walled and carves passages with an iterative
/// randomized depth-first search, so exactly one path exists between
/// any two cells. The same seed always yields the same maze.
pub fn generate_perfect_maze(w: usize, h: usize, seed: u64) -> GridMap {
    let mut map = GridMap::new(w, h);
    map.fill_walls();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut visited = vec![false; w * h];
    let idx = |p: Point| p.y as usize * w + p.x as usize;

    let mut stack = vec![Point::new(0, 0)];
    visited[0] = true;

    while let Some(&p) = stack.last() {
        let mut openings: Vec<(Point, Heading)> = Heading::ALL
            .into_iter()
            .map(|dir| (dir.step(p), dir))
            .filter(|(n, _)| map.in_bounds(*n) && !visited[idx(*n)])
            .collect();
        if openings.is_empty() {
            stack.pop();
            continue;
        }
        openings.shuffle(&mut rng);
        let (next, dir) = openings[0];
        map.set_wall(p, dir, false);
        visited[idx(next)] = true;
        stack.push(next);
    }
    debug!("[maze] generated {}x{} perfect maze (seed {})", w, h, seed);
    map
}

/// Open an entrance and an exit on opposite borders of a maze.
///
/// Picks west/east or north/south at random, opens the two outer
/// walls, and returns the entrance cell, the goal cell, and the
/// heading that faces into the maze from the entrance.
pub fn carve_entrance_exit(map: &mut GridMap, seed: u64) -> (Point, Point, Heading) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (w, h) = (map.width() as i32, map.height() as i32);
    if rng.gen_bool(0.5) {
        let entrance = Point::new(0, rng.gen_range(0..h));
        let goal = Point::new(w - 1, rng.gen_range(0..h));
        map.set_wall(entrance, Heading::West, false);
        map.set_wall(goal, Heading::East, false);
        (entrance, goal, Heading::East)
    } else {
        let entrance = Point::new(rng.gen_range(0..w), 0);
        let goal = Point::new(rng.gen_range(0..w), h - 1);
        map.set_wall(entrance, Heading::North, false);
        map.set_wall(goal, Heading::South, false);
        (entrance, goal, Heading::South)
    }
}

/// Synthesize the three-way sensor reading the robot would see at
/// `pose` in the ground-truth maze.
pub fn sensor_read_at(map: &GridMap, pose: Pose) -> SensorRead {
    let cell = map.at(pose.cell);
    SensorRead {
        left_free: cell.is_open(pose.heading.left()),
        front_free: cell.is_open(pose.heading),
        right_free: cell.is_open(pose.heading.right()),
    }
}

/// Outcome of one episode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeReport {
    /// Executed actions (rotations included)
    pub steps: u32,
    /// Predicted collisions (forward into a wall)
    pub collisions: u32,
    /// Whether the goal was reached within the step budget
    pub reached: bool,
}

impl EpisodeReport {
    /// Episode cost: `steps + 5 * collisions`.
    pub fn cost(&self) -> u32 {
        self.steps + 5 * self.collisions
    }
}

/// Drives a navigator from start to goal over a ground-truth maze.
///
/// One `run` is one episode: per tick it synthesizes the sensor
/// reading, lets the navigator observe and decide, applies the action,
/// and feeds back rewards (-1 per executed step, -5 on a predicted
/// collision, +10 on reaching the goal). A predicted collision
/// triggers a replan and a single fallback attempt with the right-hand
/// rule, per the collision contract.
pub struct EpisodeRunner<'a> {
    world: &'a GridMap,
    start: Pose,
    goal: Point,
    max_steps: u32,
}

impl<'a> EpisodeRunner<'a> {
    /// Default step budget multiplier over the cell count.
    pub const BUDGET_FACTOR: u32 = 8;

    /// Runner over a ground-truth maze with the default budget
    /// (`8 * W * H` ticks).
    pub fn new(world: &'a GridMap, start: Pose, goal: Point) -> Self {
        let cells = (world.width() * world.height()) as u32;
        Self {
            world,
            start,
            goal,
            max_steps: cells * Self::BUDGET_FACTOR,
        }
    }

    /// Override the tick budget.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Run one episode. The navigator keeps whatever map knowledge,
    /// visit counts, and weights it accumulated; re-running with the
    /// same instance is how the second traversal benefits from the
    /// first.
    pub fn run(&self, nav: &mut Navigator) -> EpisodeReport {
        let mut pose = self.start;
        let mut report = EpisodeReport {
            steps: 0,
            collisions: 0,
            reached: false,
        };

        nav.plan_route();

        for _ in 0..self.max_steps {
            let sr = sensor_read_at(self.world, pose);
            nav.observe(pose.cell, &sr, pose.heading);

            let mut decision = nav.decide_planned(pose.cell, pose.heading, &sr);
            let mut moved = false;

            if decision.action == Action::Forward {
                if self.world.can_move(pose.cell, pose.heading) {
                    pose.apply(Action::Forward);
                    moved = true;
                } else {
                    // Map and world disagree: log the collision,
                    // refresh the plan, fall back for this tick.
                    report.collisions += 1;
                    nav.apply_reward(Action::Forward, -5.0);
                    nav.plan_route();
                    decision = nav.decide(&sr);
                    if decision.action == Action::Forward {
                        if self.world.can_move(pose.cell, pose.heading) {
                            pose.apply(Action::Forward);
                            moved = true;
                        }
                    } else {
                        pose.apply(decision.action);
                        moved = true;
                    }
                }
            } else {
                pose.apply(decision.action);
                moved = true;
            }

            if moved {
                report.steps += 1;
                nav.apply_reward(decision.action, -1.0);
            }

            if pose.cell == self.goal {
                nav.apply_reward(Action::Forward, 10.0);
                report.reached = true;
                break;
            }
        }

        info!(
            "[episode] reached={} steps={} collisions={} cost={}",
            report.reached,
            report.steps,
            report.collisions,
            report.cost()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_maze_is_deterministic() {
        let a = generate_perfect_maze(6, 5, 7);
        let b = generate_perfect_maze(6, 5, 7);
        assert_eq!(a, b);
        assert_ne!(a, generate_perfect_maze(6, 5, 8));
    }

    #[test]
    fn test_perfect_maze_spans_all_cells() {
        let m = generate_perfect_maze(8, 6, 99);
        // Every cell reachable from the corner through carved passages.
        for y in 0..6 {
            for x in 0..8 {
                let path = crate::planner::plan(&m, Point::new(0, 0), Point::new(x, y));
                assert!(path.is_some(), "cell ({},{}) unreachable", x, y);
            }
        }
    }

    #[test]
    fn test_perfect_maze_has_tree_edge_count() {
        // A spanning tree over w*h cells has exactly w*h - 1 passages.
        let (w, h) = (7, 5);
        let m = generate_perfect_maze(w, h, 3);
        let mut passages = 0;
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let p = Point::new(x, y);
                if m.can_move(p, Heading::East) {
                    passages += 1;
                }
                if m.can_move(p, Heading::South) {
                    passages += 1;
                }
            }
        }
        assert_eq!(passages, w * h - 1);
    }

    #[test]
    fn test_sensor_read_matches_walls() {
        let mut m = GridMap::new(3, 3);
        m.set_wall(Point::new(1, 1), Heading::East, true);
        let pose = Pose::new(Point::new(1, 1), Heading::North);
        let sr = sensor_read_at(&m, pose);
        assert!(sr.left_free);
        assert!(sr.front_free);
        assert!(!sr.right_free); // east wall on the right when facing north
    }

    #[test]
    fn test_pose_apply_matches_action_semantics() {
        let mut pose = Pose::new(Point::new(2, 2), Heading::East);
        pose.apply(Action::Left);
        assert_eq!(pose, Pose::new(Point::new(2, 2), Heading::North));
        pose.apply(Action::Back);
        assert_eq!(pose, Pose::new(Point::new(2, 2), Heading::South));
        pose.apply(Action::Forward);
        assert_eq!(pose, Pose::new(Point::new(2, 3), Heading::South));
    }

    #[test]
    fn test_entrance_exit_open_opposite_borders() {
        let mut m = generate_perfect_maze(8, 8, 5);
        let (entrance, goal, heading) = carve_entrance_exit(&mut m, 5);
        assert!(m.in_bounds(entrance));
        assert!(m.in_bounds(goal));
        match heading {
            Heading::East => {
                assert_eq!(entrance.x, 0);
                assert_eq!(goal.x, 7);
                assert!(!m.at(entrance).wall_w);
                assert!(!m.at(goal).wall_e);
            }
            Heading::South => {
                assert_eq!(entrance.y, 0);
                assert_eq!(goal.y, 7);
                assert!(!m.at(entrance).wall_n);
                assert!(!m.at(goal).wall_s);
            }
            other => panic!("unexpected entrance heading {:?}", other),
        }
    }
}
