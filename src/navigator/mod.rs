//! The navigation decision core.
//!
//! The [`Navigator`] owns everything the robot knows: the wall map it
//! has observed so far, per-cell visit counts, the learned action
//! weights, and the current BFS plan. Each control tick the caller
//! feeds it one sensor reading plus the externally tracked pose, and
//! gets one discrete action back.
//!
//! Two policies are exposed. [`Navigator::decide`] is the wall-follower
//! fallback (right-hand rule). [`Navigator::decide_planned`] is the
//! primary policy: it ranks the open sides by exploration novelty
//! first, then plan alignment, then learned weights. The plan only
//! routes through passages the map already knows, so novelty outranks
//! it until the frontier is mapped.

use log::trace;

use crate::core::{Action, Heading, Point, SensorRead, Side};
use crate::grid::{GridMap, VisitGrid};
use crate::learning::Heuristics;
use crate::planner;

/// Navigation strategy used when no plan applies.
///
/// A tagged variant so future strategies (left-hand, weighted vote)
/// slot in without changing the public shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Wall follower preferring right > front > left > back.
    #[default]
    RightHand,
}

/// Outcome of one decision tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    /// Chosen body-frame action
    pub action: Action,
    /// Quality estimate in 0..=10, for logging only
    pub score: u8,
}

/// Candidate open side considered by the planned policy.
struct Candidate {
    action: Action,
    seen: u8,
    matches_plan: bool,
}

/// State owner and decision policy of the maze robot.
pub struct Navigator {
    strategy: Strategy,
    map: GridMap,
    visits: VisitGrid,
    start: Point,
    goal: Point,
    has_goal: bool,
    plan: Vec<Point>,
    heur: Heuristics,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Create a navigator with a 1x1 map and no goal.
    pub fn new() -> Self {
        Self {
            strategy: Strategy::RightHand,
            map: GridMap::new(1, 1),
            visits: VisitGrid::new(1, 1),
            start: Point::new(0, 0),
            goal: Point::new(0, 0),
            has_goal: false,
            plan: Vec::new(),
            heur: Heuristics::default(),
        }
    }

    /// Select the fallback strategy.
    pub fn set_strategy(&mut self, s: Strategy) {
        self.strategy = s;
    }

    /// Reallocate the map and visit grid for a maze of `w x h` cells.
    ///
    /// Drops all learned walls, visit counts, and the current plan.
    /// Heuristic weights survive; they are maze-independent.
    pub fn set_map_dimensions(&mut self, w: usize, h: usize) {
        self.map = GridMap::new(w, h);
        self.visits = VisitGrid::new(w, h);
        self.plan.clear();
    }

    /// Record the endpoints used by [`Self::plan_route`].
    pub fn set_start_goal(&mut self, start: Point, goal: Point) {
        self.start = start;
        self.goal = goal;
        self.has_goal = true;
    }

    /// Fold one sensor reading into the wall map.
    ///
    /// Each of left/front/right is mapped through `heading` to an
    /// absolute face of `cell` and written as wall-present when the
    /// sensor says blocked. The newest reading always wins, including
    /// reopening a previously walled face. Afterwards the cell's visit
    /// counter is bumped.
    pub fn observe(&mut self, cell: Point, sr: &SensorRead, heading: Heading) {
        for side in Side::ALL {
            let free = match side {
                Side::Left => sr.left_free,
                Side::Front => sr.front_free,
                Side::Right => sr.right_free,
            };
            self.map.set_wall(cell, side.to_absolute(heading), !free);
        }
        self.visits.record(cell);
    }

    /// Recompute the BFS route from start to goal.
    ///
    /// Returns true iff a non-empty plan was stored. Fails (and clears
    /// any previous plan) when no goal is set or the goal is not
    /// reachable through the known map.
    pub fn plan_route(&mut self) -> bool {
        if !self.has_goal {
            return false;
        }
        match planner::plan(&self.map, self.start, self.goal) {
            Some(path) => {
                self.plan = path;
                !self.plan.is_empty()
            }
            None => {
                self.plan.clear();
                false
            }
        }
    }

    /// True when a non-empty plan is stored.
    pub fn has_plan(&self) -> bool {
        !self.plan.is_empty()
    }

    /// The current plan, start..=goal. Empty when no route is known.
    ///
    /// Exposed read-only for visualization.
    pub fn plan(&self) -> &[Point] {
        &self.plan
    }

    /// Decide the next action from sensors alone (no plan).
    ///
    /// Right-hand rule: first free side in right, front, left order;
    /// back when everything is blocked.
    pub fn decide(&self, sr: &SensorRead) -> Decision {
        let action = match self.strategy {
            Strategy::RightHand => {
                if sr.right_free {
                    Action::Right
                } else if sr.front_free {
                    Action::Forward
                } else if sr.left_free {
                    Action::Left
                } else {
                    Action::Back
                }
            }
        };
        Decision {
            action,
            score: self.score_for(action, sr),
        }
    }

    /// Decide the next action, fusing plan guidance with exploration
    /// novelty and learned weights.
    ///
    /// Open sides are ranked lexicographically: unseen neighbors
    /// first, then fewest visits, then the side the plan wants, then
    /// the higher-scoring action. Remaining ties fall back to left,
    /// front, right insertion order. With every side blocked the
    /// decision is `Back`. Never fails.
    pub fn decide_planned(&self, current: Point, heading: Heading, sr: &SensorRead) -> Decision {
        let desired = self.plan_desired_direction(current);

        let mut cands: Vec<Candidate> = Vec::with_capacity(3);
        for side in Side::ALL {
            let free = match side {
                Side::Left => sr.left_free,
                Side::Front => sr.front_free,
                Side::Right => sr.right_free,
            };
            if !free {
                continue;
            }
            let abs = side.to_absolute(heading);
            let seen = self.visits.get(abs.step(current)).unwrap_or(u8::MAX);
            cands.push(Candidate {
                action: side.action(),
                seen,
                matches_plan: desired == Some(abs),
            });
        }

        if cands.is_empty() {
            return Decision {
                action: Action::Back,
                score: self.score_for(Action::Back, sr),
            };
        }

        cands.sort_by(|a, b| {
            let a_unseen = a.seen == 0;
            let b_unseen = b.seen == 0;
            b_unseen
                .cmp(&a_unseen)
                .then(a.seen.cmp(&b.seen))
                .then(b.matches_plan.cmp(&a.matches_plan))
                .then_with(|| {
                    self.score_for(b.action, sr)
                        .cmp(&self.score_for(a.action, sr))
                })
        });

        let best = &cands[0];
        trace!(
            "[decide] at=({},{}) heading={:?} -> {} (seen={} plan_match={})",
            current.x,
            current.y,
            heading,
            best.action,
            best.seen,
            best.matches_plan
        );
        Decision {
            action: best.action,
            score: self.score_for(best.action, sr),
        }
    }

    /// Apply a reward to the weight of the action just taken.
    pub fn apply_reward(&mut self, action: Action, reward: f32) {
        self.heur.apply_reward(action, reward);
    }

    /// Copy of the current heuristic weights.
    pub fn heuristics(&self) -> Heuristics {
        self.heur
    }

    /// Replace the heuristic weights (persistence restore).
    pub fn set_heuristics(&mut self, h: Heuristics) {
        self.heur = h;
    }

    /// Read-only access to the internal wall map.
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    /// Exclusive access to the internal wall map.
    ///
    /// For persistence restore and simulator warm-start; the borrow
    /// must not outlive the operation.
    pub fn map_mut(&mut self) -> &mut GridMap {
        &mut self.map
    }

    /// Visit count of a cell, if in bounds.
    pub fn visit_count(&self, p: Point) -> Option<u8> {
        self.visits.get(p)
    }

    /// Absolute direction the plan wants to leave `current` by.
    ///
    /// `None` when there is no plan, `current` is not on it, or
    /// `current` is the plan's final cell.
    fn plan_desired_direction(&self, current: Point) -> Option<Heading> {
        let pos = self.plan.iter().position(|p| *p == current)?;
        let next = self.plan.get(pos + 1)?;
        Heading::from_delta(current, *next)
    }

    /// Score an action in 0..=10 for logging.
    ///
    /// Free sides score their heuristic weight, blocked sides a token
    /// 0.1. `Back` earns its weight only as the last resort (all sides
    /// blocked), 0.2 otherwise. The weight range maps onto 0..=10 via
    /// `round(base / 3 * 10)`.
    fn score_for(&self, action: Action, sr: &SensorRead) -> u8 {
        let base = match action {
            Action::Right => {
                if sr.right_free {
                    self.heur.w_right
                } else {
                    0.1
                }
            }
            Action::Forward => {
                if sr.front_free {
                    self.heur.w_front
                } else {
                    0.1
                }
            }
            Action::Left => {
                if sr.left_free {
                    self.heur.w_left
                } else {
                    0.1
                }
            }
            Action::Back => {
                if sr.all_blocked() {
                    self.heur.w_back
                } else {
                    0.2
                }
            }
        };
        (base / 3.0 * 10.0).round().clamp(0.0, 10.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(left: bool, front: bool, right: bool) -> SensorRead {
        SensorRead {
            left_free: left,
            front_free: front,
            right_free: right,
        }
    }

    #[test]
    fn test_right_hand_truth_table() {
        let nav = Navigator::new();
        assert_eq!(nav.decide(&read(false, false, true)).action, Action::Right);
        assert_eq!(nav.decide(&read(false, true, false)).action, Action::Forward);
        assert_eq!(nav.decide(&read(true, false, false)).action, Action::Left);
        assert_eq!(nav.decide(&read(false, false, false)).action, Action::Back);
    }

    #[test]
    fn test_right_hand_prefers_right_over_others() {
        let nav = Navigator::new();
        assert_eq!(nav.decide(&read(true, true, true)).action, Action::Right);
    }

    #[test]
    fn test_observe_writes_reciprocal_walls_and_visits() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 3);
        // At (1,1) heading East: left=N, front=E, right=S. Front blocked.
        nav.observe(Point::new(1, 1), &read(true, false, true), Heading::East);

        let c = nav.map().at(Point::new(1, 1));
        assert!(!c.wall_n);
        assert!(c.wall_e);
        assert!(!c.wall_s);
        // Neighbor across the blocked face agrees.
        assert!(nav.map().at(Point::new(2, 1)).wall_w);
        assert_eq!(nav.visit_count(Point::new(1, 1)), Some(1));
    }

    #[test]
    fn test_observe_trusts_newest_reading() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 3);
        let p = Point::new(1, 1);
        nav.observe(p, &read(true, false, true), Heading::East);
        assert!(nav.map().at(p).wall_e);
        // Later reading says the front is open again: overwrite.
        nav.observe(p, &read(true, true, true), Heading::East);
        assert!(!nav.map().at(p).wall_e);
    }

    #[test]
    fn test_plan_route_requires_goal() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 3);
        assert!(!nav.plan_route());
        nav.set_start_goal(Point::new(0, 0), Point::new(2, 2));
        assert!(nav.plan_route());
        assert!(nav.has_plan());
    }

    #[test]
    fn test_plan_route_clears_plan_when_unreachable() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 1);
        nav.set_start_goal(Point::new(0, 0), Point::new(2, 0));
        assert!(nav.plan_route());

        // Learn a wall that seals the corridor, then replan.
        nav.observe(Point::new(1, 0), &read(true, false, true), Heading::East);
        assert!(!nav.plan_route());
        assert!(!nav.has_plan());
    }

    #[test]
    fn test_planned_straight_corridor_goes_forward() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 1);
        nav.set_start_goal(Point::new(0, 0), Point::new(2, 0));
        assert!(nav.plan_route());

        let d = nav.decide_planned(Point::new(0, 0), Heading::East, &SensorRead::all_free());
        assert_eq!(d.action, Action::Forward);
    }

    #[test]
    fn test_planned_turns_right_to_align() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(2, 2);
        nav.set_start_goal(Point::new(0, 0), Point::new(1, 0));
        assert!(nav.plan_route());

        // Heading North at (0,0): the plan wants East, a right turn.
        let d = nav.decide_planned(Point::new(0, 0), Heading::North, &SensorRead::all_free());
        assert_eq!(d.action, Action::Right);
    }

    #[test]
    fn test_planned_novelty_overrides_plan() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 3);
        nav.set_start_goal(Point::new(1, 1), Point::new(1, 0));
        assert!(nav.plan_route());

        // Front neighbor (1,0) matches the plan but has been seen
        // twice; the left neighbor (0,1) is unseen; right is blocked.
        nav.observe(Point::new(1, 0), &SensorRead::all_free(), Heading::North);
        nav.observe(Point::new(1, 0), &SensorRead::all_free(), Heading::North);

        let d = nav.decide_planned(Point::new(1, 1), Heading::North, &read(true, true, false));
        assert_eq!(d.action, Action::Left);
    }

    #[test]
    fn test_planned_dead_end_backs_out() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 3);
        let d = nav.decide_planned(Point::new(1, 1), Heading::North, &read(false, false, false));
        assert_eq!(d.action, Action::Back);
    }

    #[test]
    fn test_planned_alignment_breaks_visit_ties() {
        let mut nav = Navigator::new();
        nav.set_map_dimensions(3, 3);
        nav.set_start_goal(Point::new(1, 1), Point::new(1, 0));
        assert!(nav.plan_route());

        // All three neighbors seen exactly once: plan alignment decides.
        for p in [Point::new(1, 0), Point::new(0, 1), Point::new(2, 1)] {
            nav.observe(p, &SensorRead::all_free(), Heading::North);
        }
        let d = nav.decide_planned(Point::new(1, 1), Heading::North, &SensorRead::all_free());
        assert_eq!(d.action, Action::Forward);
    }

    #[test]
    fn test_score_reflects_availability() {
        let nav = Navigator::new();
        // Weight 1.0 on a free side: round(1/3*10) = 3.
        assert_eq!(nav.decide(&read(false, true, false)).score, 3);
        // All blocked: Back scores its own weight.
        assert_eq!(nav.decide(&read(false, false, false)).score, 3);
    }

    #[test]
    fn test_score_tracks_learned_weight() {
        let mut nav = Navigator::new();
        for _ in 0..100 {
            nav.apply_reward(Action::Forward, 10.0);
        }
        // Weight saturates at 3.0: round(3/3*10) = 10.
        assert_eq!(nav.decide(&read(false, true, false)).score, 10);
    }
}
