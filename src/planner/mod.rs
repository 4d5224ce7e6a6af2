//! Breadth-first route planner over the known wall map.

use log::{debug, trace};
use std::collections::VecDeque;

use crate::core::{Heading, Point};
use crate::grid::GridMap;

/// Find a shortest cell path from `start` to `goal`.
///
/// Runs BFS over the implicit graph in which 4-adjacent cells are
/// connected iff the map records no wall between them. Neighbors are
/// expanded in fixed N, E, S, W order, which also fixes the tie-break
/// among equal-length paths.
///
/// Returns the path including both endpoints (a single element when
/// `start == goal`), or `None` when either endpoint is out of bounds
/// or the goal is unreachable through known passages.
pub fn plan(map: &GridMap, start: Point, goal: Point) -> Option<Vec<Point>> {
    trace!(
        "[plan] start=({},{}) goal=({},{})",
        start.x,
        start.y,
        goal.x,
        goal.y
    );
    if !map.in_bounds(start) || !map.in_bounds(goal) {
        debug!("[plan] endpoint outside {}x{} grid", map.width(), map.height());
        return None;
    }

    let w = map.width();
    let idx = |p: Point| p.y as usize * w + p.x as usize;

    let mut prev: Vec<i32> = vec![-1; w * map.height()];
    let mut visited = vec![false; w * map.height()];
    let mut queue = VecDeque::new();

    visited[idx(start)] = true;
    queue.push_back(start);

    while let Some(p) = queue.pop_front() {
        if p == goal {
            break;
        }
        let cell = map.at(p);
        for dir in Heading::ALL {
            if cell.wall(dir) {
                continue;
            }
            let n = dir.step(p);
            if !map.in_bounds(n) || visited[idx(n)] {
                continue;
            }
            visited[idx(n)] = true;
            prev[idx(n)] = idx(p) as i32;
            queue.push_back(n);
        }
    }

    if !visited[idx(goal)] {
        debug!("[plan] goal unreachable from ({},{})", start.x, start.y);
        return None;
    }

    // Walk parents back from the goal, then reverse into start..=goal.
    let mut path = Vec::new();
    let mut cur = idx(goal) as i32;
    while cur != -1 {
        let p = Point::new((cur as usize % w) as i32, (cur as usize / w) as i32);
        path.push(p);
        if p == start {
            break;
        }
        cur = prev[cur as usize];
    }
    path.reverse();
    Some(path)
}
