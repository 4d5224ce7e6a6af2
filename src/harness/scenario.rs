//! Maze scenario files.
//!
//! A scenario is a YAML document describing one maze: dimensions,
//! entrance pose, goal cell, and the full wall layout as one NESW mask
//! byte per cell (same encoding as the persisted map snapshot),
//! row-major with y increasing southward. The simulator saves every
//! generated maze as a scenario so a run can be replayed exactly.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::Pose;
use crate::core::{Cell, Heading, Point};
use crate::error::{Result, VyuhaError};
use crate::grid::GridMap;

/// One maze, self-contained and replayable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MazeScenario {
    /// Human-readable scenario name
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: String,

    /// Maze width in cells
    pub width: usize,

    /// Maze height in cells
    pub height: usize,

    /// Entrance cell and initial heading
    pub entrance: EntrancePose,

    /// Goal cell
    pub goal: GoalCell,

    /// One NESW wall mask per cell (`bit0=N bit1=E bit2=S bit3=W`),
    /// row-major
    pub cells: Vec<u8>,
}

/// Entrance cell with the heading that faces into the maze.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EntrancePose {
    pub x: i32,
    pub y: i32,
    /// Absolute heading, `0=N 1=E 2=S 3=W`
    pub heading: u8,
}

/// Goal cell coordinates.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GoalCell {
    pub x: i32,
    pub y: i32,
}

impl MazeScenario {
    /// Capture a ground-truth maze as a scenario.
    pub fn from_map(
        name: impl Into<String>,
        map: &GridMap,
        entrance: Pose,
        goal: Point,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            width: map.width(),
            height: map.height(),
            entrance: EntrancePose {
                x: entrance.cell.x,
                y: entrance.cell.y,
                heading: entrance.heading.index(),
            },
            goal: GoalCell {
                x: goal.x,
                y: goal.y,
            },
            cells: map.cells().iter().map(Cell::encode).collect(),
        }
    }

    /// Rebuild the ground-truth maze.
    ///
    /// Fails when the cell list does not match the declared
    /// dimensions or the entrance/goal fall outside them.
    pub fn to_map(&self) -> Result<GridMap> {
        if self.cells.len() != self.width * self.height {
            return Err(VyuhaError::Scenario(format!(
                "cell count {} does not match {}x{} grid",
                self.cells.len(),
                self.width,
                self.height
            )));
        }
        let mut map = GridMap::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Cell::decode(self.cells[y * self.width + x]);
                let p = Point::new(x as i32, y as i32);
                for dir in Heading::ALL {
                    map.set_wall(p, dir, cell.wall(dir));
                }
            }
        }
        if !map.in_bounds(self.entrance_pose().cell) || !map.in_bounds(self.goal_point()) {
            return Err(VyuhaError::Scenario(
                "entrance or goal outside the grid".to_string(),
            ));
        }
        Ok(map)
    }

    /// Entrance pose.
    pub fn entrance_pose(&self) -> Pose {
        Pose::new(
            Point::new(self.entrance.x, self.entrance.y),
            Heading::from_index(self.entrance.heading),
        )
    }

    /// Goal cell.
    pub fn goal_point(&self) -> Point {
        Point::new(self.goal.x, self.goal.y)
    }

    /// Load a scenario from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a scenario from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Write the scenario to a YAML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).map_err(VyuhaError::from)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
