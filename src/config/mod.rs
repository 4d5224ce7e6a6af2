//! Configuration loading.
//!
//! All sections are optional in the TOML file; missing fields fall
//! back to the defaults in [`defaults`], which match the target robot
//! (150 ms control tick, 8x8 maze with the goal in the far corner, IR
//! thresholds 0.30/0.55 with EMA alpha 0.23).

pub mod defaults;

use serde::Deserialize;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct VyuhaConfig {
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub maze: MazeConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Control loop timing
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Control tick period on the robot (milliseconds)
    #[serde(default = "defaults::control_period_ms")]
    pub period_ms: u64,

    /// Control tick period in the simulator (milliseconds)
    #[serde(default = "defaults::sim_period_ms")]
    pub sim_period_ms: u64,
}

/// Maze geometry and goal
#[derive(Clone, Debug, Deserialize)]
pub struct MazeConfig {
    /// Maze width in cells
    #[serde(default = "defaults::maze_width")]
    pub width: usize,

    /// Maze height in cells
    #[serde(default = "defaults::maze_height")]
    pub height: usize,

    /// Goal cell X coordinate
    #[serde(default = "defaults::goal_x")]
    pub goal_x: i32,

    /// Goal cell Y coordinate
    #[serde(default = "defaults::goal_y")]
    pub goal_y: i32,
}

/// IR sensor discretization parameters
#[derive(Clone, Debug, Deserialize)]
pub struct SensorConfig {
    /// EMA smoothing coefficient in [0, 1]
    #[serde(default = "defaults::ir_alpha")]
    pub alpha: f32,

    /// Below this filtered value a blocked channel reads free again
    #[serde(default = "defaults::ir_th_near")]
    pub th_near: f32,

    /// At or above this filtered value a channel reads blocked
    #[serde(default = "defaults::ir_th_free")]
    pub th_free: f32,
}

/// Caller-side reward magnitudes applied per executed action
#[derive(Clone, Debug, Deserialize)]
pub struct LearningConfig {
    /// Reward for a left or right turn
    #[serde(default = "defaults::turn_reward")]
    pub turn_reward: f32,

    /// Penalty for reversing
    #[serde(default = "defaults::back_penalty")]
    pub back_penalty: f32,

    /// Reward for a completed forward step
    #[serde(default = "defaults::forward_reward")]
    pub forward_reward: f32,

    /// Penalty for commanding forward into a blocked face
    #[serde(default = "defaults::blocked_penalty")]
    pub blocked_penalty: f32,
}

/// Persistent storage location
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PersistenceConfig {
    /// Storage directory override; None means `~/.vyuha_maze`
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            period_ms: defaults::control_period_ms(),
            sim_period_ms: defaults::sim_period_ms(),
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: defaults::maze_width(),
            height: defaults::maze_height(),
            goal_x: defaults::goal_x(),
            goal_y: defaults::goal_y(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            alpha: defaults::ir_alpha(),
            th_near: defaults::ir_th_near(),
            th_free: defaults::ir_th_free(),
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            turn_reward: defaults::turn_reward(),
            back_penalty: defaults::back_penalty(),
            forward_reward: defaults::forward_reward(),
            blocked_penalty: defaults::blocked_penalty(),
        }
    }
}

impl VyuhaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
