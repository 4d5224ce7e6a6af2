//! Default value functions for serde deserialization.

pub fn control_period_ms() -> u64 {
    150
}

pub fn sim_period_ms() -> u64 {
    250
}

pub fn maze_width() -> usize {
    8
}

pub fn maze_height() -> usize {
    8
}

pub fn goal_x() -> i32 {
    7
}

pub fn goal_y() -> i32 {
    7
}

pub fn ir_alpha() -> f32 {
    0.23
}

pub fn ir_th_near() -> f32 {
    0.30
}

pub fn ir_th_free() -> f32 {
    0.55
}

pub fn turn_reward() -> f32 {
    0.2
}

pub fn back_penalty() -> f32 {
    -0.3
}

pub fn forward_reward() -> f32 {
    0.3
}

pub fn blocked_penalty() -> f32 {
    -0.2
}
