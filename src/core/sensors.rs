//! Sensor-facing types: the discretized three-way reading the core
//! consumes, and the analog front-end that produces it.
//!
//! The navigation core only ever sees [`SensorRead`]. The
//! [`IrDiscretizer`] belongs to the caller side of the contract: it
//! turns raw reflectance values into free/blocked flags with EMA
//! smoothing and two-threshold hysteresis, and rejects non-finite
//! input so the core never sees it.

use serde::{Deserialize, Serialize};

/// Discretized proximity reading relative to the current heading.
///
/// `true` means no wall on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRead {
    /// True when the left side is open
    pub left_free: bool,
    /// True when the front is open
    pub front_free: bool,
    /// True when the right side is open
    pub right_free: bool,
}

impl SensorRead {
    /// Reading with all three sides open.
    pub fn all_free() -> Self {
        Self {
            left_free: true,
            front_free: true,
            right_free: true,
        }
    }

    /// True when every side is blocked (dead end).
    #[inline]
    pub fn all_blocked(&self) -> bool {
        !self.left_free && !self.front_free && !self.right_free
    }
}

/// Analog-to-boolean front end for a three-channel IR array.
///
/// Raw values are reflectance in `[0, 1]`; higher means a closer
/// obstacle. A channel switches to blocked when its filtered value
/// rises to `th_free` and back to free only when it falls below
/// `th_near`, so readings wandering between the two thresholds do not
/// flicker.
#[derive(Clone, Debug)]
pub struct IrDiscretizer {
    alpha: f32,
    th_near: f32,
    th_free: f32,
    filtered: [f32; 3],
    blocked: [bool; 3],
}

impl IrDiscretizer {
    /// Create a front end with the given EMA coefficient and
    /// thresholds. Requires `th_near < th_free`.
    pub fn new(alpha: f32, th_near: f32, th_free: f32) -> Self {
        debug_assert!(th_near < th_free);
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            th_near,
            th_free,
            filtered: [0.0; 3],
            blocked: [false; 3],
        }
    }

    /// Feed one raw sample per channel (left, front, right).
    ///
    /// Returns `None` when any sample is non-finite; the caller is
    /// expected to stop the motors and skip the tick. Valid samples
    /// are clamped to `[0, 1]` before filtering.
    pub fn update(&mut self, raw: [f32; 3]) -> Option<SensorRead> {
        if raw.iter().any(|v| !v.is_finite()) {
            return None;
        }
        for (i, &v) in raw.iter().enumerate() {
            let v = v.clamp(0.0, 1.0);
            self.filtered[i] = self.alpha * v + (1.0 - self.alpha) * self.filtered[i];
            if self.blocked[i] {
                if self.filtered[i] < self.th_near {
                    self.blocked[i] = false;
                }
            } else if self.filtered[i] >= self.th_free {
                self.blocked[i] = true;
            }
        }
        Some(SensorRead {
            left_free: !self.blocked[0],
            front_free: !self.blocked[1],
            right_free: !self.blocked[2],
        })
    }

    /// Latest filtered values (left, front, right).
    pub fn filtered(&self) -> [f32; 3] {
        self.filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_finite() {
        let mut d = IrDiscretizer::new(1.0, 0.30, 0.55);
        assert!(d.update([0.1, f32::NAN, 0.1]).is_none());
        assert!(d.update([0.1, f32::INFINITY, 0.1]).is_none());
    }

    #[test]
    fn test_threshold_crossing() {
        // alpha = 1.0 disables smoothing so thresholds act directly.
        let mut d = IrDiscretizer::new(1.0, 0.30, 0.55);
        let sr = d.update([0.1, 0.9, 0.1]).unwrap();
        assert!(sr.left_free && !sr.front_free && sr.right_free);
    }

    #[test]
    fn test_hysteresis_band_holds_state() {
        let mut d = IrDiscretizer::new(1.0, 0.30, 0.55);
        assert!(!d.update([0.0, 0.9, 0.0]).unwrap().front_free);
        // Mid-band value: still blocked.
        assert!(!d.update([0.0, 0.4, 0.0]).unwrap().front_free);
        // Below th_near: released.
        assert!(d.update([0.0, 0.1, 0.0]).unwrap().front_free);
        // Back into the band: stays free this time.
        assert!(d.update([0.0, 0.4, 0.0]).unwrap().front_free);
    }

    #[test]
    fn test_dead_end_flag() {
        let sr = SensorRead::default();
        assert!(sr.all_blocked());
        assert!(!SensorRead::all_free().all_blocked());
    }
}
