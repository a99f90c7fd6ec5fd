//! Speed ramp curves.
//!
//! Acceleration follows an ease-in-out cubic over `ramp_up_ms`;
//! deceleration an ease-out cubic over `ramp_down_ms`, starting from the
//! speed the rotor had when stop was pressed.

use crate::config::StarterConfig;

/// `t < 0.5 ? 4t³ : 1 − (−2t + 2)³ / 2`, for `t` in `[0, 1]`.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// `1 − (1 − t)³`, for `t` in `[0, 1]`.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Ramp durations and sampling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampProfile {
    pub ramp_up_ms: u32,
    pub ramp_down_ms: u32,
    pub accel_interval_ms: u32,
    pub decel_interval_ms: u32,
}

impl RampProfile {
    pub fn from_config(config: &StarterConfig) -> Self {
        Self {
            ramp_up_ms: config.ramp_up_ms,
            ramp_down_ms: config.ramp_down_ms(),
            accel_interval_ms: config.accel_sample_interval_ms,
            decel_interval_ms: config.decel_sample_interval_ms,
        }
    }

    /// Acceleration progress in `[0, 1]` after `elapsed_ms`.
    pub fn accel_progress(&self, elapsed_ms: u64) -> f32 {
        progress(elapsed_ms, self.ramp_up_ms)
    }

    /// Deceleration progress in `[0, 1]` after `elapsed_ms`.
    pub fn decel_progress(&self, elapsed_ms: u64) -> f32 {
        progress(elapsed_ms, self.ramp_down_ms)
    }

    /// Rotor speed `elapsed_ms` into an acceleration toward `rated_rpm`.
    pub fn accel_rpm(&self, elapsed_ms: u64, rated_rpm: u32) -> u32 {
        let eased = ease_in_out_cubic(self.accel_progress(elapsed_ms));
        (rated_rpm as f32 * eased).round() as u32
    }

    /// Rotor speed `elapsed_ms` into a deceleration from `from_rpm`.
    pub fn decel_rpm(&self, elapsed_ms: u64, from_rpm: u32) -> u32 {
        let eased = ease_out_cubic(self.decel_progress(elapsed_ms));
        (from_rpm as f32 * (1.0 - eased)).round() as u32
    }
}

impl Default for RampProfile {
    fn default() -> Self {
        Self::from_config(&StarterConfig::default())
    }
}

fn progress(elapsed_ms: u64, duration_ms: u32) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / duration_ms as f32).min(1.0)
}
