//! Starter configuration parameters
//!
//! All tunable parameters for the DOL starter simulation.
//! Values can be overridden from a JSON file via the
//! [`ConfigPort`](crate::app::ports::ConfigPort) adapter.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fsm::{ElectricalModel, MotorParams, MotorState};

/// Core starter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarterConfig {
    // --- Motor nameplate ---
    /// Rated speed (RPM).  1480 for a 4-pole motor at 50 Hz.
    pub rated_rpm: u32,
    /// Supply voltage (V), 3-phase.
    pub system_voltage: u32,
    /// Fraction of rated speed at which the motor counts as running.
    pub running_threshold: f32,

    // --- Ramp timing ---
    /// Time for the rotor to reach rated speed (milliseconds)
    pub ramp_up_ms: u32,
    /// Deceleration time as a fraction of `ramp_up_ms`
    pub ramp_down_ratio: f32,
    /// Acceleration sample interval (milliseconds)
    pub accel_sample_interval_ms: u32,
    /// Deceleration sample interval (milliseconds)
    pub decel_sample_interval_ms: u32,
    /// Runtime accounting interval (milliseconds)
    pub runtime_tick_ms: u32,

    // --- Electrical / thermal model ---
    /// Line current at rated speed (A)
    pub full_load_current_a: f32,
    /// Load factor at the bottom of the speed range (0-1)
    pub baseline_load_factor: f32,
    /// Ambient temperature (Celsius)
    pub ambient_temperature_c: f32,
    /// Winding temperature at rated speed (Celsius)
    pub max_temperature_c: f32,
    /// Cooling applied per zero-speed RPM update (Celsius)
    pub cooling_step_c: f32,

    // --- Overload relay ---
    /// Current above which the relay starts timing a trip (A)
    pub overload_current_limit_a: f32,
    /// How long the current must stay above the limit before tripping (milliseconds)
    pub overload_trip_delay_ms: u32,
    /// Winding temperature that trips the relay immediately (Celsius)
    pub overload_temperature_limit_c: f32,
    /// State entered on an overload trip: `OVERLOAD` or `FAULT`
    pub trip_state: MotorState,

    // --- Reporting ---
    /// Telemetry report interval for the host runner (milliseconds)
    pub telemetry_interval_ms: u32,
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            // Nameplate
            rated_rpm: 1480,
            system_voltage: 400,
            running_threshold: 0.95,

            // Ramp timing
            ramp_up_ms: 2000,
            ramp_down_ratio: 0.8,
            accel_sample_interval_ms: 50,
            decel_sample_interval_ms: 30,
            runtime_tick_ms: 1000,

            // Model
            full_load_current_a: 5.0,
            baseline_load_factor: 0.2,
            ambient_temperature_c: 25.0,
            max_temperature_c: 90.0,
            cooling_step_c: 0.1,

            // Relay: above the model's maxima, a healthy motor never trips
            overload_current_limit_a: 6.0,
            overload_trip_delay_ms: 500,
            overload_temperature_limit_c: 100.0,
            trip_state: MotorState::Overload,

            telemetry_interval_ms: 500,
        }
    }
}

impl StarterConfig {
    /// Deceleration ramp duration (milliseconds).
    pub fn ramp_down_ms(&self) -> u32 {
        (self.ramp_up_ms as f32 * self.ramp_down_ratio).round() as u32
    }

    /// Reducer parameters derived from this configuration.
    pub fn motor_params(&self) -> MotorParams {
        MotorParams {
            rated_rpm: self.rated_rpm,
            system_voltage: self.system_voltage,
            running_threshold: self.running_threshold,
            trip_state: self.trip_state,
            electrical: ElectricalModel {
                full_load_current_a: self.full_load_current_a,
                baseline_load_factor: self.baseline_load_factor,
                ambient_temperature_c: self.ambient_temperature_c,
                max_temperature_c: self.max_temperature_c,
                cooling_step_c: self.cooling_step_c,
            },
        }
    }

    /// Reject values that would make the simulation meaningless.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let reals = [
            self.running_threshold,
            self.ramp_down_ratio,
            self.full_load_current_a,
            self.baseline_load_factor,
            self.ambient_temperature_c,
            self.max_temperature_c,
            self.cooling_step_c,
            self.overload_current_limit_a,
            self.overload_temperature_limit_c,
        ];
        // NaN slips past every ordered comparison below.
        if !reals.iter().all(|v| v.is_finite()) {
            return Err(ConfigError::ValidationFailed("real-valued fields must be finite"));
        }
        if self.rated_rpm == 0 {
            return Err(ConfigError::ValidationFailed("rated_rpm must be > 0"));
        }
        if !(self.running_threshold > 0.0 && self.running_threshold <= 1.0) {
            return Err(ConfigError::ValidationFailed(
                "running_threshold must be in (0, 1]",
            ));
        }
        if self.ramp_up_ms == 0 {
            return Err(ConfigError::ValidationFailed("ramp_up_ms must be > 0"));
        }
        if !(self.ramp_down_ratio > 0.0 && self.ramp_down_ratio.is_finite()) {
            return Err(ConfigError::ValidationFailed("ramp_down_ratio must be > 0"));
        }
        if self.ramp_down_ms() == 0 {
            return Err(ConfigError::ValidationFailed("deceleration ramp rounds to 0 ms"));
        }
        if self.accel_sample_interval_ms == 0
            || self.decel_sample_interval_ms == 0
            || self.runtime_tick_ms == 0
        {
            return Err(ConfigError::ValidationFailed("timer intervals must be > 0"));
        }
        if self.accel_sample_interval_ms > self.ramp_up_ms {
            return Err(ConfigError::ValidationFailed(
                "accel_sample_interval_ms must not exceed ramp_up_ms",
            ));
        }
        if !(0.0..=1.0).contains(&self.baseline_load_factor) {
            return Err(ConfigError::ValidationFailed(
                "baseline_load_factor must be in [0, 1]",
            ));
        }
        if self.full_load_current_a < 0.0 {
            return Err(ConfigError::ValidationFailed("full_load_current_a must be >= 0"));
        }
        if self.max_temperature_c < self.ambient_temperature_c {
            return Err(ConfigError::ValidationFailed(
                "max_temperature_c must be >= ambient_temperature_c",
            ));
        }
        if self.cooling_step_c < 0.0 {
            return Err(ConfigError::ValidationFailed("cooling_step_c must be >= 0"));
        }
        if !matches!(self.trip_state, MotorState::Overload | MotorState::Fault) {
            return Err(ConfigError::ValidationFailed(
                "trip_state must be OVERLOAD or FAULT",
            ));
        }
        Ok(())
    }
}
