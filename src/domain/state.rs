//! Plant environment state and the numeric helpers that keep it in range.

use serde::{Deserialize, Serialize};

/// Hard domain limits. Every write to [`EnvironmentState`] is clamped to these.
pub mod limits {
    pub const HUMIDITY_MIN: i32 = 0;
    pub const HUMIDITY_MAX: i32 = 100;

    pub const MOISTURE_MIN: i32 = 0;
    pub const MOISTURE_MAX: i32 = 100;

    pub const TEMPERATURE_MIN: i32 = -10;
    pub const TEMPERATURE_MAX: i32 = 60;

    pub const LIGHT_MIN: i32 = 0;
    pub const LIGHT_MAX: i32 = 20_000;

    /// Shortest allowed day/night cycle in simulated seconds.
    pub const DAY_CYCLE_MIN_SECONDS: f64 = 5.0;
}

/// Ranges a display is expected to show. Narrower than [`limits`].
pub mod display {
    pub const TEMPERATURE_MAX: i32 = 50;
    pub const LIGHT_MAX: i32 = 2_000;
}

pub const DEFAULT_HUMIDITY: i32 = 50;
pub const DEFAULT_MOISTURE: i32 = 50;
pub const DEFAULT_TEMPERATURE: i32 = 25;
pub const DEFAULT_LIGHT: i32 = 400;
pub const DEFAULT_DAY_CYCLE_SECONDS: f64 = 30.0;

/// Complete environment snapshot of the plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Relative air humidity in percent, 0..=100
    pub humidity: i32,
    /// Soil moisture in percent, 0..=100
    pub moisture: i32,
    /// Air temperature in °C, -10..=60
    pub temperature: i32,
    /// Light exposure in lux, 0..=20000
    pub light_exposure: i32,
    /// Elapsed simulated time, accumulated by simulation steps
    pub sim_time_seconds: f64,
    /// Length of one full day/night cycle in simulated seconds (>= 5)
    pub day_cycle_seconds: f64,
    /// Set by the sleep action, cleared by wake
    pub is_sleeping: bool,
    /// Light level saved by sleep so wake can restore it
    pub last_light_before_sleep: Option<i32>,
}

impl Default for EnvironmentState {
    fn default() -> Self {
        Self {
            humidity: DEFAULT_HUMIDITY,
            moisture: DEFAULT_MOISTURE,
            temperature: DEFAULT_TEMPERATURE,
            light_exposure: DEFAULT_LIGHT,
            sim_time_seconds: 0.0,
            day_cycle_seconds: DEFAULT_DAY_CYCLE_SECONDS,
            is_sleeping: false,
            last_light_before_sleep: None,
        }
    }
}

impl EnvironmentState {
    /// Whether every field lies inside its hard domain.
    pub fn in_domain(&self) -> bool {
        use limits::*;
        (HUMIDITY_MIN..=HUMIDITY_MAX).contains(&self.humidity)
            && (MOISTURE_MIN..=MOISTURE_MAX).contains(&self.moisture)
            && (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&self.temperature)
            && (LIGHT_MIN..=LIGHT_MAX).contains(&self.light_exposure)
            && self.day_cycle_seconds >= DAY_CYCLE_MIN_SECONDS
    }

    /// Display percentages for the four primary fields.
    pub fn gauges(&self) -> Gauges {
        Gauges {
            humidity: percent_of(self.humidity, 0, limits::HUMIDITY_MAX),
            moisture: percent_of(self.moisture, 0, limits::MOISTURE_MAX),
            temperature: percent_of(self.temperature, 0, display::TEMPERATURE_MAX),
            light_exposure: percent_of(self.light_exposure, 0, display::LIGHT_MAX),
        }
    }
}

/// Percent fill (0..=100) of each bar on the display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gauges {
    pub humidity: f64,
    pub moisture: f64,
    pub temperature: f64,
    pub light_exposure: f64,
}

fn percent_of(value: i32, low: i32, high: i32) -> f64 {
    let span = (high - low) as f64;
    (((value - low) as f64 / span) * 100.0).clamp(0.0, 100.0)
}

/// Phase of `time` within a cycle of length `cycle`, in [0, 1).
pub fn day_phase_fraction(time: f64, cycle: f64) -> f64 {
    if cycle <= 0.0 || !cycle.is_finite() {
        return 0.0;
    }
    time.rem_euclid(cycle) / cycle
}

/// Round to the nearest integer, with halves going toward positive infinity.
///
/// `2.5 -> 3`, `-2.5 -> -2`. This differs from [`f64::round`], which rounds
/// halves away from zero.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round and clamp into `[low, high]`. `NaN` yields `None`.
pub fn round_clamp(value: f64, low: i32, high: i32) -> Option<i32> {
    if value.is_nan() {
        return None;
    }
    let rounded = round_half_up(value).clamp(low as f64, high as f64);
    Some(rounded as i32)
}

/// Clamp an already integral value into `[low, high]`.
pub fn clamp_i32(value: i64, low: i32, high: i32) -> i32 {
    value.clamp(low as i64, high as i64) as i32
}
