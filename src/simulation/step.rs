//! # Single-Step Environment Transition
//!
//! Advances the plant environment by one simulated interval. Light follows a
//! half-rectified sine over the day cycle, temperature eases toward a diurnal
//! target, soil dries faster in heat and light, and air humidity drifts toward
//! a value implied by soil moisture (with a boost at night).
//!
//! The transition is a pure function of the previous state, the step options
//! and the draws taken from the supplied [`NoiseSource`]. The result replaces
//! the old state as a whole.

use std::f64::consts::{FRAC_PI_2, TAU};

use super::noise::NoiseSource;
use crate::domain::state::{clamp_i32, limits, round_clamp, round_half_up, EnvironmentState};

/// Tuning constants for the environment transition.
pub mod step_constants {
    /// Light at the peak of the day, before noise.
    pub const PEAK_LIGHT_LUX: f64 = 2000.0;
    /// Light jitter amplitude in either direction.
    pub const LIGHT_NOISE_LUX: f64 = 40.0;

    /// Diurnal temperature midline in °C.
    pub const BASE_TEMPERATURE_C: f64 = 22.0;
    /// Diurnal temperature amplitude in °C.
    pub const TEMPERATURE_SWING_C: f64 = 6.0;
    /// Fraction of the gap to the diurnal target closed per step.
    pub const TEMPERATURE_SMOOTHING: f64 = 0.06;
    pub const TEMPERATURE_NOISE_C: f64 = 0.3;

    /// Evaporation per step with no heat and no light.
    pub const BASE_EVAPORATION: f64 = 0.03;
    /// Degrees of temperature per unit of extra evaporation.
    pub const EVAPORATION_TEMPERATURE_DIVISOR: f64 = 800.0;
    /// Lux per unit of extra evaporation.
    pub const EVAPORATION_LIGHT_DIVISOR: f64 = 15000.0;
    /// Upper bound of the random evaporation boost (fraction).
    pub const EVAPORATION_JITTER: f64 = 0.6;

    /// Share of soil moisture reflected in implied humidity.
    pub const MOISTURE_TO_HUMIDITY: f64 = 0.6;
    /// Implied humidity boost when it is dark.
    pub const NIGHT_HUMIDITY_BOOST: f64 = 10.0;
    /// Light below which the night boost applies.
    pub const NIGHT_LIGHT_LUX: f64 = 200.0;
    pub const HUMIDITY_SMOOTHING: f64 = 0.06;
    pub const HUMIDITY_NOISE: f64 = 0.3;

    pub const DEFAULT_DELTA_SECONDS: f64 = 1.0;
    pub const DEFAULT_SCALE: f64 = 1.0;
}

/// Optional step parameters. Missing or malformed values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOptions {
    /// Simulated seconds to advance (default 1)
    pub delta_seconds: Option<f64>,
    /// Evaporation multiplier (default 1)
    pub scale: Option<f64>,
}

impl StepOptions {
    pub fn new(delta_seconds: f64, scale: f64) -> Self {
        Self {
            delta_seconds: Some(delta_seconds),
            scale: Some(scale),
        }
    }

    /// Effective delta. Non-finite falls back to 1; negative clamps to 0.
    pub fn delta(&self) -> f64 {
        match self.delta_seconds {
            Some(d) if d.is_finite() => d.max(0.0),
            _ => step_constants::DEFAULT_DELTA_SECONDS,
        }
    }

    /// Effective scale. Zero counts as unset.
    pub fn scale(&self) -> f64 {
        match self.scale {
            Some(s) if s.is_finite() && s != 0.0 => s,
            _ => step_constants::DEFAULT_SCALE,
        }
    }
}

/// Daylight factor for a phase: zero through the night half, peaking at 1
/// at mid-cycle.
pub fn daylight(phase: f64) -> f64 {
    (phase * TAU - FRAC_PI_2).sin().max(0.0)
}

/// Ambient temperature target for a phase, 16 °C at cycle start, 28 °C at mid-cycle.
pub fn diurnal_temperature(phase: f64) -> f64 {
    use step_constants::*;
    BASE_TEMPERATURE_C + TEMPERATURE_SWING_C * (phase * TAU - FRAC_PI_2).sin()
}

/// Compute the next environment state.
///
/// Noise draws happen in a fixed order (light, temperature, evaporation,
/// humidity) so a seeded source reproduces the same trajectory.
pub fn advance(
    state: &EnvironmentState,
    options: StepOptions,
    noise: &mut dyn NoiseSource,
) -> EnvironmentState {
    use step_constants::*;

    let sim_time = state.sim_time_seconds + options.delta();
    let cycle = state.day_cycle_seconds.max(limits::DAY_CYCLE_MIN_SECONDS);
    let phase = crate::domain::state::day_phase_fraction(sim_time, cycle);

    // Light is left unclamped for the derivations below
    let target_light = round_half_up(
        PEAK_LIGHT_LUX * daylight(phase) + noise.uniform(-LIGHT_NOISE_LUX, LIGHT_NOISE_LUX),
    );

    let old_temperature = state.temperature as f64;
    let temperature_noise = noise.uniform(-TEMPERATURE_NOISE_C, TEMPERATURE_NOISE_C);
    let temperature = round_clamp(
        old_temperature
            + (diurnal_temperature(phase) - old_temperature) * TEMPERATURE_SMOOTHING
            + temperature_noise,
        limits::TEMPERATURE_MIN,
        limits::TEMPERATURE_MAX,
    )
    .unwrap_or(state.temperature);

    let evaporation = BASE_EVAPORATION
        + temperature as f64 / EVAPORATION_TEMPERATURE_DIVISOR
        + target_light / EVAPORATION_LIGHT_DIVISOR;
    let jitter = 1.0 + noise.uniform(0.0, EVAPORATION_JITTER);
    let moisture_loss = (evaporation * jitter * options.scale()).max(0.0);
    let moisture = round_clamp(
        state.moisture as f64 - moisture_loss,
        limits::MOISTURE_MIN,
        limits::MOISTURE_MAX,
    )
    .unwrap_or(state.moisture);

    let night_boost = if target_light < NIGHT_LIGHT_LUX {
        NIGHT_HUMIDITY_BOOST
    } else {
        0.0
    };
    let implied_humidity = round_clamp(
        moisture as f64 * MOISTURE_TO_HUMIDITY + night_boost,
        limits::HUMIDITY_MIN,
        limits::HUMIDITY_MAX,
    )
    .unwrap_or(state.humidity);
    let humidity_delta = round_half_up(
        (implied_humidity - state.humidity) as f64 * HUMIDITY_SMOOTHING
            + noise.uniform(-HUMIDITY_NOISE, HUMIDITY_NOISE),
    ) as i64;
    let humidity = clamp_i32(
        state.humidity as i64 + humidity_delta,
        limits::HUMIDITY_MIN,
        limits::HUMIDITY_MAX,
    );

    let light_exposure = round_clamp(target_light, limits::LIGHT_MIN, limits::LIGHT_MAX)
        .unwrap_or(state.light_exposure);

    EnvironmentState {
        humidity,
        moisture,
        temperature,
        light_exposure,
        sim_time_seconds: sim_time,
        ..state.clone()
    }
}
