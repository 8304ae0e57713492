//! # Environment Model
//!
//! Owns the plant's [`EnvironmentState`] and every operation that changes it.
//! Each operation computes the new values from the current state, clamps them
//! to their domains and writes them back in one assignment. Nothing here
//! fails: out-of-range input is clamped, and missing or malformed optional
//! parameters fall back to their defaults.

use tracing::debug;

use super::noise::{NoiseSource, SeededNoise};
use super::step::{advance, StepOptions};
use crate::domain::state::{
    clamp_i32, display, limits, round_clamp, round_half_up, EnvironmentState,
    DEFAULT_DAY_CYCLE_SECONDS,
};
use crate::domain::Mood;

/// Action defaults and coupling factors.
pub mod action_constants {
    /// Moisture added by a plain watering.
    pub const DEFAULT_WATER_AMOUNT: f64 = 30.0;
    /// Share of the watering amount that reaches air humidity.
    pub const WATER_TO_HUMIDITY: f64 = 0.5;
    /// Share of a manual moisture change that reaches air humidity.
    pub const MOISTURE_TO_HUMIDITY: f64 = 0.25;
    /// Light level while asleep unless told otherwise.
    pub const DEFAULT_SLEEP_LUX: f64 = 50.0;
    /// Light level on wake when nothing was saved.
    pub const DEFAULT_WAKE_LUX: i32 = 800;
    /// Upper bound on the states returned by one `simulate_cycle` call.
    pub const MAX_CYCLE_STEPS: usize = 100_000;
}

/// Single-plant environment model.
pub struct EnvironmentModel {
    state: EnvironmentState,
    noise: Box<dyn NoiseSource>,
}

impl std::fmt::Debug for EnvironmentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentModel")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl EnvironmentModel {
    /// Create a model at the startup defaults.
    pub fn new(noise: Box<dyn NoiseSource>) -> Self {
        Self {
            state: EnvironmentState::default(),
            noise,
        }
    }

    /// Create a model backed by a seeded RNG (entropy when `seed` is `None`).
    pub fn with_seed(seed: Option<u64>) -> Self {
        Self::new(Box::new(SeededNoise::new(seed)))
    }

    /// Create a model from an existing state. Fields are clamped into domain.
    pub fn with_state(state: EnvironmentState, noise: Box<dyn NoiseSource>) -> Self {
        let mut model = Self { state, noise };
        model.normalize();
        model
    }

    /// Set the day cycle length on construction.
    pub fn with_day_cycle(mut self, secs: f64) -> Self {
        self.set_day_cycle_seconds(Some(secs));
        self
    }

    /// Current state.
    pub fn state(&self) -> &EnvironmentState {
        &self.state
    }

    /// Mood for the current state.
    pub fn mood(&self) -> Mood {
        Mood::from(&self.state)
    }

    pub fn set_humidity(&mut self, value: f64) {
        if let Some(humidity) = round_clamp(value, limits::HUMIDITY_MIN, limits::HUMIDITY_MAX) {
            self.state = EnvironmentState {
                humidity,
                ..self.state.clone()
            };
            debug!(humidity, "humidity set");
        }
    }

    pub fn set_temperature(&mut self, value: f64) {
        if let Some(temperature) =
            round_clamp(value, limits::TEMPERATURE_MIN, limits::TEMPERATURE_MAX)
        {
            self.state = EnvironmentState {
                temperature,
                ..self.state.clone()
            };
            debug!(temperature, "temperature set");
        }
    }

    pub fn set_light_exposure(&mut self, value: f64) {
        if let Some(light_exposure) = round_clamp(value, limits::LIGHT_MIN, limits::LIGHT_MAX) {
            self.state = EnvironmentState {
                light_exposure,
                ..self.state.clone()
            };
            debug!(light_exposure, "light exposure set");
        }
    }

    /// Set soil moisture. A quarter of the change carries over to humidity.
    pub fn set_moisture(&mut self, value: f64) {
        let Some(moisture) = round_clamp(value, limits::MOISTURE_MIN, limits::MOISTURE_MAX) else {
            return;
        };
        let change = (moisture - self.state.moisture) as f64;
        let humidity_delta = round_half_up(change * action_constants::MOISTURE_TO_HUMIDITY) as i64;
        let humidity = clamp_i32(
            self.state.humidity as i64 + humidity_delta,
            limits::HUMIDITY_MIN,
            limits::HUMIDITY_MAX,
        );

        self.state = EnvironmentState {
            moisture,
            humidity,
            ..self.state.clone()
        };
        debug!(moisture, humidity, "moisture set");
    }

    /// Water the plant. `None` waters with the default amount.
    pub fn water(&mut self, amount: Option<f64>) {
        let amount = amount
            .filter(|a| a.is_finite())
            .unwrap_or(action_constants::DEFAULT_WATER_AMOUNT);

        let moisture = round_clamp(
            self.state.moisture as f64 + amount,
            limits::MOISTURE_MIN,
            limits::MOISTURE_MAX,
        )
        .unwrap_or(self.state.moisture);
        let humidity_increase = round_half_up(amount * action_constants::WATER_TO_HUMIDITY) as i64;
        let humidity = clamp_i32(
            (self.state.humidity as i64).saturating_add(humidity_increase),
            limits::HUMIDITY_MIN,
            limits::HUMIDITY_MAX,
        );

        self.state = EnvironmentState {
            moisture,
            humidity,
            ..self.state.clone()
        };
        debug!(amount, moisture, humidity, "watered");
    }

    /// Dim the light and remember the previous level for [`wake`](Self::wake).
    ///
    /// Sleeping again while already asleep saves the already-dimmed level,
    /// so the original pre-sleep light is lost.
    pub fn sleep(&mut self, target_lux: Option<f64>) {
        let target = target_lux
            .filter(|t| !t.is_nan())
            .unwrap_or(action_constants::DEFAULT_SLEEP_LUX);
        let light_exposure = round_clamp(target, limits::LIGHT_MIN, limits::LIGHT_MAX)
            .unwrap_or(self.state.light_exposure);

        self.state = EnvironmentState {
            light_exposure,
            last_light_before_sleep: Some(self.state.light_exposure),
            is_sleeping: true,
            ..self.state.clone()
        };
        debug!(
            light_exposure,
            saved = ?self.state.last_light_before_sleep,
            "sleeping"
        );
    }

    /// Restore light. An explicit level wins, then the saved level, then 800 lux.
    pub fn wake(&mut self, restore_lux: Option<f64>) {
        let restored = restore_lux
            .and_then(|lux| round_clamp(lux, limits::LIGHT_MIN, limits::LIGHT_MAX))
            .or(self.state.last_light_before_sleep)
            .unwrap_or(action_constants::DEFAULT_WAKE_LUX);

        self.state = EnvironmentState {
            light_exposure: clamp_i32(restored as i64, limits::LIGHT_MIN, limits::LIGHT_MAX),
            last_light_before_sleep: None,
            is_sleeping: false,
            ..self.state.clone()
        };
        debug!(light_exposure = self.state.light_exposure, "awake");
    }

    /// Set the day cycle length. Missing, zero or non-finite means 30 s; minimum 5 s.
    pub fn set_day_cycle_seconds(&mut self, secs: Option<f64>) {
        let requested = secs
            .filter(|s| s.is_finite() && *s != 0.0)
            .unwrap_or(DEFAULT_DAY_CYCLE_SECONDS);
        let day_cycle_seconds = requested.max(limits::DAY_CYCLE_MIN_SECONDS);

        self.state = EnvironmentState {
            day_cycle_seconds,
            ..self.state.clone()
        };
        debug!(day_cycle_seconds, "day cycle set");
    }

    /// Draw the four primary fields uniformly from their display ranges.
    pub fn randomize(&mut self) {
        let humidity = self.noise.integer(0, limits::HUMIDITY_MAX);
        let moisture = self.noise.integer(0, limits::MOISTURE_MAX);
        let temperature = self.noise.integer(0, display::TEMPERATURE_MAX);
        let light_exposure = self.noise.integer(0, display::LIGHT_MAX);

        self.state = EnvironmentState {
            humidity,
            moisture,
            temperature,
            light_exposure,
            ..self.state.clone()
        };
        debug!(humidity, moisture, temperature, light_exposure, "randomized");
    }

    /// Advance the simulation by one step.
    pub fn simulate_step(&mut self, options: StepOptions) -> &EnvironmentState {
        self.state = advance(&self.state, options, self.noise.as_mut());
        &self.state
    }

    /// Step through one full day cycle, returning the state after each step.
    ///
    /// `step_seconds` that is not a positive finite number is treated as 1.
    /// Steps too small to cover the cycle within
    /// [`MAX_CYCLE_STEPS`](action_constants::MAX_CYCLE_STEPS) are widened.
    pub fn simulate_cycle(&mut self, step_seconds: f64) -> Vec<EnvironmentState> {
        const MAX_STEPS: usize = action_constants::MAX_CYCLE_STEPS;

        let cycle = self.state.day_cycle_seconds;
        let step = if step_seconds.is_finite() && step_seconds > 0.0 {
            step_seconds
        } else {
            1.0
        };
        let step = step.max(cycle / MAX_STEPS as f64);
        let steps = ((cycle / step).ceil() as usize).min(MAX_STEPS);

        let mut states = Vec::with_capacity(steps);
        for _ in 0..steps {
            let options = StepOptions {
                delta_seconds: Some(step),
                scale: None,
            };
            states.push(self.simulate_step(options).clone());
        }
        states
    }

    fn normalize(&mut self) {
        let s = &self.state;
        self.state = EnvironmentState {
            humidity: s.humidity.clamp(limits::HUMIDITY_MIN, limits::HUMIDITY_MAX),
            moisture: s.moisture.clamp(limits::MOISTURE_MIN, limits::MOISTURE_MAX),
            temperature: s.temperature.clamp(limits::TEMPERATURE_MIN, limits::TEMPERATURE_MAX),
            light_exposure: s.light_exposure.clamp(limits::LIGHT_MIN, limits::LIGHT_MAX),
            sim_time_seconds: if s.sim_time_seconds.is_finite() {
                s.sim_time_seconds.max(0.0)
            } else {
                0.0
            },
            day_cycle_seconds: if s.day_cycle_seconds.is_finite() {
                s.day_cycle_seconds.max(limits::DAY_CYCLE_MIN_SECONDS)
            } else {
                DEFAULT_DAY_CYCLE_SECONDS
            },
            is_sleeping: s.is_sleeping,
            last_light_before_sleep: if s.is_sleeping {
                s.last_light_before_sleep
                    .map(|l| l.clamp(limits::LIGHT_MIN, limits::LIGHT_MAX))
            } else {
                None
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::noise::FixedNoise;

    fn quiet_model() -> EnvironmentModel {
        EnvironmentModel::new(Box::new(FixedNoise::centered()))
    }

    #[test]
    fn test_setters_round_and_clamp() {
        let mut model = quiet_model();

        model.set_humidity(72.5);
        assert_eq!(model.state().humidity, 73);
        model.set_humidity(250.0);
        assert_eq!(model.state().humidity, 100);

        model.set_temperature(-40.0);
        assert_eq!(model.state().temperature, -10);
        model.set_temperature(-2.5);
        assert_eq!(model.state().temperature, -2);

        model.set_light_exposure(50_000.0);
        assert_eq!(model.state().light_exposure, 20_000);
        model.set_light_exposure(-1.0);
        assert_eq!(model.state().light_exposure, 0);
    }

    #[test]
    fn test_setters_touch_only_their_field() {
        let mut model = quiet_model();
        let before = model.state().clone();

        model.set_temperature(30.0);

        let after = model.state();
        assert_eq!(after.temperature, 30);
        assert_eq!(after.humidity, before.humidity);
        assert_eq!(after.moisture, before.moisture);
        assert_eq!(after.light_exposure, before.light_exposure);
    }

    #[test]
    fn test_nan_leaves_field_unchanged() {
        let mut model = quiet_model();
        model.set_humidity(f64::NAN);
        model.set_moisture(f64::NAN);
        assert_eq!(model.state(), &EnvironmentState::default());
    }

    #[test]
    fn test_set_moisture_shifts_humidity() {
        let mut model = quiet_model();

        model.set_moisture(90.0);
        assert_eq!(model.state().moisture, 90);
        // round(40 * 0.25) = 10
        assert_eq!(model.state().humidity, 60);

        model.set_moisture(88.0);
        // round(-2 * 0.25) = round(-0.5) = 0
        assert_eq!(model.state().humidity, 60);
    }

    #[test]
    fn test_set_moisture_to_current_keeps_humidity() {
        let mut model = quiet_model();
        model.set_moisture(50.0);
        assert_eq!(model.state().moisture, 50);
        assert_eq!(model.state().humidity, 50);
    }

    #[test]
    fn test_water_default_and_clamping() {
        let mut model = quiet_model();

        model.water(None);
        assert_eq!(model.state().moisture, 80);
        assert_eq!(model.state().humidity, 65);

        model.water(Some(30.0));
        assert_eq!(model.state().moisture, 100);
        assert_eq!(model.state().humidity, 80);

        model.water(Some(0.0));
        assert_eq!(model.state().moisture, 100);
        assert_eq!(model.state().humidity, 80);
    }

    #[test]
    fn test_huge_watering_saturates() {
        let mut model = quiet_model();

        model.water(Some(1.0e20));
        assert_eq!(model.state().moisture, 100);
        assert_eq!(model.state().humidity, 100);

        model.water(Some(-1.0e20));
        assert_eq!(model.state().moisture, 0);
        assert_eq!(model.state().humidity, 0);
    }

    #[test]
    fn test_sleep_then_wake_restores_light() {
        let mut model = quiet_model();
        model.set_light_exposure(1234.0);

        model.sleep(None);
        assert!(model.state().is_sleeping);
        assert_eq!(model.state().light_exposure, 50);
        assert_eq!(model.state().last_light_before_sleep, Some(1234));

        model.wake(None);
        assert!(!model.state().is_sleeping);
        assert_eq!(model.state().light_exposure, 1234);
        assert_eq!(model.state().last_light_before_sleep, None);
    }

    #[test]
    fn test_wake_with_explicit_level() {
        let mut model = quiet_model();
        model.sleep(Some(10.0));
        model.wake(Some(30_000.0));
        assert_eq!(model.state().light_exposure, 20_000);
        assert_eq!(model.state().last_light_before_sleep, None);
    }

    #[test]
    fn test_wake_without_sleep_defaults() {
        let mut model = quiet_model();
        model.wake(None);
        assert_eq!(model.state().light_exposure, 800);
        assert!(!model.state().is_sleeping);
    }

    #[test]
    fn test_repeated_sleep_loses_original_light() {
        let mut model = quiet_model();
        model.set_light_exposure(1500.0);

        model.sleep(Some(40.0));
        model.sleep(Some(20.0));
        assert_eq!(model.state().last_light_before_sleep, Some(40));

        model.wake(None);
        assert_eq!(model.state().light_exposure, 40);
    }

    #[test]
    fn test_day_cycle_defaults_and_minimum() {
        let mut model = quiet_model();

        model.set_day_cycle_seconds(Some(2.0));
        assert_eq!(model.state().day_cycle_seconds, 5.0);

        model.set_day_cycle_seconds(Some(120.0));
        assert_eq!(model.state().day_cycle_seconds, 120.0);

        model.set_day_cycle_seconds(None);
        assert_eq!(model.state().day_cycle_seconds, 30.0);

        model.set_day_cycle_seconds(Some(f64::NAN));
        assert_eq!(model.state().day_cycle_seconds, 30.0);

        model.set_day_cycle_seconds(Some(-4.0));
        assert_eq!(model.state().day_cycle_seconds, 5.0);
    }

    #[test]
    fn test_randomize_uses_display_ranges() {
        let mut high = EnvironmentModel::new(Box::new(FixedNoise::high()));
        high.randomize();
        assert_eq!(high.state().humidity, 100);
        assert_eq!(high.state().moisture, 100);
        assert_eq!(high.state().temperature, 50);
        assert_eq!(high.state().light_exposure, 2000);

        let mut low = EnvironmentModel::new(Box::new(FixedNoise::low()));
        low.randomize();
        assert_eq!(low.state().temperature, 0);
        assert_eq!(low.state().light_exposure, 0);
    }

    #[test]
    fn test_simulate_step_accumulates_time() {
        let mut model = EnvironmentModel::with_seed(Some(42));
        for i in 1..=10 {
            let state = model.simulate_step(StepOptions::new(2.5, 1.0));
            assert_eq!(state.sim_time_seconds, 2.5 * i as f64);
        }
    }

    #[test]
    fn test_simulate_cycle_covers_one_day() {
        let mut model = EnvironmentModel::with_seed(Some(42)).with_day_cycle(60.0);
        let states = model.simulate_cycle(5.0);

        assert_eq!(states.len(), 12);
        assert_eq!(model.state().sim_time_seconds, 60.0);

        let brightest = states
            .iter()
            .max_by_key(|s| s.light_exposure)
            .map(|s| s.sim_time_seconds)
            .unwrap_or_default();
        assert!((20.0..=40.0).contains(&brightest));
        assert!(states.iter().all(EnvironmentState::in_domain));
    }

    #[test]
    fn test_simulate_cycle_widens_tiny_steps() {
        let mut model = quiet_model();
        let states = model.simulate_cycle(1.0e-300);

        assert_eq!(states.len(), action_constants::MAX_CYCLE_STEPS);
        assert!((model.state().sim_time_seconds - 30.0).abs() < 1e-6);
    }

    #[test]
    fn test_simulate_cycle_bounds_huge_cycles() {
        let mut model = quiet_model();
        model.set_day_cycle_seconds(Some(1.0e308));

        let states = model.simulate_cycle(1.0);

        assert_eq!(states.len(), action_constants::MAX_CYCLE_STEPS);
        assert!(model.state().sim_time_seconds.is_finite());
        assert!(states.iter().all(EnvironmentState::in_domain));
    }

    #[test]
    fn test_with_state_normalizes() {
        let state = EnvironmentState {
            humidity: 500,
            temperature: -90,
            day_cycle_seconds: 1.0,
            last_light_before_sleep: Some(300),
            ..Default::default()
        };
        let model = EnvironmentModel::with_state(state, Box::new(FixedNoise::centered()));

        assert_eq!(model.state().humidity, 100);
        assert_eq!(model.state().temperature, -10);
        assert_eq!(model.state().day_cycle_seconds, 5.0);
        assert_eq!(model.state().last_light_before_sleep, None);
        assert!(model.state().in_domain());
    }

    #[test]
    fn test_mood_follows_actions() {
        let mut model = quiet_model();
        assert_eq!(model.mood(), Mood::Happy);

        model.water(Some(40.0));
        assert_eq!(model.mood(), Mood::Drowning);

        model.set_moisture(50.0);
        model.sleep(None);
        assert_eq!(model.mood(), Mood::Sleepy);
    }
}
