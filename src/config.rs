use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::state::DEFAULT_DAY_CYCLE_SECONDS;
use crate::error::PlantError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub simulation: SimulationConfig,
    pub telemetry: TelemetryConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    /// Real-time period between simulation steps
    #[validate(range(min = 10, max = 60000))]
    pub tick_millis: u64,
    /// Simulated seconds advanced per step
    #[validate(range(min = 0.0))]
    pub delta_seconds: f64,
    /// Evaporation multiplier per step
    pub scale: f64,
    pub day_cycle_seconds: f64,
    /// Fixed seed for reproducible runs
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_millis: 1000,
            delta_seconds: 1.0,
            scale: 1.0,
            day_cycle_seconds: DEFAULT_DAY_CYCLE_SECONDS,
            random_seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Emit JSON log lines instead of human-readable ones
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Read commands from stdin
    pub enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file("config/default.toml"))
                .merge(Env::prefixed("POTCHI__").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let cfg: Config = figment.extract().context("failed to read configuration")?;
        cfg.validate().map_err(|e| PlantError::Config(e.to_string()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::from_figment(defaults()).unwrap();
        assert_eq!(cfg.simulation.tick_millis, 1000);
        assert_eq!(cfg.simulation.day_cycle_seconds, 30.0);
        assert!(cfg.simulation.random_seed.is_none());
        assert!(cfg.console.enabled);
        assert!(!cfg.telemetry.json);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = r#"
            [simulation]
            day_cycle_seconds = 90.0
            random_seed = 7

            [telemetry]
            json = true
        "#;
        let cfg = Config::from_figment(defaults().merge(Toml::string(toml))).unwrap();
        assert_eq!(cfg.simulation.day_cycle_seconds, 90.0);
        assert_eq!(cfg.simulation.random_seed, Some(7));
        assert_eq!(cfg.simulation.tick_millis, 1000);
        assert!(cfg.telemetry.json);
    }

    #[test]
    fn test_rejects_tick_too_fast() {
        let toml = "[simulation]\ntick_millis = 1\n";
        let err = Config::from_figment(defaults().merge(Toml::string(toml))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlantError>(),
            Some(PlantError::Config(_))
        ));
    }
}
