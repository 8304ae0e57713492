//! Text commands for driving the model from a console.
//!
//! One command per line: a case-insensitive verb followed by numeric
//! arguments, e.g. `water 20`, `sleep`, `light 1200`, `step 1 3`.

use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::PlantError;
use crate::simulation::StepOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Water,
    Sleep,
    Wake,
    Humidity,
    Moisture,
    #[strum(serialize = "temperature", serialize = "temp")]
    Temperature,
    #[strum(serialize = "light", serialize = "lux")]
    Light,
    Cycle,
    Randomize,
    Step,
    Status,
}

/// A user action against the environment model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Water(Option<f64>),
    Sleep(Option<f64>),
    Wake(Option<f64>),
    SetHumidity(f64),
    SetMoisture(f64),
    SetTemperature(f64),
    SetLightExposure(f64),
    SetDayCycle(Option<f64>),
    Randomize,
    Step(StepOptions),
    /// Read-only: report the current snapshot.
    Status,
}

impl FromStr for Command {
    type Err = PlantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let word = parts
            .next()
            .ok_or_else(|| PlantError::InvalidCommand("empty command".into()))?;
        let verb = Verb::from_str(word)
            .map_err(|_| PlantError::InvalidCommand(format!("unknown command '{word}'")))?;
        let args: Vec<&str> = parts.collect();

        let optional = |i: usize| args.get(i).and_then(|a| a.parse::<f64>().ok());
        let required = |i: usize| -> Result<f64, PlantError> {
            let raw = args.get(i).ok_or_else(|| {
                PlantError::InvalidCommand(format!("'{verb}' needs a numeric value"))
            })?;
            raw.parse::<f64>()
                .map_err(|_| PlantError::InvalidCommand(format!("'{raw}' is not a number")))
        };

        Ok(match verb {
            Verb::Water => Command::Water(optional(0)),
            Verb::Sleep => Command::Sleep(optional(0)),
            Verb::Wake => Command::Wake(optional(0)),
            Verb::Humidity => Command::SetHumidity(required(0)?),
            Verb::Moisture => Command::SetMoisture(required(0)?),
            Verb::Temperature => Command::SetTemperature(required(0)?),
            Verb::Light => Command::SetLightExposure(required(0)?),
            Verb::Cycle => Command::SetDayCycle(optional(0)),
            Verb::Randomize => Command::Randomize,
            Verb::Step => Command::Step(StepOptions {
                delta_seconds: optional(0),
                scale: optional(1),
            }),
            Verb::Status => Command::Status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("water", Command::Water(None))]
    #[case("WATER 12", Command::Water(Some(12.0)))]
    #[case("water lots", Command::Water(None))]
    #[case("sleep 5", Command::Sleep(Some(5.0)))]
    #[case("wake", Command::Wake(None))]
    #[case("humidity 70", Command::SetHumidity(70.0))]
    #[case("moisture 12.5", Command::SetMoisture(12.5))]
    #[case("temp -4", Command::SetTemperature(-4.0))]
    #[case("lux 900", Command::SetLightExposure(900.0))]
    #[case("cycle", Command::SetDayCycle(None))]
    #[case("cycle 120", Command::SetDayCycle(Some(120.0)))]
    #[case("randomize", Command::Randomize)]
    #[case("  status  ", Command::Status)]
    #[case("step 2 3", Command::Step(StepOptions::new(2.0, 3.0)))]
    #[case("step", Command::Step(StepOptions::default()))]
    fn test_parse(#[case] input: &str, #[case] expected: Command) {
        assert_eq!(input.parse::<Command>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("dance")]
    #[case("humidity")]
    #[case("light bright")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Command>(),
            Err(PlantError::InvalidCommand(_))
        ));
    }
}
