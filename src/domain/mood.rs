//! Mood classification derived from the plant's current environment.
//!
//! Mood is never stored. It is recomputed from moisture, temperature and
//! light on every query, so it always agrees with the state it came from.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::state::EnvironmentState;

/// Thresholds for mood classification.
pub mod mood_thresholds {
    /// Moisture above this is waterlogged.
    pub const DROWNING_MOISTURE: i32 = 80;
    /// Moisture below this is too dry.
    pub const THIRSTY_MOISTURE: i32 = 30;
    pub const HOT_TEMPERATURE: i32 = 35;
    pub const COLD_TEMPERATURE: i32 = 15;
    /// Light below this counts as night.
    pub const SLEEPY_LIGHT: i32 = 200;
}

/// Plant mood, in classification priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Mood {
    Drowning,
    Thirsty,
    Hot,
    Cold,
    Sleepy,
    Happy,
}

impl Mood {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Mood::Drowning => "Drowning",
            Mood::Thirsty => "Thirsty",
            Mood::Hot => "Hot",
            Mood::Cold => "Cold",
            Mood::Sleepy => "Sleepy",
            Mood::Happy => "Happy",
        }
    }

    /// Face shown next to the label.
    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Drowning => "(ﾟДﾟ;)",
            Mood::Thirsty => "(´；ω；`)",
            Mood::Hot => "(; ﾟДﾟ)",
            Mood::Cold => "(｡•́_•̀｡)",
            Mood::Sleepy => "(－ω－)",
            Mood::Happy => "(◕‿◕)",
        }
    }
}

/// Classify mood from the three inputs that drive it. First match wins.
pub fn classify(moisture: i32, temperature: i32, light_exposure: i32) -> Mood {
    use mood_thresholds::*;

    if moisture > DROWNING_MOISTURE {
        Mood::Drowning
    } else if moisture < THIRSTY_MOISTURE {
        Mood::Thirsty
    } else if temperature > HOT_TEMPERATURE {
        Mood::Hot
    } else if temperature < COLD_TEMPERATURE {
        Mood::Cold
    } else if light_exposure < SLEEPY_LIGHT {
        Mood::Sleepy
    } else {
        Mood::Happy
    }
}

impl From<&EnvironmentState> for Mood {
    fn from(state: &EnvironmentState) -> Self {
        classify(state.moisture, state.temperature, state.light_exposure)
    }
}
