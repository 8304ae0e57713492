//! # Plant Environment Simulation
//!
//! Four coupled variables (soil moisture, air humidity, temperature, light)
//! evolve over a simulated day/night cycle and react to user actions.
//!
//! ## Components
//!
//! - **Model**: owns the state and exposes the user actions and the step function
//! - **Step**: pure single-step transition over a day cycle
//! - **Noise**: injectable randomness so trajectories can be reproduced
//!
//! ## Usage
//!
//! ```rust
//! use potchi_env::simulation::{EnvironmentModel, StepOptions};
//!
//! let mut model = EnvironmentModel::with_seed(Some(42)).with_day_cycle(60.0);
//!
//! model.water(None);
//! model.simulate_step(StepOptions::default());
//!
//! let mood = model.mood();
//! println!("{} {}", mood.label(), mood.emoji());
//! ```

pub mod model;
pub mod noise;
pub mod step;

pub use model::EnvironmentModel;
pub use noise::{FixedNoise, NoiseSource, SeededNoise};
pub use step::{advance, StepOptions};
