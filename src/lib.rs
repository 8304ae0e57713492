//! Simulated potted-plant environment.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Environment state, domain limits, mood classification |
//! | [`simulation`] | Environment model, day-cycle step, injectable noise |
//! | [`controller`] | Serialized access, snapshot publication, tick loop, console |
//! | [`config`] | Layered configuration (defaults, TOML, `POTCHI__` env) |
//! | [`telemetry`] | Tracing setup and shutdown signal |

pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod simulation;
pub mod telemetry;

pub use error::{PlantError, PlantResult};
