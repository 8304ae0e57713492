pub mod mood;
pub mod state;

pub use mood::{classify, Mood};
pub use state::{EnvironmentState, Gauges};
