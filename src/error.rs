use thiserror::Error;

pub type PlantResult<T> = Result<T, PlantError>;

/// Errors surfaced around the environment model.
///
/// Model operations themselves never fail; these come from the boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlantError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("No subscribers left to receive snapshots")]
    NoSubscribers,

    #[error("Invalid configuration: {0}")]
    Config(String),
}
