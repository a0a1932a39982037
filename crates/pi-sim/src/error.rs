use pi_core::IntakeError;
use pi_queue::PopulationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("population error: {0}")]
    Population(#[from] PopulationError),
}

pub type SimResult<T> = Result<T, SimError>;
