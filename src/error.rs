use crate::apportion::ApportionError;
use crate::beliefs::BeliefError;
use crate::config::ConfigError;
use crate::congress::CongressError;
use crate::projection::ProjectionError;
use crate::simulation::SimulationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Election data error: {0}")]
    Congress(#[from] CongressError),
    #[error("Vote intention error: {0}")]
    Beliefs(#[from] BeliefError),
    #[error("Apportionment error: {0}")]
    Apportion(#[from] ApportionError),
    #[error("Projection error: {0}")]
    Projection(#[from] ProjectionError),
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
