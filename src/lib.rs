pub mod apportion;
pub mod beliefs;
pub mod commands;
pub mod config;
pub mod congress;
pub mod error;
pub mod logging;
pub mod model;
pub mod projection;
pub mod report;
pub mod simulation;
pub mod util;

pub use error::{Error, Result};
