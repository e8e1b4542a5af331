//! `seatsim.yaml`: which election year is active, where its data lives and
//! the default model parameters.

use crate::apportion::Method;
use crate::projection::ProjectionParams;
use crate::simulation::SimulationParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "seatsim.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("No election year given and none configured")]
    NoYear,
    #[error("Data file not found: {0}")]
    MissingFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub draws: usize,
    pub alpha_scale: f64,
    /// `null` turns the hierarchical section draw off.
    pub phi: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let defaults = SimulationParams::default();
        Self {
            draws: defaults.draws,
            alpha_scale: defaults.alpha_scale,
            phi: defaults.phi,
            seed: defaults.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub active_year: Option<u16>,
    pub data_dir: PathBuf,
    pub turnout: f64,
    pub valid_share: f64,
    pub method: Method,
    /// Alliances simulated and listed by default, in display order.
    pub visible_alliances: Vec<String>,
    pub simulation: SimulationConfig,
}

impl Default for Config {
    fn default() -> Self {
        let projection = ProjectionParams::default();
        Self {
            active_year: None,
            data_dir: PathBuf::from("data"),
            turnout: projection.turnout,
            valid_share: projection.valid_share,
            method: projection.method,
            visible_alliances: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }
}

/// The pair of input files for one election year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    pub year: u16,
    pub structure: PathBuf,
    pub composition: PathBuf,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        // a relative data_dir is relative to the config file
        if config.data_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.data_dir = parent.join(&config.data_dir);
            }
        }
        Ok(config)
    }

    /// Read `path` if given, else `seatsim.yaml` when present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    tracing::debug!("no {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn resolve_data_files(&self, year: Option<u16>) -> Result<DataFiles> {
        let year = year.or(self.active_year).ok_or(ConfigError::NoYear)?;
        let structure = self.data_dir.join(format!("structure_{}.json", year));
        let composition = self.data_dir.join(format!("composition_{}.csv", year));
        for file in [&structure, &composition] {
            if !file.exists() {
                return Err(ConfigError::MissingFile(file.clone()));
            }
        }
        Ok(DataFiles {
            year,
            structure,
            composition,
        })
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            turnout: self.turnout,
            valid_share: self.valid_share,
            method: self.method,
        }
    }

    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            draws: self.simulation.draws,
            alpha_scale: self.simulation.alpha_scale,
            phi: self.simulation.phi,
            seed: self.simulation.seed,
            projection: self.projection_params(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = serde_yaml::from_str("active_year: 2025\nmethod: dhondt\n").unwrap();
        assert_eq!(config.active_year, Some(2025));
        assert_eq!(config.method, Method::DHondt);
        assert_eq!(config.turnout, 0.60);
        assert_eq!(config.simulation.draws, 1000);
        assert_eq!(config.simulation.phi, Some(50.0));
    }

    #[test]
    fn method_accepts_the_cli_spellings() {
        for (text, method) in [
            ("cuociente", Method::Hare),
            ("largest-remainder", Method::Hare),
            ("d'hondt", Method::DHondt),
            ("d-hondt", Method::DHondt),
        ] {
            let config: Config = serde_yaml::from_str(&format!("method: \"{}\"\n", text)).unwrap();
            assert_eq!(config.method, method);
            assert_eq!(text.parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn null_phi_disables_hierarchy() {
        let config: Config = serde_yaml::from_str("simulation:\n  phi: null\n  seed: 3\n").unwrap();
        assert_eq!(config.simulation.phi, None);
        assert_eq!(config.simulation_params().seed, Some(3));
    }

    #[test]
    fn data_files_resolve_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir(&data).unwrap();
        File::create(data.join("structure_2025.json")).unwrap();
        File::create(data.join("composition_2025.csv")).unwrap();

        let config_path = dir.path().join("seatsim.yaml");
        let mut f = File::create(&config_path).unwrap();
        writeln!(f, "active_year: 2025\ndata_dir: data").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        let files = config.resolve_data_files(None).unwrap();
        assert_eq!(files.year, 2025);
        assert_eq!(files.structure, data.join("structure_2025.json"));

        assert!(matches!(
            config.resolve_data_files(Some(2027)),
            Err(ConfigError::MissingFile(_))
        ));
    }

    #[test]
    fn year_is_required() {
        assert!(matches!(
            Config::default().resolve_data_files(None),
            Err(ConfigError::NoYear)
        ));
    }
}
