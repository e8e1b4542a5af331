//! Vote-intention inputs: percentages per alliance, globally or per section.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

const TOLERANCE: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum BeliefError {
    #[error("Vote intentions add up to {0:.2}% (must be 100%)")]
    NotHundred(f64),
    #[error("Invalid share for {alliance}: {value}")]
    InvalidShare { alliance: String, value: f64 },
    #[error("Cannot parse share {0:?} (expected NAME=PERCENT)")]
    Unparseable(String),
    #[error("Failed to read beliefs file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse beliefs file {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, BeliefError>;

/// Alliance -> vote intention in percent.
pub type Beliefs = BTreeMap<String, f64>;

/// Global vote intentions with optional per-section overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeliefSet {
    pub global: Beliefs,
    #[serde(default, rename = "sections")]
    pub by_section: BTreeMap<String, Beliefs>,
}

impl BeliefSet {
    pub fn global(global: Beliefs) -> Self {
        Self {
            global,
            by_section: BTreeMap::new(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BeliefError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| BeliefError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The override for `section`, or the global intentions.
    pub fn for_section(&self, section: &str) -> &Beliefs {
        self.by_section.get(section).unwrap_or(&self.global)
    }

    /// Global intentions must total 100%. Section overrides are only
    /// warned about since they get normalized anyway.
    pub fn validate(&self) -> Result<()> {
        validate_global(&self.global)?;
        for (section, beliefs) in &self.by_section {
            check_shares(beliefs)?;
            let total: f64 = beliefs.values().sum();
            if (total - 100.0).abs() > TOLERANCE {
                tracing::warn!(section = section.as_str(), total, "section intentions do not add up to 100%");
            }
        }
        Ok(())
    }
}

pub fn validate_global(beliefs: &Beliefs) -> Result<()> {
    check_shares(beliefs)?;
    let total: f64 = beliefs.values().sum();
    if (total - 100.0).abs() > TOLERANCE {
        return Err(BeliefError::NotHundred(total));
    }
    Ok(())
}

fn check_shares(beliefs: &Beliefs) -> Result<()> {
    for (alliance, &value) in beliefs {
        if !value.is_finite() || value < 0.0 {
            return Err(BeliefError::InvalidShare {
                alliance: alliance.clone(),
                value,
            });
        }
    }
    Ok(())
}

/// Keep the alliances that run in `section` and rescale them to 100%.
/// Returns an empty map when none of them run or all are at zero.
pub fn normalize_for_section(
    beliefs: &Beliefs,
    section: &str,
    competing: &BTreeMap<String, BTreeSet<String>>,
) -> Beliefs {
    let running: Beliefs = beliefs
        .iter()
        .filter(|(alliance, _)| {
            competing
                .get(alliance.as_str())
                .map_or(false, |sections| sections.contains(section))
        })
        .map(|(alliance, &pct)| (alliance.clone(), pct))
        .collect();

    let total: f64 = running.values().sum();
    if total <= 0.0 {
        return Beliefs::new();
    }
    running
        .into_iter()
        .map(|(alliance, pct)| (alliance, 100.0 * pct / total))
        .collect()
}

/// Parse `NAME=PERCENT` pairs as given on the command line.
pub fn parse_shares<S: AsRef<str>>(pairs: &[S]) -> Result<Beliefs> {
    let mut beliefs = Beliefs::new();
    for pair in pairs {
        let pair = pair.as_ref();
        let (name, pct) = pair
            .rsplit_once('=')
            .ok_or_else(|| BeliefError::Unparseable(pair.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(BeliefError::Unparseable(pair.to_string()));
        }
        let pct: f64 = pct
            .trim()
            .trim_end_matches('%')
            .parse()
            .map_err(|_| BeliefError::Unparseable(pair.to_string()))?;
        beliefs.insert(name.to_string(), pct);
    }
    Ok(beliefs)
}
