//! Election data for one year: electorate, seats up for election, alliances
//! and the sitting composition of both chambers.

pub mod composition;

use crate::model::{Chamber, SeatTable};
use composition::{Composition, CompositionRow};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CongressError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to parse composition {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Composition row {line}: {message}")]
    BadRow { line: usize, message: String },
    #[error("Section {section} elects {chamber} but has no electorate")]
    UnknownSection { chamber: Chamber, section: String },
}

pub type Result<T> = std::result::Result<T, CongressError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    #[serde(default)]
    pub parties: Vec<String>,
    /// `"all"` or a comma separated list of sections. A missing key means
    /// every section; an explicit `null` means the alliance does not run.
    #[serde(default = "all_sections")]
    pub sections: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

fn all_sections() -> Option<String> {
    Some("all".to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatsUp {
    #[serde(default)]
    pub deputies: BTreeMap<String, u32>,
    #[serde(default)]
    pub senators: BTreeMap<String, u32>,
}

impl SeatsUp {
    pub fn chamber(&self, chamber: Chamber) -> &BTreeMap<String, u32> {
        match chamber {
            Chamber::Deputies => &self.deputies,
            Chamber::Senators => &self.senators,
        }
    }
}

/// Contents of `structure_<year>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub alliances: BTreeMap<String, Alliance>,
    pub electorate: BTreeMap<String, u64>,
    pub seats_up: SeatsUp,
}

/// Everything the projection needs about one election.
#[derive(Debug, Clone)]
pub struct Congress {
    pub structure: Structure,
    party_to_alliance: BTreeMap<String, String>,
    current: Composition,
    non_renewing: Composition,
}

impl Congress {
    pub fn load(structure_path: &Path, composition_path: &Path) -> Result<Self> {
        let text = fs::read_to_string(structure_path).map_err(|source| CongressError::Io {
            path: structure_path.to_path_buf(),
            source,
        })?;
        let structure: Structure =
            serde_json::from_str(&text).map_err(|source| CongressError::Json {
                path: structure_path.to_path_buf(),
                source,
            })?;
        let rows = composition::read_rows(composition_path)?;
        Self::new(structure, rows)
    }

    pub fn new(structure: Structure, rows: Vec<CompositionRow>) -> Result<Self> {
        for chamber in Chamber::ALL.iter() {
            for section in structure.seats_up.chamber(*chamber).keys() {
                if !structure.electorate.contains_key(section) {
                    return Err(CongressError::UnknownSection {
                        chamber: *chamber,
                        section: section.clone(),
                    });
                }
            }
        }

        let mut party_to_alliance = BTreeMap::new();
        for (alliance, data) in &structure.alliances {
            for party in &data.parties {
                party_to_alliance.insert(normalize_party(party), alliance.clone());
            }
        }

        let mut current = Composition::default();
        let mut non_renewing = Composition::default();
        for row in &rows {
            let alliance = party_to_alliance
                .get(&normalize_party(&row.party))
                .cloned()
                .unwrap_or_else(|| row.party.trim().to_string());
            current.add(row.chamber, &row.section, &alliance);
            if !row.renews {
                non_renewing.add(row.chamber, &row.section, &alliance);
            }
        }

        tracing::debug!(
            alliances = structure.alliances.len(),
            sections = structure.electorate.len(),
            members = rows.len(),
            "loaded election data"
        );

        Ok(Self {
            structure,
            party_to_alliance,
            current,
            non_renewing,
        })
    }

    pub fn electorate(&self) -> &BTreeMap<String, u64> {
        &self.structure.electorate
    }

    pub fn seats_up(&self, chamber: Chamber) -> &BTreeMap<String, u32> {
        self.structure.seats_up.chamber(chamber)
    }

    pub fn alliance_of(&self, party: &str) -> Option<&str> {
        self.party_to_alliance
            .get(&normalize_party(party))
            .map(String::as_str)
    }

    pub fn colors(&self) -> BTreeMap<String, String> {
        self.structure
            .alliances
            .iter()
            .filter_map(|(name, a)| a.color.clone().map(|c| (name.clone(), c)))
            .collect()
    }

    /// Seats of every sitting member, by section and alliance.
    pub fn current_composition(&self, chamber: Chamber) -> &SeatTable {
        self.current.chamber(chamber)
    }

    /// Seats that are not contested this year.
    pub fn non_renewing(&self, chamber: Chamber) -> &SeatTable {
        self.non_renewing.chamber(chamber)
    }

    /// Sections each alliance runs in. Alliances scoped to `null` are left
    /// out entirely.
    pub fn sections_by_alliance(&self) -> BTreeMap<String, BTreeSet<String>> {
        let every: BTreeSet<String> = self.structure.electorate.keys().cloned().collect();
        let mut out = BTreeMap::new();
        for (alliance, data) in &self.structure.alliances {
            let raw = match &data.sections {
                Some(raw) => raw.trim(),
                None => continue,
            };
            let sections = if raw.eq_ignore_ascii_case("all") || raw.eq_ignore_ascii_case("todas") {
                every.clone()
            } else {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            };
            out.insert(alliance.clone(), sections);
        }
        out
    }

    /// Alliances that run in at least one section.
    pub fn running_alliances(&self) -> Vec<String> {
        self.sections_by_alliance()
            .into_iter()
            .filter(|(_, sections)| !sections.is_empty())
            .map(|(alliance, _)| alliance)
            .collect()
    }
}

fn normalize_party(name: &str) -> String {
    name.trim().to_uppercase()
}
