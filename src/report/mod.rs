//! Results as written to disk: a JSON report carrying the inputs'
//! fingerprints alongside the seats.

pub mod console;

use crate::beliefs::BeliefSet;
use crate::config::DataFiles;
use crate::projection::{ChamberOutcome, Projection};
use crate::simulation::summary::SummaryRow;
use crate::simulation::{ChamberSimulation, SimulationParams, SimulationRun};
use crate::util::{hash_file, write_serialized};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfo {
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
    pub year: u16,
    /// File name -> SHA-1 of its contents.
    pub inputs: BTreeMap<String, String>,
}

impl ReportInfo {
    pub fn new(files: &DataFiles) -> io::Result<Self> {
        let mut inputs = BTreeMap::new();
        for path in [&files.structure, &files.composition] {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            inputs.insert(name, hash_file(path)?);
        }
        Ok(Self {
            generated_at: Utc::now(),
            year: files.year,
            inputs,
        })
    }
}

/// Simulation results without the per-draw matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChamberSummary {
    pub summary: Vec<SummaryRow>,
    #[serde(rename = "medoidDraw")]
    pub medoid_draw: usize,
    pub outcome: ChamberOutcome,
}

impl From<&ChamberSimulation> for ChamberSummary {
    fn from(sim: &ChamberSimulation) -> Self {
        Self {
            summary: sim.summary.clone(),
            medoid_draw: sim.medoid_draw,
            outcome: sim.outcome.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub params: SimulationParams,
    pub alliances: Vec<String>,
    pub weights: Vec<f64>,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    pub deputies: ChamberSummary,
    pub senators: ChamberSummary,
}

impl From<&SimulationRun> for SimulationSummary {
    fn from(run: &SimulationRun) -> Self {
        Self {
            params: run.params,
            alliances: run.visible.clone(),
            weights: run.weights.clone(),
            elapsed_ms: run.elapsed_ms,
            deputies: (&run.deputies).into(),
            senators: (&run.senators).into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ReportBody {
    Projection(Projection),
    Simulation(SimulationSummary),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub info: ReportInfo,
    pub beliefs: BeliefSet,
    #[serde(flatten)]
    pub body: ReportBody,
}

impl Report {
    pub fn projection(info: ReportInfo, beliefs: &BeliefSet, projection: &Projection) -> Self {
        Self {
            info,
            beliefs: beliefs.clone(),
            body: ReportBody::Projection(projection.clone()),
        }
    }

    pub fn simulation(info: ReportInfo, beliefs: &BeliefSet, run: &SimulationRun) -> Self {
        Self {
            info,
            beliefs: beliefs.clone(),
            body: ReportBody::Simulation(run.into()),
        }
    }

    pub fn write(&self, path: &Path) -> io::Result<()> {
        write_serialized(path, self)
    }
}

/// Per-draw seat matrices of both chambers.
pub fn write_draws(path: &Path, run: &SimulationRun) -> io::Result<()> {
    let mut draws = BTreeMap::new();
    draws.insert("deputies", &run.deputies.matrix);
    draws.insert("senators", &run.senators.matrix);
    write_serialized(path, &draws)
}
