//! Monte Carlo wrapper around the apportionment: vote shares are drawn from
//! a Dirichlet distribution centred on the stated intentions, and the seat
//! outcomes of many draws are summarized.

pub mod dirichlet;
pub mod summary;

use crate::apportion::{self, ApportionError};
use crate::beliefs::{validate_global, BeliefError, Beliefs};
use crate::congress::Congress;
use crate::model::{Chamber, SeatRow, SeatTable, VoteRow};
use crate::projection::{valid_votes, ChamberOutcome, ProjectionError, ProjectionParams};
use dirichlet::{DirichletSampler, MIN_ALPHA};
use instant::Instant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use summary::{SeatMatrix, SummaryRow};

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("At least one draw is required")]
    NoDraws,
    #[error("No alliances selected for the simulation")]
    NoAlliances,
    #[error("{name} must be positive, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Invalid Dirichlet weights: {0}")]
    Distribution(String),
    #[error(transparent)]
    Beliefs(#[from] BeliefError),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Apportion(#[from] ApportionError),
}

pub type Result<T> = std::result::Result<T, SimulationError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub draws: usize,
    /// Total Dirichlet concentration; larger means less spread.
    pub alpha_scale: f64,
    /// Concentration of each section around the province-wide draw. `None`
    /// draws every section straight from the global weights.
    pub phi: Option<f64>,
    pub seed: Option<u64>,
    pub projection: ProjectionParams,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            draws: 1000,
            alpha_scale: 25.0,
            phi: Some(50.0),
            seed: None,
            projection: ProjectionParams::default(),
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> Result<()> {
        if self.draws == 0 {
            return Err(SimulationError::NoDraws);
        }
        positive("alpha scale", self.alpha_scale)?;
        if let Some(phi) = self.phi {
            positive("phi", phi)?;
        }
        self.projection.validate()?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidParameter { name, value })
    }
}

/// Dirichlet weights in `visible` order: `max(1e-3, pct * alpha_scale / 100)`.
pub fn dirichlet_weights(global: &Beliefs, visible: &[String], alpha_scale: f64) -> Vec<f64> {
    visible
        .iter()
        .map(|alliance| {
            let pct = global.get(alliance).copied().unwrap_or(0.0);
            (pct * alpha_scale / 100.0).max(MIN_ALPHA)
        })
        .collect()
}

/// Seat rows of one simulated election.
#[derive(Debug, Clone)]
pub struct Draw {
    pub deputies: Vec<SeatRow>,
    pub senators: Vec<SeatRow>,
}

impl Draw {
    pub fn chamber(&self, chamber: Chamber) -> &[SeatRow] {
        match chamber {
            Chamber::Deputies => &self.deputies,
            Chamber::Senators => &self.senators,
        }
    }
}

/// Everything a single draw needs besides the random generator.
pub struct Setup<'a> {
    pub congress: &'a Congress,
    pub visible: &'a [String],
    pub weights: Vec<f64>,
    pub competing: BTreeMap<String, BTreeSet<String>>,
    pub params: SimulationParams,
}

impl<'a> Setup<'a> {
    pub fn new(
        congress: &'a Congress,
        global: &Beliefs,
        visible: &'a [String],
        params: SimulationParams,
    ) -> Result<Self> {
        params.validate()?;
        validate_global(global)?;
        if visible.is_empty() {
            return Err(SimulationError::NoAlliances);
        }
        Ok(Self {
            congress,
            visible,
            weights: dirichlet_weights(global, visible, params.alpha_scale),
            competing: congress.sections_by_alliance(),
            params,
        })
    }

    /// Indices into `visible` of the alliances running in `section`.
    fn running_in(&self, section: &str) -> Vec<usize> {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, alliance)| {
                self.competing
                    .get(alliance.as_str())
                    .map_or(false, |sections| sections.contains(section))
            })
            .map(|(i, _)| i)
            .collect()
    }
}

fn sampler(alphas: &[f64]) -> Result<DirichletSampler> {
    DirichletSampler::new(alphas).map_err(|e| SimulationError::Distribution(e.to_string()))
}

/// Simulate one election. With `phi`, a province-wide share vector is drawn
/// first and shared by both chambers; each section then scatters around it.
pub fn simulate_election<R: Rng + ?Sized>(rng: &mut R, setup: &Setup) -> Result<Draw> {
    let province = match setup.params.phi {
        Some(phi) => {
            let shares = sampler(&setup.weights)?.sample(rng);
            Some(shares.into_iter().map(|p| p * phi).collect::<Vec<f64>>())
        }
        None => None,
    };
    let alphas = province.as_deref().unwrap_or(&setup.weights);

    let deputies = simulate_chamber(rng, setup, Chamber::Deputies, alphas)?;
    let senators = simulate_chamber(rng, setup, Chamber::Senators, alphas)?;
    Ok(Draw { deputies, senators })
}

fn simulate_chamber<R: Rng + ?Sized>(
    rng: &mut R,
    setup: &Setup,
    chamber: Chamber,
    alphas: &[f64],
) -> Result<Vec<SeatRow>> {
    let projection = &setup.params.projection;
    let mut rows = Vec::new();
    for (section, &seats) in setup.congress.seats_up(chamber) {
        let running = setup.running_in(section);
        if running.is_empty() {
            tracing::warn!(section = section.as_str(), %chamber, "no selected alliance runs here");
            continue;
        }
        let voters = *setup
            .congress
            .electorate()
            .get(section)
            .ok_or_else(|| ProjectionError::MissingElectorate(section.clone()))?;
        let valid = valid_votes(voters, projection.turnout, projection.valid_share);

        let section_alphas: Vec<f64> = running.iter().map(|&i| alphas[i]).collect();
        let shares = sampler(&section_alphas)?.sample(rng);
        for (&i, share) in running.iter().zip(shares) {
            rows.push(VoteRow {
                section: section.clone(),
                list: setup.visible[i].clone(),
                votes: (share * valid as f64).floor() as u64,
                seats,
            });
        }
    }
    Ok(apportion::apportion(&rows, projection.method)?)
}

/// Aggregated results for one chamber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChamberSimulation {
    pub chamber: Chamber,
    pub matrix: SeatMatrix,
    pub summary: Vec<SummaryRow>,
    pub medoid_draw: usize,
    /// Seats of the medoid draw, with non-renewing seats folded in.
    pub outcome: ChamberOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    pub params: SimulationParams,
    pub visible: Vec<String>,
    pub weights: Vec<f64>,
    pub deputies: ChamberSimulation,
    pub senators: ChamberSimulation,
    pub elapsed_ms: u64,
}

impl SimulationRun {
    pub fn chamber(&self, chamber: Chamber) -> &ChamberSimulation {
        match chamber {
            Chamber::Deputies => &self.deputies,
            Chamber::Senators => &self.senators,
        }
    }

    pub fn draws_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.params.draws as f64 * 1000.0 / self.elapsed_ms as f64
    }
}

pub fn run(
    congress: &Congress,
    global: &Beliefs,
    visible: &[String],
    params: SimulationParams,
) -> Result<SimulationRun> {
    run_with_progress(congress, global, visible, params, |_, _| {})
}

/// Run every draw, calling `progress(done, total)` every tenth of the way.
pub fn run_with_progress<F>(
    congress: &Congress,
    global: &Beliefs,
    visible: &[String],
    params: SimulationParams,
    mut progress: F,
) -> Result<SimulationRun>
where
    F: FnMut(usize, usize),
{
    let setup = Setup::new(congress, global, visible, params)?;
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let step = (params.draws / 10).max(1);
    let mut draws = Vec::with_capacity(params.draws);
    for i in 0..params.draws {
        draws.push(simulate_election(&mut rng, &setup)?);
        if (i + 1) % step == 0 || i + 1 == params.draws {
            progress(i + 1, params.draws);
        }
    }
    let elapsed_ms = start.elapsed().as_millis() as u64;
    tracing::debug!(draws = params.draws, elapsed_ms, "simulation finished");

    Ok(SimulationRun {
        params,
        visible: visible.to_vec(),
        weights: setup.weights.clone(),
        deputies: aggregate(Chamber::Deputies, &draws, visible, congress)?,
        senators: aggregate(Chamber::Senators, &draws, visible, congress)?,
        elapsed_ms,
    })
}

/// Build the draw × alliance matrix for one chamber and summarize it.
fn aggregate(
    chamber: Chamber,
    draws: &[Draw],
    visible: &[String],
    congress: &Congress,
) -> Result<ChamberSimulation> {
    let mut matrix = SeatMatrix::new(visible.to_vec());
    for draw in draws {
        let totals = SeatTable::from_rows(draw.chamber(chamber)).totals();
        matrix.rows.push(
            visible
                .iter()
                .map(|alliance| totals.get(alliance).copied().unwrap_or(0))
                .collect(),
        );
    }

    let medoid_draw = summary::medoid(&matrix)?;
    let summary = summary::summarize(&matrix)?;
    let outcome = ChamberOutcome::new(chamber, draws[medoid_draw].chamber(chamber), congress);

    Ok(ChamberSimulation {
        chamber,
        matrix,
        summary,
        medoid_draw,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::congress::tests::sample;

    fn beliefs(pairs: &[(&str, f64)]) -> Beliefs {
        pairs.iter().map(|&(a, p)| (a.to_string(), p)).collect()
    }

    fn visible() -> Vec<String> {
        vec![
            "Blue Front".to_string(),
            "Red Alliance".to_string(),
            "Green List".to_string(),
        ]
    }

    fn global() -> Beliefs {
        beliefs(&[("Blue Front", 50.0), ("Red Alliance", 40.0), ("Green List", 10.0)])
    }

    fn params(draws: usize, phi: Option<f64>) -> SimulationParams {
        SimulationParams {
            draws,
            phi,
            seed: Some(2025),
            ..SimulationParams::default()
        }
    }

    #[test]
    fn weights_scale_and_floor() {
        let mut g = global();
        g.insert("Green List".to_string(), 0.0);
        let w = dirichlet_weights(&g, &visible(), 20.0);
        assert!((w[0] - 10.0).abs() < 1e-12);
        assert!((w[1] - 8.0).abs() < 1e-12);
        assert_eq!(w[2], MIN_ALPHA);
    }

    #[test]
    fn every_draw_fills_every_seat() {
        let congress = sample();
        let vis = visible();
        for phi in [None, Some(50.0)] {
            let run = run(&congress, &global(), &vis, params(200, phi)).unwrap();
            assert_eq!(run.deputies.matrix.rows.len(), 200);
            for row in &run.deputies.matrix.rows {
                assert_eq!(row.iter().sum::<i64>(), 9);
            }
            for row in &run.senators.matrix.rows {
                assert_eq!(row.iter().sum::<i64>(), 2);
            }
        }
    }

    #[test]
    fn alliances_only_win_where_they_run() {
        let congress = sample();
        let vis = visible();
        let setup = Setup::new(&congress, &global(), &vis, params(1, None)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let draw = simulate_election(&mut rng, &setup).unwrap();
            assert!(draw
                .deputies
                .iter()
                .all(|row| !(row.section == "South" && row.list == "Green List")));
        }
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let congress = sample();
        let vis = visible();
        let a = run(&congress, &global(), &vis, params(50, Some(30.0))).unwrap();
        let b = run(&congress, &global(), &vis, params(50, Some(30.0))).unwrap();
        assert_eq!(a.deputies.matrix, b.deputies.matrix);
        assert_eq!(a.senators.medoid_draw, b.senators.medoid_draw);
    }

    #[test]
    fn summary_stays_within_the_draws() {
        let congress = sample();
        let vis = visible();
        let run = run(&congress, &global(), &vis, params(300, Some(50.0))).unwrap();
        for (j, row) in run.deputies.summary.iter().enumerate() {
            let column = run.deputies.matrix.column(j);
            let min = *column.iter().min().unwrap() as f64;
            let max = *column.iter().max().unwrap() as f64;
            assert!(row.p5 <= row.p95, "{:?}", row);
            assert!(min <= row.mean && row.mean <= max, "{:?}", row);
            assert!(min <= row.p5 && row.p95 <= max, "{:?}", row);
        }
        let medoid = &run.deputies.matrix.rows[run.deputies.medoid_draw];
        let elected: Vec<i64> = vis
            .iter()
            .map(|a| run.deputies.outcome.elected_totals.get(a).copied().unwrap_or(0))
            .collect();
        assert_eq!(&elected, medoid);
    }

    #[test]
    fn progress_reaches_the_end() {
        let congress = sample();
        let vis = visible();
        let mut seen = Vec::new();
        run_with_progress(&congress, &global(), &vis, params(25, None), |done, total| {
            seen.push((done, total))
        })
        .unwrap();
        assert_eq!(seen.last(), Some(&(25, 25)));
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let congress = sample();
        let vis = visible();
        assert!(matches!(
            run(&congress, &global(), &vis, params(0, None)),
            Err(SimulationError::NoDraws)
        ));
        assert!(matches!(
            run(&congress, &global(), &vis, params(10, Some(-1.0))),
            Err(SimulationError::InvalidParameter { name: "phi", .. })
        ));
        assert!(matches!(
            run(&congress, &global(), &[], params(10, None)),
            Err(SimulationError::NoAlliances)
        ));
        assert!(matches!(
            run(&congress, &beliefs(&[("Blue Front", 20.0)]), &vis, params(10, None)),
            Err(SimulationError::Beliefs(_))
        ));
    }
}
