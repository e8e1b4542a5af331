//! Deterministic projection: fixed vote intentions turned into seats.

use crate::apportion::{self, ApportionError, Method};
use crate::beliefs::{normalize_for_section, BeliefError, BeliefSet, Beliefs};
use crate::congress::Congress;
use crate::model::{Chamber, SeatRow, SeatTable, SeatTotals, VoteRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error("{name} must be in (0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("Section {0} has no electorate")]
    MissingElectorate(String),
    #[error(transparent)]
    Beliefs(#[from] BeliefError),
    #[error(transparent)]
    Apportion(#[from] ApportionError),
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    /// Share of the electorate that votes.
    pub turnout: f64,
    /// Share of cast ballots that are valid votes for a list.
    pub valid_share: f64,
    pub method: Method,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            turnout: 0.60,
            valid_share: 0.90,
            method: Method::Hare,
        }
    }
}

impl ProjectionParams {
    pub fn validate(&self) -> Result<()> {
        check_rate("turnout", self.turnout)?;
        check_rate("valid share", self.valid_share)
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ProjectionError::InvalidRate { name, value })
    }
}

pub fn valid_votes(electorate: u64, turnout: f64, valid_share: f64) -> u64 {
    (electorate as f64 * turnout * valid_share).floor() as u64
}

/// Vote rows for every section of one chamber. `beliefs_for` returns the
/// normalized intentions (percent) for a section.
pub fn vote_rows<F>(
    seats_by_section: &BTreeMap<String, u32>,
    electorate: &BTreeMap<String, u64>,
    beliefs_for: F,
    turnout: f64,
    valid_share: f64,
) -> Result<Vec<VoteRow>>
where
    F: Fn(&str) -> Beliefs,
{
    let mut rows = Vec::new();
    for (section, &seats) in seats_by_section {
        let voters = *electorate
            .get(section)
            .ok_or_else(|| ProjectionError::MissingElectorate(section.clone()))?;
        let valid = valid_votes(voters, turnout, valid_share);
        for (alliance, pct) in beliefs_for(section) {
            let votes = (valid as f64 * pct / 100.0).floor() as u64;
            rows.push(VoteRow {
                section: section.clone(),
                list: alliance,
                votes,
                seats,
            });
        }
    }
    Ok(rows)
}

/// Seats won in one chamber, with the seats that were not up for election
/// folded back in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChamberOutcome {
    pub chamber: Chamber,
    /// Newly elected seats per section.
    pub elected: SeatTable,
    pub elected_totals: SeatTotals,
    pub non_renewing_totals: SeatTotals,
    /// Elected plus non-renewing.
    pub totals: SeatTotals,
    /// Totals minus the sitting chamber, per alliance.
    pub change: SeatTotals,
    /// Per-section swing versus the sitting chamber.
    pub section_changes: SeatTable,
}

impl ChamberOutcome {
    pub fn new(chamber: Chamber, rows: &[SeatRow], congress: &Congress) -> Self {
        let elected = SeatTable::from_rows(rows);
        let elected_totals = elected.totals();
        let non_renewing = congress.non_renewing(chamber);
        let current = congress.current_composition(chamber);

        let totals = with_non_renewing(&elected_totals, non_renewing);
        let change = difference(&totals, &current.totals());
        let section_changes = section_changes(&elected, non_renewing, current);

        Self {
            chamber,
            elected,
            elected_totals,
            non_renewing_totals: non_renewing.totals(),
            totals,
            change,
            section_changes,
        }
    }
}

/// Add the seats not up for election, summed over every section.
pub fn with_non_renewing(new: &SeatTotals, non_renewing: &SeatTable) -> SeatTotals {
    let mut totals = new.clone();
    for (alliance, seats) in non_renewing.totals() {
        *totals.entry(alliance).or_insert(0) += seats;
    }
    totals
}

/// `(new + non_renewing) - current` for the sections that elected seats.
pub fn section_changes(new: &SeatTable, non_renewing: &SeatTable, current: &SeatTable) -> SeatTable {
    let sections: Vec<String> = new.sections().cloned().collect();
    let after = new.plus(&non_renewing.restricted_to(&sections));
    let mut swing = after.minus(&current.restricted_to(&sections));
    // keep every alliance visible in every section
    let lists = swing.lists();
    for section in &sections {
        for list in &lists {
            swing.add(section, list, 0);
        }
    }
    swing
}

fn difference(a: &SeatTotals, b: &SeatTotals) -> SeatTotals {
    let mut out = a.clone();
    for (alliance, seats) in b {
        *out.entry(alliance.clone()).or_insert(0) -= seats;
    }
    out
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub params: ProjectionParams,
    pub deputies: ChamberOutcome,
    pub senators: ChamberOutcome,
}

impl Projection {
    pub fn chamber(&self, chamber: Chamber) -> &ChamberOutcome {
        match chamber {
            Chamber::Deputies => &self.deputies,
            Chamber::Senators => &self.senators,
        }
    }
}

/// Apportion one chamber with fixed intentions.
pub fn project_chamber(
    congress: &Congress,
    chamber: Chamber,
    beliefs: &BeliefSet,
    params: &ProjectionParams,
) -> Result<Vec<SeatRow>> {
    let competing = congress.sections_by_alliance();
    let rows = vote_rows(
        congress.seats_up(chamber),
        congress.electorate(),
        |section| normalize_for_section(beliefs.for_section(section), section, &competing),
        params.turnout,
        params.valid_share,
    )?;
    Ok(apportion::apportion(&rows, params.method)?)
}

pub fn project(congress: &Congress, beliefs: &BeliefSet, params: ProjectionParams) -> Result<Projection> {
    params.validate()?;
    beliefs.validate()?;

    let deputies = project_chamber(congress, Chamber::Deputies, beliefs, &params)?;
    let senators = project_chamber(congress, Chamber::Senators, beliefs, &params)?;

    Ok(Projection {
        params,
        deputies: ChamberOutcome::new(Chamber::Deputies, &deputies, congress),
        senators: ChamberOutcome::new(Chamber::Senators, &senators, congress),
    })
}
