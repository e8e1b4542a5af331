//! Seat apportionment: converting votes per section into integer seats.

mod dhondt;
mod hare;

use crate::model::{SeatRow, VoteRow};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApportionError {
    #[error("Section {section} has rows electing both {first} and {second} seats")]
    InconsistentSeats {
        section: String,
        first: u32,
        second: u32,
    },
    #[error("Section {0} has no votes to apportion")]
    NoVotes(String),
    #[error("List {list} appears more than once in section {section}")]
    DuplicateList { section: String, list: String },
    #[error("Unknown apportionment method: {0}")]
    UnknownMethod(String),
}

pub type Result<T> = std::result::Result<T, ApportionError>;

/// Proportional representation rule used to turn votes into seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Hare quotient with largest remainders among lists that reached it.
    #[serde(alias = "cuociente", alias = "largest-remainder")]
    Hare,
    /// Highest averages with divisors 1, 2, 3, ...
    #[serde(alias = "d'hondt", alias = "d-hondt")]
    DHondt,
}

impl Default for Method {
    fn default() -> Self {
        Method::Hare
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Hare => write!(f, "hare"),
            Method::DHondt => write!(f, "dhondt"),
        }
    }
}

impl FromStr for Method {
    type Err = ApportionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hare" | "cuociente" | "largest-remainder" => Ok(Method::Hare),
            "dhondt" | "d'hondt" | "d-hondt" => Ok(Method::DHondt),
            other => Err(ApportionError::UnknownMethod(other.to_string())),
        }
    }
}

/// A single list's standing inside one section, in input order.
#[derive(Debug, Clone)]
struct Tally<'a> {
    list: &'a str,
    votes: u64,
    seats: u32,
}

/// Apportion every section in `rows` independently.
///
/// Output rows are sorted by section, then list, and the seats of every
/// section add up to the number that section elects.
pub fn apportion(rows: &[VoteRow], method: Method) -> Result<Vec<SeatRow>> {
    let mut sections: BTreeMap<&str, Vec<&VoteRow>> = BTreeMap::new();
    for row in rows {
        sections.entry(row.section.as_str()).or_default().push(row);
    }

    let mut out = Vec::with_capacity(rows.len());
    for (section, group) in sections {
        let seats = section_seats(section, &group)?;

        let mut seen = HashSet::new();
        for row in &group {
            if !seen.insert(row.list.as_str()) {
                return Err(ApportionError::DuplicateList {
                    section: section.to_string(),
                    list: row.list.clone(),
                });
            }
        }

        let tallies: Vec<Tally> = group
            .iter()
            .map(|row| Tally {
                list: row.list.as_str(),
                votes: row.votes,
                seats: 0,
            })
            .collect();

        let assigned = if seats == 0 {
            tallies
        } else {
            if tallies.iter().all(|t| t.votes == 0) {
                return Err(ApportionError::NoVotes(section.to_string()));
            }
            match method {
                Method::Hare => hare::apportion_section(tallies, seats),
                Method::DHondt => dhondt::apportion_section(tallies, seats),
            }
        };

        debug_assert_eq!(assigned.iter().map(|t| t.seats).sum::<u32>(), seats);
        tracing::debug!(section, seats, %method, "apportioned section");

        out.extend(assigned.into_iter().map(|t| SeatRow {
            section: section.to_string(),
            list: t.list.to_string(),
            seats: t.seats,
        }));
    }

    out.sort_by(|a, b| (&a.section, &a.list).cmp(&(&b.section, &b.list)));
    Ok(out)
}

fn section_seats(section: &str, group: &[&VoteRow]) -> Result<u32> {
    let distinct: Vec<u32> = group.iter().map(|row| row.seats).unique().collect();
    match distinct.as_slice() {
        [seats] => Ok(*seats),
        [first, second, ..] => Err(ApportionError::InconsistentSeats {
            section: section.to_string(),
            first: *first,
            second: *second,
        }),
        [] => Ok(0),
    }
}

/// Index of the list with most votes, first in input order on ties.
fn most_voted(tallies: &[Tally]) -> usize {
    let mut best = 0;
    for (i, tally) in tallies.iter().enumerate() {
        if tally.votes > tallies[best].votes {
            best = i;
        }
    }
    best
}
