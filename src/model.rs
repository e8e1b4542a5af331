use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One of the two houses of the provincial legislature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chamber {
    Deputies,
    Senators,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::Deputies, Chamber::Senators];

    pub fn label(&self) -> &'static str {
        match self {
            Chamber::Deputies => "Deputies",
            Chamber::Senators => "Senators",
        }
    }
}

impl fmt::Display for Chamber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chamber::Deputies => write!(f, "deputies"),
            Chamber::Senators => write!(f, "senators"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown chamber: {0}")]
pub struct UnknownChamber(pub String);

impl FromStr for Chamber {
    type Err = UnknownChamber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deputies" | "diputados" => Ok(Chamber::Deputies),
            "senators" | "senadores" => Ok(Chamber::Senators),
            other => Err(UnknownChamber(other.to_string())),
        }
    }
}

/// Votes cast for one list in one section, together with the number of
/// seats that section elects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRow {
    pub section: String,
    pub list: String,
    pub votes: u64,
    pub seats: u32,
}

impl VoteRow {
    pub fn new(section: &str, list: &str, votes: u64, seats: u32) -> Self {
        Self {
            section: section.to_string(),
            list: list.to_string(),
            votes,
            seats,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRow {
    pub section: String,
    pub list: String,
    pub seats: u32,
}

/// Chamber-wide seats keyed by alliance. Signed so that swings can be
/// expressed with the same type.
pub type SeatTotals = BTreeMap<String, i64>;

/// Section -> alliance -> seats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatTable(pub BTreeMap<String, BTreeMap<String, i64>>);

impl SeatTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: &[SeatRow]) -> Self {
        let mut table = SeatTable::new();
        for row in rows {
            table.add(&row.section, &row.list, row.seats as i64);
        }
        table
    }

    pub fn add(&mut self, section: &str, list: &str, seats: i64) {
        *self
            .0
            .entry(section.to_string())
            .or_default()
            .entry(list.to_string())
            .or_insert(0) += seats;
    }

    pub fn get(&self, section: &str, list: &str) -> i64 {
        self.0
            .get(section)
            .and_then(|lists| lists.get(list))
            .copied()
            .unwrap_or(0)
    }

    pub fn sections(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Every list that appears in any section, sorted.
    pub fn lists(&self) -> Vec<String> {
        let mut lists: Vec<String> = self
            .0
            .values()
            .flat_map(|lists| lists.keys().cloned())
            .collect();
        lists.sort();
        lists.dedup();
        lists
    }

    pub fn totals(&self) -> SeatTotals {
        let mut totals = SeatTotals::new();
        for lists in self.0.values() {
            for (list, seats) in lists {
                *totals.entry(list.clone()).or_insert(0) += seats;
            }
        }
        totals
    }

    /// Element-wise sum; sections or lists missing on one side count as 0.
    pub fn plus(&self, other: &SeatTable) -> SeatTable {
        let mut out = self.clone();
        for (section, lists) in &other.0 {
            for (list, seats) in lists {
                out.add(section, list, *seats);
            }
        }
        out
    }

    pub fn minus(&self, other: &SeatTable) -> SeatTable {
        let mut out = self.clone();
        for (section, lists) in &other.0 {
            for (list, seats) in lists {
                out.add(section, list, -seats);
            }
        }
        out
    }

    /// Restrict to the given sections, keeping their order-independent content.
    pub fn restricted_to<'a, I>(&self, sections: I) -> SeatTable
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut out = SeatTable::new();
        for section in sections {
            if let Some(lists) = self.0.get(section) {
                out.0.insert(section.clone(), lists.clone());
            }
        }
        out
    }

    /// The list holding the most seats in `section`. Ties go to the
    /// alphabetically first list; a section with no seats has no winner.
    pub fn winner(&self, section: &str) -> Option<(&str, i64)> {
        let lists = self.0.get(section)?;
        let mut best: Option<(&str, i64)> = None;
        for (list, &seats) in lists {
            match best {
                Some((_, top)) if seats <= top => {}
                _ => best = Some((list.as_str(), seats)),
            }
        }
        best.filter(|(_, seats)| *seats > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<SeatRow> {
        vec![
            SeatRow {
                section: "North".into(),
                list: "Blue".into(),
                seats: 3,
            },
            SeatRow {
                section: "North".into(),
                list: "Red".into(),
                seats: 3,
            },
            SeatRow {
                section: "South".into(),
                list: "Red".into(),
                seats: 2,
            },
        ]
    }

    #[test]
    fn chamber_parses_both_languages() {
        assert_eq!("Diputados".parse::<Chamber>().unwrap(), Chamber::Deputies);
        assert_eq!(" senators ".parse::<Chamber>().unwrap(), Chamber::Senators);
        assert!("council".parse::<Chamber>().is_err());
    }

    #[test]
    fn totals_sum_across_sections() {
        let table = SeatTable::from_rows(&rows());
        let totals = table.totals();
        assert_eq!(totals["Blue"], 3);
        assert_eq!(totals["Red"], 5);
    }

    #[test]
    fn winner_breaks_ties_alphabetically() {
        let table = SeatTable::from_rows(&rows());
        assert_eq!(table.winner("North"), Some(("Blue", 3)));
        assert_eq!(table.winner("South"), Some(("Red", 2)));
        assert_eq!(table.winner("East"), None);
    }

    #[test]
    fn winner_requires_a_seat() {
        let mut table = SeatTable::new();
        table.add("West", "Blue", 0);
        assert_eq!(table.winner("West"), None);
    }

    #[test]
    fn minus_reports_swing() {
        let new = SeatTable::from_rows(&rows());
        let mut old = SeatTable::new();
        old.add("North", "Blue", 4);
        old.add("South", "Green", 1);
        let swing = new.minus(&old);
        assert_eq!(swing.get("North", "Blue"), -1);
        assert_eq!(swing.get("South", "Green"), -1);
        assert_eq!(swing.get("South", "Red"), 2);
    }
}
