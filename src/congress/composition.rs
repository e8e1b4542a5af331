use super::{CongressError, Result};
use crate::model::{Chamber, SeatTable};
use serde::Deserialize;
use std::path::Path;

/// One sitting member, as listed in `composition_<year>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRow {
    pub chamber: Chamber,
    pub section: String,
    pub party: String,
    /// Whether the seat is contested this year.
    pub renews: bool,
}

#[derive(Debug, Deserialize)]
struct RawRow {
    chamber: String,
    section: String,
    party: String,
    renews: String,
}

pub fn read_rows(path: &Path) -> Result<Vec<CompositionRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CongressError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    parse(&mut reader, path)
}

pub fn read_rows_from_str(text: &str) -> Result<Vec<CompositionRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    parse(&mut reader, Path::new("<memory>"))
}

fn parse<R: std::io::Read>(reader: &mut csv::Reader<R>, path: &Path) -> Result<Vec<CompositionRow>> {
    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<RawRow>().enumerate() {
        // header is line 1
        let line = i + 2;
        let raw = record.map_err(|source| CongressError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let chamber: Chamber = raw.chamber.parse().map_err(|e: crate::model::UnknownChamber| {
            CongressError::BadRow {
                line,
                message: e.to_string(),
            }
        })?;
        let renews = match raw.renews.to_lowercase().as_str() {
            "yes" | "si" | "sí" | "true" => true,
            "no" | "false" => false,
            other => {
                return Err(CongressError::BadRow {
                    line,
                    message: format!("renews must be yes or no, got {:?}", other),
                })
            }
        };
        rows.push(CompositionRow {
            chamber,
            section: raw.section,
            party: raw.party,
            renews,
        });
    }
    Ok(rows)
}

/// Seat tables for both chambers.
#[derive(Debug, Clone, Default)]
pub struct Composition {
    deputies: SeatTable,
    senators: SeatTable,
}

impl Composition {
    pub fn add(&mut self, chamber: Chamber, section: &str, alliance: &str) {
        let table = match chamber {
            Chamber::Deputies => &mut self.deputies,
            Chamber::Senators => &mut self.senators,
        };
        table.add(section.trim(), alliance, 1);
    }

    pub fn chamber(&self, chamber: Chamber) -> &SeatTable {
        match chamber {
            Chamber::Deputies => &self.deputies,
            Chamber::Senators => &self.senators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_with_loose_formatting() {
        let text = "chamber,section,party,renews\n\
                    Diputados, North ,Blue Party,YES\n\
                    senators,East,Green,no\n";
        let rows = read_rows_from_str(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].chamber, Chamber::Deputies);
        assert_eq!(rows[0].section, "North");
        assert!(rows[0].renews);
        assert_eq!(rows[1].chamber, Chamber::Senators);
        assert!(!rows[1].renews);
    }

    #[test]
    fn rejects_unknown_chamber() {
        let text = "chamber,section,party,renews\ncouncil,North,Blue,yes\n";
        match read_rows_from_str(text) {
            Err(CongressError::BadRow { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_renews_flag() {
        let text = "chamber,section,party,renews\ndeputies,North,Blue,maybe\n";
        assert!(matches!(
            read_rows_from_str(text),
            Err(CongressError::BadRow { .. })
        ));
    }
}
