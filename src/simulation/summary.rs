use super::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Seats per draw (rows) and alliance (columns).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatMatrix {
    pub lists: Vec<String>,
    pub rows: Vec<Vec<i64>>,
}

impl SeatMatrix {
    pub fn new(lists: Vec<String>) -> Self {
        Self {
            lists,
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, j: usize) -> Vec<i64> {
        self.rows.iter().map(|row| row[j]).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub list: String,
    pub mean: f64,
    pub p5: f64,
    pub p95: f64,
    /// Seats in the medoid draw.
    pub seats: i64,
}

/// Index of the draw with the smallest summed city-block distance to all
/// other draws. Earliest draw wins ties.
pub fn medoid(matrix: &SeatMatrix) -> Result<usize> {
    if matrix.is_empty() {
        return Err(SimulationError::NoDraws);
    }
    let mut best = (0, i64::MAX);
    for (i, a) in matrix.rows.iter().enumerate() {
        let total: i64 = matrix
            .rows
            .iter()
            .map(|b| a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<i64>())
            .sum();
        if total < best.1 {
            best = (i, total);
        }
    }
    Ok(best.0)
}

/// Quantile with linear interpolation between the closest ranks.
pub fn quantile(values: &[i64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let h = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    sorted[lo] as f64 + (sorted[hi] - sorted[lo]) as f64 * frac
}

pub fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

/// Mean, 5th/95th percentiles and the medoid seats per alliance.
pub fn summarize(matrix: &SeatMatrix) -> Result<Vec<SummaryRow>> {
    let center = medoid(matrix)?;
    Ok(matrix
        .lists
        .iter()
        .enumerate()
        .map(|(j, list)| {
            let column = matrix.column(j);
            SummaryRow {
                list: list.clone(),
                mean: mean(&column),
                p5: quantile(&column, 0.05),
                p95: quantile(&column, 0.95),
                seats: matrix.rows[center][j],
            }
        })
        .collect())
}
