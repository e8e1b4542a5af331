use crate::model::{SeatTable, SeatTotals};
use crate::projection::ChamberOutcome;
use crate::simulation::summary::SummaryRow;
use colored::*;
use itertools::Itertools;
use std::collections::BTreeSet;

fn signed(n: i64) -> ColoredString {
    match n {
        n if n > 0 => format!("+{}", n).green(),
        n if n < 0 => n.to_string().red(),
        _ => "0".normal(),
    }
}

fn name_width<'a, I: IntoIterator<Item = &'a String>>(names: I, header: &str) -> usize {
    names
        .into_iter()
        .map(|n| n.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

/// Alliances sorted by total seats, most first; ties alphabetical.
fn by_seats(totals: &SeatTotals) -> Vec<(&String, i64)> {
    totals
        .iter()
        .map(|(a, &s)| (a, s))
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
        .collect()
}

/// Elected, non-renewing, total and change per alliance for one chamber.
pub fn print_outcome(outcome: &ChamberOutcome) {
    println!(
        "\n{}",
        format!("🏛️  {}", outcome.chamber.label()).bright_cyan().bold()
    );

    let alliances: BTreeSet<&String> = outcome
        .totals
        .keys()
        .chain(outcome.change.keys())
        .collect();
    let width = name_width(alliances.iter().copied(), "Alliance");
    println!(
        "{:<width$}  {:>7}  {:>7}  {:>7}  {:>7}",
        "Alliance".bold(),
        "Elected",
        "Holding",
        "Total",
        "Change",
        width = width
    );
    println!("{}", "-".repeat(width + 36).bright_cyan());

    for (alliance, total) in by_seats(&outcome.totals) {
        let elected = outcome.elected_totals.get(alliance).copied().unwrap_or(0);
        let holding = outcome.non_renewing_totals.get(alliance).copied().unwrap_or(0);
        let change = outcome.change.get(alliance).copied().unwrap_or(0);
        println!(
            "{:<width$}  {:>7}  {:>7}  {:>7}  {:>7}",
            alliance,
            elected,
            holding,
            total.to_string().bright_white().bold(),
            signed(change),
            width = width
        );
    }

    // Alliances that lose all their seats only show up in the change column.
    for (alliance, change) in &outcome.change {
        if !outcome.totals.contains_key(alliance) {
            println!(
                "{:<width$}  {:>7}  {:>7}  {:>7}  {:>7}",
                alliance.dimmed(),
                0,
                0,
                0,
                signed(*change),
                width = width
            );
        }
    }

    let seats: i64 = outcome.totals.values().sum();
    println!("{}", "-".repeat(width + 36).bright_cyan());
    println!(
        "{:<width$}  {:>7}  {:>7}  {:>7}",
        "Seats".bold(),
        outcome.elected_totals.values().sum::<i64>(),
        outcome.non_renewing_totals.values().sum::<i64>(),
        seats.to_string().bright_green().bold(),
        width = width
    );
}

/// Section × alliance grid. `swing` renders signed values.
pub fn print_sections(title: &str, table: &SeatTable, swing: bool) {
    let lists = table.lists();
    if lists.is_empty() {
        return;
    }
    println!("\n{}", title.bright_white().bold());

    let section_width = name_width(table.sections(), "Section");
    let widths: Vec<usize> = lists.iter().map(|l| l.chars().count().max(4)).collect();

    let header = lists
        .iter()
        .zip(&widths)
        .map(|(l, w)| format!("{:>w$}", l, w = *w))
        .join("  ");
    println!("{:<w$}  {}", "Section".bold(), header, w = section_width);

    for section in table.sections() {
        let cells = lists
            .iter()
            .zip(&widths)
            .map(|(list, w)| {
                let n = table.get(section, list);
                if swing {
                    format!("{:>w$}", signed(n), w = *w)
                } else {
                    format!("{:>w$}", n, w = *w)
                }
            })
            .join("  ");
        println!("{:<w$}  {}", section, cells, w = section_width);
    }
}

/// Alliance with most seats in each section.
pub fn print_winners(table: &SeatTable) {
    println!("\n{}", "🏆 Section winners".bright_white().bold());
    let width = name_width(table.sections(), "Section");
    for section in table.sections() {
        match table.winner(section) {
            Some((alliance, seats)) => println!(
                "{:<w$}  {} ({})",
                section,
                alliance.bright_yellow(),
                seats,
                w = width
            ),
            None => println!("{:<w$}  {}", section, "no seats".dimmed(), w = width),
        }
    }
}

/// Mean, P5, P95 and medoid seats per alliance.
pub fn print_summary(title: &str, rows: &[SummaryRow]) {
    println!("\n{}", format!("📈 {}", title).bright_cyan().bold());
    let width = name_width(rows.iter().map(|r| &r.list), "Alliance");
    println!(
        "{:<width$}  {:>7}  {:>7}  {:>7}  {:>7}",
        "Alliance".bold(),
        "Mean",
        "P5",
        "P95",
        "Seats",
        width = width
    );
    println!("{}", "-".repeat(width + 36).bright_cyan());
    for row in rows {
        println!(
            "{:<width$}  {:>7.2}  {:>7.2}  {:>7.2}  {:>7}",
            row.list,
            row.mean,
            row.p5,
            row.p95,
            row.seats.to_string().bright_white().bold(),
            width = width
        );
    }
}
