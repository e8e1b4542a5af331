use super::{Context, DataArgs};
use crate::error::Result;
use crate::model::Chamber;
use crate::report::console::print_sections;
use colored::Colorize;

pub fn info(args: &DataArgs) -> Result<()> {
    let ctx = Context::load(args)?;
    let congress = &ctx.congress;

    println!(
        "📋 Election {} ({} and {})",
        ctx.files.year.to_string().cyan(),
        ctx.files.structure.display(),
        ctx.files.composition.display()
    );

    println!("\n{}", "🗺️  Sections".bright_white().bold());
    for (section, voters) in congress.electorate() {
        let seats: Vec<String> = Chamber::ALL
            .iter()
            .filter_map(|&chamber| {
                congress
                    .seats_up(chamber)
                    .get(section)
                    .map(|n| format!("{} {}", n, chamber))
            })
            .collect();
        let seats = if seats.is_empty() {
            "no seats up".dimmed().to_string()
        } else {
            seats.join(", ")
        };
        println!("  {:<20} {:>10} voters   {}", section, voters, seats);
    }

    println!("\n{}", "🤝 Alliances".bright_white().bold());
    let competing = congress.sections_by_alliance();
    let colors = congress.colors();
    let names = ctx.ordered(congress.structure.alliances.keys());
    for name in &names {
        let alliance = &congress.structure.alliances[name];
        let sections = match competing.get(name) {
            Some(set) if set.len() == congress.electorate().len() => "everywhere".to_string(),
            Some(set) if !set.is_empty() => set.iter().cloned().collect::<Vec<_>>().join(", "),
            _ => "nowhere".dimmed().to_string(),
        };
        println!(
            "  {} [{}] {} party(ies), runs {}",
            name.bright_yellow(),
            colors.get(name).map(String::as_str).unwrap_or("-"),
            alliance.parties.len(),
            sections
        );
    }

    for chamber in Chamber::ALL {
        let current = congress.current_composition(chamber);
        let seats: i64 = current.totals().values().sum();
        let safe: i64 = congress.non_renewing(chamber).totals().values().sum();
        println!(
            "\n{} {} seats, {} not up for election",
            format!("🏛️  {}:", chamber.label()).bright_cyan().bold(),
            seats,
            safe
        );
        print_sections("Sitting members", current, false);
    }

    println!("\n✅ Data is consistent");
    Ok(())
}
