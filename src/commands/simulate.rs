use super::{Context, DataArgs, ModelArgs};
use crate::beliefs::BeliefSet;
use crate::error::Result;
use crate::model::Chamber;
use crate::report::console::{print_outcome, print_sections, print_summary, print_winners};
use crate::report::{write_draws, Report, ReportInfo};
use crate::simulation;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct SimulationArgs {
    /// Number of simulated elections
    #[clap(long)]
    pub draws: Option<usize>,
    /// Dirichlet concentration; larger means less spread
    #[clap(long)]
    pub alpha_scale: Option<f64>,
    /// Spread of each section around the province-wide draw
    #[clap(long, conflicts_with = "no_phi")]
    pub phi: Option<f64>,
    /// Draw every section straight from the global intentions
    #[clap(long)]
    pub no_phi: bool,
    /// Seed for reproducible runs
    #[clap(long)]
    pub seed: Option<u64>,
    /// Also write every draw's seats as JSON
    #[clap(long)]
    pub draws_output: Option<PathBuf>,
}

/// Draws are centred on the global intentions only.
fn warn_section_overrides(beliefs: &BeliefSet) -> bool {
    if beliefs.by_section.is_empty() {
        return false;
    }
    let sections: Vec<&str> = beliefs.by_section.keys().map(String::as_str).collect();
    tracing::warn!(sections = ?sections, "per-section intentions are not used by the simulation");
    println!(
        "⚠️  Per-section intentions for {} are ignored; simulating around the global ones",
        sections.join(", ").yellow()
    );
    true
}

pub fn simulate(data: &DataArgs, model: &ModelArgs, sim: &SimulationArgs) -> Result<()> {
    let mut ctx = Context::load(data)?;
    model.apply(&mut ctx.config);
    let beliefs = model.belief_set()?;

    let mut params = ctx.config.simulation_params();
    if let Some(draws) = sim.draws {
        params.draws = draws;
    }
    if let Some(alpha_scale) = sim.alpha_scale {
        params.alpha_scale = alpha_scale;
    }
    if sim.no_phi {
        params.phi = None;
    } else if sim.phi.is_some() {
        params.phi = sim.phi;
    }
    if sim.seed.is_some() {
        params.seed = sim.seed;
    }

    let visible = ctx.visible(&beliefs);

    println!(
        "🎲 Simulating {} draws for {} with {} (alpha scale {}, phi {})",
        params.draws.to_string().cyan(),
        ctx.files.year.to_string().cyan(),
        params.projection.method.to_string().cyan(),
        params.alpha_scale,
        params
            .phi
            .map(|phi| phi.to_string())
            .unwrap_or_else(|| "off".to_string())
    );
    ctx.warn_partial_alliances(&beliefs);
    warn_section_overrides(&beliefs);

    let run = simulation::run_with_progress(
        &ctx.congress,
        &beliefs.global,
        &visible,
        params,
        |done, total| println!("  ⏳ {}/{} draws", done, total),
    )?;

    for chamber in Chamber::ALL {
        let result = run.chamber(chamber);
        print_summary(&format!("{} over {} draws", chamber.label(), params.draws), &result.summary);
        println!(
            "\n{} draw #{}",
            "Most representative".bold(),
            result.medoid_draw + 1
        );
        print_outcome(&result.outcome);
        if model.sections {
            print_sections("Elected by section", &result.outcome.elected, false);
            print_sections("Swing by section", &result.outcome.section_changes, true);
            print_winners(&result.outcome.elected);
        }
    }

    println!(
        "\n⚡ {} draws in {:.2}s ({:.0} draws/s)",
        params.draws,
        run.elapsed_ms as f64 / 1000.0,
        run.draws_per_second()
    );

    if let Some(path) = &model.output {
        let info = ReportInfo::new(&ctx.files)?;
        Report::simulation(info, &beliefs, &run).write(path)?;
        println!(
            "💾 Report written to {}",
            path.display().to_string().bright_green()
        );
    }
    if let Some(path) = &sim.draws_output {
        write_draws(path, &run)?;
        println!(
            "💾 Draws written to {}",
            path.display().to_string().bright_green()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beliefs::Beliefs;

    #[test]
    fn section_overrides_are_flagged() {
        let global: Beliefs = vec![("Blue".to_string(), 100.0)].into_iter().collect();
        let mut beliefs = BeliefSet::global(global.clone());
        assert!(!warn_section_overrides(&beliefs));

        beliefs.by_section.insert("North".to_string(), global);
        assert!(warn_section_overrides(&beliefs));
    }
}
