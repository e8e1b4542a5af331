use super::{Context, DataArgs, ModelArgs};
use crate::error::Result;
use crate::model::Chamber;
use crate::projection;
use crate::report::console::{print_outcome, print_sections, print_winners};
use crate::report::{Report, ReportInfo};
use colored::Colorize;

pub fn project(data: &DataArgs, model: &ModelArgs) -> Result<()> {
    let mut ctx = Context::load(data)?;
    model.apply(&mut ctx.config);
    let beliefs = model.belief_set()?;
    let params = ctx.config.projection_params();

    println!(
        "🗳️  Projecting {} with {} (turnout {:.0}%, valid {:.0}%)",
        ctx.files.year.to_string().cyan(),
        params.method.to_string().cyan(),
        params.turnout * 100.0,
        params.valid_share * 100.0
    );
    ctx.warn_partial_alliances(&beliefs);

    let projection = projection::project(&ctx.congress, &beliefs, params)?;

    for chamber in Chamber::ALL {
        let outcome = projection.chamber(chamber);
        print_outcome(outcome);
        if model.sections {
            print_sections("Elected by section", &outcome.elected, false);
            print_sections("Swing by section", &outcome.section_changes, true);
            print_winners(&outcome.elected);
        }
    }

    if let Some(path) = &model.output {
        let info = ReportInfo::new(&ctx.files)?;
        Report::projection(info, &beliefs, &projection).write(path)?;
        println!(
            "\n💾 Report written to {}",
            path.display().to_string().bright_green()
        );
    }
    Ok(())
}
