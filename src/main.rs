use clap::{Parser, Subcommand};
use seat_projection::commands::{self, DataArgs, ModelArgs, SimulationArgs};
use seat_projection::logging;

#[derive(Parser)]
#[clap(version, about = "Seat projections for the provincial legislature")]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and dump info about the election data.
    Info {
        #[clap(flatten)]
        data: DataArgs,
    },
    /// Turn fixed vote intentions into seats.
    Project {
        #[clap(flatten)]
        data: DataArgs,
        #[clap(flatten)]
        model: ModelArgs,
    },
    /// Simulate many elections around the vote intentions.
    Simulate {
        #[clap(flatten)]
        data: DataArgs,
        #[clap(flatten)]
        model: ModelArgs,
        #[clap(flatten)]
        simulation: SimulationArgs,
    },
}

fn main() {
    logging::init();
    let opts = Opts::parse();

    let (name, result) = match &opts.command {
        Command::Info { data } => ("Info", commands::info(data)),
        Command::Project { data, model } => ("Projection", commands::project(data, model)),
        Command::Simulate {
            data,
            model,
            simulation,
        } => ("Simulation", commands::simulate(data, model, simulation)),
    };

    if let Err(e) = result {
        eprintln!("❌ {} failed: {}", name, e);
        std::process::exit(1);
    }
}
