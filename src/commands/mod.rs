mod info;
mod project;
mod simulate;

pub use info::info;
pub use project::project;
pub use simulate::{simulate, SimulationArgs};

use crate::apportion::Method;
use crate::beliefs::{parse_shares, BeliefSet};
use crate::config::{Config, DataFiles};
use crate::congress::Congress;
use crate::error::{Error, Result};
use clap::Args;
use colored::*;
use std::path::PathBuf;

/// Which election to load.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Config file (defaults to ./seatsim.yaml when present)
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Election year, overriding `active_year`
    #[clap(long)]
    pub year: Option<u16>,
    /// Data directory, overriding `data_dir`
    #[clap(long)]
    pub data_dir: Option<PathBuf>,
}

/// Vote intentions and turnout shared by `project` and `simulate`.
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Vote intention as NAME=PERCENT; repeat for every alliance
    #[clap(long = "share", value_name = "NAME=PCT")]
    pub shares: Vec<String>,
    /// YAML file with `global` and per-section `sections` intentions
    #[clap(long)]
    pub beliefs: Option<PathBuf>,
    /// Turnout as a fraction of the electorate
    #[clap(long)]
    pub turnout: Option<f64>,
    /// Valid votes as a fraction of turnout
    #[clap(long)]
    pub valid_share: Option<f64>,
    /// Apportionment method: hare or dhondt
    #[clap(long)]
    pub method: Option<Method>,
    /// Write a JSON report here (`.gz` compresses it)
    #[clap(long)]
    pub output: Option<PathBuf>,
    /// Also print per-section seats and swings
    #[clap(long)]
    pub sections: bool,
}

/// Loaded configuration and election data.
pub struct Context {
    pub config: Config,
    pub files: DataFiles,
    pub congress: Congress,
}

impl Context {
    pub fn load(args: &DataArgs) -> Result<Self> {
        let mut config = Config::discover(args.config.as_deref())?;
        if let Some(dir) = &args.data_dir {
            config.data_dir = dir.clone();
        }
        let files = config.resolve_data_files(args.year)?;
        let congress = Congress::load(&files.structure, &files.composition)?;
        Ok(Self {
            config,
            files,
            congress,
        })
    }

    /// Alliances in display order: configured ones first, then the rest of
    /// `names` alphabetically.
    pub fn ordered<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut names: Vec<String> = names.into_iter().cloned().collect();
        let rank = |name: &String| {
            self.config
                .visible_alliances
                .iter()
                .position(|v| v == name)
                .unwrap_or(usize::MAX)
        };
        names.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));
        names
    }

    /// Alliances to simulate: those with an intention that run somewhere,
    /// narrowed to `visible_alliances` when that is configured.
    pub fn visible(&self, beliefs: &BeliefSet) -> Vec<String> {
        let competing = self.congress.sections_by_alliance();
        let configured = &self.config.visible_alliances;
        self.ordered(beliefs.global.keys().filter(|alliance| {
            competing.contains_key(*alliance)
                && (configured.is_empty() || configured.contains(*alliance))
        }))
    }

    /// Point out alliances that will not get votes everywhere.
    pub fn warn_partial_alliances(&self, beliefs: &BeliefSet) {
        let competing = self.congress.sections_by_alliance();
        let sections = self.congress.electorate().len();
        for alliance in beliefs.global.keys() {
            match competing.get(alliance) {
                None => println!(
                    "⚠️  {} does not run in any section",
                    alliance.yellow()
                ),
                Some(set) if set.len() < sections => println!(
                    "⚠️  {} runs in {} of {} sections",
                    alliance.yellow(),
                    set.len(),
                    sections
                ),
                _ => {}
            }
        }
    }
}

impl ModelArgs {
    /// `--beliefs` file first, then `--share` pairs on top of its globals.
    pub fn belief_set(&self) -> Result<BeliefSet> {
        let mut set = match &self.beliefs {
            Some(path) => BeliefSet::from_file(path)?,
            None => BeliefSet::default(),
        };
        set.global.extend(parse_shares(&self.shares)?);
        if set.global.is_empty() {
            return Err(Error::Usage(
                "No vote intentions given (use --share NAME=PCT or --beliefs FILE)".to_string(),
            ));
        }
        Ok(set)
    }

    pub fn apply(&self, config: &mut Config) {
        if let Some(turnout) = self.turnout {
            config.turnout = turnout;
        }
        if let Some(valid_share) = self.valid_share {
            config.valid_share = valid_share;
        }
        if let Some(method) = self.method {
            config.method = method;
        }
    }
}
