pub mod grade;
pub mod parse_output;

use std::path::PathBuf;

use pagrade_core::{assignment::Assignment, Config};

use crate::util;

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct GlobalArgs {
    #[command(subcommand)]
    pub subcmd: Subcommand,

    /// Config file (default: `pagrade.toml` in the current dir or its ancestors)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommand {
    #[command(alias("g"))]
    Grade(grade::Args),

    ParseOutput(parse_output::Args),
}

pub type SubcmdResult = anyhow::Result<()>;

impl GlobalArgs {
    pub async fn exec_subcmd(&self) -> SubcmdResult {
        use Subcommand::*;
        match &self.subcmd {
            Grade(args) => grade::exec(args, self).await,
            ParseOutput(args) => parse_output::exec(args, self),
        }
    }

    pub fn load_config(&self) -> anyhow::Result<Config> {
        match &self.config {
            Some(path) => Config::from_toml_file(path.clone()),
            None => Config::load(util::current_dir()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ArgAssignment {
    #[value(name = "1")]
    Pa1,
    #[value(name = "2")]
    Pa2,
    #[value(name = "3")]
    Pa3,
}

impl From<ArgAssignment> for Assignment {
    fn from(value: ArgAssignment) -> Self {
        use ArgAssignment::*;
        match value {
            Pa1 => Assignment::Pa1,
            Pa2 => Assignment::Pa2,
            Pa3 => Assignment::Pa3,
        }
    }
}
