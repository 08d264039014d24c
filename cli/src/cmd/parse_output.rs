use std::path::PathBuf;

use colored::Colorize;
use pagrade_core::{action, assignment::Assignment};

use super::{ArgAssignment, GlobalArgs, SubcmdResult};

/// Parse a saved test-harness transcript and list its failing tests
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Assignment whose marker token to look for
    #[arg(long, value_enum)]
    pub pa: ArgAssignment,

    #[arg()] // positional argument
    pub file: PathBuf,
}

pub fn exec(args: &Args, _global_args: &GlobalArgs) -> SubcmdResult {
    let report = action::parse_transcript(&args.file, Assignment::from(args.pa))?;

    let summary = if report.failed == 0 {
        report.summary.green()
    } else {
        report.summary.bright_red()
    };
    println!("{}", summary);
    for name in &report.failed_tests {
        println!("  {} {}", "✗".red(), name);
    }
    Ok(())
}
