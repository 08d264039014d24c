use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::{DateTime, FixedOffset};
use pagrade_core::{
    action,
    assignment::Assignment,
    grade::Grader,
    process::ProcessRunner,
    report,
    sink::{LogSink, Sink},
    vcs,
};

use crate::util;

use super::{ArgAssignment, GlobalArgs, SubcmdResult};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Assignment to grade
    #[arg(long, value_enum)]
    pub pa: ArgAssignment,

    /// Due time, formatted as "%Y-%m-%d %H:%M:%S %z"
    #[arg(short, long, value_parser = parse_due)]
    pub due: DateTime<FixedOffset>,

    /// A specific submission to grade
    #[arg(short, long)]
    pub submission: Option<String>,

    /// Directory holding the `pa<N>` folders
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Per-command timeout in seconds (overrides the config file)
    #[arg(long)]
    pub timeout: Option<u64>,
}

fn parse_due(s: &str) -> Result<DateTime<FixedOffset>, String> {
    vcs::parse_timestamp(s).map_err(|e| format!("expected \"YYYY-MM-DD HH:MM:SS +HHMM\": {}", e))
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = global_args.load_config()?;
    let mut grading = cfg.grading;
    if let Some(secs) = args.timeout {
        grading.timeout_secs = secs;
    }

    let root = args.root.clone().unwrap_or_else(util::current_dir);
    let assignment = Assignment::from(args.pa);

    let sink: Arc<dyn Sink> = Arc::new(LogSink);
    let runner = ProcessRunner::new(sink.clone()).timeout(grading.timeout());
    let grader = Grader::new(&runner, sink.as_ref(), assignment, args.due)
        .tests_dir(grading.tests_dir.clone());

    match &args.submission {
        Some(name) => {
            let row = action::grade_one(&grader, &root, &grading, name).await?;
            print!("{}", report::render(&[row])?);
        }
        None => {
            let (path, _rows) = action::grade_all(&grader, &root, &grading)
                .await
                .with_context(|| format!("Failed to grade {}", assignment))?;
            println!("{}", path.to_string_lossy());
        }
    }
    Ok(())
}
