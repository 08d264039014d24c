use std::path::Path;

use chrono::{DateTime, FixedOffset};

use crate::assignment::Assignment;
use crate::process::{Execute, Invocation};
use crate::sink::Sink;

/// `git log --format=%ai` layout, also accepted for the due time.
pub const GIT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(s.trim(), GIT_TIME_FORMAT)
}

/// Which tree state a submission is graded on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    AtTag(String),
    /// The tag could not be checked out; whatever was checked out before is graded.
    Fallback,
}

impl Checkout {
    pub fn is_at_tag(&self) -> bool {
        matches!(self, Checkout::AtTag(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimestampError {
    #[error("Timed out while reading the last commit time")]
    TimedOut,

    #[error("'{cmd}' exited with code {code}")]
    CommandFailed { cmd: String, code: i32 },

    #[error("Cannot run '{cmd}': {reason}")]
    Spawn { cmd: String, reason: String },

    #[error("Cannot parse commit time '{text}': {source}")]
    Unparsable {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}

pub fn checkout_command(assignment: Assignment) -> Invocation {
    Invocation::new("git")
        .arg("checkout")
        .arg(assignment.grading_tag())
}

pub fn last_commit_command() -> Invocation {
    Invocation::new("git").args(["log", "-1", "--format=%ai"])
}

/// Never fails: a missing tag leaves the tree as it is.
pub async fn checkout_grading_tag(
    exec: &dyn Execute,
    sink: &dyn Sink,
    assignment: Assignment,
    submission: &Path,
) -> Checkout {
    sink.info("Checking out submission tag");
    let cmd = checkout_command(assignment);
    match exec.execute(&cmd, submission).await {
        Ok(o) if o.success() => Checkout::AtTag(assignment.grading_tag()),
        Ok(o) if o.timed_out => {
            sink.warning("Could not switch to submission tag in time, proceeding with current branch");
            Checkout::Fallback
        }
        Ok(_) => {
            sink.warning("Could not checkout submission tag, proceeding with current branch");
            Checkout::Fallback
        }
        Err(e) => {
            sink.error(&format!("{:#}, proceeding with current branch", e));
            Checkout::Fallback
        }
    }
}

pub async fn last_commit_timestamp(
    exec: &dyn Execute,
    sink: &dyn Sink,
    submission: &Path,
) -> Result<DateTime<FixedOffset>, TimestampError> {
    sink.info("Getting last commit time");
    let cmd = last_commit_command();
    let outcome = exec
        .execute(&cmd, submission)
        .await
        .map_err(|e| TimestampError::Spawn {
            cmd: cmd.to_string(),
            reason: format!("{:#}", e),
        })?;

    if outcome.timed_out {
        return Err(TimestampError::TimedOut);
    }
    if !outcome.success() {
        return Err(TimestampError::CommandFailed {
            cmd: cmd.to_string(),
            code: outcome.exit_code(),
        });
    }

    let text = outcome.stdout.trim();
    parse_timestamp(text).map_err(|source| TimestampError::Unparsable {
        text: text.to_owned(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_git_iso_like_dates() {
        let t = parse_timestamp("2023-02-20 18:04:11 -0800\n").unwrap();
        assert_eq!(t.offset().local_minus_utc(), -8 * 3600);
        assert_eq!(t.timestamp(), 1676945051);
    }

    #[test]
    fn rejects_missing_offset() {
        assert!(parse_timestamp("2023-02-20 18:04:11").is_err());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn commands_are_structured() {
        assert_eq!(
            checkout_command(Assignment::Pa3).to_string(),
            "git checkout pa3final"
        );
        assert_eq!(last_commit_command().args, ["log", "-1", "--format=%ai"]);
    }

    #[tokio::test]
    async fn missing_tag_falls_back() {
        use crate::process::{ProcessOutcome, ScriptedExecutor};
        use crate::sink::{MemorySink, Severity};

        let sink = MemorySink::new();
        let ok = ScriptedExecutor::new().on("git checkout", ProcessOutcome::exited(0, "", ""));
        let at_tag = checkout_grading_tag(&ok, &sink, Assignment::Pa3, Path::new(".")).await;
        assert!(at_tag.is_at_tag());
        assert_eq!(at_tag, Checkout::AtTag("pa3final".to_owned()));

        let missing =
            ScriptedExecutor::new().on("git checkout", ProcessOutcome::exited(1, "", ""));
        let fallback =
            checkout_grading_tag(&missing, &sink, Assignment::Pa3, Path::new(".")).await;
        assert!(!fallback.is_at_tag());
        assert_eq!(sink.count(Severity::Warning), 1);
    }
}
