use std::{path::Path, sync::Mutex};

use anyhow::bail;
use async_trait::async_trait;

use super::{outcome::*, runner::Execute};

/// Replays canned outcomes instead of spawning processes.
///
/// A rule matches when its fragment occurs in the rendered command line
/// (and, for [`ScriptedExecutor::on_in`], its dir fragment occurs in the
/// working dir). The first matching rule wins. Unmatched commands fail to
/// "spawn".
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    rules: Vec<Rule>,
    calls: Mutex<Vec<Invocation>>,
}

#[derive(Debug)]
struct Rule {
    cwd: Option<String>,
    fragment: String,
    outcome: ProcessOutcome,
}

impl Rule {
    fn matches(&self, line: &str, cwd: &Path) -> bool {
        let in_dir = match &self.cwd {
            Some(dir) => cwd.to_string_lossy().contains(dir.as_str()),
            None => true,
        };
        in_dir && line.contains(self.fragment.as_str())
    }
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, fragment: impl Into<String>, outcome: ProcessOutcome) -> Self {
        self.rules.push(Rule {
            cwd: None,
            fragment: fragment.into(),
            outcome,
        });
        self
    }

    /// Like [`Self::on`], restricted to commands run inside a matching dir.
    pub fn on_in(
        mut self,
        cwd: impl Into<String>,
        fragment: impl Into<String>,
        outcome: ProcessOutcome,
    ) -> Self {
        self.rules.push(Rule {
            cwd: Some(cwd.into()),
            fragment: fragment.into(),
            outcome,
        });
        self
    }

    /// Every command executed so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Execute for ScriptedExecutor {
    async fn execute(&self, cmd: &Invocation, cwd: &Path) -> anyhow::Result<ProcessOutcome> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(cmd.clone());
        }
        let line = cmd.to_string();
        match self.rules.iter().find(|r| r.matches(&line, cwd)) {
            Some(rule) => Ok(rule.outcome.clone()),
            None => bail!("No scripted outcome for '{}' in {:?}", line, cwd),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn first_matching_rule_wins() {
        let exec = ScriptedExecutor::new()
            .on("git log", ProcessOutcome::exited(0, "first", ""))
            .on("git", ProcessOutcome::exited(1, "second", ""));

        let cwd = Path::new(".");
        let log = Invocation::new("git").args(["log", "-1"]);
        let checkout = Invocation::new("git").args(["checkout", "x"]);

        assert_eq!(exec.execute(&log, cwd).await.unwrap().stdout, "first");
        assert_eq!(exec.execute(&checkout, cwd).await.unwrap().stdout, "second");
        assert!(exec.execute(&Invocation::new("mvn"), cwd).await.is_err());
        assert_eq!(exec.calls().len(), 3);
    }

    #[tokio::test]
    async fn dir_scoped_rules_take_precedence_when_listed_first() {
        let exec = ScriptedExecutor::new()
            .on_in("team-b", "mvn", ProcessOutcome::exited(1, "", ""))
            .on("mvn", ProcessOutcome::exited(0, "", ""));
        let mvn = Invocation::new("mvn");

        let a = exec
            .execute(&mvn, Path::new("pa1/submissions/team-a"))
            .await;
        let b = exec
            .execute(&mvn, Path::new("pa1/submissions/team-b"))
            .await;
        assert_eq!(a.unwrap().status, Some(0));
        assert_eq!(b.unwrap().status, Some(1));
    }
}
