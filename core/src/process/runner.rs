use std::{path::Path, process::Stdio, sync::Arc, time::Duration};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::process::Command;

use super::outcome::*;
use crate::sink::Sink;

/// Runs one external command to completion and captures what it printed.
#[async_trait]
pub trait Execute: Send + Sync {
    async fn execute(&self, cmd: &Invocation, cwd: &Path) -> anyhow::Result<ProcessOutcome>;
}

#[derive(Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    sink: Arc<dyn Sink>,
}

impl ProcessRunner {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(sink: Arc<dyn Sink>) -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            sink,
        }
    }

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = limit;
        self
    }
}

#[async_trait]
impl Execute for ProcessRunner {
    async fn execute(&self, cmd: &Invocation, cwd: &Path) -> anyhow::Result<ProcessOutcome> {
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let mut proc = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn '{}' in {:?}", cmd, cwd))?;
        let mut stdout = proc.stdout.take().context("Failed to open stdout")?;
        let mut stderr = proc.stderr.take().context("Failed to open stderr")?;

        let res = {
            let fut_stdout = tokio::io::copy(&mut stdout, &mut stdout_buf);
            let fut_stderr = tokio::io::copy(&mut stderr, &mut stderr_buf);
            let fut_exit_status = proc.wait();

            tokio::time::timeout(self.timeout, async {
                tokio::try_join!(fut_stdout, fut_stderr, fut_exit_status)
                    .context("Failed to communicate with subprocess")
            })
            .await
        };

        match res {
            Err(_) => {
                proc.kill()
                    .await
                    .unwrap_or_else(|e| log::warn!("Failed to kill timed out process: {:#}", e));
                self.sink.critical(&format!(
                    "Timed out over {}s while running '{}'",
                    self.timeout.as_secs_f64(),
                    cmd
                ));
                Ok(ProcessOutcome::timed_out())
            }

            Ok(Err(e)) => Err(e),

            Ok(Ok((_, _, exit_status))) => {
                let outcome = ProcessOutcome {
                    status: exit_status.code(),
                    stdout: String::from_utf8_lossy(&stdout_buf).into(),
                    stderr: String::from_utf8_lossy(&stderr_buf).into(),
                    timed_out: false,
                };
                if !outcome.stderr.trim().is_empty() {
                    self.sink.warning(&format!(
                        "Suppressing warning/error messages from '{}'",
                        cmd.program
                    ));
                    log::debug!("stderr of '{}':\n{}", cmd, outcome.stderr);
                }
                Ok(outcome)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::sink::{MemorySink, Severity};

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").arg("-c").arg(script)
    }

    async fn run(script: &str, limit: Duration) -> (ProcessOutcome, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let runner = ProcessRunner::new(sink.clone()).timeout(limit);
        let res = runner.execute(&sh(script), Path::new(".")).await.unwrap();
        (res, sink)
    }

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let (res, sink) = run("echo hello; exit 0", Duration::from_secs(5)).await;
        assert_eq!(res, ProcessOutcome::exited(0, "hello\n", ""));
        assert!(sink.records().is_empty());
    }

    #[tokio::test]
    async fn nonzero_exit_is_reported_not_raised() {
        let (res, _) = run("echo partial; exit 42", Duration::from_secs(5)).await;
        assert_eq!(res.status, Some(42));
        assert_eq!(res.stdout, "partial\n");
        assert!(!res.success());
    }

    #[tokio::test]
    async fn stderr_only_warns() {
        let (res, sink) = run("echo oops >&2", Duration::from_secs(5)).await;
        assert!(res.success());
        assert_eq!(res.stderr, "oops\n");
        assert_eq!(sink.count(Severity::Warning), 1);
    }

    #[tokio::test]
    async fn runs_in_given_dir() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("marker.txt"), "here").unwrap();

        let runner = ProcessRunner::new(Arc::new(MemorySink::new()));
        let res = runner
            .execute(&Invocation::new("cat").arg("marker.txt"), tmp.path())
            .await
            .unwrap();
        assert_eq!(res.stdout, "here");
    }

    #[tokio::test]
    async fn timeout_yields_sentinel_and_critical() {
        let (res, sink) = run("sleep 5", Duration::from_millis(200)).await;
        assert!(res.timed_out);
        assert_eq!(res.exit_code(), SENTINEL_EXIT_CODE);
        assert_eq!(res.stdout, "");
        assert_eq!(sink.count(Severity::Critical), 1);
    }

    #[tokio::test]
    async fn unknown_program_is_an_error() {
        let runner = ProcessRunner::new(Arc::new(MemorySink::new()));
        let res = runner
            .execute(
                &Invocation::new("pagrade-surely-missing-binary"),
                Path::new("."),
            )
            .await;
        assert!(res.is_err());
    }
}
