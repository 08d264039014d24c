use std::path::Path;

use super::parser::{self, HarnessReport, ParseError};
use crate::assignment::{Assignment, Category};
use crate::process::{Execute, SENTINEL_EXIT_CODE};
use crate::sink::Sink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResult {
    Completed(HarnessReport),
    /// The harness itself failed, timed out or could not be started.
    NotRun { exit_code: i32 },
    MalformedOutput(ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCategoryOutcome {
    pub category: Category,
    pub result: CategoryResult,
}

impl TestCategoryOutcome {
    pub fn exit_code(&self) -> i32 {
        match self.result {
            CategoryResult::NotRun { exit_code } => exit_code,
            _ => 0,
        }
    }

    pub fn passed(&self) -> Option<u32> {
        match &self.result {
            CategoryResult::Completed(r) => Some(r.passed),
            _ => None,
        }
    }

    pub fn failed_tests(&self) -> &[String] {
        match &self.result {
            CategoryResult::Completed(r) => &r.failed_tests,
            _ => &[],
        }
    }
}

pub async fn run_category(
    exec: &dyn Execute,
    sink: &dyn Sink,
    assignment: Assignment,
    submission: &Path,
    tests_dir: &Path,
    category: Category,
) -> TestCategoryOutcome {
    sink.info(&format!("Running {} tests", category));
    let cmd = assignment.test_command(tests_dir, category);
    let outcome = |result| TestCategoryOutcome { category, result };

    let res = match exec.execute(&cmd, submission).await {
        Ok(res) => res,
        Err(e) => {
            sink.error(&format!("{:#}", e));
            return outcome(CategoryResult::NotRun {
                exit_code: SENTINEL_EXIT_CODE,
            });
        }
    };

    if res.timed_out {
        return outcome(CategoryResult::NotRun {
            exit_code: res.exit_code(),
        });
    }
    if !res.success() {
        sink.error(&format!(
            "Got return value {} while running {} tests",
            res.exit_code(),
            category
        ));
        return outcome(CategoryResult::NotRun {
            exit_code: res.exit_code(),
        });
    }

    match parser::parse(&res.stdout, assignment.marker()) {
        Ok(report) => {
            if report.failed == 0 {
                sink.success(&report.summary);
            } else {
                sink.warning(&report.summary);
            }
            if report.failed as usize != report.failed_tests.len() {
                log::debug!(
                    "{} tests: summary reports {} failures but {} verdicts failed",
                    category,
                    report.failed,
                    report.failed_tests.len()
                );
            }
            outcome(CategoryResult::Completed(report))
        }
        Err(e) => {
            sink.error(&format!("Cannot read {} test output: {}", category, e));
            outcome(CategoryResult::MalformedOutput(e))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::process::{ProcessOutcome, ScriptedExecutor};
    use crate::sink::{MemorySink, Severity};

    const OUTPUT: &str = "Reading ../../tests/reference/a.py.out\n\
                          + ok\n\
                          Reading ../../tests/reference/b.py.out\n\
                          - mismatch\n\
                          Tests: 1 passed, 1 failed.\n";

    async fn run(exec: &ScriptedExecutor, sink: &MemorySink) -> TestCategoryOutcome {
        run_category(
            exec,
            sink,
            Assignment::Pa2,
            Path::new("."),
            Path::new("../../tests"),
            Category::Reference,
        )
        .await
    }

    #[tokio::test]
    async fn parses_output_on_success() {
        let exec = ScriptedExecutor::new()
            .on("tests/reference", ProcessOutcome::exited(0, OUTPUT, ""));
        let sink = MemorySink::new();

        let o = run(&exec, &sink).await;
        assert_eq!(o.exit_code(), 0);
        assert_eq!(o.passed(), Some(1));
        assert_eq!(o.failed_tests(), ["b.py"]);
        assert!(sink
            .records()
            .contains(&(Severity::Warning, "Tests: 1 passed, 1 failed".to_owned())));
    }

    #[tokio::test]
    async fn all_passing_logs_success() {
        let out = "Reading x/a.py.out\n+ ok\nTests: 1 passed, 0 failed.\n";
        let exec = ScriptedExecutor::new().on("java", ProcessOutcome::exited(0, out, ""));
        let sink = MemorySink::new();

        let o = run(&exec, &sink).await;
        assert!(o.failed_tests().is_empty());
        assert_eq!(sink.count(Severity::Success), 1);
    }

    #[tokio::test]
    async fn nonzero_exit_skips_parsing() {
        let exec = ScriptedExecutor::new().on("java", ProcessOutcome::exited(2, OUTPUT, ""));
        let sink = MemorySink::new();

        let o = run(&exec, &sink).await;
        assert_eq!(o.result, CategoryResult::NotRun { exit_code: 2 });
        assert_eq!(o.passed(), None);
        assert!(o.failed_tests().is_empty());
    }

    #[tokio::test]
    async fn timeout_and_spawn_failure_are_not_run() {
        let sink = MemorySink::new();
        let timed_out = ScriptedExecutor::new().on("java", ProcessOutcome::timed_out());
        assert_eq!(run(&timed_out, &sink).await.exit_code(), SENTINEL_EXIT_CODE);

        let unscripted = ScriptedExecutor::new();
        assert_eq!(
            run(&unscripted, &sink).await.exit_code(),
            SENTINEL_EXIT_CODE
        );
    }

    #[tokio::test]
    async fn truncated_output_is_malformed() {
        let out = "Reading x/a.py.out";
        let exec = ScriptedExecutor::new().on("java", ProcessOutcome::exited(0, out, ""));
        let sink = MemorySink::new();

        let o = run(&exec, &sink).await;
        assert!(matches!(
            o.result,
            CategoryResult::MalformedOutput(ParseError::MissingVerdict { .. })
        ));
        assert_eq!(o.exit_code(), 0);
    }
}
