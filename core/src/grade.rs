use std::{
    collections::HashSet,
    hash::Hash,
    path::{Path, PathBuf},
};

use chrono::{DateTime, FixedOffset};

use crate::assignment::{Assignment, Category};
use crate::build;
use crate::harness::{self, CategoryResult, TestCategoryOutcome};
use crate::late;
use crate::process::Execute;
use crate::readme;
use crate::report::GradeRow;
use crate::sink::Sink;
use crate::vcs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub path: PathBuf,
}

impl Submission {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Named after the directory.
    pub fn from_dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { name, path }
    }
}

/// Steps every submission goes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Stage {
    CheckedOut,
    LateComputed,
    Built,
    Tested,
    Reported,
}

pub struct Grader<'a> {
    exec: &'a dyn Execute,
    sink: &'a dyn Sink,
    assignment: Assignment,
    due: DateTime<FixedOffset>,
    tests_dir: PathBuf,
}

impl<'a> Grader<'a> {
    pub fn new(
        exec: &'a dyn Execute,
        sink: &'a dyn Sink,
        assignment: Assignment,
        due: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            exec,
            sink,
            assignment,
            due,
            tests_dir: PathBuf::from("../../tests"),
        }
    }

    pub fn tests_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tests_dir = dir.into();
        self
    }

    pub fn assignment(&self) -> Assignment {
        self.assignment
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink
    }

    /// Always produces a row: build and test failures are recorded, not raised.
    pub async fn grade(&self, sub: &Submission) -> GradeRow {
        self.sink.info(&format!("Grading submission {}", sub.name));

        let checkout =
            vcs::checkout_grading_tag(self.exec, self.sink, self.assignment, &sub.path).await;
        if !checkout.is_at_tag() {
            self.sink.info(&format!("Grading {} at its current branch", sub.name));
        }
        self.enter(sub, Stage::CheckedOut);

        let late_hours = self.late_hours(&sub.path).await;
        self.enter(sub, Stage::LateComputed);

        // Names come from the checked-out tree.
        let members = readme::team_members(self.sink, &sub.path);
        let row = GradeRow::new(&sub.name, members, late_hours, checkout);

        if build::build(self.exec, self.sink, self.assignment, &sub.path).await != 0 {
            self.enter(sub, Stage::Reported);
            return row.with_notes(GradeRow::NOTE_BUILD_FAILED);
        }
        self.enter(sub, Stage::Built);

        let mut outcomes = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            outcomes.push(
                harness::run_category(
                    self.exec,
                    self.sink,
                    self.assignment,
                    &sub.path,
                    &self.tests_dir,
                    category,
                )
                .await,
            );
        }
        self.enter(sub, Stage::Tested);

        let row = self.finish(row, &outcomes);
        self.enter(sub, Stage::Reported);
        row
    }

    fn enter(&self, sub: &Submission, stage: Stage) {
        log::debug!("[{}] {}", sub.name, stage);
    }

    /// `None` when the commit time cannot be read; grading goes on regardless.
    async fn late_hours(&self, submission: &Path) -> Option<u64> {
        match vcs::last_commit_timestamp(self.exec, self.sink, submission).await {
            Ok(commit) => Some(late::late_hours(self.due, commit)),
            Err(e) => {
                self.sink.error(&format!("{}; late hours left blank", e));
                None
            }
        }
    }

    fn finish(&self, mut row: GradeRow, outcomes: &[TestCategoryOutcome]) -> GradeRow {
        if outcomes.iter().any(|o| o.exit_code() != 0) {
            return row.with_notes(GradeRow::NOTE_TESTS_NOT_RUN);
        }
        let malformed = outcomes.iter().find_map(|o| match &o.result {
            CategoryResult::MalformedOutput(e) => Some((o.category, e)),
            _ => None,
        });
        if let Some((category, e)) = malformed {
            return row.with_notes(format!("malformed {} test output: {}", category, e));
        }

        row.compiled = true;
        for o in outcomes {
            let passed = o.passed().unwrap_or(0);
            match o.category {
                Category::Sample => row.sample_passed = passed,
                Category::Reference => row.reference_passed = passed,
                Category::Benchmark => row.benchmark_passed = passed,
            }
        }

        let failed = dedup(outcomes.iter().flat_map(|o| o.failed_tests()).cloned());
        if !failed.is_empty() {
            row.notes = Some(failed.join(", "));
        }
        row
    }
}

/// Drops repeated items, keeping first occurrences in order.
pub fn dedup<T, I>(items: I) -> Vec<T>
where
    T: Hash + Eq + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|x| seen.insert(x.clone()))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        assert_eq!(dedup(["b", "a", "b", "c", "a"]), ["b", "a", "c"]);
        assert!(dedup(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn submission_named_after_dir() {
        let s = Submission::from_dir("pa1/submissions/team-rocket");
        assert_eq!(s.name, "team-rocket");
        assert_eq!(s.path, Path::new("pa1/submissions/team-rocket"));
    }
}
