pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}
use std::path::{Path, PathBuf};

use error::*;

use crate::assignment::Assignment;
use crate::config::GradingConfig;
use crate::grade::{Grader, Submission};
use crate::harness::{self, HarnessReport};
use crate::report::{GradeReport, GradeRow};

/// `<root>/pa<N>`
pub fn assignment_dir(root: impl AsRef<Path>, assignment: Assignment) -> PathBuf {
    root.as_ref().join(assignment.dir_name())
}

pub fn submissions_dir(
    root: impl AsRef<Path>,
    assignment: Assignment,
    cfg: &GradingConfig,
) -> PathBuf {
    self::assignment_dir(root, assignment).join(&cfg.submissions_dirname)
}

pub fn report_path(root: impl AsRef<Path>, assignment: Assignment, cfg: &GradingConfig) -> PathBuf {
    self::assignment_dir(root, assignment).join(&cfg.report_filename)
}

/// Every subdirectory is one submission, taken in name order.
pub fn discover_submissions(dir: impl AsRef<Path>) -> Result<Vec<Submission>> {
    let dirs = fsutil::list_subdirs(&dir).context("Failed to list submissions")?;
    Ok(dirs.into_iter().map(Submission::from_dir).collect())
}

/// Grades every submission of the assignment and writes the report.
/// Nothing is graded if a report is already present.
pub async fn grade_all(
    grader: &Grader<'_>,
    root: impl AsRef<Path>,
    cfg: &GradingConfig,
) -> Result<(PathBuf, Vec<GradeRow>)> {
    let root = root.as_ref();
    let assignment = grader.assignment();

    let submissions_dir = self::submissions_dir(root, assignment, cfg);
    ensure!(
        submissions_dir.is_dir(),
        "Could not find {:?} in directory, stopping",
        submissions_dir
    );

    let mut report = GradeReport::open(self::report_path(root, assignment, cfg))?;

    let submissions = self::discover_submissions(&submissions_dir)?;
    if submissions.is_empty() {
        grader
            .sink()
            .warning(&format!("No submissions found in {:?}", submissions_dir));
    }
    for sub in &submissions {
        report.push(grader.grade(sub).await);
    }

    let (path, rows) = report.write()?;
    grader
        .sink()
        .success(&format!("Wrote {} grades to {:?}", rows.len(), path));
    Ok((path, rows))
}

/// Grades one named submission without touching the report file.
pub async fn grade_one(
    grader: &Grader<'_>,
    root: impl AsRef<Path>,
    cfg: &GradingConfig,
    name: &str,
) -> Result<GradeRow> {
    let submissions_dir = self::submissions_dir(root, grader.assignment(), cfg);
    let path = submissions_dir.join(name);
    ensure!(
        path.is_dir(),
        "Could not find submission {} in {:?}, stopping",
        name,
        submissions_dir
    );

    let row = grader.grade(&Submission::new(name, path)).await;
    grader.sink().info(&format!("Results: {:?}", row));
    Ok(row)
}

/// Runs the output parser over a saved harness transcript.
pub fn parse_transcript(file: impl AsRef<Path>, assignment: Assignment) -> Result<HarnessReport> {
    let file = file.as_ref();
    let text = fsutil::read_to_string(file)?;
    harness::parse(&text, assignment.marker())
        .with_context(|| format!("Malformed test output in {:?}", file))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout_paths() {
        let cfg = GradingConfig::default();
        assert_eq!(
            submissions_dir("/course", Assignment::Pa2, &cfg),
            Path::new("/course/pa2/submissions")
        );
        assert_eq!(
            report_path("/course", Assignment::Pa2, &cfg),
            Path::new("/course/pa2/grades.csv")
        );
    }

    #[test]
    fn parse_transcript_reports_location_of_bad_output() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("run.log");
        std::fs::write(&file, "Parsing a.py.out\n").unwrap();

        let err = parse_transcript(&file, Assignment::Pa1).unwrap_err();
        assert!(format!("{:#}", err).contains("not followed by a verdict line"));
    }

    #[test]
    fn parse_transcript_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("run.log");
        std::fs::write(
            &file,
            "Reading t/a.py.out\n- no\nReading t/b.py.out\n+ yes\nTests: 1 passed, 1 failed.\n",
        )
        .unwrap();

        let r = parse_transcript(&file, Assignment::Pa3).unwrap();
        assert_eq!(r.failed_tests, ["a.py"]);
        assert_eq!((r.passed, r.failed), (1, 1));
    }
}
