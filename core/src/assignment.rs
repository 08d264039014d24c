use std::path::Path;

use crate::process::Invocation;

/// One of the graded programming assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum Assignment {
    #[strum(serialize = "pa1")]
    Pa1,
    #[strum(serialize = "pa2")]
    Pa2,
    #[strum(serialize = "pa3")]
    Pa3,
}

/// Test tiers, run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Sample,
    Reference,
    Benchmark,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Sample, Category::Reference, Category::Benchmark];

    /// Name of the fixture folder under the tests dir.
    pub fn folder(&self) -> &'static str {
        use Category::*;
        match self {
            Sample => "sample",
            Reference => "reference",
            Benchmark => "benchmarks",
        }
    }
}

struct TestHarness {
    classpath: &'static str,
    flag: &'static str,
    student_class: &'static str,
    extra_flags: &'static [&'static str],
    marker: &'static str,
}

impl Assignment {
    const HARNESS_MAIN_CLASS: &str = "chocopy.ChocoPy";

    pub fn number(&self) -> u8 {
        use Assignment::*;
        match self {
            Pa1 => 1,
            Pa2 => 2,
            Pa3 => 3,
        }
    }

    /// Directory holding this assignment's submissions, tests and report.
    pub fn dir_name(&self) -> String {
        self.to_string()
    }

    /// Tag students create to mark their final submission.
    pub fn grading_tag(&self) -> String {
        format!("pa{}final", self.number())
    }

    /// First word of a harness line that introduces a test fixture.
    pub fn marker(&self) -> &'static str {
        self.harness().marker
    }

    pub fn build_command(&self) -> Invocation {
        Invocation::new("mvn").args(["clean", "package"])
    }

    pub fn test_command(&self, tests_dir: &Path, category: Category) -> Invocation {
        let h = self.harness();
        let dir = tests_dir.join(category.folder());
        Invocation::new("java")
            .args([
                "-cp",
                h.classpath,
                Self::HARNESS_MAIN_CLASS,
                h.flag,
                h.student_class,
            ])
            .arg("--dir")
            .arg(dir.to_string_lossy())
            .args(h.extra_flags.iter().copied())
            .arg("--test")
    }

    fn harness(&self) -> TestHarness {
        use Assignment::*;
        match self {
            Pa1 => TestHarness {
                classpath: "chocopy-ref.jar:target/assignment.jar",
                flag: "--pa1",
                student_class: "chocopy.pa1.StudentParser",
                extra_flags: &[],
                marker: "Parsing",
            },
            Pa2 => TestHarness {
                classpath: "target/assignment.jar:chocopy-ref.jar",
                flag: "--pa2",
                student_class: "chocopy.pa2.StudentAnalysis",
                extra_flags: &[],
                marker: "Reading",
            },
            Pa3 => TestHarness {
                classpath: "target/assignment.jar:chocopy-ref.jar:lib/venus164.jar",
                flag: "--pa3",
                student_class: "chocopy.pa3.StudentCodeGen",
                extra_flags: &["--run"],
                marker: "Reading",
            },
        }
    }
}
