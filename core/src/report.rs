use std::{io, path::PathBuf};

use anyhow::Context as _;
use serde::{Serialize, Serializer};

use crate::readme::TeamMembers;
use crate::vcs::Checkout;

pub const COLUMNS: [&str; 12] = [
    "<Group>",
    "<Name 1>",
    "<Name 2>",
    "<Compiled>",
    "<SampleTests>",
    "<ReferenceTests>",
    "<Benchmarktests>",
    "<README>",
    "<Code>",
    "<Extra>",
    "<Late Hours>",
    "<Notes>",
];

/// One line of the grade report. README, code and extra scores are left for
/// manual grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeRow {
    #[serde(rename = "<Group>")]
    pub group: String,
    #[serde(rename = "<Name 1>")]
    pub name1: Option<String>,
    #[serde(rename = "<Name 2>")]
    pub name2: Option<String>,
    #[serde(rename = "<Compiled>", serialize_with = "as_flag")]
    pub compiled: bool,
    #[serde(rename = "<SampleTests>")]
    pub sample_passed: u32,
    #[serde(rename = "<ReferenceTests>")]
    pub reference_passed: u32,
    #[serde(rename = "<Benchmarktests>")]
    pub benchmark_passed: u32,
    #[serde(rename = "<README>")]
    pub readme: Option<u32>,
    #[serde(rename = "<Code>")]
    pub code: Option<u32>,
    #[serde(rename = "<Extra>")]
    pub extra: u32,
    /// `None` when the last commit time could not be read.
    #[serde(rename = "<Late Hours>")]
    pub late_hours: Option<u64>,
    #[serde(rename = "<Notes>")]
    pub notes: Option<String>,
    #[serde(skip)]
    pub checkout: Checkout,
}

fn as_flag<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*v))
}

impl GradeRow {
    pub const NOTE_BUILD_FAILED: &str = "build failed";
    pub const NOTE_TESTS_NOT_RUN: &str = "tests failed to run";

    /// A not-compiled row with every count at its default.
    pub fn new(
        group: impl Into<String>,
        members: TeamMembers,
        late_hours: Option<u64>,
        checkout: Checkout,
    ) -> Self {
        Self {
            group: group.into(),
            name1: members.first,
            name2: members.second,
            compiled: false,
            sample_passed: 0,
            reference_passed: 0,
            benchmark_passed: 0,
            readme: None,
            code: None,
            extra: 0,
            late_hours,
            notes: None,
            checkout,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

pub fn write_rows<W: io::Write>(w: W, rows: &[GradeRow]) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_writer(w);
    if rows.is_empty() {
        w.write_record(COLUMNS)?;
    }
    for row in rows {
        w.serialize(row)?;
    }
    w.flush()?;
    Ok(())
}

pub fn render(rows: &[GradeRow]) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    self::write_rows(&mut buf, rows)?;
    Ok(String::from_utf8(buf)?)
}

/// Rows of one batch run, written once to a file that must not exist yet.
#[derive(Debug)]
pub struct GradeReport {
    path: PathBuf,
    rows: Vec<GradeRow>,
}

impl GradeReport {
    /// Fails if a report is already present at `path`.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        fsutil::ensure_absent(&path)
            .context("A grade report already exists, refusing to grade again")?;
        Ok(Self {
            path,
            rows: Vec::new(),
        })
    }

    pub fn push(&mut self, row: GradeRow) {
        self.rows.push(row);
    }

    pub fn write(self) -> anyhow::Result<(PathBuf, Vec<GradeRow>)> {
        let file = fsutil::create_new(&self.path)?;
        self::write_rows(io::BufWriter::new(file), &self.rows)
            .with_context(|| format!("Cannot write grade report {:?}", self.path))?;
        Ok((self.path, self.rows))
    }
}
