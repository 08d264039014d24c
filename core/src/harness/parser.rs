//! Reads the transcript printed by the test harness.
//!
//! ```text
//! Parsing ../../tests/sample/expr_plus.py.out
//! + 1 passed
//! Parsing ../../tests/sample/bad_indent.py.out
//! - Failed: expected ...
//! Tests: 1 passed, 1 failed.
//! ```
//!
//! A line starting with the marker names a fixture, the line right after it
//! is the verdict (`+` means pass), and the last line is the summary.

const FIXTURE_SUFFIX: &str = ".out";
const PASS_PREFIX: char = '+';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessReport {
    pub passed: u32,
    pub failed: u32,
    /// Identifiers of failing tests, in output order.
    pub failed_tests: Vec<String>,
    /// Summary line without its trailing period.
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Test output is empty")]
    EmptyOutput,

    #[error("Marker line {line} names no test fixture")]
    MissingFixture { line: usize },

    #[error("Marker line {line} ({test}) is not followed by a verdict line")]
    MissingVerdict { line: usize, test: String },

    #[error("Malformed summary line '{0}'")]
    MalformedSummary(String),
}

/// `../../tests/sample/expr_plus.py.out` -> `expr_plus.py`
pub fn test_id(fixture_path: &str) -> &str {
    let name = fixture_path
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(fixture_path);
    name.strip_suffix(FIXTURE_SUFFIX).unwrap_or(name)
}

/// Scans marker/verdict pairs. `lines` ends with the summary line, which is
/// never taken as a verdict.
pub fn failed_tests(lines: &[&str], marker: &str) -> Result<Vec<String>, ParseError> {
    let summary_idx = lines.len().saturating_sub(1);
    let mut failed = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(marker) {
            continue;
        }
        let fixture = tokens
            .next()
            .ok_or(ParseError::MissingFixture { line: i + 1 })?;
        let id = self::test_id(fixture);
        if i + 1 >= summary_idx {
            return Err(ParseError::MissingVerdict {
                line: i + 1,
                test: id.to_owned(),
            });
        }
        if !lines[i + 1].starts_with(PASS_PREFIX) {
            failed.push(id.to_owned());
        }
    }
    Ok(failed)
}

/// Reads `(passed, failed)` from words 1 and 3 of the summary line.
pub fn summary_counts(line: &str) -> Result<(u32, u32), ParseError> {
    let tokens: Vec<_> = line.split_whitespace().collect();
    let count = |idx: usize| -> Result<u32, ParseError> {
        tokens
            .get(idx)
            .map(|t| t.trim_end_matches(|c: char| c == ',' || c == '.'))
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| ParseError::MalformedSummary(line.to_owned()))
    };
    Ok((count(1)?, count(3)?))
}

pub fn parse(output: &str, marker: &str) -> Result<HarnessReport, ParseError> {
    let lines: Vec<&str> = output.lines().collect();
    let Some(summary_idx) = lines.iter().rposition(|l| !l.trim().is_empty()) else {
        return Err(ParseError::EmptyOutput);
    };
    let last = lines[summary_idx];

    let failed_tests = self::failed_tests(&lines[..=summary_idx], marker)?;
    let (passed, failed) = self::summary_counts(last)?;
    let summary = last.trim_end();

    Ok(HarnessReport {
        passed,
        failed,
        failed_tests,
        summary: summary.strip_suffix('.').unwrap_or(summary).to_owned(),
    })
}
