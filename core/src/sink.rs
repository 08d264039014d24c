use std::sync::Mutex;

use colored::{Color, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
    Critical,
}

/// Destination of the grading log. Injected into the runner and the grader
/// so that tests can observe what was reported.
pub trait Sink: Send + Sync {
    fn emit(&self, severity: Severity, msg: &str);

    fn info(&self, msg: &str) {
        self.emit(Severity::Info, msg)
    }

    fn success(&self, msg: &str) {
        self.emit(Severity::Success, msg)
    }

    fn warning(&self, msg: &str) {
        self.emit(Severity::Warning, msg)
    }

    fn error(&self, msg: &str) {
        self.emit(Severity::Error, msg)
    }

    fn critical(&self, msg: &str) {
        self.emit(Severity::Critical, msg)
    }
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for Severity {
    fn color(&self) -> Color {
        use Severity::*;
        match self {
            Info => Color::Cyan,
            Success => Color::Green,
            Warning => Color::BrightYellow,
            Error => Color::BrightRed,
            Critical => Color::Red,
        }
    }
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

/// Forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn emit(&self, severity: Severity, msg: &str) {
        use Severity::*;
        match severity {
            Info => log::info!("{}", msg),
            Success => log::info!("{}", msg.color(severity.color())),
            Warning => log::warn!("{}", msg),
            Error => log::error!("{}", msg),
            Critical => log::error!("{} {}", "CRITICAL".on_red().bold(), msg),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.records()
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }
}

impl Sink for MemorySink {
    fn emit(&self, severity: Severity, msg: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((severity, msg.to_owned()));
        }
    }
}
