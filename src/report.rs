use crate::Error;
use crate::Result;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Severity of a report line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Failure,
}

/// Single line of a conversion report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub text: String,
}

impl Display for LogLine {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.text)
    }
}

/// Files written by a successful conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionOutput {
    pub tileset: PathBuf,
    pub content: PathBuf,
}

/// Outcome of one conversion together with every line reported on the way.
#[derive(Debug)]
pub struct ConversionReport {
    lines: Vec<LogLine>,
    result: Result<ConversionOutput>,
}

impl ConversionReport {
    pub(crate) fn new(lines: Vec<LogLine>, result: Result<ConversionOutput>) -> Self {
        Self { lines, result }
    }

    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// Report lines in the order they were produced.
    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    pub fn output(&self) -> Option<&ConversionOutput> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&Error> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> Result<ConversionOutput> {
        self.result
    }
}

/// Collects report lines and forwards each one to a sink as soon as it is written.
pub(crate) struct Journal<'a> {
    lines: Vec<LogLine>,
    sink: &'a mut dyn FnMut(&LogLine),
}

impl<'a> Journal<'a> {
    pub fn new(sink: &'a mut dyn FnMut(&LogLine)) -> Self {
        Self {
            lines: Vec::new(),
            sink,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(Level::Info, text.into());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(Level::Success, text.into());
    }

    pub fn failure(&mut self, text: impl Into<String>) {
        self.push(Level::Failure, text.into());
    }

    fn push(&mut self, level: Level, text: String) {
        let line = LogLine { level, text };
        (self.sink)(&line);
        self.lines.push(line);
    }

    pub fn finish(self, result: Result<ConversionOutput>) -> ConversionReport {
        ConversionReport::new(self.lines, result)
    }
}
