use crate::runner::{ScenarioAggregate, TrialRecord};
use colored::*;
use std::io::{self, Write};

/// Console sink for trial and summary lines.
///
/// Lines are plain text unless color is switched on, in which case only the
/// timings and headers are highlighted; the wording never changes.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
    verbosity: u8,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            color: false,
            verbosity: 0,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn trial(&mut self, record: &TrialRecord<'_>) -> io::Result<()> {
        let scenario = record.scenario;
        let seconds = self.seconds(record.elapsed.as_secs_f64());
        writeln!(
            self.out,
            "Time for {} {} {}: {}",
            scenario.operation, scenario.iterations, scenario.label, seconds
        )
    }

    pub fn summary(&mut self, aggregate: &ScenarioAggregate) -> io::Result<()> {
        let scenario = &aggregate.scenario;
        let seconds = self.seconds(aggregate.mean_secs());
        writeln!(
            self.out,
            "Average time for {} {} {} in {} repeats: {}\n",
            scenario.operation,
            scenario.iterations,
            scenario.label,
            aggregate.count(),
            seconds
        )
    }

    /// Section header, shown from verbosity 1.
    pub fn phase_header(&mut self, title: &str) -> io::Result<()> {
        if self.verbosity < 1 {
            return Ok(());
        }
        if self.color {
            writeln!(self.out, "{}", title.bright_blue().bold())
        } else {
            writeln!(self.out, "{}", title)
        }
    }

    /// Free-form diagnostic line, shown from verbosity 1.
    pub fn note(&mut self, text: &str) -> io::Result<()> {
        if self.verbosity < 1 {
            return Ok(());
        }
        if self.color {
            writeln!(self.out, "{}", text.dimmed())
        } else {
            writeln!(self.out, "{}", text)
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn seconds(&self, secs: f64) -> String {
        let text = format!("{:.6}s", secs);
        if self.color {
            text.bright_green().to_string()
        } else {
            text
        }
    }
}
