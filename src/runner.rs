use crate::reporter::Reporter;
use std::io::{self, Write};
use std::time::Duration;

/// A named (operation, iteration count, strategy) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    /// e.g. "initialising and deleting"
    pub operation: &'static str,
    pub iterations: u64,
    /// Text printed after the iteration count, e.g. "Box using Box::new".
    pub label: String,
}

impl Scenario {
    pub fn new(operation: &'static str, iterations: u64, label: impl Into<String>) -> Self {
        Self {
            operation,
            iterations,
            label: label.into(),
        }
    }
}

/// One timed execution of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialRecord<'a> {
    pub scenario: &'a Scenario,
    pub elapsed: Duration,
}

/// Trial durations of one scenario, in the order they ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioAggregate {
    pub scenario: Scenario,
    durations: Vec<Duration>,
}

impl ScenarioAggregate {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            durations: Vec::new(),
        }
    }

    pub fn push(&mut self, elapsed: Duration) {
        self.durations.push(elapsed);
    }

    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    pub fn count(&self) -> usize {
        self.durations.len()
    }

    pub fn total(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// Arithmetic mean over every trial, in seconds. Zero when nothing ran.
    pub fn mean_secs(&self) -> f64 {
        if self.durations.is_empty() {
            return 0.0;
        }
        // Summing as Duration keeps the total exact regardless of trial order
        self.total().as_secs_f64() / self.durations.len() as f64
    }
}

/// Runs a scenario a fixed number of times, reporting each trial and the mean.
#[derive(Debug, Clone, Copy)]
pub struct TrialRunner {
    repeats: u32,
}

impl TrialRunner {
    pub fn new(repeats: u32) -> Self {
        Self { repeats }
    }

    /// `trial` performs one timed execution and returns its elapsed time.
    pub fn run<W: Write>(
        &self,
        scenario: Scenario,
        reporter: &mut Reporter<W>,
        mut trial: impl FnMut() -> Duration,
    ) -> io::Result<ScenarioAggregate> {
        let mut aggregate = ScenarioAggregate::new(scenario);

        for _ in 0..self.repeats {
            let elapsed = trial();
            reporter.trial(&TrialRecord {
                scenario: &aggregate.scenario,
                elapsed,
            })?;
            aggregate.push(elapsed);
        }

        reporter.summary(&aggregate)?;
        Ok(aggregate)
    }
}
