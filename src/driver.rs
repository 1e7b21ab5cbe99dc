use crate::bench::{self, Value};
use crate::reporter::Reporter;
use crate::runner::{Scenario, ScenarioAggregate, TrialRunner};
use crate::strategy::{AccessStrategy, AllocStrategy};
use std::io::{self, Write};

pub const DEFAULT_ITERATIONS: u64 = 100_000_000;
pub const DEFAULT_REPEATS: u32 = 15;
pub const DEFAULT_INITIAL_VALUE: Value = 2;

const ALLOC_OPERATION: &str = "initialising and deleting";
const ACCESS_OPERATION: &str = "reading from and writing to";

/// Everything a run needs. Strategies run in the order listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub iterations: u64,
    pub repeats: u32,
    /// Value pre-allocated before every access trial.
    pub initial_value: Value,
    pub alloc_strategies: Vec<AllocStrategy>,
    pub access_strategies: Vec<AccessStrategy>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            repeats: DEFAULT_REPEATS,
            initial_value: DEFAULT_INITIAL_VALUE,
            alloc_strategies: AllocStrategy::ALL.to_vec(),
            access_strategies: AccessStrategy::ALL.to_vec(),
        }
    }
}

impl BenchConfig {
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn initial_value(mut self, initial_value: Value) -> Self {
        self.initial_value = initial_value;
        self
    }

    pub fn alloc_strategies(mut self, strategies: impl IntoIterator<Item = AllocStrategy>) -> Self {
        self.alloc_strategies = strategies.into_iter().collect();
        self
    }

    pub fn access_strategies(
        mut self,
        strategies: impl IntoIterator<Item = AccessStrategy>,
    ) -> Self {
        self.access_strategies = strategies.into_iter().collect();
        self
    }
}

pub fn alloc_scenario(strategy: AllocStrategy, iterations: u64) -> Scenario {
    Scenario::new(ALLOC_OPERATION, iterations, strategy.label())
}

pub fn access_scenario(strategy: AccessStrategy, iterations: u64) -> Scenario {
    Scenario::new(
        ACCESS_OPERATION,
        iterations,
        format!("times through {}", strategy.label()),
    )
}

/// Runs the allocation phase, then the access phase, strictly one trial at a time.
pub struct Driver {
    config: BenchConfig,
    runner: TrialRunner,
}

impl Driver {
    pub fn new(config: BenchConfig) -> Self {
        let runner = TrialRunner::new(config.repeats);
        Self { config, runner }
    }

    pub fn run<W: Write>(&self, reporter: &mut Reporter<W>) -> io::Result<Vec<ScenarioAggregate>> {
        reporter.note(&format!(
            "iterations: {}, repeats: {}, initial value: {}",
            self.config.iterations, self.config.repeats, self.config.initial_value
        ))?;

        let mut results = self.run_allocation_phase(reporter)?;
        results.extend(self.run_access_phase(reporter)?);
        reporter.flush()?;
        Ok(results)
    }

    pub fn run_allocation_phase<W: Write>(
        &self,
        reporter: &mut Reporter<W>,
    ) -> io::Result<Vec<ScenarioAggregate>> {
        if self.config.alloc_strategies.is_empty() {
            return Ok(Vec::new());
        }
        reporter.phase_header("Allocation cost:")?;

        let iterations = self.config.iterations;
        let mut results = Vec::with_capacity(self.config.alloc_strategies.len());
        for &strategy in &self.config.alloc_strategies {
            let aggregate = self.runner.run(
                alloc_scenario(strategy, iterations),
                reporter,
                || bench::allocation_cycle(strategy, iterations),
            )?;
            results.push(aggregate);
        }
        Ok(results)
    }

    pub fn run_access_phase<W: Write>(
        &self,
        reporter: &mut Reporter<W>,
    ) -> io::Result<Vec<ScenarioAggregate>> {
        if self.config.access_strategies.is_empty() {
            return Ok(Vec::new());
        }
        reporter.phase_header("Access cost:")?;

        let iterations = self.config.iterations;
        let initial = self.config.initial_value;
        let mut results = Vec::with_capacity(self.config.access_strategies.len());
        for &strategy in &self.config.access_strategies {
            let aggregate = self.runner.run(
                access_scenario(strategy, iterations),
                reporter,
                || {
                    let outcome = bench::access_loop(strategy, iterations, initial);
                    debug_assert_eq!(
                        outcome.final_value,
                        initial.wrapping_add(iterations as Value)
                    );
                    outcome.elapsed
                },
            )?;
            results.push(aggregate);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_original_magnitudes() {
        let config = BenchConfig::default();
        assert_eq!(config.iterations, 100_000_000);
        assert_eq!(config.repeats, 15);
        assert_eq!(config.initial_value, 2);
        assert_eq!(config.alloc_strategies.len(), 5);
        assert_eq!(config.access_strategies.len(), 3);
    }

    #[test]
    fn test_driver_runs_every_selected_scenario() {
        let driver = Driver::new(BenchConfig::default().iterations(100).repeats(2));
        let mut reporter = Reporter::new(Vec::new());
        let results = driver.run(&mut reporter).unwrap();

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|aggregate| aggregate.count() == 2));

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(out.lines().filter(|l| l.starts_with("Time for")).count(), 16);
        assert_eq!(
            out.lines().filter(|l| l.starts_with("Average time for")).count(),
            8
        );
        assert!(out.contains("Average time for reading from and writing to 100 times through Rc<Cell> in 2 repeats: "));
    }

    #[test]
    fn test_empty_phase_is_skipped() {
        let driver = Driver::new(
            BenchConfig::default()
                .iterations(10)
                .repeats(1)
                .alloc_strategies(Vec::<AllocStrategy>::new())
                .access_strategies([AccessStrategy::Unique]),
        );
        let mut reporter = Reporter::new(Vec::new()).with_verbosity(1);
        let results = driver.run(&mut reporter).unwrap();

        assert_eq!(results.len(), 1);
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(!out.contains("Allocation cost:"));
        assert!(out.contains("Access cost:"));
    }
}
