pub mod allocator;
pub mod bench;
pub mod counter;
pub mod driver;
pub mod reporter;
pub mod runner;
pub mod strategy;

pub use allocator::CountingAllocator;
pub use bench::{AccessOutcome, Value, access_loop, allocation_cycle};
pub use counter::{AllocationCounter, AllocationSnapshot};
pub use driver::{BenchConfig, Driver};
pub use reporter::Reporter;
pub use runner::{Scenario, ScenarioAggregate, TrialRecord, TrialRunner};
pub use strategy::{AccessStrategy, AllocStrategy};
