use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use ptr_bench::driver::{DEFAULT_INITIAL_VALUE, DEFAULT_ITERATIONS, DEFAULT_REPEATS};
use ptr_bench::{AccessStrategy, AllocStrategy, BenchConfig, Driver, Reporter};
use std::io::IsTerminal;
use std::process;

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
    All,
    Alloc,
    Access,
}

#[derive(Clone, Copy, ValueEnum)]
enum AllocStrategyArg {
    Raw,
    UniqueNew,
    UniqueFactory,
    SharedNew,
    SharedFactory,
}

impl From<AllocStrategyArg> for AllocStrategy {
    fn from(arg: AllocStrategyArg) -> Self {
        match arg {
            AllocStrategyArg::Raw => AllocStrategy::Raw,
            AllocStrategyArg::UniqueNew => AllocStrategy::UniqueNew,
            AllocStrategyArg::UniqueFactory => AllocStrategy::UniqueFactory,
            AllocStrategyArg::SharedNew => AllocStrategy::SharedNew,
            AllocStrategyArg::SharedFactory => AllocStrategy::SharedFactory,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AccessStrategyArg {
    Raw,
    Unique,
    Shared,
}

impl From<AccessStrategyArg> for AccessStrategy {
    fn from(arg: AccessStrategyArg) -> Self {
        match arg {
            AccessStrategyArg::Raw => AccessStrategy::Raw,
            AccessStrategyArg::Unique => AccessStrategy::Unique,
            AccessStrategyArg::Shared => AccessStrategy::Shared,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about = "Time allocation and access through raw, Box and Rc pointers", long_about = None)]
struct Args {
    /// Loop iterations per trial
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u64,

    /// Trials per scenario; the summary line reports their mean
    #[arg(short, long, default_value_t = DEFAULT_REPEATS, value_parser = clap::value_parser!(u32).range(1..))]
    repeats: u32,

    /// Value pre-allocated before each access trial
    #[arg(long, default_value_t = DEFAULT_INITIAL_VALUE, allow_negative_numbers = true)]
    initial_value: i64,

    /// Which benchmark phase to run
    #[arg(long, value_enum, default_value = "all")]
    phase: PhaseArg,

    /// Allocation strategy to run (repeatable; default: all)
    #[arg(long = "alloc", value_enum)]
    alloc: Vec<AllocStrategyArg>,

    /// Access strategy to run (repeatable; default: all)
    #[arg(long = "access", value_enum)]
    access: Vec<AccessStrategyArg>,

    /// Increase verbosity (-v prints the configuration and phase headers)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Never colorize output
    #[arg(long)]
    no_color: bool,
}

impl Args {
    /// Strategy flags only make sense for a phase that actually runs.
    fn validate(&self) -> Result<(), clap::Error> {
        let skipped = match self.phase {
            PhaseArg::Access if !self.alloc.is_empty() => Some(("--alloc", "access")),
            PhaseArg::Alloc if !self.access.is_empty() => Some(("--access", "alloc")),
            _ => None,
        };

        match skipped {
            Some((flag, phase)) => Err(Args::command().error(
                ErrorKind::ArgumentConflict,
                format!("{flag} has no effect with --phase {phase}"),
            )),
            None => Ok(()),
        }
    }

    fn bench_config(&self) -> BenchConfig {
        let alloc: Vec<AllocStrategy> = match self.phase {
            PhaseArg::Access => Vec::new(),
            _ if self.alloc.is_empty() => AllocStrategy::ALL.to_vec(),
            _ => self.alloc.iter().map(|&arg| arg.into()).collect(),
        };
        let access: Vec<AccessStrategy> = match self.phase {
            PhaseArg::Alloc => Vec::new(),
            _ if self.access.is_empty() => AccessStrategy::ALL.to_vec(),
            _ => self.access.iter().map(|&arg| arg.into()).collect(),
        };

        BenchConfig::default()
            .iterations(self.iterations)
            .repeats(self.repeats)
            .initial_value(self.initial_value)
            .alloc_strategies(alloc)
            .access_strategies(access)
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        e.exit();
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let color = !args.no_color && stdout.is_terminal();
    let mut reporter = Reporter::new(stdout.lock())
        .with_color(color)
        .with_verbosity(args.verbose);

    Driver::new(args.bench_config()).run(&mut reporter)?;
    Ok(())
}
