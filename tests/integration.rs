use std::process::{Command, Output};

fn ptr_bench(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ptr-bench"))
        .args(args)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute command")
}

fn trial_lines(stdout: &str) -> Vec<&str> {
    stdout.lines().filter(|l| l.starts_with("Time for")).collect()
}

fn summary_lines(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .filter(|l| l.starts_with("Average time for"))
        .collect()
}

#[test]
fn test_raw_allocation_run() {
    let output = ptr_bench(&[
        "--phase", "alloc", "--alloc", "raw", "-n", "1000", "-r", "3",
    ]);

    assert!(output.status.success(), "Command should succeed");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);

    let trials = trial_lines(&stdout);
    assert_eq!(trials.len(), 3, "Should print one line per trial");
    for line in &trials {
        assert!(
            line.starts_with("Time for initialising and deleting 1000 raw pointer: "),
            "Unexpected trial line: {line}"
        );
        assert!(line.ends_with('s'));
    }

    let summaries = summary_lines(&stdout);
    assert_eq!(summaries.len(), 1, "Should print one mean line");
    assert!(summaries[0].starts_with(
        "Average time for initialising and deleting 1000 raw pointer in 3 repeats: "
    ));

    // The mean line comes after every trial line
    let last_trial = stdout.rfind("Time for").unwrap();
    let summary = stdout.find("Average time for").unwrap();
    assert!(summary > last_trial);
}

#[test]
fn test_summary_is_mean_of_printed_trials() {
    let output = ptr_bench(&["--phase", "access", "--access", "unique", "-n", "20000", "-r", "4"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    let seconds = |line: &str| -> f64 {
        line.rsplit(": ")
            .next()
            .and_then(|s| s.strip_suffix('s'))
            .and_then(|s| s.parse().ok())
            .expect("line should end with a duration")
    };

    let trials: Vec<f64> = trial_lines(&stdout).into_iter().map(seconds).collect();
    assert_eq!(trials.len(), 4);
    let mean = seconds(summary_lines(&stdout)[0]);

    // Printed values are rounded to microseconds
    let expected = trials.iter().sum::<f64>() / 4.0;
    assert!((mean - expected).abs() < 2e-6, "{mean} vs {expected}");
}

#[test]
fn test_full_battery_covers_every_strategy() {
    let output = ptr_bench(&["-n", "100", "-r", "2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(trial_lines(&stdout).len(), 16);
    assert_eq!(summary_lines(&stdout).len(), 8);
    for label in [
        "100 raw pointer in",
        "100 Box using Box::from_raw in",
        "100 Box using Box::new in",
        "100 Rc using Rc::from(Box) in",
        "100 Rc using Rc::new in",
        "100 times through raw pointer in",
        "100 times through Box in",
        "100 times through Rc<Cell> in",
    ] {
        assert!(stdout.contains(label), "Missing scenario: {label}");
    }
}

#[test]
fn test_zero_iterations() {
    let output = ptr_bench(&["-n", "0", "-r", "1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(summary_lines(&stdout).len(), 8);
}

#[test]
fn test_verbose_prints_headers() {
    let output = ptr_bench(&["-v", "-n", "10", "-r", "1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("iterations: 10, repeats: 1, initial value: 2"));
    assert!(stdout.contains("Allocation cost:"));
    assert!(stdout.contains("Access cost:"));
}

#[test]
fn test_strategy_for_skipped_phase_rejected() {
    for args in [
        ["--phase", "access", "--alloc", "raw"],
        ["--phase", "alloc", "--access", "shared"],
    ] {
        let output = ptr_bench(&args);
        assert_eq!(output.status.code(), Some(2), "{args:?} should be rejected");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("has no effect with --phase"), "{stderr}");
        assert!(output.stdout.is_empty(), "Nothing should run");
    }
}

#[test]
fn test_strategy_for_running_phase_accepted() {
    let output = ptr_bench(&["--phase", "access", "--access", "shared", "-n", "5", "-r", "1"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(trial_lines(&stdout).len(), 1);
    assert!(stdout.contains("5 times through Rc<Cell>"));
}

#[test]
fn test_zero_repeats_rejected() {
    let output = ptr_bench(&["-r", "0"]);
    assert!(!output.status.success(), "repeats = 0 should be rejected");
}

#[test]
fn test_help_output() {
    let output = ptr_bench(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--iterations"), "Should document --iterations");
    assert!(stdout.contains("--repeats"), "Should document --repeats");
    assert!(stdout.contains("--phase"), "Should document --phase");
    assert!(stdout.contains("--alloc"), "Should document --alloc");
    assert!(stdout.contains("--access"), "Should document --access");
    assert!(stdout.contains("--initial-value"), "Should document --initial-value");
}
