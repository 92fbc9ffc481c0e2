/*!
 * Batch Session Tests
 * Command scripts read from files
 */

use memory_sim::memory::FitStrategy;
use memory_sim::shell::{run, InputSource, OutputMode, Session, SessionSummary, SimConfig};
use memory_sim::MemoryManager;
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::{BufReader, Cursor, Write};

const SCRIPT: &str = "\
# allocate two processes
A P1 30 20
A P2 20

X 5
A P3 100
L P1
L ghost
Q
M
";

fn run_script(script: &str, config: &SimConfig) -> (SessionSummary, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = run(config, Cursor::new(script), &mut out, &mut err, false).unwrap();
    (
        summary,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn test_script_summary() {
    let (summary, _, _) = run_script(SCRIPT, &SimConfig::default());

    assert_eq!(
        summary,
        SessionSummary {
            commands: 6,
            allocations: 2,
            failed_allocations: 1,
            deallocations: 1,
            failed_deallocations: 1,
            warnings: 2,
        }
    );
}

#[test]
fn test_script_output_echoes_commands() {
    let (_, out, _) = run_script(SCRIPT, &SimConfig::default());

    let expected_prefix = "\
> A P1 30 20
Allocation succeeded
> A P2 20
Allocation succeeded
> A P3 100
Error: Out of memory: requested 100 units, largest free block is 50 units (50 free in total)
> L P1
Memory released
> L ghost
Error: Process ghost not found
> M
";
    assert!(out.starts_with(expected_prefix), "output was:\n{}", out);
    assert!(out.contains("=== MEMORY STATE ==="));
    assert!(out.contains("Memory map:"));
    assert!(out.contains("External fragmentation: 30 units (largest free block: 50)"));
    assert!(!out.contains("> Q"));
    assert!(!out.contains("# allocate"));
}

#[test]
fn test_malformed_lines_warn_with_line_numbers() {
    let (_, _, err) = run_script(SCRIPT, &SimConfig::default());

    let lines: Vec<&str> = err.lines().collect();
    assert_eq!(
        lines,
        vec![
            "warning (line 5): Unknown command 'X'",
            "warning (line 9): Q is only available interactively",
        ]
    );
}

#[test]
fn test_compact_output() {
    let config = SimConfig {
        output: OutputMode::Compact,
        ..SimConfig::default()
    };
    let (_, out, _) = run_script("A P1 10\nA P2 5 5\nL P1\nM\n", &config);

    assert_eq!(out, "[Free: 10][P2: 5][Free: 85]\n");
}

#[test]
fn test_json_output() {
    let config = SimConfig {
        memory_size: 50,
        strategy: FitStrategy::WorstFit,
        output: OutputMode::Json,
        ..SimConfig::default()
    };
    let (_, out, _) = run_script("A P1 10 4\nM\nS\n", &config);

    let json_lines: Vec<serde_json::Value> = out
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(json_lines.len(), 2);

    let report = &json_lines[0];
    assert_eq!(report["strategy"], "Worst Fit");
    assert_eq!(report["total_memory"], 50);
    assert_eq!(report["blocks"][0]["owner"], "P1");
    assert_eq!(report["blocks"][1]["is_free"], true);

    let stats = &json_lines[1];
    assert_eq!(stats["reserved_used"], 10);
    assert_eq!(stats["actual_used"], 4);
    assert_eq!(stats["internal_fragmentation"], 6);
}

#[test]
fn test_used_larger_than_size_is_reported() {
    let (summary, out, err) = run_script("A P1 10 20\nA P1 10\nA P1 5\n", &SimConfig::default());

    assert!(out.contains("Error: Used amount 20 exceeds reserved size 10"));
    assert!(out.contains("Error: Process P1 already holds an allocation"));
    assert_eq!(summary.allocations, 1);
    assert_eq!(summary.failed_allocations, 2);
    assert!(err.is_empty());
}

#[test]
fn test_script_from_file() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    write!(script, "A P1 60\nA P2 60\nL P1\nA P2 40\n").unwrap();

    let config = SimConfig::from_sources(
        vec![
            "--file".to_string(),
            script.path().display().to_string(),
            "--size".to_string(),
            "100".to_string(),
        ],
        |_| None,
    )
    .unwrap();
    let InputSource::File(path) = &config.input else {
        panic!("expected a file input, got {:?}", config.input);
    };

    let file = BufReader::new(File::open(path).unwrap());
    let summary = run(&config, file, Vec::new(), Vec::new(), false).unwrap();

    assert_eq!(summary.allocations, 2);
    assert_eq!(summary.failed_allocations, 1);
    assert_eq!(summary.deallocations, 1);
}

#[test]
fn test_session_keeps_manager_state() {
    let manager = MemoryManager::new(40, FitStrategy::BestFit).unwrap();
    let mut session = Session::new(manager, OutputMode::Table, Vec::new(), Vec::new());

    session
        .run_batch(Cursor::new("A big 20\nA small 5\nL big\nA mid 8\n"))
        .unwrap();
    let (manager, _, _) = session.into_parts();

    // Holes of 20 at 0 and 15 at 25; the smaller one wins
    let mid = manager.owner_block("mid").unwrap();
    assert_eq!(mid.start, 25);
    assert!(manager.contains("small"));
    assert!(!manager.contains("big"));
}

#[test]
fn test_map_for_huge_memory() {
    let config = SimConfig {
        memory_size: usize::MAX / 10,
        ..SimConfig::default()
    };
    let (summary, out, _) = run_script("A P1 10\nM\n", &config);

    assert_eq!(summary.allocations, 1);
    let map = out
        .lines()
        .skip_while(|line| *line != "Memory map:")
        .nth(1)
        .unwrap();
    assert_eq!(map, format!("[#{}]", ".".repeat(49)));
}
