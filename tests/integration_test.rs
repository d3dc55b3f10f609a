// Integration tests for loading and running Barebones programs

use barebones::interpreter::engine::{Interpreter, RunState, Step};
use barebones::interpreter::RuntimeError;
use barebones::parser::{self, ParseError};
use std::fs;
use std::path::Path;

fn run_source(source: &str) -> Interpreter {
    let program = parser::load(source).expect("Loading failed");
    let mut interpreter = Interpreter::new(program);
    interpreter.run().expect("Execution failed");
    interpreter
}

#[test]
fn test_loop_runs_body_once() {
    let interp = run_source("clear X; while X == 0; incr X; end while");

    assert_eq!(interp.variables().get("X"), Some(1));
    assert_eq!(interp.state(), RunState::Finished);
}

#[test]
fn test_if_body_skipped() {
    let interp = run_source("clear X; incr X; if X == 0; incr X; end if");
    assert_eq!(interp.variables().get("X"), Some(1));
}

#[test]
fn test_if_body_taken() {
    let interp = run_source("clear X; if X == 0; incr X; end if; incr X");
    assert_eq!(interp.variables().get("X"), Some(2));
}

#[test]
fn test_undeclared_comparison_reads_zero() {
    let interp = run_source("while Y > 0; incr Z; end while");

    assert_eq!(interp.variables().get("Y"), Some(0));
    assert_eq!(interp.variables().get("Z"), None);
}

#[test]
fn test_decr_never_negative() {
    let interp = run_source("clear X; decr X; decr X; decr Fresh");

    assert_eq!(interp.variables().get("X"), Some(0));
    assert_eq!(interp.variables().get("Fresh"), Some(0));
}

#[test]
fn test_clear_is_idempotent() {
    let once = run_source("incr X; incr X; clear X");
    let twice = run_source("incr X; incr X; clear X; clear X");

    assert_eq!(once.variables(), twice.variables());
    assert_eq!(twice.variables().get("X"), Some(0));
}

#[test]
fn test_incr_creates_variable_at_one() {
    let interp = run_source("incr New");
    assert_eq!(interp.variables().get("New"), Some(1));
}

#[test]
fn test_all_operators() {
    let interp = run_source(
        "clear X; incr X; incr X\n\
         if X == 2; incr Eq; end if\n\
         if X not 3; incr Ne; end if\n\
         if X > 1; incr Gt; end if\n\
         if X < 3; incr Lt; end if\n\
         if X > 2; incr Never; end if",
    );

    assert_eq!(interp.variables().get("Eq"), Some(1));
    assert_eq!(interp.variables().get("Ne"), Some(1));
    assert_eq!(interp.variables().get("Gt"), Some(1));
    assert_eq!(interp.variables().get("Lt"), Some(1));
    assert_eq!(interp.variables().get("Never"), None);
}

#[test]
fn test_nested_blocks() {
    let interp = run_source(
        "clear X; incr X; incr X; incr X\n\
         while X not 0\n\
         decr X\n\
         if X == 1\n\
         incr Hit\n\
         end if\n\
         incr Count\n\
         end while",
    );

    assert_eq!(interp.variables().get("X"), Some(0));
    assert_eq!(interp.variables().get("Hit"), Some(1));
    assert_eq!(interp.variables().get("Count"), Some(3));
    assert_eq!(interp.loop_depth(), 0);
}

#[test]
fn test_multiply_demo() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/multiply.bb");
    let source = fs::read_to_string(path).expect("Failed to read demo file");

    let interp = run_source(&source);

    assert_eq!(interp.variables().get("X"), Some(0));
    assert_eq!(interp.variables().get("Y"), Some(4));
    assert_eq!(interp.variables().get("Z"), Some(12));
    assert_eq!(interp.variables().get("W"), Some(0));
    assert!(interp.elapsed().is_some());
}

#[test]
fn test_jump_targets_are_lifo() {
    let program = parser::load(
        "while A not 0; if B == 0; end if; while C > 1; end while; end while; if D < 2; end if",
    )
    .expect("Loading failed");

    let entries = program.jumps().entries();
    let pairs: Vec<(usize, usize)> = entries.iter().map(|(o, t)| (*o, t.end)).collect();
    assert_eq!(pairs, vec![(0, 5), (1, 2), (3, 4), (6, 7)]);
    for (opener, end) in pairs {
        assert!(end > opener);
    }
}

#[test]
fn test_unterminated_while_rejected() {
    let err = parser::load("clear X; while X == 0; incr X").unwrap_err();

    assert_eq!(err.errors.len(), 1);
    assert!(matches!(err.errors[0], ParseError::UnterminatedBlock { .. }));
}

#[test]
fn test_stray_end_rejected() {
    let err = parser::load("clear X; end while").unwrap_err();
    assert!(matches!(
        err.errors[0],
        ParseError::UnmatchedEnd { position: 1, .. }
    ));
}

#[test]
fn test_arity_errors_collected() {
    let err = parser::load("clear; incr X Y; while X 0; end while").unwrap_err();

    assert_eq!(err.errors.len(), 3);
    assert!(err
        .errors
        .iter()
        .all(|e| matches!(e, ParseError::IncorrectArguments { .. })));
}

#[test]
fn test_unknown_command_skipped() {
    let interp = run_source("incr X; frobnicate X; incr X");

    assert_eq!(interp.variables().get("X"), Some(2));
    let output = interp.terminal().get_output();
    assert_eq!(output.len(), 1);
    assert!(output[0].0.contains("frobnicate"));
}

#[test]
fn test_bad_literal_stops_run() {
    let program = parser::load("clear X; while X == ten; incr X; end while").expect("Loading failed");
    let mut interp = Interpreter::new(program);

    let result = interp.run();

    assert!(matches!(
        result,
        Err(RuntimeError::InvalidOperand { position: 1, .. })
    ));
    assert_eq!(interp.state(), RunState::Stopped);
    assert!(interp.terminal().has_errors());
    assert!(interp.elapsed().is_none());
}

#[test]
fn test_step_matches_run() {
    let source = "clear X; incr X; incr X\nwhile X not 0\ndecr X\nincr Y\nend while\nif Y == 2\nincr Z\nend if";

    let ran = run_source(source);

    let mut stepped = Interpreter::new(parser::load(source).expect("Loading failed"));
    let mut steps = 0;
    while let Step::Executed(_) = stepped.step().expect("Step failed") {
        steps += 1;
    }

    assert_eq!(stepped.variables(), ran.variables());
    assert_eq!(steps, ran.executed());
    assert_eq!(stepped.state(), RunState::Finished);
    assert!(stepped.elapsed().is_none());
}

#[test]
fn test_memory_dump_sorted() {
    let interp = run_source("incr b; incr a; incr a");
    assert_eq!(interp.memory_dump(), "Memory:\na <- 2\nb <- 1");
}
