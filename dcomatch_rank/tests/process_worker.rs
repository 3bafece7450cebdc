#![cfg(unix)]

use std::time::{Duration, Instant};

use dcomatch_rank::{Comparator, ComparisonError, ProcessComparator};

fn shell(script: &str) -> ProcessComparator {
    ProcessComparator::new("sh").with_args(["-c", script])
}

fn paragraphs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn reads_reply_from_worker_stdout() {
    let worker = shell(r#"cat > /dev/null; printf '{"similarity": 87.5, "reordered": true}'"#);
    let comparison = worker
        .compare(&paragraphs(&["(1) a"]), &paragraphs(&["(1) b"]))
        .expect("worker reply");
    assert_eq!(comparison.similarity, 87.5);
    assert!(comparison.reordered);
}

#[test]
fn worker_receives_both_sequences_as_json() {
    let worker = shell(
        r#"input=$(cat); case "$input" in *'"source":["alpha"]'*'"target":["beta"]'*) echo '[64.0, false]';; *) exit 7;; esac"#,
    );
    let comparison = worker
        .compare(&paragraphs(&["alpha"]), &paragraphs(&["beta"]))
        .expect("worker reply");
    assert_eq!(comparison.similarity, 64.0);
}

#[test]
fn nonzero_exit_reports_code_and_stderr() {
    let worker = shell("cat > /dev/null; echo 'no model loaded' >&2; exit 3");
    match worker.compare(&paragraphs(&["a"]), &paragraphs(&["b"])) {
        Err(ComparisonError::Exit { code, stderr }) => {
            assert_eq!(code, Some(3));
            assert_eq!(stderr, "no model loaded");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn malformed_reply_is_an_error() {
    let worker = shell("cat > /dev/null; echo 'similarity: high'");
    assert!(matches!(
        worker.compare(&paragraphs(&["a"]), &paragraphs(&["b"])),
        Err(ComparisonError::Malformed(_))
    ));
}

#[test]
fn slow_worker_is_killed_after_timeout() {
    let worker = shell("exec sleep 5").with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    assert!(matches!(
        worker.compare(&paragraphs(&["a"]), &paragraphs(&["b"])),
        Err(ComparisonError::Timeout(_))
    ));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn background_child_holding_stdout_hits_timeout() {
    let worker = shell("cat > /dev/null; sleep 3 & echo '[60.0, false]'")
        .with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    assert!(matches!(
        worker.compare(&paragraphs(&["a"]), &paragraphs(&["b"])),
        Err(ComparisonError::Timeout(_))
    ));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn missing_program_fails_to_spawn() {
    let worker = ProcessComparator::new("/nonexistent/dcomatch-worker");
    assert!(matches!(
        worker.compare(&paragraphs(&["a"]), &paragraphs(&["b"])),
        Err(ComparisonError::Spawn(_))
    ));
}

#[test]
fn empty_input_is_rejected_before_spawning() {
    let worker = ProcessComparator::new("/nonexistent/dcomatch-worker");
    assert!(matches!(
        worker.compare(&[], &[]),
        Err(ComparisonError::EmptyInput)
    ));
}
