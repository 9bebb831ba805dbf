#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use shipcheck_core::smoke::{HELP_ARGS, SmokeTester};
use tempfile::TempDir;

/// Stubs are written and then executed; serialized to avoid ETXTBSY.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn write_stub(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("Product");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn background_child_holding_stdout_does_not_extend_the_wait() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "sleep 8 &\necho usage\nexit 0");
    let tester = SmokeTester::new(Duration::from_secs(1));

    let started = Instant::now();
    let outcome = tester.smoke_test(&stub, HELP_ARGS).unwrap();

    assert!(started.elapsed() < Duration::from_secs(5), "{:?}", started.elapsed());
    assert_eq!(outcome.exit_code, Some(0));
    assert!(!outcome.timed_out);
    assert!(outcome.succeeded());
    assert!(outcome.stdout.contains("usage"));
}

#[test]
fn timed_out_binary_keeps_partial_output() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let stub = write_stub(
        dir.path(),
        "echo started-but-hung\necho warming-up >&2\nexec sleep 10",
    );
    let tester = SmokeTester::new(Duration::from_secs(1));

    let outcome = tester.smoke_test(&stub, HELP_ARGS).unwrap();

    assert!(outcome.timed_out);
    assert_eq!(outcome.exit_code, None);
    assert!(outcome.stdout.contains("started-but-hung"));
    assert!(outcome.stderr.contains("warming-up"));
    assert!(outcome.elapsed_ms < 5_000);
}

#[test]
fn sub_second_timeout_is_honored() {
    let _guard = serial();
    let dir = TempDir::new().unwrap();
    let stub = write_stub(dir.path(), "exec sleep 10");
    let tester = SmokeTester::new(Duration::from_millis(300));

    let outcome = tester.smoke_test(&stub, HELP_ARGS).unwrap();
    let err = outcome.check(tester.timeout()).unwrap_err();

    assert!(outcome.timed_out);
    assert_eq!(err.to_string(), "`--help` timed out after 300ms");
}
