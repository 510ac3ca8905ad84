// crates/epics-env/src/source/tests.rs
// ============================================================================
// Module: Environment Source Unit Tests
// Description: Tests for process, in-memory, and overlay sources.
// Purpose: Ensure write policy and shadowing rules hold.
// Dependencies: epics-env
// ============================================================================

//! ## Overview
//! Validates read/write behavior of the built-in [`EnvSource`] implementations.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::EnvSource;
use super::MapEnv;
use super::OverlayEnv;
use super::ProcessEnv;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn process_env_reads_existing_variables() {
    let Ok(expected) = std::env::var("PATH") else {
        return;
    };
    assert_eq!(ProcessEnv.var("PATH"), Some(expected));
}

#[test]
fn process_env_rejects_writes() {
    let err = ProcessEnv.set_var("EPICS_ENV_TEST_WRITE", "1").unwrap_err();
    assert!(err.reason.contains("read-only"), "unexpected reason: {}", err.reason);
    assert!(err.reason.contains("EPICS_ENV_TEST_WRITE"));
    assert_eq!(ProcessEnv.var("EPICS_ENV_TEST_WRITE"), None);
}

#[test]
fn map_env_last_writer_wins() {
    let env = MapEnv::from_entries([("EPICS_CA_SERVER_PORT", "5064")]);
    env.set_var("EPICS_CA_SERVER_PORT", "6064").unwrap();
    env.set_var("EPICS_CA_SERVER_PORT", "7064").unwrap();
    assert_eq!(env.var("EPICS_CA_SERVER_PORT").as_deref(), Some("7064"));
    assert_eq!(env.snapshot().len(), 1);
}

#[test]
fn map_env_missing_key_is_none() {
    let env = MapEnv::new();
    assert_eq!(env.var("EPICS_CA_ADDR_LIST"), None);
}

#[test]
fn overlay_shadows_base_without_mutating_it() {
    let base = MapEnv::from_entries([("EPICS_AR_PORT", "7002"), ("EPICS_TS_MIN_WEST", "360")]);
    let overlay = OverlayEnv::new(&base);
    overlay.set_var("EPICS_AR_PORT", "8002").unwrap();

    assert_eq!(overlay.var("EPICS_AR_PORT").as_deref(), Some("8002"));
    assert_eq!(overlay.var("EPICS_TS_MIN_WEST").as_deref(), Some("360"));
    assert_eq!(base.var("EPICS_AR_PORT").as_deref(), Some("7002"));
    assert_eq!(overlay.overrides().get("EPICS_AR_PORT").map(String::as_str), Some("8002"));
}

#[test]
fn overlay_accepts_writes_over_read_only_base() {
    let overlay = OverlayEnv::new(ProcessEnv);
    overlay.set_var("EPICS_ENV_TEST_OVERLAY", "yes").unwrap();
    assert_eq!(overlay.var("EPICS_ENV_TEST_OVERLAY").as_deref(), Some("yes"));
    assert_eq!(overlay.base().var("EPICS_ENV_TEST_OVERLAY"), None);
}

#[test]
fn map_env_keeps_entries_after_poisoned_lock() {
    let env = MapEnv::from_entries([("EPICS_AR_PORT", "7002")]);
    std::thread::scope(|scope| {
        let handle = scope.spawn(|| {
            let _guard = env.values.lock().unwrap();
            panic!("poison the table");
        });
        assert!(handle.join().is_err());
    });
    assert!(env.values.is_poisoned());

    assert_eq!(env.var("EPICS_AR_PORT").as_deref(), Some("7002"));
    env.set_var("EPICS_IOC_LOG_PORT", "7004").unwrap();
    assert_eq!(env.snapshot().len(), 2);
}
