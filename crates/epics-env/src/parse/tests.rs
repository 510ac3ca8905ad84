// crates/epics-env/src/parse/tests.rs
// ============================================================================
// Module: Parameter Parsing Unit Tests
// Description: Tests for integer, real, and address converters.
// Purpose: Pin scanf-style prefix handling and strict address parsing.
// Dependencies: epics-env
// ============================================================================

//! ## Overview
//! Exercises the text converters used by the typed getters.

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
    clippy::float_cmp,
    clippy::approx_constant,
    reason = "Test-only assertions."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::Ipv4Addr;

use super::parse_double;
use super::parse_inet_addr;
use super::parse_long;

// ============================================================================
// SECTION: Integers
// ============================================================================

#[test]
fn parse_long_accepts_plain_and_signed_values() {
    assert_eq!(parse_long("42"), Some(42));
    assert_eq!(parse_long("-17"), Some(-17));
    assert_eq!(parse_long("+8"), Some(8));
    assert_eq!(parse_long("  \t360"), Some(360));
}

#[test]
fn parse_long_stops_at_first_non_digit() {
    assert_eq!(parse_long("42abc"), Some(42));
    assert_eq!(parse_long("5064 "), Some(5064));
    assert_eq!(parse_long("30.0"), Some(30));
}

#[test]
fn parse_long_rejects_non_numeric_text() {
    assert_eq!(parse_long("abc"), None);
    assert_eq!(parse_long(""), None);
    assert_eq!(parse_long("-"), None);
    assert_eq!(parse_long("+ 5"), None);
}

#[test]
fn parse_long_rejects_overflow() {
    assert_eq!(parse_long("9223372036854775807"), Some(i64::MAX));
    assert_eq!(parse_long("-9223372036854775808"), Some(i64::MIN));
    assert_eq!(parse_long("9223372036854775808"), None);
}

// ============================================================================
// SECTION: Reals
// ============================================================================

#[test]
fn parse_double_accepts_decimal_forms() {
    assert_eq!(parse_double("3.14"), Some(3.14));
    assert_eq!(parse_double("30"), Some(30.0));
    assert_eq!(parse_double(".5"), Some(0.5));
    assert_eq!(parse_double("5."), Some(5.0));
    assert_eq!(parse_double(" -2.5e3"), Some(-2500.0));
    assert_eq!(parse_double("1E-2"), Some(0.01));
}

#[test]
fn parse_double_ignores_trailing_text() {
    assert_eq!(parse_double("15.0s"), Some(15.0));
    assert_eq!(parse_double("2e"), Some(2.0));
    assert_eq!(parse_double("2e+"), Some(2.0));
    assert_eq!(parse_double("1.5.6"), Some(1.5));
}

#[test]
fn parse_double_accepts_special_values() {
    assert_eq!(parse_double("inf"), Some(f64::INFINITY));
    assert_eq!(parse_double("-Infinity"), Some(f64::NEG_INFINITY));
    assert!(parse_double("NaN").is_some_and(f64::is_nan));
    assert_eq!(parse_double("info"), Some(f64::INFINITY));
}

#[test]
fn parse_double_accepts_hex_notation() {
    assert_eq!(parse_double("0x1p3"), Some(8.0));
    assert_eq!(parse_double("0X1.8P1"), Some(3.0));
    assert_eq!(parse_double(" -0x10"), Some(-16.0));
    assert_eq!(parse_double("0x.8"), Some(0.5));
    assert_eq!(parse_double("0x1p-2"), Some(0.25));
    assert_eq!(parse_double("0xAp"), Some(10.0));
    assert_eq!(parse_double("0x1p2000"), Some(f64::INFINITY));
}

#[test]
fn parse_double_reads_zero_before_bare_hex_prefix() {
    assert_eq!(parse_double("0x"), Some(0.0));
    assert_eq!(parse_double("0xg"), Some(0.0));
}

#[test]
fn parse_double_rejects_non_numeric_text() {
    assert_eq!(parse_double("abc"), None);
    assert_eq!(parse_double("."), None);
    assert_eq!(parse_double("-"), None);
    assert_eq!(parse_double("e5"), None);
    assert_eq!(parse_double(""), None);
}

// ============================================================================
// SECTION: Addresses
// ============================================================================

#[test]
fn parse_inet_addr_accepts_dotted_quads() {
    assert_eq!(parse_inet_addr("127.0.0.1"), Some(Ipv4Addr::LOCALHOST));
    assert_eq!(parse_inet_addr(" 10.0.0.5\n"), Some(Ipv4Addr::new(10, 0, 0, 5)));
    assert_eq!(parse_inet_addr("255.255.255.255"), Some(Ipv4Addr::BROADCAST));
}

#[test]
fn parse_inet_addr_rejects_malformed_input() {
    assert_eq!(parse_inet_addr("127.0.0"), None);
    assert_eq!(parse_inet_addr("256.0.0.1"), None);
    assert_eq!(parse_inet_addr("localhost"), None);
    assert_eq!(parse_inet_addr("1.2.3.4.5"), None);
    assert_eq!(parse_inet_addr(""), None);
}
