// crates/epics-env/src/error.rs
// ============================================================================
// Module: Parameter Errors
// Description: Error types for parameter lookup, parsing, and writes.
// Purpose: Report non-fatal accessor failures to callers.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every accessor failure is reported as a [`ParamError`]. None of them are
//! fatal: callers decide whether a missing or malformed parameter matters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Value Kinds
// ============================================================================

/// Typed interpretation requested for a parameter value.
///
/// # Invariants
/// - Labels are stable for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Base-10 signed integer.
    Long,
    /// Floating-point literal.
    Double,
    /// Dotted-quad IPv4 address.
    InetAddr,
}

impl ValueKind {
    /// Returns a stable label for the value kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Long => "integer",
            Self::Double => "real number",
            Self::InetAddr => "inet address",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by the parameter accessor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// No environment value and no default.
    #[error("{name} is undefined")]
    Absent {
        /// Parameter name.
        name: String,
    },
    /// Value present but not convertible to the requested kind.
    #[error("illegal value for {name}:{value} (expected {kind})")]
    Parse {
        /// Parameter name.
        name: String,
        /// Requested interpretation.
        kind: ValueKind,
        /// Offending text.
        value: String,
    },
    /// The environment source refused the write.
    #[error("failed to set environment parameter \"{name}\": {reason}")]
    EnvWrite {
        /// Parameter name.
        name: String,
        /// Reason reported by the source.
        reason: String,
    },
    /// Parameter name cannot be used as an environment key.
    #[error("invalid parameter name \"{name}\"")]
    InvalidName {
        /// Rejected name.
        name: String,
    },
}

/// Failure reported by an environment source that cannot store a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct EnvWriteError {
    /// Human-readable reason.
    pub reason: String,
}

impl EnvWriteError {
    /// Constructs a new [`EnvWriteError`].
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
