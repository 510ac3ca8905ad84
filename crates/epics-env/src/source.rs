// crates/epics-env/src/source.rs
// ============================================================================
// Module: Environment Sources
// Description: Injected capabilities for reading and writing parameters.
// Purpose: Decouple the accessor from the process environment.
// Dependencies: Standard library only.
// ============================================================================

//! ## Overview
//! The accessor never touches `std::env` directly. It reads and writes through
//! an [`EnvSource`], which may be the real process environment, an in-memory
//! table, or an overlay combining both.
//!
//! ## Invariants
//! - [`ProcessEnv`] is read-only; writes fail with [`EnvWriteError`].
//! - Writable sources follow last-writer-wins semantics.
//! - Overlay entries shadow the base source.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::error::EnvWriteError;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Source of environment values keyed by parameter name.
pub trait EnvSource {
    /// Returns the value stored under `name`, if any.
    fn var(&self, name: &str) -> Option<String>;

    /// Stores `value` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvWriteError`] when the source cannot be mutated.
    fn set_var(&self, name: &str, value: &str) -> Result<(), EnvWriteError>;
}

impl<S: EnvSource + ?Sized> EnvSource for &S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }

    fn set_var(&self, name: &str, value: &str) -> Result<(), EnvWriteError> {
        (**self).set_var(name, value)
    }
}

// ============================================================================
// SECTION: Process Environment
// ============================================================================

/// Read-only view of the process environment.
///
/// # Invariants
/// - Non-unicode values are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set_var(&self, name: &str, _value: &str) -> Result<(), EnvWriteError> {
        Err(EnvWriteError::new(format!(
            "process environment is read-only; cannot set {name}"
        )))
    }
}

// ============================================================================
// SECTION: In-Memory Environment
// ============================================================================

/// Writable in-memory environment table.
#[derive(Debug, Default)]
pub struct MapEnv {
    /// Stored values keyed by name.
    values: Mutex<BTreeMap<String, String>>,
}

impl MapEnv {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table pre-populated with the given entries.
    #[must_use]
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect();
        Self {
            values: Mutex::new(values),
        }
    }

    /// Returns a copy of every stored entry in name order.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries().clone()
    }

    /// Locks the table, recovering the stored entries from a poisoned lock.
    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EnvSource for MapEnv {
    fn var(&self, name: &str) -> Option<String> {
        self.entries().get(name).cloned()
    }

    fn set_var(&self, name: &str, value: &str) -> Result<(), EnvWriteError> {
        self.entries().insert(name.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// SECTION: Overlay Environment
// ============================================================================

/// Writable overlay on top of a base source.
///
/// Reads consult the overlay first and fall back to the base. Writes only ever
/// land in the overlay, so a read-only base such as [`ProcessEnv`] is never
/// mutated.
#[derive(Debug, Default)]
pub struct OverlayEnv<S> {
    /// Fallback source.
    base: S,
    /// Values written through this source.
    overlay: MapEnv,
}

impl<S: EnvSource> OverlayEnv<S> {
    /// Creates an empty overlay over `base`.
    #[must_use]
    pub fn new(base: S) -> Self {
        Self {
            base,
            overlay: MapEnv::new(),
        }
    }

    /// Returns the base source.
    #[must_use]
    pub const fn base(&self) -> &S {
        &self.base
    }

    /// Returns a copy of the overlay entries in name order.
    #[must_use]
    pub fn overrides(&self) -> BTreeMap<String, String> {
        self.overlay.snapshot()
    }
}

impl<S: EnvSource> EnvSource for OverlayEnv<S> {
    fn var(&self, name: &str) -> Option<String> {
        self.overlay.var(name).or_else(|| self.base.var(name))
    }

    fn set_var(&self, name: &str, value: &str) -> Result<(), EnvWriteError> {
        self.overlay.set_var(name, value)
    }
}

#[cfg(test)]
mod tests;
