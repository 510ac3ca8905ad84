// crates/epics-env/src/lib.rs
// ============================================================================
// Module: EPICS Environment Parameters
// Description: Typed access to environment-sourced configuration parameters.
// Purpose: Resolve named parameters from an injected environment with defaults.
// Dependencies: serde, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! This crate resolves EPICS configuration parameters. Each [`ConfigParam`]
//! names an environment variable and carries a compiled-in default; the
//! [`ConfigParamAccessor`] prefers a non-empty environment value, falls back to
//! the default, and converts the text to integers, reals, or IPv4 addresses.
//!
//! Environment access goes through the [`EnvSource`] capability so callers
//! can resolve parameters against the process environment, an in-memory
//! table, or an overlay without global state.
//!
//! Invariants:
//! - Accessor failures are reported as [`ParamError`] and are never fatal.
//! - Catalog files are validated before any parameter is exposed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod accessor;
pub mod catalog;
pub mod error;
pub mod param;
pub mod parse;
pub mod source;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use accessor::ConfigParamAccessor;
pub use accessor::PRINT_CAPACITY;
pub use accessor::TYPED_VALUE_CAPACITY;
pub use catalog::CATALOG_ENV_VAR;
pub use catalog::CatalogError;
pub use catalog::ParamCatalog;
pub use error::EnvWriteError;
pub use error::ParamError;
pub use error::ValueKind;
pub use param::BUILTIN_PARAMS;
pub use param::BUILTIN_SITE;
pub use param::ConfigParam;
pub use param::SiteAssignment;
pub use source::EnvSource;
pub use source::MapEnv;
pub use source::OverlayEnv;
pub use source::ProcessEnv;
