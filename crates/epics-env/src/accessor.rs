// crates/epics-env/src/accessor.rs
// ============================================================================
// Module: Parameter Accessor
// Description: Resolves configuration parameters to typed values.
// Purpose: Prefer environment overrides, fall back to compiled-in defaults.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! [`ConfigParamAccessor`] resolves a [`ConfigParam`] through an injected
//! [`EnvSource`]. A non-empty environment value wins over the default; an
//! empty default means the parameter is absent. Typed getters log the
//! offending text before returning an error.
//!
//! ## Invariants
//! - Returned strings never exceed `capacity - 1` characters.
//! - Failures are returned, never fatal.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::net::Ipv4Addr;

use crate::error::ParamError;
use crate::error::ValueKind;
use crate::param::ConfigParam;
use crate::param::SiteAssignment;
use crate::parse::parse_double;
use crate::parse::parse_inet_addr;
use crate::parse::parse_long;
use crate::source::EnvSource;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Buffer capacity used by the typed getters.
pub const TYPED_VALUE_CAPACITY: usize = 128;
/// Buffer capacity used when printing parameters.
pub const PRINT_CAPACITY: usize = 80;

// ============================================================================
// SECTION: Accessor
// ============================================================================

/// Resolves configuration parameters through an environment source.
#[derive(Debug, Default)]
pub struct ConfigParamAccessor<S> {
    /// Injected environment capability.
    source: S,
}

impl<S: EnvSource> ConfigParamAccessor<S> {
    /// Creates an accessor over `source`.
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self {
            source,
        }
    }

    /// Returns the underlying environment source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Returns the parameter value as text, or `None` when absent.
    ///
    /// The environment value is used when present and non-empty, otherwise the
    /// default. The result is truncated to `capacity - 1` characters.
    #[must_use]
    pub fn get_string(&self, param: &ConfigParam, capacity: usize) -> Option<String> {
        let env_value = self.source.var(param.name()).filter(|value| !value.is_empty());
        let value = match env_value {
            Some(value) => value,
            None => param.default_value()?.to_string(),
        };
        Some(truncate_chars(value, capacity.saturating_sub(1)))
    }

    /// Returns the parameter as a signed integer.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Absent`] when there is no value and
    /// [`ParamError::Parse`] when the text is not an integer.
    pub fn get_long(&self, param: &ConfigParam) -> Result<i64, ParamError> {
        self.get_typed(param, ValueKind::Long, parse_long)
    }

    /// Returns the parameter as a floating-point number.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Absent`] when there is no value and
    /// [`ParamError::Parse`] when the text is not a real number.
    pub fn get_double(&self, param: &ConfigParam) -> Result<f64, ParamError> {
        self.get_typed(param, ValueKind::Double, parse_double)
    }

    /// Returns the parameter as an IPv4 address.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Absent`] when there is no value and
    /// [`ParamError::Parse`] when the text is not a dotted quad.
    pub fn get_inet_addr(&self, param: &ConfigParam) -> Result<Ipv4Addr, ParamError> {
        self.get_typed(param, ValueKind::InetAddr, parse_inet_addr)
    }

    /// Writes `"<name>: <value>"` or `"<name> is undefined"` to `out`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when writing to `out` fails.
    pub fn print<W: Write + ?Sized>(&self, param: &ConfigParam, out: &mut W) -> io::Result<()> {
        match self.get_string(param, PRINT_CAPACITY) {
            Some(value) => writeln!(out, "{}: {value}", param.name()),
            None => writeln!(out, "{} is undefined", param.name()),
        }
    }

    /// Prints every parameter in order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when writing to `out` fails.
    pub fn print_all<'a, I, W>(&self, params: I, out: &mut W) -> io::Result<()>
    where
        I: IntoIterator<Item = &'a ConfigParam>,
        W: Write + ?Sized,
    {
        for param in params {
            self.print(param, out)?;
        }
        Ok(())
    }

    /// Writes `value` into the environment under the parameter name.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::EnvWrite`] when the source cannot be mutated.
    pub fn set(&self, param: &ConfigParam, value: &str) -> Result<(), ParamError> {
        self.source.set_var(param.name(), value).map_err(|err| {
            tracing::error!(
                param = param.name(),
                value,
                error = %err,
                "failed to set environment parameter"
            );
            ParamError::EnvWrite {
                name: param.name().to_string(),
                reason: err.reason,
            }
        })?;
        tracing::debug!(param = param.name(), value, "environment parameter set");
        Ok(())
    }

    /// Writes every site assignment in order.
    ///
    /// A failed assignment is logged and skipped; the remaining assignments
    /// are still written.
    ///
    /// # Errors
    ///
    /// Returns the first failure: [`ParamError::InvalidName`] for an unusable
    /// name or [`ParamError::EnvWrite`] when the source refuses a write.
    pub fn apply_site<'a, I>(&self, assignments: I) -> Result<(), ParamError>
    where
        I: IntoIterator<Item = &'a SiteAssignment>,
    {
        tracing::info!("setting EPICS environment parameters");
        let mut first_error = None;
        for assignment in assignments {
            let result = match ConfigParam::try_new(assignment.name.as_ref(), "") {
                Ok(param) => self.set(&param, &assignment.value),
                Err(err) => {
                    tracing::error!(
                        param = %assignment.name,
                        error = %err,
                        "skipping site assignment"
                    );
                    Err(err)
                }
            };
            if let Err(err) = result
                && first_error.is_none()
            {
                first_error = Some(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Resolves text with the typed buffer capacity and converts it.
    fn get_typed<T>(
        &self,
        param: &ConfigParam,
        kind: ValueKind,
        parse: fn(&str) -> Option<T>,
    ) -> Result<T, ParamError> {
        let Some(text) = self.get_string(param, TYPED_VALUE_CAPACITY) else {
            tracing::warn!(param = param.name(), expected = %kind, "parameter is undefined");
            return Err(ParamError::Absent {
                name: param.name().to_string(),
            });
        };
        parse(&text).ok_or_else(|| {
            tracing::warn!(
                param = param.name(),
                value = %text,
                expected = %kind,
                "illegal value for parameter"
            );
            ParamError::Parse {
                name: param.name().to_string(),
                kind,
                value: text,
            }
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Truncates `value` to at most `max_chars` characters.
fn truncate_chars(mut value: String, max_chars: usize) -> String {
    if let Some((index, _)) = value.char_indices().nth(max_chars) {
        value.truncate(index);
    }
    value
}
