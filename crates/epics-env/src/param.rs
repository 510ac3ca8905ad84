// crates/epics-env/src/param.rs
// ============================================================================
// Module: Configuration Parameters
// Description: Named parameters with compiled-in defaults.
// Purpose: Define the parameter model and the built-in EPICS parameter table.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ConfigParam`] pairs an environment variable name with a default string.
//! An empty default means the parameter has no default. The built-in table
//! lists the EPICS parameters in the order they are reported by
//! `print_all`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ParamError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Named configuration parameter with an optional default.
///
/// # Invariants
/// - `name` is non-empty and usable as an environment key.
/// - An empty `default` is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigParam {
    /// Environment variable name.
    name: Cow<'static, str>,
    /// Compiled-in default; empty when there is none.
    #[serde(default)]
    default: Cow<'static, str>,
}

impl ConfigParam {
    /// Creates a parameter from static strings for built-in tables.
    ///
    /// Callers are responsible for passing a valid name; use
    /// [`ConfigParam::try_new`] for names that come from untrusted input.
    #[must_use]
    pub const fn new(name: &'static str, default: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            default: Cow::Borrowed(default),
        }
    }

    /// Creates a parameter after validating its name.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidName`] when the name is empty or contains
    /// `=` or NUL.
    pub fn try_new(
        name: impl Into<String>,
        default: impl Into<String>,
    ) -> Result<Self, ParamError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name: Cow::Owned(name),
            default: Cow::Owned(default.into()),
        })
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default value, or `None` when the default is empty.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        if self.default.is_empty() { None } else { Some(&self.default) }
    }

    /// Validates the parameter name.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidName`] when the name is not a usable key.
    pub fn validate(&self) -> Result<(), ParamError> {
        validate_name(&self.name)
    }
}

/// Environment value written by `apply_site`.
///
/// # Invariants
/// - `name` refers to a parameter known to the owning catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteAssignment {
    /// Parameter name.
    pub name: Cow<'static, str>,
    /// Value to write.
    pub value: Cow<'static, str>,
}

impl SiteAssignment {
    /// Creates a site assignment from static strings.
    #[must_use]
    pub const fn new(name: &'static str, value: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            value: Cow::Borrowed(value),
        }
    }
}

// ============================================================================
// SECTION: Built-in Parameters
// ============================================================================

/// Minutes west of UTC used by the time stamp support.
pub const EPICS_TS_MIN_WEST: ConfigParam = ConfigParam::new("EPICS_TS_MIN_WEST", "360");
/// Command protocol port.
pub const EPICS_CMD_PROTO_PORT: ConfigParam = ConfigParam::new("EPICS_CMD_PROTO_PORT", "");
/// Alarm/archive port.
pub const EPICS_AR_PORT: ConfigParam = ConfigParam::new("EPICS_AR_PORT", "7002");
/// IOC log server address.
pub const EPICS_IOC_LOG_INET: ConfigParam = ConfigParam::new("EPICS_IOC_LOG_INET", "");
/// IOC log server port.
pub const EPICS_IOC_LOG_PORT: ConfigParam = ConfigParam::new("EPICS_IOC_LOG_PORT", "7004");
/// IOC log file size limit in bytes.
pub const EPICS_IOC_LOG_FILE_LIMIT: ConfigParam =
    ConfigParam::new("EPICS_IOC_LOG_FILE_LIMIT", "1000000");
/// IOC log file name.
pub const EPICS_IOC_LOG_FILE_NAME: ConfigParam = ConfigParam::new("EPICS_IOC_LOG_FILE_NAME", "");
/// Channel Access search address list.
pub const EPICS_CA_ADDR_LIST: ConfigParam = ConfigParam::new("EPICS_CA_ADDR_LIST", "");
/// Channel Access connection timeout in seconds.
pub const EPICS_CA_CONN_TMO: ConfigParam = ConfigParam::new("EPICS_CA_CONN_TMO", "30.0");
/// Channel Access beacon period in seconds.
pub const EPICS_CA_BEACON_PERIOD: ConfigParam =
    ConfigParam::new("EPICS_CA_BEACON_PERIOD", "15.0");
/// Whether Channel Access adds local broadcast addresses.
pub const EPICS_CA_AUTO_ADDR_LIST: ConfigParam =
    ConfigParam::new("EPICS_CA_AUTO_ADDR_LIST", "YES");
/// Channel Access repeater port.
pub const EPICS_CA_REPEATER_PORT: ConfigParam =
    ConfigParam::new("EPICS_CA_REPEATER_PORT", "5065");
/// Channel Access server port.
pub const EPICS_CA_SERVER_PORT: ConfigParam = ConfigParam::new("EPICS_CA_SERVER_PORT", "5064");

/// Built-in parameters in reporting order.
pub const BUILTIN_PARAMS: &[ConfigParam] = &[
    EPICS_TS_MIN_WEST,
    EPICS_CMD_PROTO_PORT,
    EPICS_AR_PORT,
    EPICS_IOC_LOG_INET,
    EPICS_IOC_LOG_PORT,
    EPICS_IOC_LOG_FILE_LIMIT,
    EPICS_IOC_LOG_FILE_NAME,
    EPICS_CA_ADDR_LIST,
    EPICS_CA_CONN_TMO,
    EPICS_CA_BEACON_PERIOD,
    EPICS_CA_AUTO_ADDR_LIST,
    EPICS_CA_REPEATER_PORT,
    EPICS_CA_SERVER_PORT,
];

/// Built-in site assignments applied by `apply_site`.
///
/// `EPICS_IOC_LOG_INET` and `EPICS_IOC_LOG_FILE_NAME` are also site
/// parameters, but their values depend on the installation and have no
/// portable default. Sites supply them through `[[site]]` entries in a
/// catalog file.
pub const BUILTIN_SITE: &[SiteAssignment] = &[
    SiteAssignment::new("EPICS_TS_MIN_WEST", "360"),
    SiteAssignment::new("EPICS_AR_PORT", "7002"),
    SiteAssignment::new("EPICS_IOC_LOG_PORT", "7004"),
    SiteAssignment::new("EPICS_IOC_LOG_FILE_LIMIT", "1000000"),
];

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects names that cannot be used as environment keys.
fn validate_name(name: &str) -> Result<(), ParamError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(ParamError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
