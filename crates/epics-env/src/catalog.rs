// crates/epics-env/src/catalog.rs
// ============================================================================
// Module: Parameter Catalog
// Description: Built-in and file-defined parameter tables.
// Purpose: Load site parameter definitions from TOML with strict validation.
// Dependencies: serde, thiserror, toml, tracing
// ============================================================================

//! ## Overview
//! A [`ParamCatalog`] is the ordered set of parameters a site knows about plus
//! the site assignments written by `apply_site`. The built-in catalog covers
//! the standard EPICS parameters; a TOML catalog file can extend or replace
//! it.
//!
//! Catalog files are untrusted input: size and path limits are enforced
//! before parsing, and validation fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::param::BUILTIN_PARAMS;
use crate::param::BUILTIN_SITE;
use crate::param::ConfigParam;
use crate::param::SiteAssignment;
use crate::source::EnvSource;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Environment variable naming the catalog file.
pub const CATALOG_ENV_VAR: &str = "EPICS_ENV_CATALOG";
/// Maximum catalog file size in bytes.
pub(crate) const MAX_CATALOG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of parameters in a catalog file.
pub(crate) const MAX_CATALOG_PARAMS: usize = 1024;
/// Maximum number of site assignments in a catalog file.
pub(crate) const MAX_SITE_ASSIGNMENTS: usize = 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Catalog loading and validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O failure while reading the catalog.
    #[error("catalog io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("catalog parse error: {0}")]
    Parse(String),
    /// Invalid catalog data.
    #[error("invalid catalog: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Catalog File Model
// ============================================================================

/// On-disk catalog representation.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    /// Whether built-in parameters and site assignments are included.
    #[serde(default = "default_include_builtin")]
    include_builtin: bool,
    /// Parameter definitions.
    #[serde(default, rename = "param")]
    params: Vec<ConfigParam>,
    /// Site assignments.
    #[serde(default)]
    site: Vec<SiteAssignment>,
}

/// Default for [`CatalogFile::include_builtin`].
const fn default_include_builtin() -> bool {
    true
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Ordered parameter table with site assignments.
///
/// # Invariants
/// - Parameter names are valid and unique.
/// - Every site assignment names a parameter in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamCatalog {
    /// Parameters in reporting order.
    params: Vec<ConfigParam>,
    /// Site assignments in application order.
    site: Vec<SiteAssignment>,
}

impl ParamCatalog {
    /// Returns the built-in EPICS catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            params: BUILTIN_PARAMS.to_vec(),
            site: BUILTIN_SITE.to_vec(),
        }
    }

    /// Loads a catalog from `path`, the [`CATALOG_ENV_VAR`] variable, or the
    /// built-in table, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load<S: EnvSource + ?Sized>(
        path: Option<&Path>,
        env: &S,
    ) -> Result<Self, CatalogError> {
        match resolve_path(path, env)? {
            Some(resolved) => Self::load_file(&resolved),
            None => Ok(Self::builtin()),
        }
    }

    /// Loads and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| CatalogError::Io(err.to_string()))?;
        if bytes.len() > MAX_CATALOG_FILE_SIZE {
            return Err(CatalogError::Invalid("catalog file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| CatalogError::Invalid("catalog file must be utf-8".to_string()))?;
        let catalog = Self::from_toml_str(content)?;
        tracing::debug!(
            path = %path.display(),
            params = catalog.params.len(),
            site = catalog.site.len(),
            "loaded parameter catalog"
        );
        Ok(catalog)
    }

    /// Parses and validates catalog TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the text cannot be parsed or validated.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|err| CatalogError::Parse(err.to_string()))?;
        Self::from_file(file)
    }

    /// Returns the parameters in reporting order.
    #[must_use]
    pub fn params(&self) -> &[ConfigParam] {
        &self.params
    }

    /// Returns the site assignments in application order.
    #[must_use]
    pub fn site(&self) -> &[SiteAssignment] {
        &self.site
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ConfigParam> {
        self.params.iter().find(|param| param.name() == name)
    }

    /// Builds a catalog from the parsed file model.
    fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        if file.params.len() > MAX_CATALOG_PARAMS {
            return Err(CatalogError::Invalid("too many params in catalog".to_string()));
        }
        if file.site.len() > MAX_SITE_ASSIGNMENTS {
            return Err(CatalogError::Invalid("too many site entries in catalog".to_string()));
        }

        let mut seen = BTreeSet::new();
        for param in &file.params {
            param.validate().map_err(|err| CatalogError::Invalid(err.to_string()))?;
            if !seen.insert(param.name()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate param \"{}\" in catalog",
                    param.name()
                )));
            }
        }

        let mut catalog = if file.include_builtin {
            Self::builtin()
        } else {
            Self {
                params: Vec::new(),
                site: Vec::new(),
            }
        };
        for param in file.params {
            catalog.upsert(param);
        }
        for assignment in &file.site {
            if catalog.find(&assignment.name).is_none() {
                return Err(CatalogError::Invalid(format!(
                    "site entry \"{}\" names an unknown param",
                    assignment.name
                )));
            }
        }
        catalog.site.extend(file.site);
        Ok(catalog)
    }

    /// Replaces a parameter of the same name in place, or appends it.
    fn upsert(&mut self, param: ConfigParam) {
        match self.params.iter_mut().find(|existing| existing.name() == param.name()) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }
}

impl Default for ParamCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the catalog path from the argument or the environment.
fn resolve_path<S: EnvSource + ?Sized>(
    path: Option<&Path>,
    env: &S,
) -> Result<Option<PathBuf>, CatalogError> {
    if let Some(path) = path {
        return Ok(Some(path.to_path_buf()));
    }
    match env.var(CATALOG_ENV_VAR).filter(|value| !value.is_empty()) {
        Some(env_path) => {
            if env_path.len() > MAX_TOTAL_PATH_LENGTH {
                return Err(CatalogError::Invalid("catalog path exceeds max length".to_string()));
            }
            Ok(Some(PathBuf::from(env_path)))
        }
        None => Ok(None),
    }
}

/// Validates a catalog path against length limits.
fn validate_path(path: &Path) -> Result<(), CatalogError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(CatalogError::Invalid("catalog path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(CatalogError::Invalid("catalog path component too long".to_string()));
        }
    }
    Ok(())
}
