//! Generator configuration.
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) is valid. CLI flags override individual fields.
//!
//! ```toml
//! runtime = "courier_http"
//! trait_module = "crate::api"
//! client_suffix = "Client"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::GeneratorError;

const DEFAULT_RUNTIME: &str = "courier_http";
const DEFAULT_TRAIT_MODULE: &str = "super";
const DEFAULT_CLIENT_SUFFIX: &str = "Client";

/// Settings that shape the emitted code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Path of the runtime crate the generated code calls into.
    pub runtime: String,
    /// Module where the annotated traits live, relative to the output file.
    pub trait_module: String,
    /// Appended to the interface name to form the client type name.
    pub client_suffix: String,
    /// Extra line placed under the generated-code notice.
    pub header_comment: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime: DEFAULT_RUNTIME.to_string(),
            trait_module: DEFAULT_TRAIT_MODULE.to_string(),
            client_suffix: DEFAULT_CLIENT_SUFFIX.to_string(),
            header_comment: None,
        }
    }
}

impl GeneratorConfig {
    /// Reads and validates a TOML configuration file.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ReadError`] if the file cannot be read and
    /// [`GeneratorError::ConfigError`] if it does not parse or validate.
    pub fn load(path: &Path) -> Result<Self, GeneratorError> {
        let text = std::fs::read_to_string(path).map_err(|source| GeneratorError::ReadError {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|e| {
            GeneratorError::ConfigError(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field can be spliced into generated code.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] when `runtime` or
    /// `trait_module` is not a Rust path, or `client_suffix` is empty or
    /// not alphanumeric.
    ///
    /// ## Examples
    ///
    /// ```
    /// use courier_gen::config::GeneratorConfig;
    ///
    /// assert!(GeneratorConfig::default().validate().is_ok());
    ///
    /// let bad = GeneratorConfig { client_suffix: "Client!".into(), ..Default::default() };
    /// assert!(bad.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), GeneratorError> {
        for (field, value) in [("runtime", &self.runtime), ("trait_module", &self.trait_module)] {
            if syn::parse_str::<syn::Path>(value).is_err() {
                return Err(GeneratorError::ConfigError(format!(
                    "`{field}` must be a Rust path, got `{value}`"
                )));
            }
        }

        if self.client_suffix.is_empty() {
            return Err(GeneratorError::ConfigError(
                "`client_suffix` cannot be empty".to_string(),
            ));
        }
        if !self.client_suffix.chars().all(|c| c.is_alphanumeric()) {
            return Err(GeneratorError::ConfigError(format!(
                "`client_suffix` must contain only letters and numbers, got `{}`",
                self.client_suffix
            )));
        }
        Ok(())
    }

    pub(crate) fn runtime_path(&self) -> Result<syn::Path, GeneratorError> {
        parse_path("runtime", &self.runtime)
    }

    pub(crate) fn trait_module_path(&self) -> Result<syn::Path, GeneratorError> {
        parse_path("trait_module", &self.trait_module)
    }
}

fn parse_path(field: &str, value: &str) -> Result<syn::Path, GeneratorError> {
    syn::parse_str(value)
        .map_err(|e| GeneratorError::ConfigError(format!("`{field}` = `{value}`: {e}")))
}
