//! Front ends that produce interface definitions.
//!
//! - [`file`] - `.json` / `.toml` documents holding a [`DefinitionFile`]
//! - [`rust`] - `.rs` source with `#[api]`-annotated traits
//!
//! Both yield [`Definitions`]: the interfaces found, plus faults detected
//! while reading them (for instance a method without a verb attribute).
//!
//! [`DefinitionFile`]: courier_define::DefinitionFile

pub mod file;
pub mod rust;

use std::path::Path;

use courier_define::InterfaceSpec;

use crate::errors::{GenerationError, GeneratorError};

/// Interfaces loaded from one input, with front-end faults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions {
    pub interfaces: Vec<InterfaceSpec>,
    pub faults: Vec<GenerationError>,
}

impl From<Vec<InterfaceSpec>> for Definitions {
    fn from(interfaces: Vec<InterfaceSpec>) -> Self {
        Self {
            interfaces,
            faults: Vec::new(),
        }
    }
}

/// Loads definitions from `path`, choosing the front end by extension.
///
/// ## Errors
///
/// Returns [`GeneratorError::ReadError`] if the file cannot be read,
/// [`GeneratorError::ParseError`] if it does not parse, and
/// [`GeneratorError::ConfigError`] for an unknown extension or an
/// unsupported document version.
pub fn load_definitions(path: &Path) -> Result<Definitions, GeneratorError> {
    let text = std::fs::read_to_string(path).map_err(|source| GeneratorError::ReadError {
        path: path.display().to_string(),
        source,
    })?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    let definitions = match extension {
        "rs" => rust::parse_source(&text, path)?,
        "json" | "toml" => file::parse_document(&text, extension, path)?.into(),
        other => {
            return Err(GeneratorError::ConfigError(format!(
                "unsupported input '{}': expected a .rs, .json or .toml file, got extension `{other}`",
                path.display()
            )));
        }
    };

    tracing::debug!(
        path = %path.display(),
        interfaces = definitions.interfaces.len(),
        faults = definitions.faults.len(),
        "loaded definitions"
    );
    Ok(definitions)
}
