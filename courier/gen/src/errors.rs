//! Error types for the courier generator.
//!
//! [`GenerationError`] covers faults in an interface definition: they are
//! detected while analysing a method and name the offending method or
//! parameter. [`GeneratorError`] wraps everything the tool as a whole can
//! hit, including I/O and configuration problems.

use courier_define::{ItemKind, TagAttrError};
use thiserror::Error;

use crate::classify::RoleKind;

/// A generation-time fault in an interface definition.
///
/// These are never retried. Emission for the offending method stops; other
/// methods of the same interface are still analysed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The annotated item is not a trait.
    #[error("`{name}` is a {kind}; only traits can be annotated as HTTP interfaces")]
    NotAnInterface { name: String, kind: ItemKind },

    /// A role that allows one parameter per method appears twice.
    #[error(
        "method `{method}`: parameters `{first}` and `{second}` both take the {role} role, which allows only one parameter"
    )]
    DuplicateRole {
        method: String,
        role: RoleKind,
        first: String,
        second: String,
    },

    /// A role-tagged parameter has a type the role cannot use.
    #[error(
        "method `{method}`: parameter `{param}` of type `{found}` cannot take the {role} role; expected {expected}"
    )]
    InvalidParameterType {
        method: String,
        param: String,
        role: RoleKind,
        found: String,
        expected: &'static str,
    },

    /// The declared return type matches no response strategy.
    #[error("method `{method}`: unsupported return type `{found}`: {reason}")]
    InvalidReturnType {
        method: String,
        found: String,
        reason: String,
    },

    /// A tag attribute, parameter name or verb is malformed or missing.
    #[error("method `{method}`: {reason}")]
    InvalidDefinition { method: String, reason: String },
}

impl GenerationError {
    pub(crate) fn invalid_attr(method: &str, source: TagAttrError) -> Self {
        Self::InvalidDefinition {
            method: method.to_string(),
            reason: source.to_string(),
        }
    }

    /// Name of the method the fault belongs to, if it is method-scoped.
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::NotAnInterface { .. } => None,
            Self::DuplicateRole { method, .. }
            | Self::InvalidParameterType { method, .. }
            | Self::InvalidReturnType { method, .. }
            | Self::InvalidDefinition { method, .. } => Some(method),
        }
    }
}

/// Errors that can occur while running the generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Failed to parse an input definition
    #[error("Failed to parse definition '{path}': {reason}")]
    ParseError { path: String, reason: String },

    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generated code did not parse back as Rust
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// A single definition fault
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// One or more interfaces had faults; nothing was written.
    #[error("{} definition fault(s):\n{}", .0.len(), render_faults(.0))]
    Faults(Vec<GenerationError>),
}

fn render_faults(faults: &[GenerationError]) -> String {
    faults
        .iter()
        .map(|f| format!("  - {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_role_names_both_parameters() {
        let err = GenerationError::DuplicateRole {
            method: "create".into(),
            role: RoleKind::Body,
            first: "a".into(),
            second: "b".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("`create`"));
        assert!(msg.contains("`a`"));
        assert!(msg.contains("`b`"));
        assert!(msg.contains("Body"));
        assert_eq!(err.method(), Some("create"));
    }

    #[test]
    fn not_an_interface_has_no_method() {
        let err = GenerationError::NotAnInterface {
            name: "Config".into(),
            kind: ItemKind::Struct,
        };
        assert_eq!(err.method(), None);
        assert!(err.to_string().contains("`Config` is a struct"));
    }

    #[test]
    fn faults_render_one_per_line() {
        let err = GeneratorError::Faults(vec![
            GenerationError::InvalidDefinition {
                method: "a".into(),
                reason: "x".into(),
            },
            GenerationError::InvalidDefinition {
                method: "b".into(),
                reason: "y".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 definition fault(s):"));
        assert!(msg.contains("  - method `a`: x"));
        assert!(msg.contains("  - method `b`: y"));
    }
}
