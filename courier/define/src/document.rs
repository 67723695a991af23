//! Versioned definition documents.
//!
//! Front ends that are not Rust source (JSON or TOML files) deliver a
//! [`DefinitionFile`]. The `version` field lets the generator refuse
//! documents written for a newer model.

use serde::{Deserialize, Serialize};

use crate::types::InterfaceSpec;

/// Model version written by this crate.
pub const CURRENT_VERSION: u32 = 1;

/// A set of interfaces loaded from a single document.
///
/// ## Examples
///
/// ```
/// use courier_define::{DefinitionFile, InterfaceSpec};
///
/// let doc = DefinitionFile::new(vec![InterfaceSpec::new("UserApi")]);
/// assert_eq!(doc.version, courier_define::CURRENT_VERSION);
/// assert!(doc.is_supported());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default, rename = "interface")]
    pub interfaces: Vec<InterfaceSpec>,
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

impl DefinitionFile {
    pub fn new(interfaces: Vec<InterfaceSpec>) -> Self {
        Self {
            version: CURRENT_VERSION,
            interfaces,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.version <= CURRENT_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;

    #[test]
    fn toml_document_round_trips_through_model() {
        let doc: DefinitionFile = toml::from_str(
            r#"
            version = 1

            [[interface]]
            name = "UserApi"
            base_url = "https://api.example.com"

            [[interface.methods]]
            name = "get_user"
            verb = "GET"
            path = "/users/{id}"
            returns = "Result<User, Error>"

            [[interface.methods.params]]
            name = "id"
            ty = "u64"
            tag = { name = "Path" }
            "#,
        )
        .unwrap();

        assert!(doc.is_supported());
        let method = &doc.interfaces[0].methods[0];
        assert_eq!(method.verb, HttpMethod::Get);
        assert!(method.params[0].has_tag("Path"));
        assert!(method.params[0].required);
    }

    #[test]
    fn newer_versions_are_not_supported() {
        let doc: DefinitionFile = serde_json::from_str(r#"{"version": 99}"#).unwrap();
        assert!(!doc.is_supported());
    }
}
