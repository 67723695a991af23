//! JSON and TOML definition documents.

use std::path::Path;

use courier_define::{CURRENT_VERSION, DefinitionFile, InterfaceSpec};

use crate::errors::GeneratorError;

/// Deserialises a [`DefinitionFile`] and returns its interfaces.
///
/// `format` is `"json"` or `"toml"`; anything else is treated as TOML.
///
/// ## Errors
///
/// Returns [`GeneratorError::ParseError`] if the document does not
/// deserialise, and [`GeneratorError::ConfigError`] if it was written for a
/// newer model version.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use courier_gen::frontend::file::parse_document;
///
/// let interfaces = parse_document(
///     r#"{"interface": [{"name": "UserApi", "base_url": "https://api.example.com"}]}"#,
///     "json",
///     Path::new("api.json"),
/// )
/// .unwrap();
/// assert_eq!(interfaces[0].base_url.as_deref(), Some("https://api.example.com"));
/// ```
pub fn parse_document(
    text: &str,
    format: &str,
    path: &Path,
) -> Result<Vec<InterfaceSpec>, GeneratorError> {
    let parse_error = |reason: String| GeneratorError::ParseError {
        path: path.display().to_string(),
        reason,
    };
    let document: DefinitionFile = match format {
        "json" => serde_json::from_str(text).map_err(|e| parse_error(e.to_string()))?,
        _ => toml::from_str(text).map_err(|e| parse_error(e.to_string()))?,
    };

    if !document.is_supported() {
        return Err(GeneratorError::ConfigError(format!(
            "'{}' has version {}; this generator supports up to {CURRENT_VERSION}",
            path.display(),
            document.version
        )));
    }
    Ok(document.interfaces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_define::{HttpMethod, ItemKind, names};

    #[test]
    fn toml_document_with_tags() {
        let interfaces = parse_document(
            r#"
            [[interface]]
            name = "Files"

            [[interface.methods]]
            name = "upload"
            verb = "POST"
            path = "/files"
            returns = "Result<(), Error>"
            tags = [{ name = "Multipart", attrs = { boundary = "xyz" } }]

            [[interface.methods.params]]
            name = "file"
            ty = "PathBuf"
            tag = { name = "Part", attrs = { filename = "a.txt" } }
            "#,
            "toml",
            Path::new("files.toml"),
        )
        .unwrap();

        let method = &interfaces[0].methods[0];
        assert_eq!(method.verb, HttpMethod::Post);
        assert_eq!(
            method.tag(names::MULTIPART).unwrap().str_attr("boundary").unwrap(),
            Some("xyz")
        );
        assert!(method.params[0].has_tag(names::PART));
    }

    #[test]
    fn json_keeps_item_kind() {
        let interfaces = parse_document(
            r#"{"interface": [{"name": "Settings", "kind": "struct"}]}"#,
            "json",
            Path::new("settings.json"),
        )
        .unwrap();
        assert_eq!(interfaces[0].kind, ItemKind::Struct);
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = parse_document(r#"{"version": 2}"#, "json", Path::new("v2.json")).unwrap_err();
        assert!(matches!(err, GeneratorError::ConfigError(_)));
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse_document("{", "json", Path::new("bad.json")).unwrap_err();
        match err {
            GeneratorError::ParseError { path, .. } => assert_eq!(path, "bad.json"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
