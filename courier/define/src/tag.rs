//! Declarative tags attached to methods and parameters.
//!
//! A [`Tag`] is a name plus literal attributes. Tags carry no behavior of
//! their own; `courier-gen` resolves them into roles, auth descriptors and
//! status policies.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known tag names understood by the generator.
///
/// Several names are valid at both method and parameter level with
/// different meanings (e.g. a method-level `Header` is a static header,
/// a parameter-level `Header` binds the argument as a header value).
pub mod names {
    // Method and parameter level
    pub const HEADER: &str = "Header";
    pub const FIELD: &str = "Field";
    pub const FORM: &str = "Form";
    pub const MULTIPART: &str = "Multipart";

    // Method level
    pub const THROWS: &str = "Throws";
    pub const RAW: &str = "Raw";
    pub const HTTP2: &str = "Http2";
    pub const BASIC_AUTH: &str = "BasicAuth";
    pub const DIGEST_AUTH: &str = "DigestAuth";
    pub const BEARER_AUTH: &str = "BearerAuth";
    pub const HAWK_AUTH: &str = "HawkAuth";

    // Parameter level
    pub const PATH: &str = "Path";
    pub const QUERY: &str = "Query";
    pub const QUERIES: &str = "Queries";
    pub const HEADERS: &str = "Headers";
    pub const PART: &str = "Part";
    pub const BODY: &str = "Body";
    pub const EXTRA: &str = "Extra";
    pub const REQUEST_OPTIONS: &str = "RequestOptions";
    pub const BASIC_USERNAME: &str = "BasicUsername";
    pub const BASIC_PASSWORD: &str = "BasicPassword";
    pub const DIGEST_USERNAME: &str = "DigestUsername";
    pub const DIGEST_PASSWORD: &str = "DigestPassword";
    pub const BEARER_TOKEN: &str = "BearerToken";
    pub const BEARER_PREFIX: &str = "BearerPrefix";
    pub const HAWK_KEY: &str = "HawkKey";
    pub const HAWK_ID: &str = "HawkId";
    pub const HAWK_ALGORITHM: &str = "HawkAlgorithm";
    pub const HAWK_EXT: &str = "HawkExt";
}

/// A literal attribute value on a [`Tag`].
///
/// ## Examples
///
/// ```
/// use courier_define::TagValue;
///
/// let v: TagValue = "application/json".into();
/// assert_eq!(v.as_str(), Some("application/json"));
/// assert_eq!(TagValue::Int(400).as_int(), Some(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A string literal.
    Str(String),
    /// A reference to an enum variant (e.g. `HawkAlgorithm::Sha256` is
    /// stored as `Sha256`).
    Enum {
        #[serde(rename = "enum")]
        variant: String,
    },
}

impl TagValue {
    /// Creates an enum reference value.
    pub fn variant(name: impl Into<String>) -> Self {
        Self::Enum {
            variant: name.into(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short label of the literal kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Enum { .. } => "enum",
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Enum { variant } => write!(f, "{variant}"),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An attribute was present but held the wrong kind of literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("attribute `{attr}` of tag `{tag}` must be {expected}, found {found}")]
pub struct TagAttrError {
    pub tag: String,
    pub attr: String,
    pub expected: &'static str,
    pub found: String,
}

/// A declarative marker with literal attributes.
///
/// ## Examples
///
/// ```
/// use courier_define::Tag;
///
/// let throws = Tag::new("Throws").with("min", 400_i64).with("negate", true);
/// assert_eq!(throws.int_attr("min").unwrap(), Some(400));
/// assert_eq!(throws.bool_attr("negate").unwrap(), Some(true));
/// assert_eq!(throws.int_attr("max").unwrap(), None);
/// assert!(throws.str_attr("min").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, TagValue>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) an attribute.
    pub fn with(mut self, attr: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.attrs.insert(attr.into(), value.into());
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, attr: &str) -> Option<&TagValue> {
        self.attrs.get(attr)
    }

    /// Returns a string attribute, `Ok(None)` when absent.
    ///
    /// ## Errors
    ///
    /// Returns [`TagAttrError`] if the attribute holds a non-string literal.
    pub fn str_attr(&self, attr: &str) -> Result<Option<&str>, TagAttrError> {
        self.typed(attr, "a string", TagValue::as_str)
    }

    /// Returns an integer attribute, `Ok(None)` when absent.
    ///
    /// ## Errors
    ///
    /// Returns [`TagAttrError`] if the attribute holds a non-integer literal.
    pub fn int_attr(&self, attr: &str) -> Result<Option<i64>, TagAttrError> {
        self.typed(attr, "an integer", TagValue::as_int)
    }

    /// Returns a boolean attribute, `Ok(None)` when absent.
    ///
    /// ## Errors
    ///
    /// Returns [`TagAttrError`] if the attribute holds a non-boolean literal.
    pub fn bool_attr(&self, attr: &str) -> Result<Option<bool>, TagAttrError> {
        self.typed(attr, "a boolean", TagValue::as_bool)
    }

    /// Returns an enum-variant attribute. A plain string is accepted too,
    /// so `algorithm = "sha256"` and `algorithm = HawkAlgorithm::Sha256`
    /// both resolve.
    ///
    /// ## Errors
    ///
    /// Returns [`TagAttrError`] for integer or boolean literals.
    pub fn enum_attr(&self, attr: &str) -> Result<Option<&str>, TagAttrError> {
        self.typed(attr, "an enum variant", |v| match v {
            TagValue::Enum { variant } => Some(variant.as_str()),
            TagValue::Str(s) => Some(s.as_str()),
            _ => None,
        })
    }

    fn typed<'a, T>(
        &'a self,
        attr: &str,
        expected: &'static str,
        extract: impl Fn(&'a TagValue) -> Option<T>,
    ) -> Result<Option<T>, TagAttrError> {
        match self.attrs.get(attr) {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| TagAttrError {
                tag: self.name.clone(),
                attr: attr.to_string(),
                expected,
                found: value.kind().to_string(),
            }),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.attrs.is_empty() {
            let attrs: Vec<String> = self
                .attrs
                .iter()
                .map(|(k, v)| format!("{k} = {v}"))
                .collect();
            write!(f, "({})", attrs.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_attribute_is_none() {
        let tag = Tag::new(names::PATH);
        assert_eq!(tag.str_attr("name").unwrap(), None);
    }

    #[test]
    fn wrong_kind_reports_tag_and_attribute() {
        let tag = Tag::new(names::THROWS).with("min", "four hundred");
        let err = tag.int_attr("min").unwrap_err();
        assert_eq!(err.tag, "Throws");
        assert_eq!(err.attr, "min");
        assert_eq!(err.found, "string");
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn enum_attr_accepts_variant_and_string() {
        let tag = Tag::new(names::HAWK_AUTH)
            .with("algorithm", TagValue::variant("Sha256"))
            .with("fallback", "sha1");
        assert_eq!(tag.enum_attr("algorithm").unwrap(), Some("Sha256"));
        assert_eq!(tag.enum_attr("fallback").unwrap(), Some("sha1"));
    }

    #[test]
    fn display_lists_attributes_in_key_order() {
        let tag = Tag::new(names::HEADER)
            .with("value", "json")
            .with("name", "Accept");
        assert_eq!(tag.to_string(), r#"Header(name = "Accept", value = "json")"#);
    }

    #[test]
    fn tag_values_deserialize_from_plain_json() {
        let tag: Tag = serde_json::from_str(
            r#"{"name":"Throws","attrs":{"min":400,"negate":true,"label":"x","alg":{"enum":"Sha1"}}}"#,
        )
        .unwrap();
        assert_eq!(tag.attr("min"), Some(&TagValue::Int(400)));
        assert_eq!(tag.attr("negate"), Some(&TagValue::Bool(true)));
        assert_eq!(tag.attr("label"), Some(&TagValue::Str("x".into())));
        assert_eq!(tag.attr("alg"), Some(&TagValue::variant("Sha1")));
    }
}
