//! Core records of the metadata model.
//!
//! - [`InterfaceSpec`] - one annotated type and its endpoint methods
//! - [`MethodSpec`] - a single endpoint method
//! - [`HttpMethod`] - HTTP verb enumeration
//! - [`ItemKind`] - what sort of item carried the interface annotation

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::param::ParameterSpec;
use crate::tag::Tag;

/// HTTP verbs an endpoint method can declare.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use courier_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("PATCH").unwrap(), HttpMethod::Patch);
/// assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

/// The kind of item an interface annotation was found on.
///
/// Only traits are eligible; the generator rejects anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Trait,
    Struct,
    Enum,
    Function,
    Other,
}

/// An annotated HTTP interface.
///
/// ## Examples
///
/// ```
/// use courier_define::{HttpMethod, InterfaceSpec, MethodSpec};
///
/// let api = InterfaceSpec::new("UserApi")
///     .with_base_url("https://api.example.com")
///     .with_method(MethodSpec::new("list_users", HttpMethod::Get, "/users", "Result<Vec<User>, Error>"));
///
/// assert_eq!(api.methods.len(), 1);
/// assert!(api.is_eligible());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSpec {
    /// Type name of the interface (e.g. `UserApi`).
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    /// Base address used when the client is built without an override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

impl InterfaceSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ItemKind::Trait,
            base_url: None,
            description: None,
            methods: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Whether the annotated item is an abstract interface.
    pub fn is_eligible(&self) -> bool {
        self.kind == ItemKind::Trait
    }
}

/// A single endpoint method.
///
/// `returns` holds the declared Rust return type verbatim, e.g.
/// `Result<User, courier_http::Error>`. Parameter and method tags are
/// kept in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    pub verb: HttpMethod,
    /// Path template with `{name}` placeholders.
    pub path: String,
    #[serde(default)]
    pub params: Vec<ParameterSpec>,
    pub returns: String,
    #[serde(default = "default_true")]
    pub is_async: bool,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

fn default_true() -> bool {
    true
}

impl MethodSpec {
    pub fn new(
        name: impl Into<String>,
        verb: HttpMethod,
        path: impl Into<String>,
        returns: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            verb,
            path: path.into(),
            params: Vec::new(),
            returns: returns.into(),
            is_async: true,
            tags: Vec::new(),
            doc: None,
        }
    }

    pub fn with_param(mut self, param: ParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// First method-level tag with the given name.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.is(name))
    }

    /// All method-level tags with the given name, in declaration order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.is(name))
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::names;
    use strum::IntoEnumIterator;

    #[test]
    fn seven_http_methods() {
        assert_eq!(HttpMethod::iter().count(), 7);
    }

    #[test]
    fn http_method_parses_case_insensitively() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Options".parse::<HttpMethod>().unwrap(), HttpMethod::Options);
    }

    #[test]
    fn non_trait_items_are_not_eligible() {
        let item = InterfaceSpec::new("Thing").with_kind(ItemKind::Struct);
        assert!(!item.is_eligible());
    }

    #[test]
    fn tags_named_preserves_declaration_order() {
        let method = MethodSpec::new("ping", HttpMethod::Get, "/ping", "Result<(), Error>")
            .with_tag(Tag::new(names::HEADER).with("name", "A"))
            .with_tag(Tag::new(names::RAW))
            .with_tag(Tag::new(names::HEADER).with("name", "B"));

        let names: Vec<_> = method
            .tags_named(names::HEADER)
            .map(|t| t.str_attr("name").unwrap().unwrap())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(method.has_tag(names::RAW));
    }

    #[test]
    fn method_defaults_to_async_when_deserialized() {
        let method: MethodSpec = serde_json::from_str(
            r#"{"name":"ping","verb":"GET","path":"/ping","returns":"Result<(), Error>"}"#,
        )
        .unwrap();
        assert!(method.is_async);
        assert!(method.params.is_empty());
    }
}
