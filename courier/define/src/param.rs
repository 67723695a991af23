//! Parameter records.

use serde::{Deserialize, Serialize};

use crate::tag::Tag;

/// One parameter of an endpoint method.
///
/// A parameter carries at most one role tag. `ty` is Rust type syntax
/// (`String`, `Vec<HeaderEntry>`, `Option<u32>` ...); `default` is a Rust
/// expression used when an optional argument is omitted. A default is only
/// valid on a parameter that is not `required`.
///
/// ## Examples
///
/// ```
/// use courier_define::{ParameterSpec, Tag};
///
/// let id = ParameterSpec::new("id", "u64").tagged(Tag::new("Path"));
/// assert!(id.has_tag("Path"));
///
/// let page = ParameterSpec::new("page", "Option<u32>").optional().with_default("1");
/// assert!(!page.required);
/// assert_eq!(page.default.as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub ty: String,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
}

fn default_required() -> bool {
    true
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            required: true,
            default: None,
            tag: None,
        }
    }

    pub fn tagged(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tag.as_ref().is_some_and(|t| t.is(name))
    }
}
