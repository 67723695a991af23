//! Path template resolution.
//!
//! Templates use `{name}` placeholders. Each Path-role parameter replaces
//! the first remaining occurrence of its key, in parameter declaration
//! order. A key that was already substituted is not substituted again, so a
//! template repeating `{id}` keeps its second occurrence verbatim even when
//! two parameters map to `id`. Placeholders with no parameter are left as
//! they are.

use std::collections::HashSet;

use proc_macro2::Ident;

use crate::classify::KeyedParam;

/// One piece of a resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    Param(Ident),
}

/// A path template after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub segments: Vec<PathSegment>,
}

impl ResolvedPath {
    /// Renders the path with concrete values, for previews and tests.
    ///
    /// ## Examples
    ///
    /// ```
    /// use courier_gen::path::{PathSegment, ResolvedPath};
    /// use proc_macro2::{Ident, Span};
    ///
    /// let path = ResolvedPath {
    ///     segments: vec![
    ///         PathSegment::Literal("/users/".into()),
    ///         PathSegment::Param(Ident::new("id", Span::call_site())),
    ///     ],
    /// };
    /// assert_eq!(path.render(|_| "7".to_string()), "/users/7");
    /// ```
    pub fn render(&self, value_of: impl Fn(&Ident) -> String) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Literal(text) => text.clone(),
                PathSegment::Param(ident) => value_of(ident),
            })
            .collect()
    }

    /// Builds a `format!` string and its arguments. Literal braces are
    /// escaped so unresolved placeholders survive formatting.
    pub fn format_parts(&self) -> (String, Vec<&Ident>) {
        let mut fmt = String::new();
        let mut args = Vec::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Literal(text) => {
                    fmt.push_str(&text.replace('{', "{{").replace('}', "}}"));
                }
                PathSegment::Param(ident) => {
                    fmt.push_str("{}");
                    args.push(ident);
                }
            }
        }
        (fmt, args)
    }

    /// Whether no parameter was substituted.
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, PathSegment::Literal(_)))
    }

    /// Placeholders still present in the literal parts.
    pub fn unresolved(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Literal(text) => Some(extract_path_params(text)),
                PathSegment::Param(_) => None,
            })
            .flatten()
            .collect()
    }
}

/// Substitutes Path-role parameters into `template`.
///
/// ## Examples
///
/// ```
/// use courier_gen::path::resolve_path;
///
/// let path = resolve_path("/models", &[]);
/// assert!(path.is_static());
/// assert_eq!(path.render(|_| unreachable!()), "/models");
/// ```
pub fn resolve_path(template: &str, params: &[KeyedParam]) -> ResolvedPath {
    let mut segments = vec![PathSegment::Literal(template.to_string())];
    let mut substituted: HashSet<&str> = HashSet::new();

    for keyed in params {
        if !substituted.insert(keyed.key.as_str()) {
            tracing::debug!(key = %keyed.key, param = %keyed.param.ident, "placeholder already substituted");
            continue;
        }
        let placeholder = format!("{{{}}}", keyed.key);

        let hit = segments.iter().enumerate().find_map(|(idx, s)| match s {
            PathSegment::Literal(text) => text.find(&placeholder).map(|at| (idx, at)),
            PathSegment::Param(_) => None,
        });
        let Some((idx, at)) = hit else {
            continue;
        };
        let PathSegment::Literal(text) = segments.remove(idx) else {
            continue;
        };

        let before = &text[..at];
        let after = &text[at + placeholder.len()..];
        let mut replacement = Vec::with_capacity(3);
        if !before.is_empty() {
            replacement.push(PathSegment::Literal(before.to_string()));
        }
        replacement.push(PathSegment::Param(keyed.param.ident.clone()));
        if !after.is_empty() {
            replacement.push(PathSegment::Literal(after.to_string()));
        }
        segments.splice(idx..idx, replacement);
    }

    ResolvedPath { segments }
}

/// Extracts placeholder names from a path template.
///
/// ## Examples
///
/// ```
/// use courier_gen::path::extract_path_params;
///
/// assert_eq!(extract_path_params("/models"), vec![] as Vec<&str>);
/// assert_eq!(
///     extract_path_params("/threads/{thread_id}/messages/{message_id}"),
///     vec!["thread_id", "message_id"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut pos = 0;

    for (idx, c) in path.char_indices() {
        if c == '{' {
            pos = idx + 1;
        } else if c == '}' && pos > 0 {
            let param = &path[pos..idx];
            if !param.is_empty() {
                params.push(param);
            }
            pos = 0;
        }
    }

    params
}
