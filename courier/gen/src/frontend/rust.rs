//! Rust source front end.
//!
//! Reads a `.rs` file and turns every item annotated with `#[api]` or
//! `#[courier::api]` into an [`InterfaceSpec`]:
//!
//! ```ignore
//! /// User management.
//! #[api(base_url = "https://api.example.com")]
//! pub trait UserApi {
//!     /// Fetch one user.
//!     #[get("/users/{id}")]
//!     #[bearer_auth(token = "secret")]
//!     async fn get_user(&self, #[path] id: u64) -> Result<User, Error>;
//!
//!     #[post("/search")]
//!     #[header("Accept", "application/json")]
//!     async fn search(&self, #[query("q")] term: String, #[default(1)] page: Option<u32>) -> Result<Vec<User>, Error>;
//! }
//! ```
//!
//! Verb attributes (`#[get]`, `#[post]` ...) give the method's verb and
//! path. Every other attribute becomes a [`Tag`] named in PascalCase
//! (`bearer_auth` -> `BearerAuth`). Arguments are `key = literal`,
//! `key = Enum::Variant`, or positional literals: the first is `name`, the
//! second `value` on a method-level `Header` or `Field`.

use std::path::Path;

use courier_define::{
    HttpMethod, InterfaceSpec, ItemKind, MethodSpec, ParameterSpec, Tag, TagValue, names,
};
use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, ExprLit, FnArg, Item, Lit, LitStr, Meta, Pat, PatType, ReturnType, Token,
    TraitItemFn, Type, UnOp,
};

use super::Definitions;
use crate::errors::{GenerationError, GeneratorError};
use crate::naming::to_pascal_case;

/// Built-in attributes that are never tags.
const PASSTHROUGH: &[&str] = &[
    "doc",
    "allow",
    "warn",
    "deny",
    "expect",
    "cfg",
    "cfg_attr",
    "must_use",
    "deprecated",
];

/// Where a tag attribute was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Method,
    Param,
}

/// Parses Rust source into interface definitions.
///
/// Malformed `#[api]` attributes abort parsing; problems inside a method
/// (missing verb, malformed tag) become faults and the method is skipped.
///
/// ## Errors
///
/// Returns [`GeneratorError::ParseError`] if the source does not parse or an
/// `#[api]` attribute is malformed.
///
/// ## Examples
///
/// ```
/// use std::path::Path;
/// use courier_gen::frontend::rust::parse_source;
///
/// let defs = parse_source(
///     r#"
///     #[api(base_url = "https://api.example.com")]
///     pub trait UserApi {
///         #[get("/users/{id}")]
///         async fn get_user(&self, #[path] id: u64) -> Result<User, Error>;
///     }
///     "#,
///     Path::new("api.rs"),
/// )
/// .unwrap();
///
/// let method = &defs.interfaces[0].methods[0];
/// assert_eq!(method.path, "/users/{id}");
/// assert!(method.params[0].has_tag("Path"));
/// ```
pub fn parse_source(text: &str, path: &Path) -> Result<Definitions, GeneratorError> {
    let parse_error = |e: syn::Error| GeneratorError::ParseError {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    let file = syn::parse_file(text).map_err(parse_error)?;
    let mut definitions = Definitions::default();
    collect_items(&file.items, &mut definitions).map_err(parse_error)?;
    Ok(definitions)
}

fn collect_items(items: &[Item], out: &mut Definitions) -> syn::Result<()> {
    for item in items {
        if let Item::Mod(module) = item {
            if let Some((_, content)) = &module.content {
                collect_items(content, out)?;
            }
            continue;
        }

        let attrs = item_attrs(item);
        let Some(api) = attrs.iter().find(|a| is_api_attr(a)) else {
            continue;
        };

        let mut interface = InterfaceSpec::new(item_name(item)).with_kind(item_kind(item));
        interface.base_url = api_base_url(api)?;
        interface.description = doc_text(attrs);

        if let Item::Trait(item_trait) = item {
            for trait_item in &item_trait.items {
                let syn::TraitItem::Fn(method) = trait_item else {
                    continue;
                };
                if method.default.is_some() {
                    tracing::debug!(
                        interface = %interface.name,
                        method = %method.sig.ident,
                        "skipping provided method"
                    );
                    continue;
                }
                match parse_method(method) {
                    Ok(spec) => interface.methods.push(spec),
                    Err(fault) => {
                        tracing::warn!(interface = %interface.name, %fault, "method fault");
                        out.faults.push(fault);
                    }
                }
            }
        }

        out.interfaces.push(interface);
    }
    Ok(())
}

fn item_attrs(item: &Item) -> &[Attribute] {
    match item {
        Item::Trait(i) => &i.attrs,
        Item::Struct(i) => &i.attrs,
        Item::Enum(i) => &i.attrs,
        Item::Fn(i) => &i.attrs,
        Item::Union(i) => &i.attrs,
        Item::Type(i) => &i.attrs,
        Item::Impl(i) => &i.attrs,
        Item::Const(i) => &i.attrs,
        Item::Static(i) => &i.attrs,
        _ => &[],
    }
}

fn item_name(item: &Item) -> String {
    match item {
        Item::Trait(i) => i.ident.to_string(),
        Item::Struct(i) => i.ident.to_string(),
        Item::Enum(i) => i.ident.to_string(),
        Item::Fn(i) => i.sig.ident.to_string(),
        Item::Union(i) => i.ident.to_string(),
        Item::Type(i) => i.ident.to_string(),
        Item::Const(i) => i.ident.to_string(),
        Item::Static(i) => i.ident.to_string(),
        Item::Impl(i) => i.self_ty.to_token_stream().to_string(),
        _ => "<item>".to_string(),
    }
}

fn item_kind(item: &Item) -> ItemKind {
    match item {
        Item::Trait(_) => ItemKind::Trait,
        Item::Struct(_) => ItemKind::Struct,
        Item::Enum(_) => ItemKind::Enum,
        Item::Fn(_) => ItemKind::Function,
        _ => ItemKind::Other,
    }
}

fn is_api_attr(attr: &Attribute) -> bool {
    let segments: Vec<String> = attr
        .path()
        .segments
        .iter()
        .map(|s| s.ident.to_string())
        .collect();
    matches!(
        segments.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
        ["api"] | ["courier", "api"]
    )
}

fn api_base_url(attr: &Attribute) -> syn::Result<Option<String>> {
    let mut base_url = None;
    if let Meta::List(_) = &attr.meta {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("base_url") {
                let value: LitStr = meta.value()?.parse()?;
                base_url = Some(value.value());
                Ok(())
            } else {
                Err(meta.error(format!(
                    "unknown api attribute: `{}`",
                    meta.path.to_token_stream()
                )))
            }
        })?;
    }
    Ok(base_url)
}

/// Joins `///` lines, trimmed. `None` when there are none.
fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    let text = lines.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn attr_name(attr: &Attribute) -> String {
    attr.path()
        .segments
        .last()
        .map(|s| s.ident.to_string())
        .unwrap_or_default()
}

fn verb_of(name: &str) -> Option<HttpMethod> {
    match name {
        "get" => Some(HttpMethod::Get),
        "post" => Some(HttpMethod::Post),
        "put" => Some(HttpMethod::Put),
        "patch" => Some(HttpMethod::Patch),
        "delete" => Some(HttpMethod::Delete),
        "head" => Some(HttpMethod::Head),
        "options" => Some(HttpMethod::Options),
        _ => None,
    }
}

fn parse_method(method: &TraitItemFn) -> Result<MethodSpec, GenerationError> {
    let name = method.sig.ident.to_string();
    let fault = |reason: String| GenerationError::InvalidDefinition {
        method: name.clone(),
        reason,
    };

    let mut endpoint: Option<(HttpMethod, String)> = None;
    let mut tags = Vec::new();
    for attr in &method.attrs {
        let attr_name = attr_name(attr);
        if PASSTHROUGH.contains(&attr_name.as_str()) {
            continue;
        }
        if let Some(verb) = verb_of(&attr_name) {
            let path: LitStr = attr
                .parse_args()
                .map_err(|e| fault(format!("`#[{attr_name}]` expects a path literal: {e}")))?;
            if endpoint.replace((verb, path.value())).is_some() {
                return Err(fault("more than one HTTP verb attribute".to_string()));
            }
            continue;
        }
        let tag = parse_tag(attr, &attr_name, Level::Method)
            .map_err(|e| fault(format!("`#[{attr_name}]`: {e}")))?;
        tags.push(tag);
    }

    let Some((verb, path)) = endpoint else {
        return Err(fault(
            "missing HTTP verb attribute such as `#[get(\"/path\")]`".to_string(),
        ));
    };

    let params = method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pt) => Some(pt),
            FnArg::Receiver(_) => None,
        })
        .map(|pt| parse_param(pt).map_err(&fault))
        .collect::<Result<Vec<_>, _>>()?;

    let returns = match &method.sig.output {
        ReturnType::Default => "()".to_string(),
        ReturnType::Type(_, ty) => ty.to_token_stream().to_string(),
    };

    let mut spec = MethodSpec::new(name.as_str(), verb, path, returns);
    spec.is_async = method.sig.asyncness.is_some();
    spec.params = params;
    spec.tags = tags;
    spec.doc = doc_text(&method.attrs);
    Ok(spec)
}

fn parse_param(pt: &PatType) -> Result<ParameterSpec, String> {
    let Pat::Ident(pat) = pt.pat.as_ref() else {
        return Err(format!(
            "parameter `{}` must be a plain identifier",
            pt.pat.to_token_stream()
        ));
    };
    let name = pat.ident.to_string();
    let mut spec = ParameterSpec::new(name.as_str(), pt.ty.to_token_stream().to_string());
    if is_option(&pt.ty) {
        spec = spec.optional();
    }

    for attr in &pt.attrs {
        let attr_name = attr_name(attr);
        if PASSTHROUGH.contains(&attr_name.as_str()) {
            continue;
        }
        if attr_name == "default" {
            let expr: Expr = attr
                .parse_args()
                .map_err(|e| format!("parameter `{name}`: `#[default]` expects an expression: {e}"))?;
            spec.default = Some(expr.to_token_stream().to_string());
            continue;
        }
        let tag = parse_tag(attr, &attr_name, Level::Param)
            .map_err(|e| format!("parameter `{name}`: `#[{attr_name}]`: {e}"))?;
        if spec.tag.replace(tag).is_some() {
            return Err(format!("parameter `{name}` has more than one role attribute"));
        }
    }
    Ok(spec)
}

fn is_option(ty: &Type) -> bool {
    matches!(ty, Type::Path(p) if p.path.segments.last().is_some_and(|s| s.ident == "Option"))
}

fn parse_tag(attr: &Attribute, attr_name: &str, level: Level) -> syn::Result<Tag> {
    let mut tag = Tag::new(to_pascal_case(attr_name));
    match &attr.meta {
        Meta::Path(_) => {}
        Meta::NameValue(nv) => tag = tag.with("name", tag_value(&nv.value)?),
        Meta::List(_) => {
            let args = attr.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
            let mut positional = 0;
            for arg in args {
                if let Expr::Assign(assign) = &arg {
                    let key = match assign.left.as_ref() {
                        Expr::Path(p) => p.path.get_ident().map(ToString::to_string),
                        _ => None,
                    }
                    .ok_or_else(|| {
                        syn::Error::new_spanned(&assign.left, "expected an attribute name")
                    })?;
                    tag = tag.with(key, tag_value(&assign.right)?);
                } else {
                    let key = positional_key(&tag.name, positional, level).ok_or_else(|| {
                        syn::Error::new_spanned(&arg, "unexpected positional argument")
                    })?;
                    tag = tag.with(key, tag_value(&arg)?);
                    positional += 1;
                }
            }
        }
    }
    Ok(tag)
}

fn positional_key(tag: &str, index: usize, level: Level) -> Option<&'static str> {
    match index {
        0 => Some("name"),
        1 if level == Level::Method && (tag == names::HEADER || tag == names::FIELD) => {
            Some("value")
        }
        _ => None,
    }
}

fn tag_value(expr: &Expr) -> syn::Result<TagValue> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(s) => Ok(TagValue::Str(s.value())),
            Lit::Int(i) => Ok(TagValue::Int(i.base10_parse()?)),
            Lit::Bool(b) => Ok(TagValue::Bool(b.value)),
            other => Err(syn::Error::new_spanned(
                other,
                "expected a string, integer or boolean literal",
            )),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match tag_value(&unary.expr)? {
            TagValue::Int(n) => Ok(TagValue::Int(-n)),
            _ => Err(syn::Error::new_spanned(expr, "only integers can be negated")),
        },
        Expr::Path(p) => p
            .path
            .segments
            .last()
            .map(|s| TagValue::variant(s.ident.to_string()))
            .ok_or_else(|| syn::Error::new_spanned(p, "expected an enum variant")),
        other => Err(syn::Error::new_spanned(
            other,
            "expected a literal or an enum variant",
        )),
    }
}
