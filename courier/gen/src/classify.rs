//! Parameter classification.
//!
//! Resolves each parameter's tag into a [`Role`] once, validates the
//! parameter's type against what the role accepts, enforces the
//! one-per-method roles, and sorts the parameters into [`ClassifiedParams`]
//! buckets. Nothing here touches the filesystem or emits code.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use courier_define::{MethodSpec, ParameterSpec, names};
use proc_macro2::Ident;
use strum::{Display, EnumIter, EnumString};
use syn::Type;

use crate::errors::GenerationError;
use crate::shape::{NativeKind, TypeShape};

/// A single credential supplied by a dedicated parameter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
pub enum CredentialField {
    BasicUsername,
    BasicPassword,
    DigestUsername,
    DigestPassword,
    BearerToken,
    BearerPrefix,
    HawkKey,
    HawkId,
    HawkAlgorithm,
    HawkExt,
}

impl CredentialField {
    fn accepts(self, shape: &TypeShape) -> bool {
        match self {
            Self::HawkAlgorithm => *shape == TypeShape::Native(NativeKind::HawkAlgorithm),
            _ => *shape == TypeShape::Str,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::HawkAlgorithm => "`HawkAlgorithm`",
            _ => "`String` or `&str`",
        }
    }
}

/// Role label used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
    Path,
    Query,
    Queries,
    Header,
    Headers,
    Field,
    Form,
    Part,
    Multipart,
    Body,
    Extra,
    RequestOptions,
    Credential(CredentialField),
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credential(field) => write!(f, "{field}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A parameter as the later stages see it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRef {
    pub ident: Ident,
    pub ty: Type,
    pub shape: TypeShape,
}

/// A parameter bound under a key (path placeholder, query name, header name ...).
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedParam {
    pub key: String,
    pub param: ParamRef,
}

/// A multipart part parameter with its per-part attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PartParam {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub charset: Option<String>,
    pub param: ParamRef,
}

/// A whole multipart body supplied by one parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartParam {
    pub content_type: Option<String>,
    pub boundary: Option<String>,
    pub param: ParamRef,
}

/// The raw request body parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyParam {
    pub content_type: Option<String>,
    pub charset: Option<String>,
    pub param: ParamRef,
}

/// The resolved role of one parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Path { key: String },
    Query { key: String },
    Queries,
    Header { key: String },
    Headers,
    Field { key: String },
    Form,
    Part {
        name: String,
        filename: Option<String>,
        content_type: Option<String>,
        charset: Option<String>,
    },
    Multipart {
        content_type: Option<String>,
        boundary: Option<String>,
    },
    Body {
        content_type: Option<String>,
        charset: Option<String>,
    },
    Extra,
    Options,
    Credential(CredentialField),
    Inert,
}

/// Parameters of one method, sorted by role in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedParams {
    pub path: Vec<KeyedParam>,
    pub query: Vec<KeyedParam>,
    pub queries: Vec<ParamRef>,
    pub header: Vec<KeyedParam>,
    pub headers: Vec<ParamRef>,
    pub field: Vec<KeyedParam>,
    pub form: Vec<ParamRef>,
    pub parts: Vec<PartParam>,
    pub multipart: Option<MultipartParam>,
    pub body: Option<BodyParam>,
    pub extra: Option<ParamRef>,
    pub options: Option<ParamRef>,
    pub credentials: BTreeMap<CredentialField, ParamRef>,
    pub inert: Vec<ParamRef>,
}

impl ClassifiedParams {
    pub fn credential(&self, field: CredentialField) -> Option<&ParamRef> {
        self.credentials.get(&field)
    }
}

/// Classifies every parameter of `method`.
///
/// ## Errors
///
/// - [`GenerationError::DuplicateRole`] when a one-per-method role repeats
/// - [`GenerationError::InvalidParameterType`] when a type does not fit its role
/// - [`GenerationError::InvalidDefinition`] for malformed tag attributes or
///   parameter names
///
/// ## Examples
///
/// ```
/// use courier_define::prelude::*;
/// use courier_gen::classify::classify_params;
///
/// let method = MethodSpec::new("get", HttpMethod::Get, "/users/{id}", "Result<User, Error>")
///     .with_param(ParameterSpec::new("id", "u64").tagged(Tag::new(names::PATH)))
///     .with_param(ParameterSpec::new("verbose", "bool"));
///
/// let params = classify_params(&method).unwrap();
/// assert_eq!(params.path[0].key, "id");
/// assert_eq!(params.inert.len(), 1);
/// ```
pub fn classify_params(method: &MethodSpec) -> Result<ClassifiedParams, GenerationError> {
    let mut out = ClassifiedParams::default();
    let mut singletons: BTreeMap<SingletonSlot, String> = BTreeMap::new();

    for spec in &method.params {
        let param = param_ref(method, spec)?;
        let role = resolve_role(method, spec, &param)?;
        check_type(method, spec, &param, &role)?;

        if let Some(slot) = SingletonSlot::of(&role) {
            if let Some(first) = singletons.get(&slot) {
                return Err(GenerationError::DuplicateRole {
                    method: method.name.clone(),
                    role: slot.kind(),
                    first: first.clone(),
                    second: spec.name.clone(),
                });
            }
            singletons.insert(slot, spec.name.clone());
        }

        match role {
            Role::Path { key } => out.path.push(KeyedParam { key, param }),
            Role::Query { key } => out.query.push(KeyedParam { key, param }),
            Role::Queries => out.queries.push(param),
            Role::Header { key } => out.header.push(KeyedParam { key, param }),
            Role::Headers => out.headers.push(param),
            Role::Field { key } => out.field.push(KeyedParam { key, param }),
            Role::Form => out.form.push(param),
            Role::Part {
                name,
                filename,
                content_type,
                charset,
            } => out.parts.push(PartParam {
                name,
                filename,
                content_type,
                charset,
                param,
            }),
            Role::Multipart {
                content_type,
                boundary,
            } => {
                out.multipart = Some(MultipartParam {
                    content_type,
                    boundary,
                    param,
                })
            }
            Role::Body {
                content_type,
                charset,
            } => {
                out.body = Some(BodyParam {
                    content_type,
                    charset,
                    param,
                })
            }
            Role::Extra => out.extra = Some(param),
            Role::Options => out.options = Some(param),
            Role::Credential(field) => {
                out.credentials.insert(field, param);
            }
            Role::Inert => out.inert.push(param),
        }
    }

    Ok(out)
}

/// Parses a parameter's name and type.
pub(crate) fn param_ref(
    method: &MethodSpec,
    spec: &ParameterSpec,
) -> Result<ParamRef, GenerationError> {
    let ident: Ident = syn::parse_str(&spec.name).map_err(|_| GenerationError::InvalidDefinition {
        method: method.name.clone(),
        reason: format!("`{}` is not a valid parameter name", spec.name),
    })?;
    let (ty, shape) = TypeShape::parse(&spec.ty).map_err(|_| GenerationError::InvalidDefinition {
        method: method.name.clone(),
        reason: format!("parameter `{}` has unparseable type `{}`", spec.name, spec.ty),
    })?;
    Ok(ParamRef { ident, ty, shape })
}

fn resolve_role(
    method: &MethodSpec,
    spec: &ParameterSpec,
    param: &ParamRef,
) -> Result<Role, GenerationError> {
    let Some(tag) = &spec.tag else {
        return Ok(match param.shape {
            TypeShape::Native(NativeKind::RequestOptions) => Role::Options,
            _ => Role::Inert,
        });
    };

    let attr = |name: &str| -> Result<Option<String>, GenerationError> {
        tag.str_attr(name)
            .map(|v| v.map(str::to_string))
            .map_err(|e| GenerationError::invalid_attr(&method.name, e))
    };
    let key = || -> Result<String, GenerationError> {
        Ok(attr("name")?.unwrap_or_else(|| spec.name.clone()))
    };

    let role = match tag.name.as_str() {
        names::PATH => Role::Path { key: key()? },
        names::QUERY => Role::Query { key: key()? },
        names::QUERIES => Role::Queries,
        names::HEADER => Role::Header { key: key()? },
        names::HEADERS => Role::Headers,
        names::FIELD => Role::Field { key: key()? },
        names::FORM => Role::Form,
        names::PART => Role::Part {
            name: key()?,
            filename: attr("filename")?,
            content_type: attr("content_type")?,
            charset: attr("charset")?,
        },
        names::MULTIPART => Role::Multipart {
            content_type: attr("content_type")?,
            boundary: attr("boundary")?,
        },
        names::BODY => Role::Body {
            content_type: attr("content_type")?,
            charset: attr("charset")?,
        },
        names::EXTRA => Role::Extra,
        names::REQUEST_OPTIONS => Role::Options,
        other => match CredentialField::from_str(other) {
            Ok(field) => Role::Credential(field),
            Err(_) => {
                tracing::debug!(
                    method = %method.name,
                    param = %spec.name,
                    tag = %tag,
                    "ignoring tag with no request role"
                );
                Role::Inert
            }
        },
    };
    Ok(role)
}

fn check_type(
    method: &MethodSpec,
    spec: &ParameterSpec,
    param: &ParamRef,
    role: &Role,
) -> Result<(), GenerationError> {
    use NativeKind as N;
    use TypeShape as S;

    let shape = &param.shape;
    let (kind, ok, expected) = match role {
        Role::Headers => (
            RoleKind::Headers,
            matches!(shape, S::StringMap | S::Native(N::Headers) | S::NativeList(N::HeaderEntry)),
            "a String-keyed map, `Headers` or `Vec<HeaderEntry>`",
        ),
        Role::Queries => (
            RoleKind::Queries,
            matches!(
                shape,
                S::StringMap | S::Native(N::Queries) | S::NativeList(N::QueryEntry) | S::StringList { .. }
            ),
            "a String-keyed map, `Queries`, `Vec<QueryEntry>` or `Vec<String>`",
        ),
        Role::Form => (
            RoleKind::Form,
            matches!(shape, S::StringMap | S::Native(N::Form) | S::NativeList(N::FormEntry)),
            "a String-keyed map, `Form` or `Vec<FormEntry>`",
        ),
        Role::Part { .. } => (
            RoleKind::Part,
            matches!(shape, S::Str | S::File | S::Native(N::Part) | S::NativeList(N::Part)),
            "`String`, a file handle, `Part` or `Vec<Part>`",
        ),
        Role::Multipart { .. } => (
            RoleKind::Multipart,
            matches!(shape, S::NativeList(N::Part) | S::Native(N::MultipartBody) | S::StringMap),
            "`Vec<Part>`, `MultipartBody` or a String-keyed map",
        ),
        Role::Body { .. } => (
            RoleKind::Body,
            !matches!(shape, S::Unit | S::Unsupported),
            "a value type",
        ),
        Role::Extra => (RoleKind::Extra, *shape == S::StringMap, "a String-keyed map"),
        Role::Options => (
            RoleKind::RequestOptions,
            *shape == S::Native(N::RequestOptions),
            "`RequestOptions`",
        ),
        Role::Credential(field) => (
            RoleKind::Credential(*field),
            field.accepts(shape),
            field.expected(),
        ),
        Role::Path { .. }
        | Role::Query { .. }
        | Role::Header { .. }
        | Role::Field { .. }
        | Role::Inert => return Ok(()),
    };

    if ok {
        Ok(())
    } else {
        Err(GenerationError::InvalidParameterType {
            method: method.name.clone(),
            param: spec.name.clone(),
            role: kind,
            found: spec.ty.clone(),
            expected,
        })
    }
}

/// Roles that allow at most one parameter per method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SingletonSlot {
    Body,
    Extra,
    Options,
    Multipart,
    Credential(CredentialField),
}

impl SingletonSlot {
    fn of(role: &Role) -> Option<Self> {
        match role {
            Role::Body { .. } => Some(Self::Body),
            Role::Extra => Some(Self::Extra),
            Role::Options => Some(Self::Options),
            Role::Multipart { .. } => Some(Self::Multipart),
            Role::Credential(field) => Some(Self::Credential(*field)),
            _ => None,
        }
    }

    fn kind(self) -> RoleKind {
        match self {
            Self::Body => RoleKind::Body,
            Self::Extra => RoleKind::Extra,
            Self::Options => RoleKind::RequestOptions,
            Self::Multipart => RoleKind::Multipart,
            Self::Credential(field) => RoleKind::Credential(field),
        }
    }
}
