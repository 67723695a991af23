//! Request assembly.
//!
//! Turns a method's classified parameters into an immutable [`RequestPlan`].
//! Stages run in a fixed order: headers, queries, body, extra, options.
//! Each stage is a plain function over [`ClassifiedParams`] so it can be
//! tested without emitting any code.

use courier_define::{HttpMethod, MethodSpec, TagAttrError, names};
use proc_macro2::Ident;
use syn::Type;

use crate::auth::{AuthDescriptor, resolve_auth};
use crate::classify::{ClassifiedParams, KeyedParam, ParamRef, PartParam};
use crate::errors::GenerationError;
use crate::path::{ResolvedPath, resolve_path};
use crate::shape::{NativeKind, TypeShape};

/// One operation on a header, query or form builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOp {
    /// A name/value pair known at generation time.
    Literal { name: String, value: String },
    /// A named entry whose value is a parameter.
    Keyed { key: String, param: Ident },
    /// Merge every pair of a `String`-keyed map.
    MergeMap(Ident),
    /// Merge a native collection (`Headers`, `Queries`, `Form`).
    MergeCollection(Ident),
    /// Append a list of native entries.
    AppendEntries(Ident),
    /// Add one value-only query entry per non-null string.
    ValueList {
        param: Ident,
        optional: bool,
        nullable_items: bool,
    },
}

/// A single multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOp {
    Text {
        name: String,
        param: Ident,
    },
    File {
        name: String,
        param: Ident,
        filename: Option<String>,
        content_type: Option<String>,
        charset: Option<String>,
    },
    /// A ready-made `Part`.
    Native(Ident),
    /// A `Vec<Part>` spread into the parts list.
    Spread(Ident),
}

/// Where a multipart body's parts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartSource {
    /// Per-parameter parts (possibly none).
    Parts(Vec<PartOp>),
    /// A `Vec<Part>` parameter.
    List(Ident),
    /// A `String`-keyed map parameter.
    Map(Ident),
    /// A ready-made `MultipartBody`, passed through untouched.
    Native(Ident),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPlan {
    pub source: MultipartSource,
    pub content_type: Option<String>,
    pub boundary: Option<String>,
    pub charset: Option<String>,
}

/// How a raw body parameter is encoded.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBodyKind {
    String,
    Bytes,
    Stream,
    File,
    /// A ready-made `Body`, passed through.
    Native,
    /// Generic typed encoding of the parameter's static type.
    Encoded(Type),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawBody {
    pub kind: RawBodyKind,
    pub param: Ident,
    pub content_type: Option<String>,
    pub charset: Option<String>,
}

/// The request body, resolved by priority: multipart, form, raw.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyPlan {
    Multipart(MultipartPlan),
    Form(Vec<EntryOp>),
    Raw(RawBody),
}

/// Options attached to the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsPlan {
    /// Caller-supplied `RequestOptions` to copy and modify.
    pub base: Option<Ident>,
    pub auth: Option<AuthDescriptor>,
    pub http2: bool,
}

impl OptionsPlan {
    /// True when nothing needs to be attached to the request.
    pub fn is_empty(&self) -> bool {
        self.base.is_none() && self.auth.is_none() && !self.http2
    }
}

/// The ordered description of how to build one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub verb: HttpMethod,
    pub path: ResolvedPath,
    pub headers: Vec<EntryOp>,
    pub queries: Vec<EntryOp>,
    pub body: Option<BodyPlan>,
    pub extra: Option<Ident>,
    pub options: OptionsPlan,
}

/// Assembles the request plan for `method`.
///
/// ## Errors
///
/// Propagates [`GenerationError::InvalidDefinition`] from malformed
/// method-level tag attributes and from authentication resolution.
///
/// ## Examples
///
/// ```
/// use courier_define::prelude::*;
/// use courier_gen::assemble::{assemble_request, EntryOp};
/// use courier_gen::classify::classify_params;
///
/// let method = MethodSpec::new("list", HttpMethod::Get, "/items", "Result<Vec<Item>, Error>")
///     .with_tag(Tag::new(names::HEADER).with("name", "Accept").with("value", "application/json"))
///     .with_param(ParameterSpec::new("page", "u32").tagged(Tag::new(names::QUERY)));
/// let params = classify_params(&method).unwrap();
///
/// let plan = assemble_request(&method, &params).unwrap();
/// assert_eq!(plan.headers.len(), 1);
/// assert!(matches!(&plan.queries[0], EntryOp::Keyed { key, .. } if key == "page"));
/// assert!(plan.body.is_none());
/// ```
pub fn assemble_request(
    method: &MethodSpec,
    params: &ClassifiedParams,
) -> Result<RequestPlan, GenerationError> {
    let path = resolve_path(&method.path, &params.path);
    for placeholder in path.unresolved() {
        tracing::warn!(
            method = %method.name,
            placeholder,
            "path placeholder has no Path parameter; left verbatim"
        );
    }

    Ok(RequestPlan {
        verb: method.verb,
        path,
        headers: header_ops(method, params)?,
        queries: query_ops(params),
        body: body_plan(method, params)?,
        extra: params.extra.as_ref().map(|p| p.ident.clone()),
        options: options_plan(method, params)?,
    })
}

fn header_ops(
    method: &MethodSpec,
    params: &ClassifiedParams,
) -> Result<Vec<EntryOp>, GenerationError> {
    let mut ops = static_pairs(method, names::HEADER)?;
    ops.extend(keyed_ops(&params.header));
    ops.extend(params.headers.iter().map(bulk_op));
    Ok(ops)
}

fn query_ops(params: &ClassifiedParams) -> Vec<EntryOp> {
    let mut ops: Vec<EntryOp> = keyed_ops(&params.query).collect();
    ops.extend(params.queries.iter().map(bulk_op));
    ops
}

fn form_ops(method: &MethodSpec, params: &ClassifiedParams) -> Result<Vec<EntryOp>, GenerationError> {
    let mut ops = static_pairs(method, names::FIELD)?;
    ops.extend(keyed_ops(&params.field));
    ops.extend(params.form.iter().map(bulk_op));
    Ok(ops)
}

/// Literal name/value pairs from method-level tags. Pairs with an empty or
/// missing name or value are skipped.
fn static_pairs(method: &MethodSpec, tag_name: &str) -> Result<Vec<EntryOp>, GenerationError> {
    let mut ops = Vec::new();
    for tag in method.tags_named(tag_name) {
        let invalid = |e: TagAttrError| GenerationError::invalid_attr(&method.name, e);
        let name = tag.str_attr("name").map_err(invalid)?.unwrap_or_default();
        let value = tag.str_attr("value").map_err(invalid)?.unwrap_or_default();
        if name.is_empty() || value.is_empty() {
            tracing::debug!(method = %method.name, tag = %tag, "skipping incomplete static pair");
            continue;
        }
        ops.push(EntryOp::Literal {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
    Ok(ops)
}

fn keyed_ops(params: &[KeyedParam]) -> impl Iterator<Item = EntryOp> + '_ {
    params.iter().map(|keyed| EntryOp::Keyed {
        key: keyed.key.clone(),
        param: keyed.param.ident.clone(),
    })
}

fn bulk_op(param: &ParamRef) -> EntryOp {
    let ident = param.ident.clone();
    match param.shape {
        TypeShape::StringMap => EntryOp::MergeMap(ident),
        TypeShape::NativeList(_) => EntryOp::AppendEntries(ident),
        TypeShape::StringList {
            optional,
            nullable_items,
        } => EntryOp::ValueList {
            param: ident,
            optional,
            nullable_items,
        },
        _ => EntryOp::MergeCollection(ident),
    }
}

fn body_plan(
    method: &MethodSpec,
    params: &ClassifiedParams,
) -> Result<Option<BodyPlan>, GenerationError> {
    let has_multipart = method.has_tag(names::MULTIPART) || params.multipart.is_some();

    if has_multipart {
        warn_ignored(method, "Field/Form", !params.field.is_empty() || !params.form.is_empty());
        warn_ignored(method, "Body", params.body.is_some());
        return multipart_plan(method, params).map(|plan| Some(BodyPlan::Multipart(plan)));
    }
    warn_ignored(method, "Part", !params.parts.is_empty());

    if method.has_tag(names::FORM) {
        warn_ignored(method, "Body", params.body.is_some());
        return form_ops(method, params).map(|ops| Some(BodyPlan::Form(ops)));
    }
    warn_ignored(method, "Field/Form", !params.field.is_empty() || !params.form.is_empty());

    Ok(params.body.as_ref().map(|body| {
        let kind = match &body.param.shape {
            TypeShape::Str => RawBodyKind::String,
            TypeShape::Bytes => RawBodyKind::Bytes,
            TypeShape::ByteStream => RawBodyKind::Stream,
            TypeShape::File => RawBodyKind::File,
            TypeShape::Native(NativeKind::Body) => RawBodyKind::Native,
            _ => RawBodyKind::Encoded(body.param.ty.clone()),
        };
        BodyPlan::Raw(RawBody {
            kind,
            param: body.param.ident.clone(),
            content_type: body.content_type.clone(),
            charset: body.charset.clone(),
        })
    }))
}

fn multipart_plan(
    method: &MethodSpec,
    params: &ClassifiedParams,
) -> Result<MultipartPlan, GenerationError> {
    let (tag_content_type, tag_boundary, tag_charset) = match method.tag(names::MULTIPART) {
        Some(tag) => {
            let invalid = |e: TagAttrError| GenerationError::invalid_attr(&method.name, e);
            (
                tag.str_attr("content_type").map_err(invalid)?.map(str::to_string),
                tag.str_attr("boundary").map_err(invalid)?.map(str::to_string),
                tag.str_attr("charset").map_err(invalid)?.map(str::to_string),
            )
        }
        None => (None, None, None),
    };

    let multipart = match &params.multipart {
        Some(multipart) if params.parts.is_empty() => multipart,
        other => {
            if other.is_some() {
                tracing::warn!(
                    method = %method.name,
                    "Multipart parameter ignored because Part parameters are present"
                );
            }
            return Ok(MultipartPlan {
                source: MultipartSource::Parts(params.parts.iter().map(part_op).collect()),
                content_type: tag_content_type,
                boundary: tag_boundary,
                charset: tag_charset,
            });
        }
    };
    let ident = multipart.param.ident.clone();
    let content_type = multipart.content_type.clone().or(tag_content_type);
    let boundary = multipart.boundary.clone().or(tag_boundary);

    let plan = match multipart.param.shape {
        TypeShape::Native(NativeKind::MultipartBody) => MultipartPlan {
            source: MultipartSource::Native(ident),
            content_type: None,
            boundary: None,
            charset: None,
        },
        TypeShape::StringMap => MultipartPlan {
            source: MultipartSource::Map(ident),
            content_type,
            boundary,
            charset: tag_charset,
        },
        _ => MultipartPlan {
            source: MultipartSource::List(ident),
            content_type,
            boundary,
            charset: tag_charset,
        },
    };
    Ok(plan)
}

fn part_op(part: &PartParam) -> PartOp {
    let param = part.param.ident.clone();
    match part.param.shape {
        TypeShape::Str => PartOp::Text {
            name: part.name.clone(),
            param,
        },
        TypeShape::File => PartOp::File {
            name: part.name.clone(),
            param,
            filename: part.filename.clone(),
            content_type: part.content_type.clone(),
            charset: part.charset.clone(),
        },
        TypeShape::NativeList(_) => PartOp::Spread(param),
        _ => PartOp::Native(param),
    }
}

fn options_plan(
    method: &MethodSpec,
    params: &ClassifiedParams,
) -> Result<OptionsPlan, GenerationError> {
    Ok(OptionsPlan {
        base: params.options.as_ref().map(|p| p.ident.clone()),
        auth: resolve_auth(method, params)?,
        http2: method.has_tag(names::HTTP2),
    })
}

fn warn_ignored(method: &MethodSpec, what: &str, present: bool) {
    if present {
        tracing::warn!(
            method = %method.name,
            "{what} parameters ignored: the method body is built another way"
        );
    }
}
