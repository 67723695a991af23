//! Response dispatch.
//!
//! Classifies a method's declared return type into a [`ResponsePlan`]: how
//! the body is extracted, whether a status check runs, whether the response
//! is released, and whether the result is packaged in an `Envelope`.
//!
//! | Shape | Extraction | Status check | Close |
//! |---|---|---|---|
//! | `()` | none | yes | yes |
//! | `String` | text | yes | yes |
//! | `Vec<u8>` | raw or decompressed bytes | yes | yes |
//! | `Response` | none | no | no |
//! | `ByteStream` | byte stream | no | no |
//! | integer | status code | no | yes |
//! | anything else | typed decode | yes | yes |
//!
//! An envelope never changes the extraction. It carries the response
//! metadata next to the payload, so the status check is skipped.

use courier_define::{MethodSpec, TagAttrError, names};
use strum::Display;
use syn::{GenericArgument, PathArguments, Type};

use crate::errors::GenerationError;
use crate::shape::{NativeKind, TypeShape, result_ok_type};

/// Recognised return shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ResponseShape {
    NoPayload,
    Text,
    Bytes,
    NativeResponse,
    Stream,
    StatusCode,
    Decoded,
}

/// The body extraction step.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    None,
    Text,
    /// `raw` skips transparent decompression.
    Bytes { raw: bool },
    /// Hand the response itself to the caller.
    Response,
    Stream,
    /// Convert the numeric status into the declared integer type.
    StatusCode(Type),
    Decode(Type),
}

/// When a response status is turned into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCheck {
    /// Raise on anything outside `200..300`.
    Default,
    /// Raise when the status falls in `min..max`, inverted by `negate`.
    Range { min: u16, max: u16, negate: bool },
}

impl StatusCheck {
    pub const DEFAULT_MIN: u16 = 300;
    pub const DEFAULT_MAX: u16 = 600;

    /// Whether a response with `status` raises.
    ///
    /// ## Examples
    ///
    /// ```
    /// use courier_gen::response::StatusCheck;
    ///
    /// assert!(StatusCheck::Default.raises(404));
    /// assert!(!StatusCheck::Default.raises(200));
    ///
    /// let inverted = StatusCheck::Range { min: 400, max: 500, negate: true };
    /// assert!(!inverted.raises(404));
    /// assert!(inverted.raises(200));
    /// ```
    pub fn raises(&self, status: u16) -> bool {
        match *self {
            Self::Default => !(200..300).contains(&status),
            Self::Range { min, max, negate } => (min..max).contains(&status) != negate,
        }
    }
}

/// How one method turns its response into the declared value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePlan {
    pub shape: ResponseShape,
    pub extraction: Extraction,
    /// `None` when no check runs.
    pub status_check: Option<StatusCheck>,
    /// Release the response explicitly once the value is produced.
    pub close: bool,
    /// The result is packaged in an `Envelope`.
    pub wrapped: bool,
}

/// Builds the response plan for `method`.
///
/// ## Errors
///
/// - [`GenerationError::InvalidReturnType`] for non-async methods, returns
///   other than `Result<T, E>`, and payload types with no strategy
/// - [`GenerationError::InvalidDefinition`] for malformed `Throws` attributes
///
/// ## Examples
///
/// ```
/// use courier_define::prelude::*;
/// use courier_gen::response::{dispatch_response, Extraction};
///
/// let method = MethodSpec::new("avatar", HttpMethod::Get, "/avatar", "Result<Vec<u8>, Error>")
///     .with_tag(Tag::new(names::RAW));
/// let plan = dispatch_response(&method).unwrap();
/// assert_eq!(plan.extraction, Extraction::Bytes { raw: true });
/// ```
pub fn dispatch_response(method: &MethodSpec) -> Result<ResponsePlan, GenerationError> {
    let invalid = |reason: &str| GenerationError::InvalidReturnType {
        method: method.name.clone(),
        found: method.returns.clone(),
        reason: reason.to_string(),
    };

    if !method.is_async {
        return Err(invalid("endpoint methods must be async"));
    }
    let returns: Type =
        syn::parse_str(&method.returns).map_err(|_| invalid("not a valid Rust type"))?;
    let ok = result_ok_type(&returns).ok_or_else(|| invalid("expected `Result<T, E>`"))?;

    let (payload, wrapped) = match TypeShape::of(ok) {
        TypeShape::Envelope(_) => {
            let inner = first_generic(ok).ok_or_else(|| invalid("`Envelope` needs a payload type"))?;
            (inner, true)
        }
        _ => (ok, false),
    };

    let (shape, extraction) = match TypeShape::of(payload) {
        TypeShape::Unit => (ResponseShape::NoPayload, Extraction::None),
        TypeShape::Str => (ResponseShape::Text, Extraction::Text),
        TypeShape::Bytes => (
            ResponseShape::Bytes,
            Extraction::Bytes {
                raw: method.has_tag(names::RAW),
            },
        ),
        TypeShape::Native(NativeKind::Response) => {
            (ResponseShape::NativeResponse, Extraction::Response)
        }
        TypeShape::ByteStream => (ResponseShape::Stream, Extraction::Stream),
        TypeShape::Integer => (
            ResponseShape::StatusCode,
            Extraction::StatusCode(payload.clone()),
        ),
        TypeShape::Other | TypeShape::StringMap | TypeShape::StringList { .. } => {
            (ResponseShape::Decoded, Extraction::Decode(payload.clone()))
        }
        TypeShape::Native(kind) => {
            return Err(invalid(&format!("`{kind}` is a request value, not a response payload")));
        }
        TypeShape::NativeList(_) | TypeShape::File | TypeShape::Envelope(_) => {
            return Err(invalid("no response strategy produces this type"));
        }
        TypeShape::Unsupported => return Err(invalid("no response strategy produces this type")),
    };

    if matches!(payload, Type::Reference(_)) {
        return Err(invalid("borrowed payloads cannot outlive the response"));
    }
    if wrapped
        && matches!(
            shape,
            ResponseShape::NativeResponse | ResponseShape::Stream | ResponseShape::StatusCode
        )
    {
        return Err(invalid(&format!("`Envelope` cannot wrap a {shape} payload")));
    }

    let checked = matches!(
        shape,
        ResponseShape::NoPayload | ResponseShape::Text | ResponseShape::Bytes | ResponseShape::Decoded
    );
    let status_check = if checked && !wrapped {
        Some(status_check(method)?)
    } else {
        None
    };
    let close = !matches!(shape, ResponseShape::NativeResponse | ResponseShape::Stream);

    tracing::debug!(
        method = %method.name,
        %shape,
        wrapped,
        checked = status_check.is_some(),
        "dispatched response"
    );

    Ok(ResponsePlan {
        shape,
        extraction,
        status_check,
        close,
        wrapped,
    })
}

fn status_check(method: &MethodSpec) -> Result<StatusCheck, GenerationError> {
    let Some(tag) = method.tag(names::THROWS) else {
        return Ok(StatusCheck::Default);
    };
    let invalid = |e: TagAttrError| GenerationError::invalid_attr(&method.name, e);
    let status = |attr: &str, default: u16| -> Result<u16, GenerationError> {
        match tag.int_attr(attr).map_err(invalid)? {
            None => Ok(default),
            Some(n) => u16::try_from(n).map_err(|_| GenerationError::InvalidDefinition {
                method: method.name.clone(),
                reason: format!("Throws `{attr}` = {n} is not a valid status code"),
            }),
        }
    };

    Ok(StatusCheck::Range {
        min: status("min", StatusCheck::DEFAULT_MIN)?,
        max: status("max", StatusCheck::DEFAULT_MAX)?,
        negate: tag.bool_attr("negate").map_err(invalid)?.unwrap_or(false),
    })
}

fn first_generic(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    match &path.path.segments.last()?.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}
