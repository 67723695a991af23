//! Type shape classification.
//!
//! Parameter and return types arrive as Rust type syntax. The generator
//! parses them with `syn` and reduces each to a [`TypeShape`], which is all
//! the classifier and dispatcher need to pick a strategy. Runtime value
//! objects (`Headers`, `Part`, `Response` ...) are recognised by the last
//! segment of their path so both `Headers` and `courier_http::Headers` match.

use std::str::FromStr;

use strum::{Display, EnumString};
use syn::{GenericArgument, PathArguments, Type};

/// Value-object types provided by the runtime crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum NativeKind {
    Headers,
    HeaderEntry,
    Queries,
    QueryEntry,
    Form,
    FormEntry,
    Part,
    MultipartBody,
    Body,
    Response,
    RequestOptions,
    HawkAlgorithm,
}

/// The classified form of a Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// `()`
    Unit,
    /// `String`, `&str`
    Str,
    /// `Vec<u8>`, `Bytes`
    Bytes,
    /// `ByteStream`
    ByteStream,
    /// `File`, `PathBuf`
    File,
    /// Any primitive integer wide enough to hold a status code.
    Integer,
    /// A map keyed by `String`.
    StringMap,
    /// `Vec<String>` and its optional variants.
    StringList {
        /// The list itself is wrapped in `Option`.
        optional: bool,
        /// Elements are `Option<String>`.
        nullable_items: bool,
    },
    Native(NativeKind),
    /// `Vec<K>` of a runtime entry type.
    NativeList(NativeKind),
    /// `Envelope<T>` result wrapper.
    Envelope(Box<TypeShape>),
    /// Any other nameable type; encoded or decoded generically.
    Other,
    /// Types the generator cannot work with (tuples, arrays, trait objects,
    /// `impl Trait`, function pointers ...).
    Unsupported,
}

const INTEGER_TYPES: &[&str] = &["u16", "u32", "u64", "usize", "i32", "i64"];
const MAP_TYPES: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

impl TypeShape {
    /// Parses Rust type syntax and classifies it.
    ///
    /// ## Errors
    ///
    /// Returns the `syn` error when `text` is not a valid type.
    ///
    /// ## Examples
    ///
    /// ```
    /// use courier_gen::shape::{NativeKind, TypeShape};
    ///
    /// let (_, shape) = TypeShape::parse("Vec<HeaderEntry>").unwrap();
    /// assert_eq!(shape, TypeShape::NativeList(NativeKind::HeaderEntry));
    ///
    /// let (_, shape) = TypeShape::parse("std::collections::HashMap<String, String>").unwrap();
    /// assert_eq!(shape, TypeShape::StringMap);
    /// ```
    pub fn parse(text: &str) -> syn::Result<(Type, TypeShape)> {
        let ty: Type = syn::parse_str(text)?;
        let shape = Self::of(&ty);
        Ok((ty, shape))
    }

    /// Classifies an already parsed type.
    pub fn of(ty: &Type) -> TypeShape {
        match ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => TypeShape::Unit,
            Type::Paren(inner) => Self::of(&inner.elem),
            Type::Group(inner) => Self::of(&inner.elem),
            Type::Reference(reference) => match Self::of(&reference.elem) {
                TypeShape::Str => TypeShape::Str,
                shape @ (TypeShape::Native(_) | TypeShape::StringMap | TypeShape::Other) => shape,
                _ => Self::of_slice_ref(&reference.elem),
            },
            Type::Path(path) if path.qself.is_none() => Self::of_path(&path.path),
            _ => TypeShape::Unsupported,
        }
    }

    fn of_slice_ref(elem: &Type) -> TypeShape {
        match elem {
            Type::Slice(slice) if is_ident(&slice.elem, "u8") => TypeShape::Bytes,
            _ => TypeShape::Unsupported,
        }
    }

    fn of_path(path: &syn::Path) -> TypeShape {
        let Some(last) = path.segments.last() else {
            return TypeShape::Unsupported;
        };
        let name = last.ident.to_string();
        let args = generic_types(&last.arguments);

        match name.as_str() {
            "String" | "str" => TypeShape::Str,
            "Bytes" => TypeShape::Bytes,
            "ByteStream" => TypeShape::ByteStream,
            "File" | "PathBuf" => TypeShape::File,
            n if INTEGER_TYPES.contains(&n) => TypeShape::Integer,
            n if MAP_TYPES.contains(&n) => match args.first() {
                Some(key) if Self::of(key) == TypeShape::Str => TypeShape::StringMap,
                _ => TypeShape::Other,
            },
            "Vec" => match args.first() {
                Some(elem) if is_ident(elem, "u8") => TypeShape::Bytes,
                Some(elem) => Self::of_vec_elem(elem),
                None => TypeShape::Other,
            },
            "Option" => match args.first().map(|inner| Self::of(inner)) {
                Some(TypeShape::StringList {
                    optional: false,
                    nullable_items,
                }) => TypeShape::StringList {
                    optional: true,
                    nullable_items,
                },
                _ => TypeShape::Other,
            },
            "Envelope" => match args.first() {
                Some(inner) => TypeShape::Envelope(Box::new(Self::of(inner))),
                None => TypeShape::Unsupported,
            },
            other => match NativeKind::from_str(other) {
                Ok(kind) => TypeShape::Native(kind),
                Err(_) => TypeShape::Other,
            },
        }
    }

    fn of_vec_elem(elem: &Type) -> TypeShape {
        match Self::of(elem) {
            TypeShape::Str => TypeShape::StringList {
                optional: false,
                nullable_items: false,
            },
            TypeShape::Native(
                kind @ (NativeKind::HeaderEntry
                | NativeKind::QueryEntry
                | NativeKind::FormEntry
                | NativeKind::Part),
            ) => TypeShape::NativeList(kind),
            TypeShape::Other if is_optional_string(elem) => TypeShape::StringList {
                optional: false,
                nullable_items: true,
            },
            _ => TypeShape::Other,
        }
    }
}

/// Returns the `Ok` type when `ty` is `Result<T>` or `Result<T, E>`.
pub fn result_ok_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    generic_types(&last.arguments).into_iter().next()
}

/// Returns `T` when `ty` is `Option<T>`.
pub fn option_inner_type(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let last = path.path.segments.last()?;
    if last.ident != "Option" {
        return None;
    }
    generic_types(&last.arguments).into_iter().next()
}

fn generic_types(arguments: &PathArguments) -> Vec<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args
            .args
            .iter()
            .filter_map(|arg| match arg {
                GenericArgument::Type(ty) => Some(ty),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn is_ident(ty: &Type, ident: &str) -> bool {
    matches!(ty, Type::Path(p) if p.qself.is_none() && p.path.is_ident(ident))
}

fn is_optional_string(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    let Some(last) = path.path.segments.last() else {
        return false;
    };
    last.ident == "Option"
        && generic_types(&last.arguments)
            .first()
            .is_some_and(|inner| TypeShape::of(inner) == TypeShape::Str)
}
