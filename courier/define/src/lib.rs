//! Courier Definition Library
//!
//! This crate provides the metadata model for declarative HTTP interfaces.
//! A front end (Rust source parsed by `courier-gen`, or a JSON/TOML
//! document) produces these records; `courier-gen` walks them and emits an
//! implementation that performs each call through an HTTP client.
//!
//! ## Core Types
//!
//! - [`InterfaceSpec`] - An annotated interface with base URL and methods
//! - [`MethodSpec`] - A single endpoint: verb, path template, params, return type, tags
//! - [`ParameterSpec`] - A method parameter with its Rust type and optional role tag
//! - [`Tag`] / [`TagValue`] - Declarative markers with literal attributes
//! - [`HttpMethod`] - HTTP verbs
//! - [`DefinitionFile`] - Versioned document wrapper for file-based front ends
//!
//! ## Examples
//!
//! ```
//! use courier_define::prelude::*;
//!
//! let api = InterfaceSpec::new("UserApi")
//!     .with_base_url("https://api.example.com")
//!     .with_method(
//!         MethodSpec::new("get_user", HttpMethod::Get, "/users/{id}", "Result<User, Error>")
//!             .with_param(ParameterSpec::new("id", "u64").tagged(Tag::new(names::PATH)))
//!             .with_tag(Tag::new(names::BEARER_AUTH).with("token", "secret")),
//!     );
//!
//! assert_eq!(api.methods[0].params[0].name, "id");
//! ```

pub mod document;
pub mod param;
pub mod prelude;
pub mod tag;
pub mod types;

pub use document::{CURRENT_VERSION, DefinitionFile};
pub use param::ParameterSpec;
pub use tag::{Tag, TagAttrError, TagValue, names};
pub use types::{HttpMethod, InterfaceSpec, ItemKind, MethodSpec};
