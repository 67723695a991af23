//! Convenient re-exports for building interface definitions.
//!
//! ## Examples
//!
//! ```
//! use courier_define::prelude::*;
//!
//! let method = MethodSpec::new("upload", HttpMethod::Post, "/files", "Result<(), Error>")
//!     .with_tag(Tag::new(names::MULTIPART))
//!     .with_param(ParameterSpec::new("file", "PathBuf").tagged(Tag::new(names::PART)));
//!
//! assert!(method.has_tag(names::MULTIPART));
//! ```

pub use crate::document::{CURRENT_VERSION, DefinitionFile};
pub use crate::param::ParameterSpec;
pub use crate::tag::{Tag, TagValue, names};
pub use crate::types::{HttpMethod, InterfaceSpec, ItemKind, MethodSpec};
