//! Code generation for interface clients.
//!
//! Each submodule turns one part of an analysed interface into tokens:
//!
//! - [`auth`] - Authenticator construction, constant or per call
//! - [`request`] - Path, headers, queries, body and options of a request
//! - [`response`] - Send, status check and payload extraction
//! - [`method`] - One `async fn` per endpoint, or a `compile_error!` for faults
//! - [`client_struct`] - The client struct, its constructor and `Default`
//! - [`module_docs`] - The `//!` header of the generated file
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the assembly and file writing logic.

pub mod auth;
pub mod client_struct;
pub mod method;
pub mod module_docs;
pub mod request;
pub mod response;

pub use auth::{AuthTokens, generate_auth};
pub use client_struct::generate_client_struct;
pub use method::{generate_defaults, generate_faulted_method, generate_method, generate_methods};
pub use module_docs::ModuleDocBuilder;
pub use request::generate_request;
pub use response::generate_response;
