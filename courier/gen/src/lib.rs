//! Courier code generator library.
//!
//! This crate turns declarative HTTP interfaces, described with
//! `courier-define` records or `#[api]`-annotated Rust traits, into client
//! implementations. For each interface the generated file contains:
//!
//! - A client struct holding an HTTP client and base URL, with `new()` and `Default`
//! - An `impl Trait for Client` block with one `async fn` per endpoint
//! - Module docs summarising endpoints and authentication
//!
//! ## Pipeline
//!
//! Each method is analysed on its own:
//!
//! 1. [`shape`] - classify parameter and return types
//! 2. [`classify`] - assign request roles to parameters
//! 3. [`path`] - resolve `{name}` placeholders against path parameters
//! 4. [`assemble`] and [`auth`] - plan headers, queries, body, options and credentials
//! 5. [`response`] - pick the status check and payload extraction
//! 6. [`codegen`] - emit tokens for the plans
//!
//! [`analysis`] drives steps 1-5 for a whole interface, collecting faults
//! per method. [`output`] assembles, validates, formats and writes the files.
//!
//! ## Modules
//!
//! - [`frontend`] - Load definitions from `.rs`, `.json` or `.toml` files
//! - [`config`] - Generator settings (runtime path, trait module, suffix)
//! - [`naming`] - File and type names for generated items
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use courier_gen::config::GeneratorConfig;
//! use courier_gen::frontend::load_definitions;
//! use courier_gen::output::generate_and_write;
//!
//! let definitions = load_definitions(Path::new("src/api.rs")).unwrap();
//! let files = generate_and_write(
//!     &definitions,
//!     &GeneratorConfig::default(),
//!     Path::new("src/generated"),
//!     false,
//!     false,
//! )
//! .unwrap();
//! println!("wrote {} client(s)", files.len());
//! ```

pub mod analysis;
pub mod assemble;
pub mod auth;
pub mod classify;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod frontend;
pub mod naming;
pub mod output;
pub mod path;
pub mod response;
pub mod shape;
