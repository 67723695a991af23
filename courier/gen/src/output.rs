//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation: assembling the
//! generated pieces of an interface into a complete Rust file, validating
//! the output, formatting it, and writing it to disk atomically.
//!
//! ## Output Structure
//!
//! One file per interface, named after the interface in snake_case:
//! ```text
//! out/
//! ├── user_api.rs    # UserApiClient implementing UserApi
//! └── pet_store.rs   # PetStoreClient implementing PetStore
//! ```
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes
//! - **Faults**: Nothing is written while any definition fault is outstanding,
//!   unless the caller explicitly allows it

use std::fs;
use std::path::Path;

use courier_define::InterfaceSpec;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use tracing::{info, warn};

use crate::analysis::{MethodOutcome, analyze_interface};
use crate::codegen::{ModuleDocBuilder, generate_client_struct, generate_methods};
use crate::config::GeneratorConfig;
use crate::errors::{GenerationError, GeneratorError};
use crate::frontend::Definitions;
use crate::naming::{client_type_name, module_file_name};

/// A generated client file, ready to be written.
#[derive(Debug, Clone)]
pub struct GeneratedInterface {
    /// Name of the source interface.
    pub name: String,
    /// File name relative to the output directory.
    pub file_name: String,
    /// Formatted Rust source.
    pub code: String,
    /// Methods that were replaced by `compile_error!`.
    pub faults: Vec<GenerationError>,
}

/// Assembles the token stream of a client module from analysed methods.
///
/// ## Errors
///
/// Returns [`GeneratorError::ConfigError`] if a configured path does not
/// parse, or [`GeneratorError::CodeGenError`] if the interface or client
/// name is not a valid identifier.
pub fn assemble_interface_module(
    interface: &InterfaceSpec,
    outcomes: &[MethodOutcome],
    config: &GeneratorConfig,
) -> Result<TokenStream, GeneratorError> {
    let rt = config.runtime_path()?;
    let trait_module = config.trait_module_path()?;
    let trait_name = ident(&interface.name)?;
    let client_name = ident(&client_type_name(&interface.name, &config.client_suffix))?;

    let docs = ModuleDocBuilder::new(interface, outcomes, &client_name).build();
    let client_struct = generate_client_struct(interface, &client_name, &rt);
    let methods = generate_methods(outcomes, &rt);

    Ok(quote! {
        #docs

        use #trait_module::*;

        #client_struct

        impl #trait_module::#trait_name for #client_name {
            #methods
        }
    })
}

fn ident(name: &str) -> Result<Ident, GeneratorError> {
    syn::parse_str(name)
        .map_err(|_| GeneratorError::CodeGenError(format!("`{name}` is not a valid identifier")))
}

/// Analyses, assembles, validates and formats one interface.
///
/// ## Errors
///
/// Returns [`GeneratorError::Generation`] when the item is not an
/// interface, and any error of [`assemble_interface_module`] or
/// [`validate_code`]. Per-method faults are not errors; they are reported
/// in [`GeneratedInterface::faults`].
pub fn generate_interface(
    interface: &InterfaceSpec,
    config: &GeneratorConfig,
) -> Result<GeneratedInterface, GeneratorError> {
    let outcomes = analyze_interface(interface)?;
    let tokens = assemble_interface_module(interface, &outcomes, config)?;
    let file = validate_code(&tokens)?;

    let faults = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            MethodOutcome::Faulted { error, .. } => Some(error),
            MethodOutcome::Planned(_) => None,
        })
        .collect();

    Ok(GeneratedInterface {
        name: interface.name.clone(),
        file_name: module_file_name(&interface.name),
        code: format_code(&file, config.header_comment.as_deref()),
        faults,
    })
}

/// Validates generated code by parsing it with syn.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if the tokens are not a valid
/// Rust file.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {e}")))
}

/// Formats a validated file with prettyplease, under a generated-code notice.
pub fn format_code(file: &syn::File, header_comment: Option<&str>) -> String {
    let formatted = prettyplease::unparse(file);
    let extra = header_comment
        .map(|line| format!("// {line}\n"))
        .unwrap_or_default();
    format!(
        "// This code was automatically generated by courier-gen. Do not edit manually.\n{extra}\n{formatted}"
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if a directory cannot be created
/// or the file cannot be written or renamed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Generates every interface and writes one file per interface.
///
/// With `dry_run`, files are printed to stdout instead of written.
///
/// ## Errors
///
/// Returns [`GeneratorError::Faults`] listing every definition fault
/// (front-end faults, non-interface items and faulty methods) unless
/// `allow_faults` is set; in that case nothing is written. Non-interface
/// items are skipped even when faults are allowed.
pub fn generate_and_write(
    definitions: &Definitions,
    config: &GeneratorConfig,
    output_dir: &Path,
    dry_run: bool,
    allow_faults: bool,
) -> Result<Vec<GeneratedInterface>, GeneratorError> {
    let mut generated = Vec::new();
    let mut faults = definitions.faults.clone();

    for interface in &definitions.interfaces {
        match generate_interface(interface, config) {
            Ok(file) => {
                faults.extend(file.faults.iter().cloned());
                generated.push(file);
            }
            Err(GeneratorError::Generation(fault)) => faults.push(fault),
            Err(other) => return Err(other),
        }
    }

    if !faults.is_empty() {
        if !allow_faults {
            return Err(GeneratorError::Faults(faults));
        }
        warn!(count = faults.len(), "writing output despite definition faults");
    }

    for file in &generated {
        if dry_run {
            println!("=== {} ===\n{}\n", file.file_name, file.code);
        } else {
            let path = output_dir.join(&file.file_name);
            write_atomic(&path, &file.code)?;
            info!(
                interface = %file.name,
                path = %path.display(),
                faults = file.faults.len(),
                "wrote client"
            );
        }
    }

    Ok(generated)
}
