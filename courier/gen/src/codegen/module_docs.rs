//! Module documentation for generated client files.
//!
//! [`ModuleDocBuilder`] renders the `//!` header of each generated file: an
//! introduction, the authentication schemes in use, the endpoints grouped by
//! HTTP verb, and any methods that could not be generated.

use std::collections::BTreeMap;

use courier_define::InterfaceSpec;
use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::analysis::MethodOutcome;
use crate::auth::AuthKind;

/// Builds module-level documentation for a generated client.
///
/// ## Examples
///
/// ```ignore
/// let outcomes = analyze_interface(&api)?;
/// let docs = ModuleDocBuilder::new(&api, &outcomes, &client_name).build();
/// ```
pub struct ModuleDocBuilder<'a> {
    interface: &'a InterfaceSpec,
    outcomes: &'a [MethodOutcome],
    client_name: &'a Ident,
}

impl<'a> ModuleDocBuilder<'a> {
    /// `outcomes` must be the analysis of `interface`, in method order.
    pub fn new(
        interface: &'a InterfaceSpec,
        outcomes: &'a [MethodOutcome],
        client_name: &'a Ident,
    ) -> Self {
        Self {
            interface,
            outcomes,
            client_name,
        }
    }

    /// Builds the documentation as `#![doc = ".."]` attributes, one per line.
    pub fn build(&self) -> TokenStream {
        let mut lines = self.intro_paragraph();
        lines.push(String::new());
        lines.extend(self.auth_section());
        lines.push(String::new());
        lines.extend(self.endpoints_section());
        let faults = self.faults_section();
        if !faults.is_empty() {
            lines.push(String::new());
            lines.extend(faults);
        }

        let attrs = lines.iter().map(|line| {
            let line = if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            };
            quote! { #![doc = #line] }
        });
        quote! { #(#attrs)* }
    }

    fn intro_paragraph(&self) -> Vec<String> {
        let name = &self.interface.name;
        let mut lines = vec![format!(
            "[`{}`] implements [`{name}`] over HTTP.",
            self.client_name
        )];
        if let Some(base_url) = &self.interface.base_url {
            lines.push(String::new());
            lines.push(format!("Default base URL: `{base_url}`"));
        }
        if let Some(description) = &self.interface.description {
            lines.push(String::new());
            lines.extend(description.lines().map(str::to_string));
        }
        lines
    }

    /// Groups generated methods by the authentication kind they use.
    fn auth_kinds(&self) -> BTreeMap<String, Vec<&'a str>> {
        let mut kinds: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for (method, outcome) in self.interface.methods.iter().zip(self.outcomes) {
            let MethodOutcome::Planned(plan) = outcome else {
                continue;
            };
            if let Some(auth) = &plan.request.options.auth {
                kinds
                    .entry(auth_label(auth.kind()).to_string())
                    .or_default()
                    .push(&method.name);
            }
        }
        kinds
    }

    fn auth_section(&self) -> Vec<String> {
        let kinds = self.auth_kinds();
        let mut lines = vec!["## Authentication".to_string(), String::new()];
        if kinds.is_empty() {
            lines.push("No endpoint attaches credentials.".to_string());
            return lines;
        }
        for (kind, methods) in kinds {
            let methods = methods
                .iter()
                .map(|m| format!("`{m}`"))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("- {kind}: {methods}"));
        }
        lines
    }

    /// Groups endpoints by HTTP verb.
    fn categorize_endpoints(&self) -> BTreeMap<String, Vec<(&'a str, &'a str)>> {
        let mut categories: BTreeMap<String, Vec<(&str, &str)>> = BTreeMap::new();
        for method in &self.interface.methods {
            categories
                .entry(method.verb.to_string())
                .or_default()
                .push((&method.name, &method.path));
        }
        categories
    }

    fn endpoints_section(&self) -> Vec<String> {
        let categories = self.categorize_endpoints();
        let mut lines = vec!["## Endpoints".to_string(), String::new()];
        if categories.is_empty() {
            lines.push("No endpoints defined.".to_string());
            return lines;
        }
        for (verb, endpoints) in &categories {
            lines.push(format!("**{verb}**:"));
            for (name, path) in endpoints {
                lines.push(format!("- `{name}` - `{path}`"));
            }
            lines.push(String::new());
        }
        lines.pop();
        lines
    }

    fn faults_section(&self) -> Vec<String> {
        let faults: Vec<String> = self
            .outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                MethodOutcome::Faulted { error, .. } => Some(format!("- {error}")),
                MethodOutcome::Planned(_) => None,
            })
            .collect();
        if faults.is_empty() {
            return faults;
        }
        let mut lines = vec!["## Not generated".to_string(), String::new()];
        lines.extend(faults);
        lines
    }
}

fn auth_label(kind: AuthKind) -> &'static str {
    match kind {
        AuthKind::Hawk => "Hawk",
        AuthKind::Bearer => "Bearer token",
        AuthKind::Digest => "HTTP Digest",
        AuthKind::Basic => "HTTP Basic",
    }
}
