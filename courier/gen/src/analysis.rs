//! Per-method analysis pipeline.
//!
//! `classify -> assemble -> dispatch` for each method of an interface. A
//! method is a pure function of its own [`MethodSpec`]; one method's fault
//! never affects another's plan.

use courier_define::{InterfaceSpec, MethodSpec, ParameterSpec};
use proc_macro2::Ident;
use syn::{Expr, Type};

use crate::assemble::{RequestPlan, assemble_request};
use crate::classify::{classify_params, param_ref};
use crate::errors::GenerationError;
use crate::response::{ResponsePlan, dispatch_response};
use crate::shape::option_inner_type;

/// A parameter as it appears in the emitted signature.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParam {
    pub ident: Ident,
    pub ty: Type,
    /// Fallback applied when an `Option` argument is `None`.
    pub default: Option<DefaultValue>,
}

/// A default for an omitted `Option<T>` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    /// The `T` of `Option<T>`; the expression is bound at this type.
    pub ty: Type,
    pub expr: Expr,
}

/// Everything needed to emit one endpoint method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodPlan {
    pub name: Ident,
    pub params: Vec<SignatureParam>,
    pub returns: Type,
    pub doc: Option<String>,
    /// Parameters with no request role.
    pub inert: Vec<Ident>,
    pub request: RequestPlan,
    pub response: ResponsePlan,
}

/// The outcome of analysing one method.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutcome {
    Planned(Box<MethodPlan>),
    Faulted {
        /// Name of the method, or `None` if the name itself is invalid.
        name: Option<Ident>,
        error: GenerationError,
    },
}

/// Analyses a single method.
///
/// ## Errors
///
/// Returns the first [`GenerationError`] hit by classification, assembly or
/// dispatch.
pub fn analyze_method(method: &MethodSpec) -> Result<MethodPlan, GenerationError> {
    let name = method_ident(method)?;
    let classified = classify_params(method)?;
    let request = assemble_request(method, &classified)?;
    let response = dispatch_response(method)?;

    let params = method
        .params
        .iter()
        .map(|spec| {
            let param = param_ref(method, spec)?;
            let default = match &spec.default {
                Some(text) => default_value(method, spec, &param.ty, text)?,
                None => None,
            };
            Ok(SignatureParam {
                ident: param.ident,
                ty: param.ty,
                default,
            })
        })
        .collect::<Result<Vec<_>, GenerationError>>()?;

    let returns = syn::parse_str(&method.returns).map_err(|_| GenerationError::InvalidReturnType {
        method: method.name.clone(),
        found: method.returns.clone(),
        reason: "not a valid Rust type".to_string(),
    })?;

    tracing::debug!(
        method = %method.name,
        verb = %method.verb,
        path = %method.path,
        params = params.len(),
        "analysed method"
    );

    Ok(MethodPlan {
        name,
        params,
        returns,
        doc: method.doc.clone(),
        inert: classified.inert.iter().map(|p| p.ident.clone()).collect(),
        request,
        response,
    })
}

/// Analyses every method of `interface`, collecting faults per method.
///
/// ## Errors
///
/// Returns [`GenerationError::NotAnInterface`] if the annotated item is not
/// a trait; nothing is analysed in that case.
///
/// ## Examples
///
/// ```
/// use courier_define::prelude::*;
/// use courier_gen::analysis::{analyze_interface, MethodOutcome};
///
/// let api = InterfaceSpec::new("Api")
///     .with_method(MethodSpec::new("ok", HttpMethod::Get, "/", "Result<(), Error>"))
///     .with_method(MethodSpec::new("bad", HttpMethod::Get, "/", "String"));
///
/// let outcomes = analyze_interface(&api).unwrap();
/// assert!(matches!(outcomes[0], MethodOutcome::Planned(_)));
/// assert!(matches!(outcomes[1], MethodOutcome::Faulted { .. }));
/// ```
pub fn analyze_interface(
    interface: &InterfaceSpec,
) -> Result<Vec<MethodOutcome>, GenerationError> {
    if !interface.is_eligible() {
        return Err(GenerationError::NotAnInterface {
            name: interface.name.clone(),
            kind: interface.kind,
        });
    }

    Ok(interface
        .methods
        .iter()
        .map(|method| match analyze_method(method) {
            Ok(plan) => MethodOutcome::Planned(Box::new(plan)),
            Err(error) => {
                tracing::warn!(interface = %interface.name, %error, "method fault");
                MethodOutcome::Faulted {
                    name: method_ident(method).ok(),
                    error,
                }
            }
        })
        .collect())
}

fn method_ident(method: &MethodSpec) -> Result<Ident, GenerationError> {
    syn::parse_str(&method.name).map_err(|_| GenerationError::InvalidDefinition {
        method: method.name.clone(),
        reason: format!("`{}` is not a valid method name", method.name),
    })
}

/// Parses a default expression. Defaults only apply to `Option` parameters;
/// on anything else they are ignored. An `Option` parameter marked
/// `required` cannot also carry a default.
fn default_value(
    method: &MethodSpec,
    spec: &ParameterSpec,
    ty: &Type,
    text: &str,
) -> Result<Option<DefaultValue>, GenerationError> {
    let param = spec.name.as_str();
    let expr: Expr = syn::parse_str(text).map_err(|_| GenerationError::InvalidDefinition {
        method: method.name.clone(),
        reason: format!("default of parameter `{param}` is not a valid expression: `{text}`"),
    })?;
    let Some(inner) = option_inner_type(ty) else {
        tracing::warn!(
            method = %method.name,
            param,
            "default ignored: only `Option` parameters can be omitted"
        );
        return Ok(None);
    };
    if spec.required {
        return Err(GenerationError::InvalidDefinition {
            method: method.name.clone(),
            reason: format!(
                "parameter `{param}` is marked required but declares a default; mark it optional"
            ),
        });
    }
    Ok(Some(DefaultValue {
        ty: inner.clone(),
        expr,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_define::{HttpMethod, ItemKind, ParameterSpec, Tag, names};

    fn get(name: &str, returns: &str) -> MethodSpec {
        MethodSpec::new(name, HttpMethod::Get, "/x", returns)
    }

    #[test]
    fn non_traits_are_rejected_before_analysis() {
        let api = InterfaceSpec::new("Config").with_kind(ItemKind::Struct);
        assert_eq!(
            analyze_interface(&api).unwrap_err(),
            GenerationError::NotAnInterface {
                name: "Config".into(),
                kind: ItemKind::Struct
            }
        );
    }

    #[test]
    fn one_faulty_method_does_not_block_others() {
        let api = InterfaceSpec::new("Api")
            .with_method(
                get("dup", "Result<(), Error>")
                    .with_param(ParameterSpec::new("a", "String").tagged(Tag::new(names::BODY)))
                    .with_param(ParameterSpec::new("b", "String").tagged(Tag::new(names::BODY))),
            )
            .with_method(get("fine", "Result<String, Error>"));

        let outcomes = analyze_interface(&api).unwrap();
        match &outcomes[0] {
            MethodOutcome::Faulted { name, error } => {
                assert_eq!(name.as_ref().unwrap(), "dup");
                assert!(matches!(error, GenerationError::DuplicateRole { .. }));
            }
            other => panic!("expected fault, got {other:?}"),
        }
        assert!(matches!(outcomes[1], MethodOutcome::Planned(_)));
    }

    #[test]
    fn option_defaults_are_kept() {
        let m = get("list", "Result<(), Error>").with_param(
            ParameterSpec::new("page", "Option<u32>")
                .tagged(Tag::new(names::QUERY))
                .optional()
                .with_default("1"),
        );
        let plan = analyze_method(&m).unwrap();
        let default = plan.params[0].default.as_ref().unwrap();
        assert_eq!(default.ty, syn::parse_str::<Type>("u32").unwrap());
    }

    #[test]
    fn required_option_with_default_is_a_definition_fault() {
        let m = get("list", "Result<(), Error>")
            .with_param(ParameterSpec::new("page", "Option<u32>").with_default("1"));
        match analyze_method(&m) {
            Err(GenerationError::InvalidDefinition { reason, .. }) => {
                assert!(reason.contains("`page` is marked required"));
            }
            other => panic!("expected definition fault, got {other:?}"),
        }
    }

    #[test]
    fn defaults_on_required_types_are_dropped() {
        let m = get("list", "Result<(), Error>")
            .with_param(ParameterSpec::new("page", "u32").with_default("1"));
        assert!(analyze_method(&m).unwrap().params[0].default.is_none());
    }

    #[test]
    fn malformed_default_is_a_definition_fault() {
        let m = get("list", "Result<(), Error>")
            .with_param(ParameterSpec::new("page", "Option<u32>").optional().with_default("1 +"));
        assert!(matches!(
            analyze_method(&m),
            Err(GenerationError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn invalid_method_name_is_reported_without_ident() {
        let api = InterfaceSpec::new("Api").with_method(get("not valid", "Result<(), Error>"));
        match &analyze_interface(&api).unwrap()[0] {
            MethodOutcome::Faulted { name, .. } => assert!(name.is_none()),
            other => panic!("expected fault, got {other:?}"),
        }
    }
}
