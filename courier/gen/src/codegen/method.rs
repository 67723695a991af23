//! Endpoint method emission.

use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::{Expr, ExprLit, Lit};

use crate::analysis::{MethodOutcome, MethodPlan, SignatureParam};
use crate::codegen::request::generate_request;
use crate::codegen::response::generate_response;
use crate::errors::GenerationError;

/// Emits one `async fn` implementing an endpoint.
///
/// ## Examples
///
/// ```ignore
/// async fn get_user(&self, id: u64) -> Result<User, Error> {
///     let __path = format!("/users/{}", id);
///     let __request = courier_http::Request::new(courier_http::Method::GET, __path);
///     let __response = self.client.send(&self.base_url, __request).await?;
///     let __status = __response.status();
///     if !(200..300).contains(&__status) {
///         return Err(courier_http::Error::from_response(__response).await.into());
///     }
///     let __value = __response.decode::<User>().await?;
///     Ok(__value)
/// }
/// ```
pub fn generate_method(plan: &MethodPlan, rt: &syn::Path) -> TokenStream {
    let name = &plan.name;
    let returns = &plan.returns;
    let params = plan.params.iter().map(|p| {
        let (ident, ty) = (&p.ident, &p.ty);
        quote! { #ident: #ty }
    });
    let defaults = generate_defaults(&plan.params);
    let doc = plan.doc.iter().flat_map(|d| d.lines()).map(|line| {
        let line = format!(" {line}");
        quote! { #[doc = #line] }
    });
    let allow_unused = (!plan.inert.is_empty()).then(|| quote! { #[allow(unused_variables)] });

    let request = generate_request(&plan.request, rt);
    let response = generate_response(&plan.response, rt);

    quote! {
        #(#doc)*
        #allow_unused
        async fn #name(&self, #(#params),*) -> #returns {
            #defaults
            #request
            #response
        }
    }
}

/// Rebinds every defaulted `Option<T>` parameter so `None` falls back to its
/// default. The default is bound at `T`; string literals convert with `Into`.
///
/// ```ignore
/// let limit = limit.or_else(|| {
///     let __default: u32 = 20;
///     Some(__default)
/// });
/// ```
pub fn generate_defaults(params: &[SignatureParam]) -> TokenStream {
    params
        .iter()
        .filter_map(|p| {
            let ident = &p.ident;
            p.default.as_ref().map(|default| {
                let ty = &default.ty;
                let expr = &default.expr;
                let value = if is_str_literal(expr) {
                    quote! { ::core::convert::Into::into(#expr) }
                } else {
                    quote! { #expr }
                };
                quote! {
                    let #ident = #ident.or_else(|| {
                        let __default: #ty = #value;
                        Some(__default)
                    });
                }
            })
        })
        .collect()
}

fn is_str_literal(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Lit(ExprLit {
            lit: Lit::Str(_),
            ..
        })
    )
}

/// Emits a `compile_error!` in place of a method that could not be analysed.
pub fn generate_faulted_method(name: Option<&Ident>, error: &GenerationError) -> TokenStream {
    let message = match name {
        Some(name) => format!("courier: cannot implement `{name}`: {error}"),
        None => format!("courier: {error}"),
    };
    quote! { ::core::compile_error!(#message); }
}

/// Emits every method outcome, in declaration order.
pub fn generate_methods(outcomes: &[MethodOutcome], rt: &syn::Path) -> TokenStream {
    outcomes
        .iter()
        .map(|outcome| match outcome {
            MethodOutcome::Planned(plan) => generate_method(plan, rt),
            MethodOutcome::Faulted { name, error } => generate_faulted_method(name.as_ref(), error),
        })
        .collect()
}
