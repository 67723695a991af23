//! Request emission.
//!
//! Renders a [`RequestPlan`] as the statements that build `__request`.
//! Header, query and body stages are emitted only when they contribute at
//! least one operation.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::assemble::{
    BodyPlan, EntryOp, MultipartPlan, MultipartSource, OptionsPlan, PartOp, RawBody, RawBodyKind,
    RequestPlan,
};
use crate::codegen::auth::generate_auth;

/// Emits the statements that bind `__request`.
///
/// ## Examples
///
/// ```ignore
/// let __path = format!("/users/{}", id);
/// let mut __headers = courier_http::Headers::new();
/// __headers.insert("Accept", "application/json");
/// let __request = courier_http::Request::new(courier_http::Method::GET, __path)
///     .with_headers(__headers);
/// ```
pub fn generate_request(plan: &RequestPlan, rt: &syn::Path) -> TokenStream {
    let path = generate_path(plan);
    let method = format_ident!("{}", plan.verb.to_string());

    let mut stmts = vec![path];
    let mut chain = Vec::new();

    if !plan.headers.is_empty() {
        let var = format_ident!("__headers");
        stmts.push(entries(&var, quote! { #rt::Headers }, &plan.headers));
        chain.push(quote! { .with_headers(#var) });
    }
    if !plan.queries.is_empty() {
        let var = format_ident!("__query");
        stmts.push(entries(&var, quote! { #rt::Queries }, &plan.queries));
        chain.push(quote! { .with_query(#var) });
    }
    if let Some(body) = &plan.body {
        stmts.push(generate_body(body, rt));
        chain.push(quote! { .with_body(__body) });
    }
    if let Some(extra) = &plan.extra {
        chain.push(quote! { .with_extra(#extra) });
    }
    if !plan.options.is_empty() {
        stmts.push(generate_options(&plan.options, rt));
        chain.push(quote! { .with_options(__options) });
    }

    quote! {
        #(#stmts)*
        let __request = #rt::Request::new(#rt::Method::#method, __path) #(#chain)*;
    }
}

fn generate_path(plan: &RequestPlan) -> TokenStream {
    let (fmt, args) = plan.path.format_parts();
    if args.is_empty() {
        let literal = plan.path.render(|_| String::new());
        quote! { let __path = ::std::string::String::from(#literal); }
    } else {
        quote! { let __path = ::std::format!(#fmt, #(#args),*); }
    }
}

/// A fresh builder of type `ty` bound to `var`, then one statement per op.
fn entries(var: &Ident, ty: TokenStream, ops: &[EntryOp]) -> TokenStream {
    let ops = ops.iter().map(|op| entry_op(var, op));
    quote! {
        let mut #var = #ty::new();
        #(#ops)*
    }
}

fn entry_op(var: &Ident, op: &EntryOp) -> TokenStream {
    match op {
        EntryOp::Literal { name, value } => quote! { #var.insert(#name, #value); },
        EntryOp::Keyed { key, param } => quote! { #var.insert(#key, #param); },
        EntryOp::MergeMap(param) => quote! { #var.extend_map(#param); },
        EntryOp::MergeCollection(param) => quote! { #var.merge(#param); },
        EntryOp::AppendEntries(param) => quote! { #var.append_all(#param); },
        EntryOp::ValueList {
            param,
            optional,
            nullable_items,
        } => {
            let flatten_list = optional.then(|| quote! { .flatten() });
            let flatten_items = nullable_items.then(|| quote! { .flatten() });
            quote! {
                for __value in #param.into_iter() #flatten_list #flatten_items {
                    #var.push_value(__value);
                }
            }
        }
    }
}

fn generate_body(body: &BodyPlan, rt: &syn::Path) -> TokenStream {
    match body {
        BodyPlan::Raw(raw) => {
            let expr = raw_body(raw, rt);
            quote! { let __body = #expr; }
        }
        BodyPlan::Form(ops) => {
            let var = format_ident!("__form");
            let form = entries(&var, quote! { #rt::Form }, ops);
            quote! {
                #form
                let __body = #rt::Body::from(#var);
            }
        }
        BodyPlan::Multipart(plan) => {
            let expr = multipart(plan, rt);
            quote! { let __body = #rt::Body::from(#expr); }
        }
    }
}

fn raw_body(raw: &RawBody, rt: &syn::Path) -> TokenStream {
    let param = &raw.param;
    let base = match &raw.kind {
        RawBodyKind::Native => return quote! { #param },
        RawBodyKind::String => quote! { #rt::Body::string(#param) },
        RawBodyKind::Bytes => quote! { #rt::Body::bytes(#param) },
        RawBodyKind::Stream => quote! { #rt::Body::stream(#param) },
        RawBodyKind::File => quote! { #rt::Body::file(#param) },
        RawBodyKind::Encoded(ty) => quote! { #rt::Body::encode::<#ty>(&#param)? },
    };
    let content_type = with("with_content_type", raw.content_type.as_deref());
    let charset = with("with_charset", raw.charset.as_deref());
    quote! { #base #content_type #charset }
}

fn multipart(plan: &MultipartPlan, rt: &syn::Path) -> TokenStream {
    let base = match &plan.source {
        MultipartSource::Native(param) => return quote! { #param },
        MultipartSource::List(param) => quote! { #rt::MultipartBody::new(#param) },
        MultipartSource::Map(param) => quote! { #rt::MultipartBody::from_map(#param) },
        MultipartSource::Parts(parts) => {
            let parts = parts_expr(parts, rt);
            quote! { #rt::MultipartBody::new(#parts) }
        }
    };
    let content_type = with("with_content_type", plan.content_type.as_deref());
    let boundary = with("with_boundary", plan.boundary.as_deref());
    let charset = with("with_charset", plan.charset.as_deref());
    quote! { #base #content_type #boundary #charset }
}

/// Builds the `Vec<Part>` expression. Spread lists need a mutable vector;
/// everything else fits in `vec![..]`.
fn parts_expr(parts: &[PartOp], rt: &syn::Path) -> TokenStream {
    let has_spread = parts.iter().any(|p| matches!(p, PartOp::Spread(_)));
    if !has_spread {
        let items = parts.iter().map(|p| single_part(p, rt));
        return quote! { ::std::vec![#(#items),*] };
    }

    let pushes = parts.iter().map(|part| match part {
        PartOp::Spread(param) => quote! { __parts.extend(#param); },
        other => {
            let item = single_part(other, rt);
            quote! { __parts.push(#item); }
        }
    });
    quote! {
        {
            let mut __parts: ::std::vec::Vec<#rt::Part> = ::std::vec::Vec::new();
            #(#pushes)*
            __parts
        }
    }
}

fn single_part(part: &PartOp, rt: &syn::Path) -> TokenStream {
    match part {
        PartOp::Text { name, param } => quote! { #rt::Part::text(#name, #param) },
        PartOp::File {
            name,
            param,
            filename,
            content_type,
            charset,
        } => {
            let filename = with("with_filename", filename.as_deref());
            let content_type = with("with_content_type", content_type.as_deref());
            let charset = with("with_charset", charset.as_deref());
            quote! { #rt::Part::file(#name, #param) #filename #content_type #charset }
        }
        PartOp::Native(param) | PartOp::Spread(param) => quote! { #param },
    }
}

fn generate_options(options: &OptionsPlan, rt: &syn::Path) -> TokenStream {
    let base = match &options.base {
        Some(param) => quote! { #param.clone() },
        None => quote! { #rt::RequestOptions::new() },
    };
    let (item, auth) = match &options.auth {
        Some(auth) => {
            let tokens = generate_auth(auth, rt);
            let expr = tokens.expr;
            (tokens.item, Some(quote! { .with_auth(#expr) }))
        }
        None => (None, None),
    };
    let http2 = options.http2.then(|| quote! { .with_http2(true) });

    quote! {
        #item
        let __options = #base #auth #http2;
    }
}

fn with(method: &str, value: Option<&str>) -> Option<TokenStream> {
    let method = format_ident!("{}", method);
    value.map(|v| quote! { .#method(#v) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_method;
    use courier_define::{HttpMethod, MethodSpec, ParameterSpec, Tag, names};

    fn emit(method: &MethodSpec) -> String {
        let plan = analyze_method(method).unwrap();
        let rt: syn::Path = syn::parse_str("rt").unwrap();
        // Wrap in a function so the statements can be formatted.
        let body = generate_request(&plan.request, &rt);
        let tokens = quote! { fn probe() { #body } };
        let file: syn::File = syn::parse2(tokens).unwrap();
        prettyplease::unparse(&file)
    }

    fn p(name: &str, ty: &str, tag: &str) -> ParameterSpec {
        ParameterSpec::new(name, ty).tagged(Tag::new(tag))
    }

    #[test]
    fn static_path_is_a_plain_string() {
        let code = emit(&MethodSpec::new("list", HttpMethod::Get, "/items", "Result<(), E>"));
        assert!(code.contains("::std::string::String::from(\"/items\")"));
        assert!(code.contains("rt::Request::new(rt::Method::GET, __path)"));
        assert!(!code.contains("__headers"));
        assert!(!code.contains("__options"));
    }

    #[test]
    fn path_parameters_are_formatted() {
        let m = MethodSpec::new("get", HttpMethod::Get, "/users/{id}/posts/{post}", "Result<(), E>")
            .with_param(p("id", "u64", names::PATH))
            .with_param(p("post", "u64", names::PATH));
        let code = emit(&m);
        assert!(code.contains("format!(\"/users/{}/posts/{}\", id, post)"));
    }

    #[test]
    fn headers_and_queries_are_built_in_order() {
        let m = MethodSpec::new("search", HttpMethod::Get, "/search", "Result<(), E>")
            .with_tag(Tag::new(names::HEADER).with("name", "Accept").with("value", "text/plain"))
            .with_param(p("q", "String", names::QUERY))
            .with_param(p("tags", "Vec<String>", names::QUERIES))
            .with_param(p("extra", "HashMap<String, String>", names::HEADERS));
        let code = emit(&m);
        assert!(code.contains("let mut __headers = rt::Headers::new();"));
        assert!(code.contains("__headers.insert(\"Accept\", \"text/plain\");"));
        assert!(code.contains("__headers.extend_map(extra);"));
        assert!(code.contains("__query.insert(\"q\", q);"));
        assert!(code.contains("for __value in tags.into_iter() {"));
        assert!(code.contains("__query.push_value(__value);"));
        assert!(code.contains(".with_headers(__headers)"));
        assert!(code.contains(".with_query(__query)"));
    }

    #[test]
    fn optional_nullable_lists_flatten_twice() {
        let m = MethodSpec::new("s", HttpMethod::Get, "/s", "Result<(), E>")
            .with_param(p("tags", "Option<Vec<Option<String>>>", names::QUERIES));
        assert!(emit(&m).contains("tags.into_iter().flatten().flatten()"));
    }

    #[test]
    fn encoded_body_uses_turbofish() {
        let m = MethodSpec::new("create", HttpMethod::Post, "/users", "Result<(), E>").with_param(
            ParameterSpec::new("user", "NewUser")
                .tagged(Tag::new(names::BODY).with("content_type", "application/json")),
        );
        let code = emit(&m);
        assert!(code.contains("rt::Body::encode::<NewUser>(&user)?"));
        assert!(code.contains(".with_content_type(\"application/json\")"));
        assert!(code.contains(".with_body(__body)"));
    }

    #[test]
    fn form_body_converts_into_body() {
        let m = MethodSpec::new("login", HttpMethod::Post, "/login", "Result<(), E>")
            .with_tag(Tag::new(names::FORM))
            .with_param(p("user", "String", names::FIELD));
        let code = emit(&m);
        assert!(code.contains("let mut __form = rt::Form::new();"));
        assert!(code.contains("__form.insert(\"user\", user);"));
        assert!(code.contains("let __body = rt::Body::from(__form);"));
    }

    #[test]
    fn multipart_parts_with_spread() {
        let m = MethodSpec::new("upload", HttpMethod::Post, "/up", "Result<(), E>")
            .with_tag(Tag::new(names::MULTIPART).with("boundary", "XYZ"))
            .with_param(p("title", "String", names::PART))
            .with_param(p("more", "Vec<Part>", names::PART));
        let code = emit(&m);
        assert!(code.contains("__parts.push(rt::Part::text(\"title\", title));"));
        assert!(code.contains("__parts.extend(more);"));
        assert!(code.contains(".with_boundary(\"XYZ\")"));
    }

    #[test]
    fn multipart_tag_without_parts_is_empty_body() {
        let m = MethodSpec::new("upload", HttpMethod::Post, "/up", "Result<(), E>")
            .with_tag(Tag::new(names::MULTIPART));
        assert!(emit(&m).contains("rt::MultipartBody::new(::std::vec![])"));
    }

    #[test]
    fn constant_auth_is_static_and_http2_is_set() {
        let m = MethodSpec::new("me", HttpMethod::Get, "/me", "Result<(), E>")
            .with_tag(Tag::new(names::BEARER_AUTH).with("token", "abc"))
            .with_tag(Tag::new(names::HTTP2));
        let code = emit(&m);
        assert!(code.contains("static __AUTH: ::std::sync::LazyLock<rt::Authenticator>"));
        assert!(code.contains("rt::Authenticator::bearer(\"abc\")"));
        assert!(code.contains(".with_auth(__AUTH.clone())"));
        assert!(code.contains(".with_http2(true)"));
    }

    #[test]
    fn caller_options_are_copied() {
        let m = MethodSpec::new("me", HttpMethod::Get, "/me", "Result<(), E>")
            .with_param(ParameterSpec::new("opts", "RequestOptions"))
            .with_param(p("token", "String", names::BEARER_TOKEN));
        let code = emit(&m);
        assert!(code.contains("opts.clone().with_auth(rt::Authenticator::bearer(token))"));
        assert!(!code.contains("static __AUTH"));
    }

    #[test]
    fn extra_is_attached() {
        let m = MethodSpec::new("x", HttpMethod::Get, "/x", "Result<(), E>")
            .with_param(p("ctx", "HashMap<String, String>", names::EXTRA));
        assert!(emit(&m).contains(".with_extra(ctx)"));
    }
}
