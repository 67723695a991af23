//! Integration tests for authentication resolution and emission.

use courier_define::{HttpMethod, MethodSpec, ParameterSpec, Tag, names};
use courier_gen::analysis::analyze_method;
use courier_gen::auth::{AuthDescriptor, AuthKind, FieldSource, resolve_auth};
use courier_gen::classify::classify_params;
use courier_gen::codegen::generate_method;
use quote::quote;

fn method() -> MethodSpec {
    MethodSpec::new("me", HttpMethod::Get, "/me", "Result<String, Error>")
}

fn resolve(method: &MethodSpec) -> Option<AuthDescriptor> {
    let params = classify_params(method).expect("classification should succeed");
    resolve_auth(method, &params).expect("resolution should succeed")
}

fn emit(method: &MethodSpec) -> String {
    let plan = analyze_method(method).expect("analysis should succeed");
    let rt: syn::Path = syn::parse_str("courier_http").unwrap();
    let body = generate_method(&plan, &rt);
    let file: syn::File = syn::parse2(quote! { impl Api for ApiClient { #body } }).unwrap();
    prettyplease::unparse(&file)
}

#[test]
fn bearer_outranks_basic() {
    let method = method()
        .with_tag(Tag::new(names::BASIC_AUTH).with("username", "u").with("password", "p"))
        .with_tag(Tag::new(names::BEARER_AUTH).with("token", "t"));

    let auth = resolve(&method).unwrap();
    assert_eq!(auth.kind(), AuthKind::Bearer);
    assert!(auth.is_constant());

    let code = emit(&method);
    assert!(code.contains("Authenticator::bearer(\"t\")"));
    assert!(!code.contains("Authenticator::basic"));
}

#[test]
fn literal_credentials_build_one_shared_authenticator() {
    let method = method().with_tag(Tag::new(names::BEARER_AUTH).with("token", "secret"));

    let code = emit(&method);
    assert!(code.contains("static __AUTH"));
    assert!(code.contains(".with_auth(__AUTH.clone())"));
}

#[test]
fn parameter_credentials_build_per_call() {
    let method = method().with_param(
        ParameterSpec::new("token", "String").tagged(Tag::new(names::BEARER_TOKEN)),
    );

    let auth = resolve(&method).unwrap();
    assert!(!auth.is_constant());
    assert!(matches!(
        auth,
        AuthDescriptor::Bearer { token: FieldSource::Param(ref ident), prefix: None } if ident == "token"
    ));

    let code = emit(&method);
    assert!(!code.contains("static __AUTH"));
    assert!(code.contains(".with_auth(courier_http::Authenticator::bearer(token))"));
}

#[test]
fn literal_wins_over_parameter_for_the_same_field() {
    let method = method()
        .with_tag(Tag::new(names::BASIC_AUTH).with("username", "admin"))
        .with_param(ParameterSpec::new("user", "String").tagged(Tag::new(names::BASIC_USERNAME)))
        .with_param(ParameterSpec::new("pass", "String").tagged(Tag::new(names::BASIC_PASSWORD)));

    match resolve(&method).unwrap() {
        AuthDescriptor::Basic { username, password } => {
            assert_eq!(username, FieldSource::Literal("admin".to_string()));
            assert!(matches!(password, FieldSource::Param(ref ident) if ident == "pass"));
        }
        other => panic!("expected basic auth, got {other:?}"),
    }
}

#[test]
fn incomplete_credentials_fall_through_to_next_kind() {
    let method = method()
        .with_tag(Tag::new(names::HAWK_AUTH).with("key", "k"))
        .with_tag(Tag::new(names::DIGEST_AUTH).with("username", "u").with("password", "p"));

    assert_eq!(resolve(&method).unwrap().kind(), AuthKind::Digest);
}

#[test]
fn no_credentials_resolve_to_none() {
    assert!(resolve(&method()).is_none());
    assert!(!emit(&method()).contains("with_auth"));
}

#[test]
fn unknown_hawk_algorithm_is_rejected() {
    let method = method().with_tag(
        Tag::new(names::HAWK_AUTH)
            .with("key", "k")
            .with("id", "i")
            .with("algorithm", courier_define::TagValue::variant("Md5")),
    );
    let params = classify_params(&method).unwrap();
    let err = resolve_auth(&method, &params).unwrap_err();
    assert!(err.to_string().contains("Md5"));
}
