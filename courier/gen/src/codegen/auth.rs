//! Authenticator emission.
//!
//! A constant authenticator becomes a function-local `static` built once on
//! first use; a per-call authenticator is built inline from the arguments.

use proc_macro2::TokenStream;
use quote::quote;

use crate::auth::{AlgorithmSource, AuthDescriptor, FieldSource, HawkAlgorithm};

/// Emitted authenticator: an optional item to place before the request and
/// the expression handed to `RequestOptions::with_auth`.
pub struct AuthTokens {
    pub item: Option<TokenStream>,
    pub expr: TokenStream,
}

pub fn generate_auth(auth: &AuthDescriptor, rt: &syn::Path) -> AuthTokens {
    let build = constructor(auth, rt);

    if auth.is_constant() {
        AuthTokens {
            item: Some(quote! {
                static __AUTH: ::std::sync::LazyLock<#rt::Authenticator> =
                    ::std::sync::LazyLock::new(|| #build);
            }),
            expr: quote! { __AUTH.clone() },
        }
    } else {
        AuthTokens {
            item: None,
            expr: build,
        }
    }
}

fn constructor(auth: &AuthDescriptor, rt: &syn::Path) -> TokenStream {
    match auth {
        AuthDescriptor::Basic { username, password } => {
            let (u, p) = (field(username), field(password));
            quote! { #rt::Authenticator::basic(#u, #p) }
        }
        AuthDescriptor::Digest { username, password } => {
            let (u, p) = (field(username), field(password));
            quote! { #rt::Authenticator::digest(#u, #p) }
        }
        AuthDescriptor::Bearer { token, prefix } => {
            let token = field(token);
            let prefix = prefix.as_ref().map(|p| {
                let p = field(p);
                quote! { .with_prefix(#p) }
            });
            quote! { #rt::Authenticator::bearer(#token) #prefix }
        }
        AuthDescriptor::Hawk {
            key,
            id,
            algorithm,
            ext,
        } => {
            let (key, id) = (field(key), field(id));
            let algorithm = algorithm.as_ref().map(|a| {
                let a = match a {
                    AlgorithmSource::Literal(HawkAlgorithm::Sha1) => {
                        quote! { #rt::HawkAlgorithm::Sha1 }
                    }
                    AlgorithmSource::Literal(HawkAlgorithm::Sha256) => {
                        quote! { #rt::HawkAlgorithm::Sha256 }
                    }
                    AlgorithmSource::Param(ident) => quote! { #ident },
                };
                quote! { .with_algorithm(#a) }
            });
            let ext = ext.as_ref().map(|e| {
                let e = field(e);
                quote! { .with_ext(#e) }
            });
            quote! { #rt::Authenticator::hawk(#key, #id) #algorithm #ext }
        }
    }
}

fn field(source: &FieldSource) -> TokenStream {
    match source {
        FieldSource::Literal(value) => quote! { #value },
        FieldSource::Param(ident) => quote! { #ident },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proc_macro2::{Ident, Span};

    fn rt() -> syn::Path {
        syn::parse_str("courier_http").unwrap()
    }

    fn lit(s: &str) -> FieldSource {
        FieldSource::Literal(s.into())
    }

    fn param(s: &str) -> FieldSource {
        FieldSource::Param(Ident::new(s, Span::call_site()))
    }

    #[test]
    fn constant_bearer_is_a_lazy_static() {
        let auth = AuthDescriptor::Bearer {
            token: lit("secret"),
            prefix: None,
        };
        let tokens = generate_auth(&auth, &rt());
        let item = tokens.item.unwrap().to_string();
        assert!(item.contains("static __AUTH"));
        assert!(item.contains("LazyLock"));
        assert!(item.contains("Authenticator :: bearer (\"secret\")"));
        assert_eq!(tokens.expr.to_string(), "__AUTH . clone ()");
    }

    #[test]
    fn per_call_bearer_is_inline() {
        let auth = AuthDescriptor::Bearer {
            token: param("token"),
            prefix: Some(lit("Token")),
        };
        let tokens = generate_auth(&auth, &rt());
        assert!(tokens.item.is_none());
        assert_eq!(
            tokens.expr.to_string(),
            "courier_http :: Authenticator :: bearer (token) . with_prefix (\"Token\")"
        );
    }

    #[test]
    fn hawk_includes_optional_parts() {
        let auth = AuthDescriptor::Hawk {
            key: lit("k"),
            id: lit("i"),
            algorithm: Some(AlgorithmSource::Literal(HawkAlgorithm::Sha1)),
            ext: Some(param("ext")),
        };
        let expr = generate_auth(&auth, &rt()).expr.to_string();
        assert!(expr.contains("Authenticator :: hawk (\"k\" , \"i\")"));
        assert!(expr.contains("with_algorithm (courier_http :: HawkAlgorithm :: Sha1)"));
        assert!(expr.contains("with_ext (ext)"));
    }

    #[test]
    fn basic_and_digest_constructors() {
        let basic = AuthDescriptor::Basic {
            username: param("user"),
            password: param("pass"),
        };
        assert!(generate_auth(&basic, &rt()).expr.to_string().contains("basic (user , pass)"));

        let digest = AuthDescriptor::Digest {
            username: lit("u"),
            password: lit("p"),
        };
        assert!(generate_auth(&digest, &rt()).item.unwrap().to_string().contains("digest"));
    }
}
