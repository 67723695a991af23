//! Client struct generation.
//!
//! Each interface gets a struct holding the HTTP client and base URL, with
//! the `BASE_URL` constant, a `new(client, base_url)` constructor and a
//! `Default` implementation.

use courier_define::InterfaceSpec;
use proc_macro2::{Ident, TokenStream};
use quote::quote;

/// Generates the client struct for an interface.
///
/// ## Examples
///
/// For `UserApi` with base URL `https://api.example.com`:
/// ```ignore
/// /// HTTP client implementing [`UserApi`].
/// pub struct UserApiClient {
///     client: courier_http::Client,
///     base_url: String,
/// }
///
/// impl UserApiClient {
///     pub const BASE_URL: &'static str = "https://api.example.com";
///
///     pub fn new(client: Option<courier_http::Client>, base_url: Option<String>) -> Self {
///         Self {
///             client: client.unwrap_or_default(),
///             base_url: base_url.unwrap_or_else(|| Self::BASE_URL.to_string()),
///         }
///     }
/// }
///
/// impl Default for UserApiClient {
///     fn default() -> Self {
///         Self::new(None, None)
///     }
/// }
/// ```
pub fn generate_client_struct(
    interface: &InterfaceSpec,
    client_name: &Ident,
    rt: &syn::Path,
) -> TokenStream {
    let base_url = interface.base_url.as_deref().unwrap_or_default();
    let description = format!(" HTTP client implementing [`{}`].", interface.name);
    let extra_doc = interface.description.as_ref().map(|d| {
        let d = format!(" {d}");
        quote! {
            ///
            #[doc = #d]
        }
    });

    quote! {
        #[doc = #description]
        #extra_doc
        pub struct #client_name {
            client: #rt::Client,
            base_url: String,
        }

        impl #client_name {
            /// Base URL used when none is supplied.
            pub const BASE_URL: &'static str = #base_url;

            /// Creates a client. `None` falls back to a default HTTP client
            /// and [`Self::BASE_URL`].
            pub fn new(client: Option<#rt::Client>, base_url: Option<String>) -> Self {
                Self {
                    client: client.unwrap_or_default(),
                    base_url: base_url.unwrap_or_else(|| Self::BASE_URL.to_string()),
                }
            }
        }

        impl Default for #client_name {
            fn default() -> Self {
                Self::new(None, None)
            }
        }
    }
}
