//! Response emission.
//!
//! Sends `__request` and turns `__response` into the method's return value
//! according to a [`ResponsePlan`].

use proc_macro2::TokenStream;
use quote::quote;

use crate::response::{Extraction, ResponsePlan, StatusCheck};

/// Emits the send, optional status check, extraction, close and final
/// `Ok(..)` of an endpoint method.
pub fn generate_response(plan: &ResponsePlan, rt: &syn::Path) -> TokenStream {
    let send = quote! {
        let __response = self.client.send(&self.base_url, __request).await?;
    };

    let check = plan.status_check.map(|check| {
        let raises = raises_condition(check);
        quote! {
            let __status = __response.status();
            if #raises {
                return Err(#rt::Error::from_response(__response).await.into());
            }
        }
    });

    let meta = plan
        .wrapped
        .then(|| quote! { let __meta = __response.meta(); });

    let (extract, value) = extraction(&plan.extraction);
    let close = (plan.close && releases_explicitly(&plan.extraction))
        .then(|| quote! { drop(__response); });

    let result = if plan.wrapped {
        let payload = match value {
            Some(value) => quote! { Some(#value) },
            None => quote! { None },
        };
        quote! { #rt::Envelope::new(__meta, #payload) }
    } else {
        value.unwrap_or_else(|| quote! { () })
    };

    quote! {
        #send
        #check
        #meta
        #extract
        #close
        Ok(#result)
    }
}

/// The condition under which `__status` raises.
fn raises_condition(check: StatusCheck) -> TokenStream {
    match check {
        StatusCheck::Default => quote! { !(200..300).contains(&__status) },
        StatusCheck::Range {
            min,
            max,
            negate: false,
        } => quote! { (#min..#max).contains(&__status) },
        StatusCheck::Range {
            min,
            max,
            negate: true,
        } => quote! { !(#min..#max).contains(&__status) },
    }
}

/// Statements that extract the payload, and the payload expression.
fn extraction(extraction: &Extraction) -> (TokenStream, Option<TokenStream>) {
    match extraction {
        Extraction::None => (TokenStream::new(), None),
        Extraction::Text => (
            quote! { let __value = __response.text().await?; },
            Some(quote! { __value }),
        ),
        Extraction::Bytes { raw } => {
            let call = if *raw {
                quote! { raw_bytes }
            } else {
                quote! { decompressed_bytes }
            };
            (
                quote! { let __value = __response.#call().await?; },
                Some(quote! { __value.into() }),
            )
        }
        Extraction::Response => (TokenStream::new(), Some(quote! { __response })),
        Extraction::Stream => (TokenStream::new(), Some(quote! { __response.bytes_stream() })),
        Extraction::StatusCode(ty) => (
            quote! { let __value = <#ty>::from(__response.status()); },
            Some(quote! { __value }),
        ),
        Extraction::Decode(ty) => (
            quote! { let __value = __response.decode::<#ty>().await?; },
            Some(quote! { __value }),
        ),
    }
}

/// Extractions that read nothing from the body leave the response alive;
/// those are dropped explicitly.
fn releases_explicitly(extraction: &Extraction) -> bool {
    matches!(extraction, Extraction::None | Extraction::StatusCode(_))
}
