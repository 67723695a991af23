//! Authentication resolution.
//!
//! At most one authenticator is resolved per method. Kinds are tried in the
//! order Hawk, Bearer, Digest, Basic and the first one whose required fields
//! are available wins; lower-precedence credentials are ignored.
//!
//! Each field comes either from a literal on the method-level auth tag or
//! from a dedicated credential parameter. A literal takes priority over a
//! parameter for the same field. An authenticator built only from literals
//! is constant and shared across calls; anything else is built per call.

use courier_define::{MethodSpec, names};
use proc_macro2::Ident;
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::classify::{ClassifiedParams, CredentialField};
use crate::errors::GenerationError;

/// Supported authentication kinds, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum AuthKind {
    Hawk,
    Bearer,
    Digest,
    Basic,
}

/// Where a credential value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    Literal(String),
    Param(Ident),
}

impl FieldSource {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

/// Hawk MAC algorithms the runtime understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HawkAlgorithm {
    Sha1,
    Sha256,
}

impl HawkAlgorithm {
    fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// Source of the Hawk algorithm: a known variant or a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmSource {
    Literal(HawkAlgorithm),
    Param(Ident),
}

/// The resolved authentication strategy for one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDescriptor {
    Basic {
        username: FieldSource,
        password: FieldSource,
    },
    Digest {
        username: FieldSource,
        password: FieldSource,
    },
    Bearer {
        token: FieldSource,
        prefix: Option<FieldSource>,
    },
    Hawk {
        key: FieldSource,
        id: FieldSource,
        algorithm: Option<AlgorithmSource>,
        ext: Option<FieldSource>,
    },
}

impl AuthDescriptor {
    pub fn kind(&self) -> AuthKind {
        match self {
            Self::Basic { .. } => AuthKind::Basic,
            Self::Digest { .. } => AuthKind::Digest,
            Self::Bearer { .. } => AuthKind::Bearer,
            Self::Hawk { .. } => AuthKind::Hawk,
        }
    }

    /// True when every contributing field is a literal, so one
    /// authenticator can serve every call.
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Basic { username, password } | Self::Digest { username, password } => {
                username.is_literal() && password.is_literal()
            }
            Self::Bearer { token, prefix } => {
                token.is_literal() && prefix.as_ref().is_none_or(FieldSource::is_literal)
            }
            Self::Hawk {
                key,
                id,
                algorithm,
                ext,
            } => {
                key.is_literal()
                    && id.is_literal()
                    && algorithm
                        .as_ref()
                        .is_none_or(|a| matches!(a, AlgorithmSource::Literal(_)))
                    && ext.as_ref().is_none_or(FieldSource::is_literal)
            }
        }
    }
}

/// Resolves the authentication strategy for `method`.
///
/// Returns `Ok(None)` when no kind has its required fields.
///
/// ## Errors
///
/// Returns [`GenerationError::InvalidDefinition`] when an auth tag
/// attribute has the wrong literal kind or names an unknown Hawk algorithm.
///
/// ## Examples
///
/// ```
/// use courier_define::prelude::*;
/// use courier_gen::auth::{resolve_auth, AuthKind};
/// use courier_gen::classify::classify_params;
///
/// let method = MethodSpec::new("me", HttpMethod::Get, "/me", "Result<User, Error>")
///     .with_tag(Tag::new(names::BASIC_AUTH).with("username", "u").with("password", "p"))
///     .with_tag(Tag::new(names::BEARER_AUTH).with("token", "t"));
/// let params = classify_params(&method).unwrap();
///
/// let auth = resolve_auth(&method, &params).unwrap().unwrap();
/// assert_eq!(auth.kind(), AuthKind::Bearer);
/// assert!(auth.is_constant());
/// ```
pub fn resolve_auth(
    method: &MethodSpec,
    params: &ClassifiedParams,
) -> Result<Option<AuthDescriptor>, GenerationError> {
    let resolver = Resolver { method, params };

    for kind in AuthKind::iter() {
        if let Some(descriptor) = resolver.resolve(kind)? {
            tracing::debug!(
                method = %method.name,
                kind = %kind,
                constant = descriptor.is_constant(),
                "resolved authenticator"
            );
            return Ok(Some(descriptor));
        }
    }
    Ok(None)
}

struct Resolver<'a> {
    method: &'a MethodSpec,
    params: &'a ClassifiedParams,
}

impl Resolver<'_> {
    fn resolve(&self, kind: AuthKind) -> Result<Option<AuthDescriptor>, GenerationError> {
        use CredentialField as C;

        let descriptor = match kind {
            AuthKind::Hawk => {
                let key = self.field(names::HAWK_AUTH, "key", C::HawkKey)?;
                let id = self.field(names::HAWK_AUTH, "id", C::HawkId)?;
                let algorithm = self.algorithm()?;
                let ext = self.field(names::HAWK_AUTH, "ext", C::HawkExt)?;
                match (key, id) {
                    (Some(key), Some(id)) => Some(AuthDescriptor::Hawk {
                        key,
                        id,
                        algorithm,
                        ext,
                    }),
                    (key, id) => self.partial(kind, key.is_some() || id.is_some()),
                }
            }
            AuthKind::Bearer => {
                let token = self.field(names::BEARER_AUTH, "token", C::BearerToken)?;
                let prefix = self.field(names::BEARER_AUTH, "prefix", C::BearerPrefix)?;
                match token {
                    Some(token) => Some(AuthDescriptor::Bearer { token, prefix }),
                    None => self.partial(kind, prefix.is_some()),
                }
            }
            AuthKind::Digest => {
                let username = self.field(names::DIGEST_AUTH, "username", C::DigestUsername)?;
                let password = self.field(names::DIGEST_AUTH, "password", C::DigestPassword)?;
                match (username, password) {
                    (Some(username), Some(password)) => {
                        Some(AuthDescriptor::Digest { username, password })
                    }
                    (u, p) => self.partial(kind, u.is_some() || p.is_some()),
                }
            }
            AuthKind::Basic => {
                let username = self.field(names::BASIC_AUTH, "username", C::BasicUsername)?;
                let password = self.field(names::BASIC_AUTH, "password", C::BasicPassword)?;
                match (username, password) {
                    (Some(username), Some(password)) => {
                        Some(AuthDescriptor::Basic { username, password })
                    }
                    (u, p) => self.partial(kind, u.is_some() || p.is_some()),
                }
            }
        };
        Ok(descriptor)
    }

    /// Literal from the method tag if present, else the credential parameter.
    fn field(
        &self,
        tag_name: &str,
        attr: &str,
        credential: CredentialField,
    ) -> Result<Option<FieldSource>, GenerationError> {
        let literal = match self.method.tag(tag_name) {
            Some(tag) => tag
                .str_attr(attr)
                .map_err(|e| GenerationError::invalid_attr(&self.method.name, e))?,
            None => None,
        };
        Ok(literal
            .map(|value| FieldSource::Literal(value.to_string()))
            .or_else(|| {
                self.params
                    .credential(credential)
                    .map(|p| FieldSource::Param(p.ident.clone()))
            }))
    }

    fn algorithm(&self) -> Result<Option<AlgorithmSource>, GenerationError> {
        let literal = match self.method.tag(names::HAWK_AUTH) {
            Some(tag) => tag
                .enum_attr("algorithm")
                .map_err(|e| GenerationError::invalid_attr(&self.method.name, e))?,
            None => None,
        };
        if let Some(text) = literal {
            let algorithm =
                HawkAlgorithm::parse(text).ok_or_else(|| GenerationError::InvalidDefinition {
                    method: self.method.name.clone(),
                    reason: format!("unknown Hawk algorithm `{text}`; expected Sha1 or Sha256"),
                })?;
            return Ok(Some(AlgorithmSource::Literal(algorithm)));
        }
        Ok(self
            .params
            .credential(CredentialField::HawkAlgorithm)
            .map(|p| AlgorithmSource::Param(p.ident.clone())))
    }

    fn partial(&self, kind: AuthKind, anything_present: bool) -> Option<AuthDescriptor> {
        if anything_present {
            tracing::warn!(
                method = %self.method.name,
                kind = %kind,
                "incomplete credentials; {kind} authentication not applied"
            );
        }
        None
    }
}
