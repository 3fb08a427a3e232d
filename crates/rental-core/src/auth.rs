//! Actor extraction.
//!
//! Session mechanics live outside the core: whatever issues and stores
//! bearer tokens implements [`ActorResolver`], and the [`CurrentActor`]
//! extractor turns the `Authorization` header into an explicit [`Actor`]
//! value for each handler. An absent or unknown token yields
//! `Actor::Anonymous` rather than a rejection; the policy decides what an
//! anonymous caller may do.

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use axum::Extension;

use crate::domain::{Actor, ActorAccount};

/// Resolves a bearer token to the account context it was issued for.
pub trait ActorResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<ActorAccount>;
}

/// Layer wiring a resolver into the request extensions.
pub fn actor_layer(resolver: Arc<dyn ActorResolver>) -> Extension<Arc<dyn ActorResolver>> {
    Extension(resolver)
}

/// Extractor yielding the request's actor.
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim);

        let resolver = parts.extensions.get::<Arc<dyn ActorResolver>>();

        let actor = match (resolver, token) {
            (Some(resolver), Some(token)) => resolver
                .resolve(token)
                .map(Actor::Account)
                .unwrap_or(Actor::Anonymous),
            _ => Actor::Anonymous,
        };

        Ok(CurrentActor(actor))
    }
}
