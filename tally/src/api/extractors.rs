//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

/// The end-user identity injected upstream in the `X-User-Id` header.
///
/// Session handling lives outside this service; the header value is
/// trusted as-is and only gates target edit-window checks. A missing or
/// non-UTF-8 header yields `None`, which makes every write forbidden and
/// every review row read-only.
#[derive(Debug, Clone)]
pub struct RequesterId(pub Option<String>);

impl<S> FromRequestParts<S> for RequesterId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Ok(RequesterId(id))
    }
}
