use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use std::convert::Infallible;
use tracing::Span;
use crate::domain::models::context::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = parts.headers.get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(RequestContext::new)
            .unwrap_or_else(RequestContext::generate);

        Span::current().record("request_id", ctx.request_id.as_str());

        Ok(ctx)
    }
}
