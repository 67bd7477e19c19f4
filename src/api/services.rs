use axum::{
    extract::{Request, State},
    http::{StatusCode, header, uri::Authority},
    response::IntoResponse,
};
use url::Url;

use super::state::AppState;
use crate::edge::{EdgeError, IncomingRequest};

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Catch-all handler: every path that is not an operator route goes
/// through the edge pipeline.
pub async fn serve_edge(State(state): State<AppState>, request: Request) -> impl IntoResponse {
    let Some(incoming) = to_incoming(&state, &request) else {
        tracing::debug!(uri = %request.uri(), "Unable to rebuild request URL");
        return EdgeError::NotFound.into_response();
    };

    let response = state.pipeline.handle(&incoming).await;
    tracing::info!(
        method = %incoming.method,
        host = incoming.hostname(),
        path = incoming.url.path(),
        status = response.status.as_u16(),
        "Edge request served"
    );
    response.into_response()
}

/// Rebuild the public URL from the Host header (or absolute-form URI) and
/// the configured scheme.
fn to_incoming(state: &AppState, request: &Request) -> Option<IncomingRequest> {
    let headers = request.headers();
    let uri = request.uri();

    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .filter(|h| !h.is_empty())?;
    let authority = bare_authority(host)?;

    let scheme = state
        .config
        .server
        .trust_forwarded_proto
        .then(|| headers.get("x-forwarded-proto"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .filter(|v| matches!(*v, "http" | "https"))
        .unwrap_or(&state.config.server.public_scheme);

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let url = Url::parse(&format!("{scheme}://{authority}{path_and_query}")).ok()?;

    Some(IncomingRequest::new(
        request.method().clone(),
        url,
        headers.clone(),
    ))
}

/// `host[:port]` only; userinfo or any path, query or fragment is refused.
fn bare_authority(host: &str) -> Option<Authority> {
    let authority: Authority = host.parse().ok()?;
    (!authority.as_str().contains('@')).then_some(authority)
}
