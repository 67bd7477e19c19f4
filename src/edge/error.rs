use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::response::EdgeResponse;

/// Terminal outcomes that end a request before a successful origin response.
///
/// Every 403 cause renders the same body so callers cannot tell which
/// validation stage rejected them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EdgeError {
    #[error("request path is empty")]
    NotFound,
    #[error("malformed request: {0}")]
    BadRequestShape(String),
    #[error("referer rejected: {0}")]
    ForbiddenReferer(String),
    #[error("host does not match shard pattern: {0}")]
    ForbiddenHost(String),
    #[error("origin unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("origin answered with status {0}")]
    UpstreamRejected(u16),
}

impl EdgeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EdgeError::NotFound => StatusCode::NOT_FOUND,
            EdgeError::BadRequestShape(_) => StatusCode::FORBIDDEN,
            EdgeError::ForbiddenReferer(_) => StatusCode::FORBIDDEN,
            EdgeError::ForbiddenHost(_) => StatusCode::FORBIDDEN,
            EdgeError::UpstreamUnreachable(_) => StatusCode::BAD_GATEWAY,
            EdgeError::UpstreamRejected(_) => StatusCode::NOT_FOUND,
        }
    }

    /// Short plain-text body sent to the client.
    pub fn public_message(&self) -> &'static str {
        match self.status_code() {
            StatusCode::FORBIDDEN => "Forbidden",
            StatusCode::BAD_GATEWAY => "Bad Gateway",
            _ => "Not found",
        }
    }

    pub fn to_response(&self) -> EdgeResponse {
        EdgeResponse::plain(self.status_code(), self.public_message())
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> axum::response::Response {
        self.to_response().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(EdgeError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            EdgeError::BadRequestShape("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EdgeError::ForbiddenReferer("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EdgeError::ForbiddenHost("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EdgeError::UpstreamUnreachable("x".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            EdgeError::UpstreamRejected(500).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_forbidden_causes_are_indistinguishable() {
        let bodies: Vec<_> = [
            EdgeError::BadRequestShape("unsupported extension".into()),
            EdgeError::ForbiddenReferer("evil.com".into()),
            EdgeError::ForbiddenHost("cdn.vicdn.cc".into()),
        ]
        .iter()
        .map(|e| e.to_response().body)
        .collect();

        assert!(bodies.iter().all(|b| b.as_ref() == b"Forbidden"));
    }

    #[test]
    fn test_upstream_rejection_renders_not_found() {
        let response = EdgeError::UpstreamRejected(503).to_response();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body.as_ref(), b"Not found");
    }
}
