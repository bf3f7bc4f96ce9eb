//! Request id extraction.
//!
//! `SetRequestIdLayer` stamps every request with `x-request-id`; handlers
//! read it back with `RequestId` and pass it to commands as the correlation id.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::domain::foundation::{CommandMetadata, UserId};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// The request id assigned by the request-id layer, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestId(pub Option<String>);

impl RequestId {
    /// Builds command metadata for `user_id`, correlated with this request.
    pub fn metadata(self, user_id: UserId) -> CommandMetadata {
        let metadata = CommandMetadata::new(user_id);
        match self.0 {
            Some(id) => metadata.with_correlation_id(id),
            None => metadata,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestId(
            parts
                .headers
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn reads_request_id_header() {
        let request: Request<()> = Request::builder()
            .header(REQUEST_ID_HEADER, "req-42")
            .body(())
            .unwrap();
        let (mut parts, _body) = request.into_parts();

        let id = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        let metadata = id.metadata(UserId::new("user-1").unwrap());
        assert_eq!(metadata.correlation_id(), "req-42");
    }

    #[tokio::test]
    async fn missing_header_still_yields_a_correlation_id() {
        let request: Request<()> = Request::builder().body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let id = RequestId::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(id, RequestId(None));
        assert!(!id.metadata(UserId::new("user-1").unwrap()).correlation_id().is_empty());
    }
}
