//! Request plumbing shared by the identity and directory clients.

use reqwest::{Response, StatusCode, Url};

use crate::error::ApiError;

/// Parsed base URL of the backend.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base: Url,
}

impl Endpoint {
    pub fn parse(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| ApiError::Validation(format!("invalid API URL {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Validation(format!(
                "invalid API URL {base_url:?}: not a hierarchical URL"
            )));
        }
        Ok(Self { base })
    }

    /// Append path segments, percent-encoding each one.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }
}

/// A non-2xx answer: status plus the backend's message, if any.
#[derive(Debug)]
pub(crate) struct Rejection {
    pub status: StatusCode,
    pub message: String,
}

impl Rejection {
    pub fn code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Fallback mapping once a call has handled the statuses it knows.
    pub fn into_error(self) -> ApiError {
        if self.status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized;
        }
        ApiError::Service {
            status: self.status.as_u16(),
            message: self.message,
        }
    }
}

/// Split a response into success or a [`Rejection`].
///
/// The message is the body's `message` field when the body is JSON,
/// otherwise the raw body text.
pub(crate) async fn check(resp: Response) -> Result<Response, Rejection> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);
    Err(Rejection { status, message })
}

/// Decode a 2xx JSON body.
pub(crate) async fn json<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json::<T>()
        .await
        .map_err(|e| ApiError::Decode(format!("response body: {e}")))
}
