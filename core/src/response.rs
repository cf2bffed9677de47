//! Responses produced by route handlers.
//!
//! A handler returns a `PretendResponse`, built from a literal body or
//! loaded from a fixture (see `fixture`). Status defaults to 200. The
//! content type is recorded as the response's content descriptor and
//! emitted as a `content-type` header when converted to `HttpResponse`.

use serde::Serialize;

use crate::error::HandlerError;
use crate::http::HttpResponse;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Status and body of the fixed response for unmatched requests.
pub const NOT_FOUND_STATUS: u16 = 404;
pub const NOT_FOUND_BODY: &str = "Not Found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PretendResponse {
    pub status: u16,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl PretendResponse {
    pub fn new(body: impl Into<Vec<u8>>, content_type: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: content_type.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(body.into(), TEXT_PLAIN)
    }

    pub fn bytes(body: impl Into<Vec<u8>>) -> Self {
        Self::new(body, OCTET_STREAM)
    }

    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::to_vec(value)?, APPLICATION_JSON))
    }

    /// The fixed response for a diverted request no route accepts.
    pub fn not_found() -> Self {
        Self::text(NOT_FOUND_BODY).with_status(NOT_FOUND_STATUS)
    }

    pub fn empty() -> Self {
        Self::text(String::new())
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn into_http(self) -> HttpResponse {
        let mut headers = Vec::with_capacity(self.headers.len() + 2);
        headers.push(("content-type".to_string(), self.content_type));
        headers.push(("content-length".to_string(), self.body.len().to_string()));
        headers.extend(self.headers);
        HttpResponse {
            status: self.status,
            headers,
            body: self.body,
        }
    }
}

impl From<PretendResponse> for HttpResponse {
    fn from(response: PretendResponse) -> Self {
        response.into_http()
    }
}

/// What a route handler may return.
///
/// Plain responses always succeed; `Result`s carry handler failures so
/// fixture loading and other fallible work can use `?`.
pub trait IntoReply {
    fn into_reply(self) -> Result<PretendResponse, HandlerError>;
}

impl IntoReply for PretendResponse {
    fn into_reply(self) -> Result<PretendResponse, HandlerError> {
        Ok(self)
    }
}

impl<E> IntoReply for Result<PretendResponse, E>
where
    E: Into<HandlerError>,
{
    fn into_reply(self) -> Result<PretendResponse, HandlerError> {
        self.map_err(Into::into)
    }
}
