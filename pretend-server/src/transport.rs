//! Request execution with interception.
//!
//! # Design
//! `Client` is the transport layer client code sends through. Before any
//! I/O it asks the interception registry whether an active `PretendServer`
//! claims the request's URL; if so the route table answers in-process,
//! otherwise the request goes to the wrapped `Transport`. The default
//! transport is `NetworkTransport`, a thin ureq wrapper.
//!
//! Metadata attached to an `HttpRequest` is visible to handlers but is
//! never written to the wire.
//!
//! `send` blocks the calling thread. `send_async` runs the same path on
//! tokio's blocking pool and resolves once with that request's response,
//! so concurrent callers each get exactly their own answer.

use std::sync::Arc;

use pretender_core::{HttpMethod, HttpRequest, HttpResponse};
use tracing::debug;

use crate::error::TransportError;
use crate::hook;

/// Executes a request that no pretend server claimed.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Real network I/O through a `ureq::Agent`.
///
/// HTTP error statuses are returned as responses, not errors, so a real
/// 404 looks the same as a stubbed one.
#[derive(Debug, Clone)]
pub struct NetworkTransport {
    agent: ureq::Agent,
}

impl NetworkTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for NetworkTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for NetworkTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let body = request.body.as_deref().unwrap_or_default();

        let mut response = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(url), request).call(),
            HttpMethod::Head => with_headers(self.agent.head(url), request).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(url), request).call(),
            HttpMethod::Options => with_headers(self.agent.options(url), request).call(),
            HttpMethod::Post => with_headers(self.agent.post(url), request).send(body),
            HttpMethod::Put => with_headers(self.agent.put(url), request).send(body),
            HttpMethod::Patch => with_headers(self.agent.patch(url), request).send(body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Sends requests, diverting those claimed by an active `PretendServer`.
pub struct Client<T = NetworkTransport> {
    transport: Arc<T>,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

impl Client<NetworkTransport> {
    pub fn new() -> Self {
        Self::with_transport(NetworkTransport::new())
    }
}

impl Default for Client<NetworkTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport + 'static> Client<T> {
    /// Use `transport` for requests no pretend server claims.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send `request` and block until its response is ready.
    ///
    /// An unmatched route on a claimed address is a normal 404 response. A
    /// failing handler is `TransportError::Handler`.
    pub fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        match hook::divert(&request) {
            Some(result) => Ok(result?),
            None => {
                debug!(method = %request.method, url = %request.url, "passing request through");
                self.transport.execute(&request)
            }
        }
    }

    /// Send `request` from async code.
    ///
    /// Handlers and fixture reads are blocking, so the work runs on tokio's
    /// blocking pool. Must be called from within a tokio runtime.
    pub async fn send_async(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.send(request))
            .await
            .map_err(|err| {
                if err.is_panic() {
                    TransportError::HandlerPanicked(panic_message(err.into_panic()))
                } else {
                    TransportError::InvalidRequest(format!("request was cancelled: {err}"))
                }
            })?
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
