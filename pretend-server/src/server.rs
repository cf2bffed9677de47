//! The `PretendServer` facade.
//!
//! # Design
//! A server is created from a base address and a setup closure. The
//! closure registers routes on a `RouteBuilder`; when it returns the route
//! table is sealed, shared, and handed to a freshly installed
//! `InterceptionHook`, all before `new` returns. There is no window where a
//! server exists but is not intercepting, and no way to reach the builder
//! afterwards.
//!
//! Teardown happens on `stop` or on drop, whichever comes first. It is
//! idempotent and cannot be undone.

use std::sync::Arc;

use pretender_core::{handler, HttpMethod, HttpRequest, IntoReply, ParameterMap, RouteError, RouteTable};

use crate::address::BaseAddress;
use crate::error::PretendError;
use crate::hook::InterceptionHook;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Intercepting requests to the base address.
    Active,
    /// Interception removed; requests to the base address pass through.
    TornDown,
}

/// Registers routes while a server is being set up.
///
/// The first malformed pattern is remembered and reported by
/// `PretendServer::new`, so the setup closure itself stays infallible.
#[derive(Debug, Default)]
pub struct RouteBuilder {
    table: RouteTable,
    error: Option<RouteError>,
}

impl RouteBuilder {
    /// Register `handler` for `method` requests whose path matches `pattern`.
    pub fn route<F, R>(&mut self, method: HttpMethod, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        if self.error.is_none() {
            if let Err(err) = self.table.register(method, pattern, handler(f)) {
                self.error = Some(err);
            }
        }
        self
    }

    pub fn get<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Get, pattern, f)
    }

    pub fn post<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Post, pattern, f)
    }

    pub fn put<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Put, pattern, f)
    }

    pub fn patch<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Patch, pattern, f)
    }

    pub fn delete<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Delete, pattern, f)
    }

    pub fn head<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Head, pattern, f)
    }

    pub fn options<F, R>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
        R: IntoReply,
    {
        self.route(HttpMethod::Options, pattern, f)
    }

    fn finish(mut self) -> Result<RouteTable, RouteError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.table.seal();
        Ok(self.table)
    }
}

/// A stubbed HTTP service bound to a base address.
///
/// ```no_run
/// use pretend_server::{Client, HttpRequest, PretendResponse, PretendServer};
///
/// let server = PretendServer::new("http://pretend.stub", |server| {
///     server.get("thing1", |_, _| PretendResponse::text("Hello from thing1"));
/// })?;
///
/// let response = Client::new().send(HttpRequest::get(server.url("/thing1")))?;
/// assert_eq!(response.text(), "Hello from thing1");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct PretendServer {
    address: BaseAddress,
    routes: Arc<RouteTable>,
    hook: InterceptionHook,
}

impl PretendServer {
    /// Register routes with `setup`, then start intercepting `base_url`.
    pub fn new<F>(base_url: &str, setup: F) -> Result<Self, PretendError>
    where
        F: FnOnce(&mut RouteBuilder),
    {
        let address = BaseAddress::parse(base_url)?;

        let mut builder = RouteBuilder::default();
        setup(&mut builder);
        let routes = Arc::new(builder.finish()?);

        let hook = InterceptionHook::install(address.clone(), Arc::clone(&routes));
        Ok(Self {
            address,
            routes,
            hook,
        })
    }

    /// Normalized base address, without a trailing slash.
    pub fn base_url(&self) -> String {
        self.address.as_url()
    }

    /// Absolute URL for `path` under this server's base address.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.address.as_url(), path.trim_start_matches('/'))
    }

    pub fn state(&self) -> ServerState {
        if self.hook.is_active() {
            ServerState::Active
        } else {
            ServerState::TornDown
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Stop intercepting. Stopping a stopped server does nothing.
    pub fn stop(&mut self) {
        self.hook.remove();
    }
}
