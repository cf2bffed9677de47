//! Ordered route table and request dispatch.
//!
//! # Design
//! Routes are kept in registration order and never de-duplicated. Lookup
//! walks the list and the first route whose method and pattern both match
//! wins, so an earlier loose pattern shadows a later specific one. Once
//! `seal` is called the table is read-only; it is then shared behind an
//! `Arc` and looked up concurrently without locks.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{HandlerError, RouteError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{self, ParameterMap};
use crate::pattern::PathPattern;
use crate::response::{IntoReply, PretendResponse};

/// A route handler: the request plus its merged parameters in, a response out.
pub type Handler =
    Arc<dyn Fn(&HttpRequest, &ParameterMap) -> Result<PretendResponse, HandlerError> + Send + Sync>;

/// Wrap a closure returning anything `IntoReply` as a `Handler`.
pub fn handler<F, R>(f: F) -> Handler
where
    F: Fn(&HttpRequest, &ParameterMap) -> R + Send + Sync + 'static,
    R: IntoReply,
{
    Arc::new(move |request: &HttpRequest, params: &ParameterMap| f(request, params).into_reply())
}

pub struct Route {
    pub method: HttpMethod,
    pub pattern: PathPattern,
    handler: Handler,
}

impl Route {
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// A successful lookup: the winning route and everything it will be called with.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: ParameterMap,
}

#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    sealed: bool,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Fails if the pattern is malformed or the table is sealed.
    pub fn register(
        &mut self,
        method: HttpMethod,
        pattern: &str,
        handler: Handler,
    ) -> Result<(), RouteError> {
        if self.sealed {
            return Err(RouteError::Sealed {
                method,
                pattern: pattern.to_string(),
            });
        }
        let pattern = PathPattern::parse(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(())
    }

    /// Refuse any further registration.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First route, in registration order, accepting `method` and `path`.
    ///
    /// `path` is the route-relative path; the request supplies the query,
    /// body and metadata that complete the parameter map.
    pub fn lookup(&self, request: &HttpRequest, path: &str) -> Result<RouteMatch<'_>, RouteError> {
        self.routes
            .iter()
            .filter(|route| route.method == request.method)
            .find_map(|route| {
                route.pattern.matches(path).map(|bound| RouteMatch {
                    route,
                    params: params::resolve(&bound, request),
                })
            })
            .ok_or_else(|| RouteError::NoRouteMatched {
                method: request.method,
                path: path.to_string(),
            })
    }

    /// Run the matching handler, or answer with the fixed not-found response.
    ///
    /// Only handler failures are errors; an unmatched request is an ordinary
    /// 404.
    pub fn dispatch(&self, request: &HttpRequest, path: &str) -> Result<HttpResponse, HandlerError> {
        match self.lookup(request, path) {
            Ok(found) => {
                debug!(
                    method = %request.method,
                    path,
                    pattern = found.route.pattern.as_str(),
                    "dispatching to route"
                );
                let mut response = (found.route.handler)(request, &found.params)?.into_http();
                if request.method == HttpMethod::Head {
                    response.body.clear();
                }
                Ok(response)
            }
            Err(err) => {
                warn!(error = %err, "answering with not found");
                Ok(PretendResponse::not_found().into_http())
            }
        }
    }
}
