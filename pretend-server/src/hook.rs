//! Process-wide interception of outbound requests.
//!
//! # Design
//! Every active `PretendServer` owns one `InterceptionHook`, which is a
//! registration in a process-wide table of `(base address, route table)`
//! pairs. The intercepting `Client` consults that table before doing any
//! I/O: a claimed request is answered from the route table, anything else
//! passes through untouched.
//!
//! Servers bound to different addresses coexist; the longest claiming
//! prefix wins when several share an origin. A server on an address that is
//! already claimed shadows the older one until it is removed, after which
//! the older server answers again. The registry lock is released
//! before a handler runs, so a slow handler never blocks other servers or
//! their teardown.

use std::sync::Arc;

use parking_lot::RwLock;
use pretender_core::{HandlerError, HttpRequest, HttpResponse, RouteTable};
use tracing::{debug, info, info_span};
use url::Url;
use uuid::Uuid;

use crate::address::BaseAddress;

static REGISTRY: RwLock<Vec<Registration>> = parking_lot::const_rwlock(Vec::new());

struct Registration {
    id: Uuid,
    address: BaseAddress,
    routes: Arc<RouteTable>,
}

/// One server's claim on a base address. Removed on `remove` or drop.
#[derive(Debug)]
pub struct InterceptionHook {
    id: Option<Uuid>,
    address: BaseAddress,
}

impl InterceptionHook {
    /// Claim `address` for `routes`, shadowing any older claim on it.
    pub fn install(address: BaseAddress, routes: Arc<RouteTable>) -> Self {
        let mut registry = REGISTRY.write();
        let shadowed = registry.iter().filter(|entry| entry.address == address).count();

        let id = Uuid::new_v4();
        info!(%address, %id, routes = routes.len(), shadowed, "interception installed");
        registry.push(Registration {
            id,
            address: address.clone(),
            routes,
        });
        Self {
            id: Some(id),
            address,
        }
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn address(&self) -> &BaseAddress {
        &self.address
    }

    /// Drop this hook's registration. Calling it again does nothing.
    pub fn remove(&mut self) {
        if let Some(id) = self.id.take() {
            REGISTRY.write().retain(|entry| entry.id != id);
            info!(address = %self.address, %id, "interception removed");
        }
    }
}

impl Drop for InterceptionHook {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Answer `request` from the route table of the server claiming its URL.
///
/// Returns `None` when no active server claims it, meaning the request
/// should go out over the network.
pub fn divert(request: &HttpRequest) -> Option<Result<HttpResponse, HandlerError>> {
    let url = Url::parse(&request.url).ok()?;
    let (id, routes, path) = {
        let registry = REGISTRY.read();
        registry
            .iter()
            .filter_map(|entry| entry.address.claim(&url).map(|path| (entry, path)))
            // `max_by_key` keeps the last of equal keys: the newest registration.
            .max_by_key(|(entry, _)| entry.address.prefix().len())
            .map(|(entry, path)| (entry.id, Arc::clone(&entry.routes), path))?
    };

    let span = info_span!("pretend", server = %id, method = %request.method, %path);
    let _enter = span.enter();
    debug!(url = %request.url, "request diverted");
    Some(routes.dispatch(request, &path))
}

/// Whether an active server would divert a request to `url`.
pub fn is_intercepted(url: &str) -> bool {
    let Ok(url) = Url::parse(url) else {
        return false;
    };
    REGISTRY
        .read()
        .iter()
        .any(|entry| entry.address.claim(&url).is_some())
}
