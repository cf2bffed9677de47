//! In-process HTTP test doubles.
//!
//! # Overview
//! A `PretendServer` claims a base address such as `http://pretend.stub`
//! and a set of routes. While it is alive, every request sent through a
//! `Client` to that address is answered by the matching route's handler
//! instead of going over the network. Requests to any other address are
//! executed for real.
//!
//! # Design
//! - Route matching, parameter merging and response building live in
//!   `pretender-core`; this crate adds base addresses, the process-wide
//!   interception registry, and the client that consults it.
//! - Interception is tied to the server value: installed by
//!   `PretendServer::new`, removed by `stop` or drop.
//! - Several servers on different addresses can be active at once, from any
//!   number of threads.

pub mod address;
pub mod error;
pub mod hook;
pub mod server;
pub mod transport;

pub use address::BaseAddress;
pub use error::{PretendError, TransportError};
pub use hook::{is_intercepted, InterceptionHook};
pub use server::{PretendServer, RouteBuilder, ServerState};
pub use transport::{Client, NetworkTransport, Transport};

pub use pretender_core::{
    FixtureError, FixtureResponse, HandlerError, HttpMethod, HttpRequest, HttpResponse, ParameterMap,
    PretendResponse, ResourceContext,
};
