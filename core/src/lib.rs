//! Request-interception and route-matching engine for HTTP test doubles.
//!
//! # Overview
//! Matches plain-data `HttpRequest` values against an ordered table of
//! `(method, pattern, handler)` routes and builds the `HttpResponse` a
//! handler asks for, literal or fixture-backed. Nothing here touches the
//! network; diverting real client traffic into a route table is the job of
//! the `pretend-server` crate.
//!
//! # Design
//! - Patterns are `/`-separated literal and `:param` segments; first
//!   registered match wins.
//! - Parameters merge path < query < body < metadata.
//! - Fixtures need a resource context, explicit or default, and fail fast
//!   without one.
//! - Types use owned `String` / `Vec` fields so requests can be moved to
//!   whichever thread or task ends up serving them.

pub mod error;
pub mod fixture;
pub mod http;
pub mod params;
pub mod pattern;
pub mod response;
pub mod routes;

pub use error::{FixtureError, HandlerError, PatternError, RouteError};
pub use fixture::{DefaultContextGuard, FixtureResponse, ResourceContext};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Metadata};
pub use params::ParameterMap;
pub use pattern::{PathParams, PathPattern, Segment};
pub use response::{IntoReply, PretendResponse};
pub use routes::{handler, Handler, Route, RouteMatch, RouteTable};
