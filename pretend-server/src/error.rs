//! Error types for server construction and request delivery.
//!
//! # Design
//! `PretendError` covers everything that can go wrong before a server is
//! active. `TransportError` is what a caller sees when a request could not
//! be answered. An unmatched route is not an error at all; it arrives as an
//! ordinary 404 response.

use pretender_core::{HandlerError, RouteError};
use thiserror::Error;

/// Errors from building a `PretendServer`.
#[derive(Debug, Error)]
pub enum PretendError {
    #[error("invalid base address `{url}`: {reason}")]
    InvalidBaseAddress { url: String, reason: String },

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Errors delivered in place of a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A route handler failed for this request.
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    /// A route handler panicked while serving an asynchronous request.
    #[error("handler panicked: {0}")]
    HandlerPanicked(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request went out over the network and failed there.
    #[error("network error: {0}")]
    Network(#[from] ureq::Error),
}
