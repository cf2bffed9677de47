//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{extract::Path, http::HeaderMap, routing::get, Router};
use pretend_server::ResourceContext;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The committed fixtures under `tests/fixtures`.
pub fn fixtures() -> ResourceContext {
    ResourceContext::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

/// Start a real HTTP upstream on a random loopback port.
///
/// `GET /echo/{word}` answers with the word and `GET /headers/{name}` with
/// the named request header, so tests can tell real network traffic from a
/// stubbed answer.
pub fn start_upstream() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, upstream()).await
        })
        .unwrap();
    });

    addr
}

fn upstream() -> Router {
    Router::new()
        .route("/echo/{word}", get(|Path(word): Path<String>| async move { format!("upstream says {word}") }))
        .route(
            "/headers/{name}",
            get(|Path(name): Path<String>, headers: HeaderMap| async move {
                headers
                    .get(name.as_str())
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("<absent>")
                    .to_string()
            }),
        )
}
