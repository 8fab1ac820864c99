// Shared primitives for serving stub upstreams to integration tests.
#![allow(dead_code)]

// `Router` is the stub service each test builds for itself.
use axum::Router;
// Timeouts bound every client the tests construct.
use std::time::Duration;

// Serve the router on an ephemeral port and return its base URL.
pub async fn spawn_stub(app: Router) -> String {
    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    // Capture the exact address that was assigned by the OS.
    let addr = listener.local_addr().expect("get local addr");
    // Serve on the test runtime; the task ends when the test does.
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server failed");
    });
    // The listener is already bound, so requests queue until the task is polled.
    format!("http://{addr}")
}

// Base URL of a port nobody listens on.
pub async fn closed_port_url() -> String {
    // Reserve a port from the OS so the address is well-formed and local.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    // Release it again; connects now fail with connection refused.
    drop(listener);
    format!("http://{addr}")
}

// Generous default so slow CI machines do not flake.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);
