//! Request tracing middleware.
//!
//! Every request runs inside a span carrying the method, path, peer address,
//! and a request id, and ends with one event recording the status and
//! latency. The request id is echoed from an incoming `x-request-id` header
//! when the proxy supplies one, otherwise generated from a process-local
//! counter; either way it is set on the response so a client can quote it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use http::Method;
use tracing::{Instrument, info, info_span};

use crate::response::Response;

static NEXT_REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// A fresh process-local request id.
pub(crate) fn next_request_id() -> String {
    format!("{:08x}", NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed))
}

/// Runs one request future inside its span and stamps the outcome.
pub(crate) async fn trace<F>(
    method: &Method,
    path: &str,
    peer: SocketAddr,
    request_id: &str,
    respond: F,
) -> Response
where
    F: Future<Output = Response>,
{
    let span = info_span!("request", %method, path, %peer, request_id);
    async {
        let started = Instant::now();
        let mut response = respond.await;
        response.insert_header("x-request-id", request_id);
        info!(
            status = response.status_code().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "handled"
        );
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    #[test]
    fn request_ids_are_unique() {
        let first = next_request_id();
        let second = next_request_id();
        assert_ne!(first, second);
        assert_eq!(first.len(), 8);
    }

    #[tokio::test]
    async fn trace_stamps_the_request_id() {
        let peer: SocketAddr = "127.0.0.1:9999".parse().expect("test addr");
        let response = trace(&Method::GET, "/healthz", peer, "deadbeef", async {
            Response::text("ok")
        })
        .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("x-request-id"), Some("deadbeef"));
    }
}
