//! Kubernetes health-check handlers.
//!
//! The dataset is loaded before the listener binds, so once the process
//! accepts connections it is both alive and ready. Both probes are plain
//! 200 responses.
//!
//! | Probe | Path |
//! |---|---|
//! | Liveness | `/healthz` |
//! | Readiness | `/readyz` |

use crate::request::Request;
use crate::response::Response;

/// Liveness probe. Answers `200 OK` with the body `ok`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// Readiness probe. Answers `200 OK` with the body `ready`.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}
