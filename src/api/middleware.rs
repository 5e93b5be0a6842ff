//! Request logging middleware: one structured `tracing` event per
//! request, tagged with a generated request id so a single request's
//! entry and exit lines can be correlated in aggregated logs.

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    tracing::info!(%request_id, %method, %path, "request received");
    let response = next.run(req).await;
    tracing::info!(
        %request_id,
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}
