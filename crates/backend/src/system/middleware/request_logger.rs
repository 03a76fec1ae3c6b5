use axum::body::to_bytes;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов
///
/// Logs method, path, status, duration and response size of every request.
/// The body is buffered to measure its real size.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();
    let status = parts.status.as_u16();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!(
                %method,
                %path,
                status,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "failed to read response body: {}",
                e
            );
            return Response::from_parts(parts, Body::default());
        }
    };

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let size = format_number(bytes.len());

    if parts.status.is_success() {
        tracing::info!(%method, %path, status, elapsed_ms, %size, "request");
    } else {
        tracing::warn!(%method, %path, status, elapsed_ms, %size, "request");
    }

    Response::from_parts(parts, Body::from(bytes))
}
