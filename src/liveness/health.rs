//! Health-check responder

use axum::{http::StatusCode, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub const HEALTH_BODY: &str = "OK";

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, HEALTH_BODY)
}

/// Answers every method and path with `200 OK`
pub fn health_router() -> Router {
    Router::new()
        .fallback(health)
        .layer(TraceLayer::new_for_http())
}

/// Serve the health responder until cancelled
pub async fn serve_health(listener: TcpListener, cancel: CancellationToken) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Health responder listening");
    }
    axum::serve(listener, health_router())
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    async fn call(method: Method, uri: &str) -> (StatusCode, String) {
        let response = health_router()
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_any_request_is_healthy() {
        for (method, uri) in [
            (Method::GET, "/"),
            (Method::HEAD, "/healthz"),
            (Method::POST, "/some/deep/path?x=1"),
        ] {
            let (status, body) = call(method.clone(), uri).await;
            assert_eq!(status, StatusCode::OK, "{method} {uri}");
            if method != Method::HEAD {
                assert_eq!(body, HEALTH_BODY);
            }
        }
    }

    #[tokio::test]
    async fn test_serve_stops_on_cancel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let server = tokio::spawn(serve_health(listener, cancel.clone()));

        let body = reqwest::get(format!("http://{addr}/ping"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, HEALTH_BODY);

        cancel.cancel();
        server.await.unwrap().unwrap();
    }
}
