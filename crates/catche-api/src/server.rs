use crate::{AppState, Error, Result, handlers};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/login", post(handlers::import))
        .route("/import", post(handlers::import))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl+C or SIGTERM
pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| Error::Bind {
            addr: addr.clone(),
            source,
        })?;

    info!("Catch-e importer listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Serve)?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, starting graceful shutdown"),
        _ = terminate => info!("SIGTERM received, starting graceful shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::tests::{FakeLauncher, MemoryStore, service};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use catche_core::{ErrorKind, ImportReport};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn app(scratch: &std::path::Path, launcher: Arc<FakeLauncher>, store: MemoryStore) -> Router {
        router(AppState::new(service(scratch, launcher, store)))
    }

    async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let scratch = tempfile::tempdir().unwrap();
        let response = app(scratch.path(), Arc::default(), MemoryStore::default())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn test_login_accepts_legacy_field_name() {
        let scratch = tempfile::tempdir().unwrap();
        let (status, bytes) = post_json(
            app(
                scratch.path(),
                Arc::default(),
                MemoryStore::with("NS_test.txt", b"data"),
            ),
            "/login",
            serde_json::json!({
                "username": "fleet",
                "password": "secret",
                "s3_filename": "NS_test.txt"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let report: ImportReport = serde_json::from_slice(&bytes).unwrap();
        assert!(report.success);
        assert_eq!(report.object_key, "NS_test.txt");
        assert_eq!(report.bytes_downloaded, Some(4));
    }

    #[tokio::test]
    async fn test_invalid_request_is_bad_request() {
        let scratch = tempfile::tempdir().unwrap();
        let launcher = Arc::new(FakeLauncher::default());
        let (status, bytes) = post_json(
            app(scratch.path(), launcher.clone(), MemoryStore::default()),
            "/import",
            serde_json::json!({
                "username": "fleet",
                "password": "secret",
                "object_key": "../etc/passwd"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let report: ImportReport = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report.error_kind, Some(ErrorKind::Config));
        assert_eq!(launcher.launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_object_is_bad_gateway() {
        let scratch = tempfile::tempdir().unwrap();
        let (status, bytes) = post_json(
            app(scratch.path(), Arc::default(), MemoryStore::default()),
            "/import",
            serde_json::json!({
                "username": "fleet",
                "password": "secret",
                "object_key": "NS_missing.txt"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let report: ImportReport = serde_json::from_slice(&bytes).unwrap();
        assert!(!report.success);
        assert_eq!(report.error_kind, Some(ErrorKind::Download));
    }

    #[tokio::test]
    async fn test_password_is_not_echoed() {
        let scratch = tempfile::tempdir().unwrap();
        let (_, bytes) = post_json(
            app(
                scratch.path(),
                Arc::default(),
                MemoryStore::with("NS_test.txt", b"data"),
            ),
            "/import",
            serde_json::json!({
                "username": "fleet",
                "password": "hunter2",
                "object_key": "NS_test.txt"
            }),
        )
        .await;

        assert!(!String::from_utf8_lossy(&bytes).contains("hunter2"));
    }
}
