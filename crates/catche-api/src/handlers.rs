use crate::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use catche_core::{ErrorKind, ImportReport, ImportRequest};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// Runs the full login-to-upload flow. `/login` is kept as the name existing
/// callers use; `/import` is the same operation.
pub async fn import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> ReportResponse {
    tracing::info!("Import requested for {}", request.object_key);
    ReportResponse(state.importer.run(request).await)
}

/// An import report with the status code its outcome maps to
pub struct ReportResponse(pub ImportReport);

impl ReportResponse {
    pub fn status(&self) -> StatusCode {
        match self.0.error_kind {
            None if self.0.success => StatusCode::OK,
            Some(ErrorKind::Config) => StatusCode::BAD_REQUEST,
            Some(ErrorKind::Download) | Some(ErrorKind::Ui) => StatusCode::BAD_GATEWAY,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        if !status.is_success() {
            tracing::warn!("Import {} failed: {}", self.0.run_id, self.0.message);
        }
        (status, Json(self.0)).into_response()
    }
}
