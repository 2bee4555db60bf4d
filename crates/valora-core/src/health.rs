use std::fmt::Display;

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
}

/// Handler for `GET /healthz`: liveness check, never touches dependencies.
pub async fn healthz() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// Turn a dependency probe into a readiness response: 200 when it succeeded, 503 otherwise.
pub fn readiness<E: Display>(probe: Result<(), E>) -> (StatusCode, Json<HealthBody>) {
    match probe {
        Ok(()) => (StatusCode::OK, Json(HealthBody { status: "ok" })),
        Err(e) => {
            ::tracing::warn!(error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthBody {
                    status: "unavailable",
                }),
            )
        }
    }
}
