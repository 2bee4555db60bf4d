use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Build the failure body shared by every error type: `{ success: false, kind, message }`.
///
/// `kind` is a stable SCREAMING_SNAKE identifier clients can branch on; `message` is for humans.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "kind": kind,
        "message": message,
    });
    (status, Json(body)).into_response()
}
