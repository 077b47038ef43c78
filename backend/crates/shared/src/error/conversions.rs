//! Error conversions
//!
//! JSON body and HTTP rendering of [`AppError`].

use super::app_error::AppError;

/// JSON error body shared by every endpoint:
/// `{"error": {"message": "...", "status": 401}}`, with `action` when set.
pub fn error_body(err: &AppError) -> serde_json::Value {
    let mut error = serde_json::json!({
        "message": err.public_message(),
        "status": err.status_code(),
    });
    if let Some(action) = err.action() {
        error["action"] = serde_json::Value::from(action);
    }
    serde_json::json!({ "error": error })
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(error_body(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = error_body(&AppError::unauthorized("Invalid credentials"));
        assert_eq!(body["error"]["message"], "Invalid credentials");
        assert_eq!(body["error"]["status"], 401);
        assert!(body["error"].get("action").is_none());
    }

    #[test]
    fn test_error_body_includes_action() {
        let err = AppError::bad_request("Password is required").with_action("Enter a password");
        let body = error_body(&err);
        assert_eq!(body["error"]["action"], "Enter a password");
    }

    #[test]
    fn test_error_body_hides_internal_message() {
        let body = error_body(&AppError::internal("connection refused (os error 111)"));
        assert_eq!(body["error"]["message"], "Internal Server Error");
        assert_eq!(body["error"]["status"], 500);
    }
}
