use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform success envelope: `{statusCode, data, message, success}`.
///
/// Every successful handler returns one of these; failures go through
/// `AppError` instead and never use this shape.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, data, message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_flag_tracks_status() {
        let ok = ApiResponse::ok(1, "fine");
        assert!(ok.success);
        assert_eq!(ok.status_code, 200);

        let created = ApiResponse::created((), "made");
        assert!(created.success);
        assert_eq!(created.status_code, 201);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let body = serde_json::to_value(ApiResponse::ok(serde_json::json!({"a": 1}), "msg"))
            .expect("serializable");
        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["message"], "msg");
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["a"], 1);
    }
}
