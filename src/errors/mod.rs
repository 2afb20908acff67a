pub mod api;
pub mod device;
pub mod sensor;

pub use api::ApiError;
pub use device::DeviceError;
pub use sensor::SensorError;

use http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DeviceError(e) => e.status_code(),
            ApiError::SensorError(e) => e.status_code(),
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Status and JSON body for the transport layer to frame. Internal
    /// failures are logged under a correlation id and redacted from the
    /// caller-visible message.
    pub fn into_parts(self) -> (StatusCode, Value) {
        let (status, error_message, error_id) = match self {
            ApiError::DeviceError(e) => (e.status_code(), e.to_string(), None),
            ApiError::SensorError(e) => (e.status_code(), e.to_string(), None),
            ApiError::DatabaseError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
            ApiError::InternalError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        (status, json!({ "error": error_obj }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DeviceError::DeviceNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DeviceError::DeviceIdExists).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(DeviceError::InsufficientPermission).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(SensorError::InvalidAttribute).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_errors_are_redacted() {
        let error = ApiError::DatabaseError(sqlx::Error::RowNotFound);

        let (status, body) = error.into_parts();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal server error");
        assert!(body["error"]["error_id"].is_string());
    }
}
