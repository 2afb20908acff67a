use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device not found")]
    DeviceNotFound,

    #[error("Device id already exists")]
    DeviceIdExists,

    #[error("Insufficient permission")]
    InsufficientPermission,
}

impl DeviceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::DeviceNotFound => StatusCode::NOT_FOUND,
            DeviceError::DeviceIdExists => StatusCode::CONFLICT,
            DeviceError::InsufficientPermission => StatusCode::FORBIDDEN,
        }
    }
}
