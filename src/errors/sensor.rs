use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Sensor not found")]
    SensorNotFound,

    #[error("Invalid sensor attribute")]
    InvalidAttribute,
}

impl SensorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SensorError::SensorNotFound => StatusCode::NOT_FOUND,
            SensorError::InvalidAttribute => StatusCode::BAD_REQUEST,
        }
    }
}
