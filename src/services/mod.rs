mod access_policy;
mod telemetry_service;

pub use access_policy::{Access, AccessPolicy, Operation};
pub use telemetry_service::TelemetryService;
