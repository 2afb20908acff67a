use std::sync::Arc;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::services::TelemetryService;

/// Builds the service stack. The transport layer mounts its routes on
/// the returned service and owns the listening loop.
pub async fn create_app(settings: &Settings) -> Result<TelemetryService, sqlx::Error> {
    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);

    Ok(TelemetryService::new(storage))
}
