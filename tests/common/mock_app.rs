use std::sync::Arc;

use sensorhub::configs::{Database, SchemaManager, Storage};
use sensorhub::models::{Actor, NewDevice, NewSensor, Role};
use sensorhub::services::TelemetryService;

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub service: TelemetryService,
    pub admin: Actor,
    pub alice: Actor,
    pub bob: Actor,
}

impl MockApp {
    pub async fn new() -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "sensorhub=debug".into()),
            )
            .with_test_writer()
            .try_init()
            .ok();

        let storage = Arc::new(
            Storage::new(
                Database {
                    migration_path: None,
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        Self {
            service: TelemetryService::new(storage.clone()),
            storage,
            admin: Actor::new("root", Role::Admin),
            alice: Actor::new("alice", Role::User),
            bob: Actor::new("bob", Role::User),
        }
    }

    pub fn sample_device(&self, id: &str) -> NewDevice {
        NewDevice {
            id: id.to_string(),
            name: Some("Test Device".to_string()),
            visibility: None,
            sensors: vec![self.sample_sensor("s1")],
        }
    }

    pub fn sample_sensor(&self, id: &str) -> NewSensor {
        NewSensor {
            id: id.to_string(),
            name: Some("Sensor 1".to_string()),
            quantity_kind: Some("AirTemperature".to_string()),
            device_kind: Some("Thermometer".to_string()),
            unit: Some("DegreeCelsius".to_string()),
        }
    }
}
