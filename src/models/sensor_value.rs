use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::models::Table;

/// One stored measurement. The payload keeps whatever JSON shape the
/// caller pushed; `timestamp` is the caller's own clock, forwarded as
/// opaque text, while `date_received` is stamped by the store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SensorValue {
    #[serde(skip)]
    pub id: i64,
    #[serde(skip)]
    pub device_id: String,
    #[serde(skip)]
    pub sensor_id: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_received: OffsetDateTime,
}

/// Ingestion payload as it comes off the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewValue {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Clone)]
pub struct SensorValueTable;

impl Table for SensorValueTable {
    fn name(&self) -> &'static str {
        "sensor_values"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS sensor_values (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                device_id TEXT NOT NULL,
                sensor_id TEXT NOT NULL,
                value JSON NOT NULL,
                timestamp TEXT,
                date_received DATETIME NOT NULL,
                FOREIGN KEY (device_id, sensor_id) REFERENCES sensors (device_id, id) ON DELETE CASCADE
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS sensor_values;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["sensors"]
    }
}
