use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::models::sensor_value::SensorValue;
use crate::models::Table;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sensor {
    #[serde(skip)]
    pub device_id: String,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub date_created: OffsetDateTime,
    #[serde(skip)]
    pub last_value_id: Option<i64>,
}

/// Creation payload. Only the whitelisted attributes survive
/// deserialization; unknown fields are dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSensor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl NewSensor {
    pub fn into_sensor(self, device_id: String, date_created: OffsetDateTime) -> Sensor {
        Sensor {
            device_id,
            id: self.id,
            name: self.name,
            quantity_kind: self.quantity_kind,
            device_kind: self.device_kind,
            unit: self.unit,
            date_created,
            last_value_id: None,
        }
    }
}

/// The closed set of sensor attributes that may be updated one at a time.
/// Parsing caller input through this enum keeps the UPDATE column name a
/// static string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorAttribute {
    Name,
    QuantityKind,
    DeviceKind,
    Unit,
}

impl SensorAttribute {
    pub fn column(&self) -> &'static str {
        match self {
            SensorAttribute::Name => "name",
            SensorAttribute::QuantityKind => "quantity_kind",
            SensorAttribute::DeviceKind => "device_kind",
            SensorAttribute::Unit => "unit",
        }
    }
}

impl FromStr for SensorAttribute {
    type Err = ();

    fn from_str(input: &str) -> Result<SensorAttribute, Self::Err> {
        match input {
            "name" => Ok(SensorAttribute::Name),
            "quantity_kind" => Ok(SensorAttribute::QuantityKind),
            "device_kind" => Ok(SensorAttribute::DeviceKind),
            "unit" => Ok(SensorAttribute::Unit),
            _ => Err(()),
        }
    }
}

/// The sensor representation served to callers: attributes plus the
/// latest ingested value, composed by the service layer.
#[derive(Debug, Clone, Serialize)]
pub struct SensorView {
    #[serde(flatten)]
    pub sensor: Sensor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_value: Option<SensorValue>,
}

#[derive(Clone)]
pub struct SensorTable;

impl Table for SensorTable {
    fn name(&self) -> &'static str {
        "sensors"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS sensors (
                device_id TEXT NOT NULL,
                id TEXT NOT NULL,
                name TEXT,
                quantity_kind TEXT,
                device_kind TEXT,
                unit TEXT,
                date_created DATETIME NOT NULL,
                last_value_id INTEGER,
                PRIMARY KEY (device_id, id),
                FOREIGN KEY (device_id) REFERENCES devices (id) ON DELETE CASCADE
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS sensors;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["devices"]
    }
}
