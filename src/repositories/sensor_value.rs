use std::sync::Arc;

use time::OffsetDateTime;

use crate::configs::Storage;
use crate::models::{NewValue, Sensor, SensorValue};

pub struct SensorValueRepository {
    storage: Arc<Storage>,
}

impl SensorValueRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl SensorValueRepository {
    /// Appends a value and repoints the sensor's last-value reference in
    /// one transaction, so readers see either the pre-append or the
    /// fully-appended state.
    pub async fn append(&self, sensor: &Sensor, item: &NewValue) -> Result<SensorValue, sqlx::Error> {
        let mut tx = self.storage.get_pool().begin().await?;

        // date_received must never run backwards within a sensor's timeline
        let mut date_received = OffsetDateTime::now_utc();
        let previous: Option<OffsetDateTime> = sqlx::query_scalar(
            r#"
            SELECT v.date_received FROM sensor_values v
            JOIN sensors s ON s.last_value_id = v.id
            WHERE s.device_id = $1 AND s.id = $2
            "#,
        )
        .bind(&sensor.device_id)
        .bind(&sensor.id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(previous) = previous {
            if previous > date_received {
                date_received = previous;
            }
        }

        let value: SensorValue = sqlx::query_as(
            r#"
            INSERT INTO sensor_values (device_id, sensor_id, value, timestamp, date_received)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&sensor.device_id)
        .bind(&sensor.id)
        .bind(&item.value)
        .bind(&item.timestamp)
        .bind(date_received)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE sensors SET last_value_id = $1 WHERE device_id = $2 AND id = $3")
            .bind(value.id)
            .bind(&sensor.device_id)
            .bind(&sensor.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(value)
    }

    // Full history, newest first
    pub async fn find_by_sensor(
        &self,
        device_id: &str,
        sensor_id: &str,
    ) -> Result<Vec<SensorValue>, sqlx::Error> {
        let values: Vec<SensorValue> = sqlx::query_as(
            r#"
            SELECT * FROM sensor_values
            WHERE device_id = $1 AND sensor_id = $2
            ORDER BY id DESC
            "#,
        )
        .bind(device_id)
        .bind(sensor_id)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(values)
    }

    // The most recently ingested value, through the pointer on the sensor row
    pub async fn find_last(
        &self,
        device_id: &str,
        sensor_id: &str,
    ) -> Result<Option<SensorValue>, sqlx::Error> {
        let value: Option<SensorValue> = sqlx::query_as(
            r#"
            SELECT v.* FROM sensor_values v
            JOIN sensors s ON s.last_value_id = v.id
            WHERE s.device_id = $1 AND s.id = $2
            "#,
        )
        .bind(device_id)
        .bind(sensor_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(value)
    }
}
