use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::{Sensor, SensorAttribute};

pub struct SensorRepository {
    storage: Arc<Storage>,
}

impl SensorRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl SensorRepository {
    // Attach a new sensor to its device
    pub async fn create(
        &self,
        item: &Sensor,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO sensors (device_id, id, name, quantity_kind, device_kind, unit, date_created)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&item.device_id)
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.quantity_kind)
        .bind(&item.device_kind)
        .bind(&item.unit)
        .bind(item.date_created)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    // Find one sensor of a device
    pub async fn find(&self, device_id: &str, sensor_id: &str) -> Result<Option<Sensor>, Error> {
        let sensor: Option<Sensor> =
            sqlx::query_as("SELECT * FROM sensors WHERE device_id = $1 AND id = $2")
                .bind(device_id)
                .bind(sensor_id)
                .fetch_optional(self.storage.get_pool())
                .await?;

        Ok(sensor)
    }

    // All sensors of a device, in creation order
    pub async fn find_by_device(&self, device_id: &str) -> Result<Vec<Sensor>, Error> {
        let sensors: Vec<Sensor> =
            sqlx::query_as("SELECT * FROM sensors WHERE device_id = $1 ORDER BY rowid")
                .bind(device_id)
                .fetch_all(self.storage.get_pool())
                .await?;

        Ok(sensors)
    }

    // Overwrite a single whitelisted attribute, leaving the rest untouched.
    // Returns the number of matched rows; 0 means the sensor is unknown.
    pub async fn update_attribute(
        &self,
        device_id: &str,
        sensor_id: &str,
        attribute: SensorAttribute,
        value: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let result = sqlx::query(&format!(
            "UPDATE sensors SET {} = $1 WHERE device_id = $2 AND id = $3",
            attribute.column()
        ))
        .bind(value)
        .bind(device_id)
        .bind(sensor_id)
        .execute(&mut **transaction)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use crate::configs::{Database, SchemaManager};
    use crate::models::Device;
    use crate::repositories::DeviceRepository;

    use super::*;

    async fn setup_test_db() -> Arc<Storage> {
        Arc::new(
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
        )
    }

    async fn create_test_device(storage: Arc<Storage>) -> String {
        let device = Device {
            id: "dev-1".to_string(),
            name: None,
            owner: "alice".to_string(),
            visibility: "public".to_string(),
            date_created: OffsetDateTime::now_utc(),
        };

        let repo = DeviceRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        repo.create(&device, &mut tx).await.unwrap();
        tx.commit().await.unwrap();

        device.id
    }

    fn sample_sensor(device_id: &str, id: &str) -> Sensor {
        Sensor {
            device_id: device_id.to_string(),
            id: id.to_string(),
            name: Some("Temperature Sensor".to_string()),
            quantity_kind: Some("Temperature".to_string()),
            device_kind: Some("Thermometer".to_string()),
            unit: Some("DegreeCelsius".to_string()),
            date_created: OffsetDateTime::now_utc(),
            last_value_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_sensor() {
        let storage = setup_test_db().await;
        let device_id = create_test_device(storage.clone()).await;

        let repo = SensorRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        repo.create(&sample_sensor(&device_id, "s1"), &mut tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let found = repo.find(&device_id, "s1").await.unwrap().unwrap();
        assert_eq!(found.quantity_kind.as_deref(), Some("Temperature"));
        assert_eq!(found.last_value_id, None);

        assert!(repo.find(&device_id, "s2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sensor_requires_existing_device() {
        let storage = setup_test_db().await;

        let repo = SensorRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        let result = repo.create(&sample_sensor("ghost", "s1"), &mut tx).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_list_preserves_creation_order() {
        let storage = setup_test_db().await;
        let device_id = create_test_device(storage.clone()).await;

        let repo = SensorRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        for id in ["s3", "s1", "s2"] {
            repo.create(&sample_sensor(&device_id, id), &mut tx)
                .await
                .unwrap();
        }
        tx.commit().await.unwrap();

        let sensors = repo.find_by_device(&device_id).await.unwrap();
        let ids: Vec<&str> = sensors.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s3", "s1", "s2"]);
    }

    #[tokio::test]
    async fn test_update_attribute_leaves_others_untouched() {
        let storage = setup_test_db().await;
        let device_id = create_test_device(storage.clone()).await;

        let repo = SensorRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        repo.create(&sample_sensor(&device_id, "s1"), &mut tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = storage.get_pool().begin().await.unwrap();
        let updated = repo
            .update_attribute(&device_id, "s1", SensorAttribute::Name, "ss1", &mut tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        assert_eq!(updated, 1);

        let found = repo.find(&device_id, "s1").await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("ss1"));
        assert_eq!(found.unit.as_deref(), Some("DegreeCelsius"));
        assert_eq!(found.device_kind.as_deref(), Some("Thermometer"));
    }

    #[tokio::test]
    async fn test_update_unknown_sensor_matches_nothing() {
        let storage = setup_test_db().await;
        let device_id = create_test_device(storage.clone()).await;

        let repo = SensorRepository::new(storage.clone());
        let mut tx = storage.get_pool().begin().await.unwrap();
        let updated = repo
            .update_attribute(&device_id, "ghost", SensorAttribute::Unit, "K", &mut tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(updated, 0);
    }
}
