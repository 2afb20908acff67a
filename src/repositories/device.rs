use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::Device;

pub struct DeviceRepository {
    storage: Arc<Storage>,
}

impl DeviceRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl DeviceRepository {
    // Register a new device
    pub async fn create(
        &self,
        item: &Device,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO devices (id, name, owner, visibility, date_created)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.owner)
        .bind(&item.visibility)
        .bind(item.date_created)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    // Check for an id collision inside the creating transaction
    pub async fn exists(
        &self,
        id: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<bool, Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM devices WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut **transaction)
            .await?;

        Ok(exists)
    }

    // Find device by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Device>, Error> {
        let device: Option<Device> = sqlx::query_as("SELECT * FROM devices WHERE id = $1")
            .bind(id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(device)
    }

    // Delete device; sensors and their values go with it
    pub async fn delete(
        &self,
        id: &str,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected())
    }
}
