use std::sync::Arc;

use time::OffsetDateTime;

use crate::configs::Storage;
use crate::errors::{ApiError, DeviceError, SensorError};
use crate::models::{
    Actor, Device, NewDevice, NewSensor, NewValue, SensorAttribute, SensorValue, SensorView,
    Visibility,
};
use crate::repositories::{DeviceRepository, SensorRepository, SensorValueRepository};
use crate::services::{Access, AccessPolicy, Operation};

/// The single entry point the transport layer talks to. Stateless:
/// resolves the device, asks the policy, then delegates to the owning
/// repository.
pub struct TelemetryService {
    storage: Arc<Storage>,
    policy: AccessPolicy,
    devices: DeviceRepository,
    sensors: SensorRepository,
    values: SensorValueRepository,
}

impl TelemetryService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            policy: AccessPolicy,
            devices: DeviceRepository::new(storage.clone()),
            sensors: SensorRepository::new(storage.clone()),
            values: SensorValueRepository::new(storage.clone()),
            storage,
        }
    }

    async fn authorize(
        &self,
        actor: &Actor,
        device_id: &str,
        operation: Operation,
    ) -> Result<Device, ApiError> {
        let device = self
            .devices
            .find_by_id(device_id)
            .await?
            .ok_or(DeviceError::DeviceNotFound)?;

        match self.policy.evaluate(actor, &device, operation) {
            Access::Allow => Ok(device),
            Access::Deny => Err(DeviceError::InsufficientPermission.into()),
        }
    }

    /// Registers a device owned by the caller, together with any embedded
    /// sensors, in one transaction.
    pub async fn create_device(&self, actor: &Actor, item: NewDevice) -> Result<Device, ApiError> {
        let mut tx = self.storage.get_pool().begin().await?;

        if self.devices.exists(&item.id, &mut tx).await? {
            return Err(DeviceError::DeviceIdExists.into());
        }

        let now = OffsetDateTime::now_utc();
        let device = Device {
            id: item.id,
            name: item.name,
            owner: actor.id.clone(),
            visibility: item
                .visibility
                .unwrap_or(Visibility::Public)
                .as_str()
                .to_string(),
            date_created: now,
        };

        self.devices.create(&device, &mut tx).await?;
        for sensor in item.sensors {
            self.sensors
                .create(&sensor.into_sensor(device.id.clone(), now), &mut tx)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(device_id = %device.id, owner = %device.owner, "device created");

        Ok(device)
    }

    /// Removes a device with its sensors and their histories. Deleting an
    /// absent id succeeds without effect, so cleanup can be repeated.
    pub async fn delete_device(&self, actor: &Actor, device_id: &str) -> Result<(), ApiError> {
        let device = match self.devices.find_by_id(device_id).await? {
            Some(device) => device,
            None => {
                tracing::debug!(device_id = %device_id, "delete of unknown device ignored");
                return Ok(());
            }
        };

        if self.policy.evaluate(actor, &device, Operation::DeleteDevice) == Access::Deny {
            return Err(DeviceError::InsufficientPermission.into());
        }

        let mut tx = self.storage.get_pool().begin().await?;
        self.devices.delete(&device.id, &mut tx).await?;
        tx.commit().await?;

        tracing::info!(device_id = %device.id, "device deleted");

        Ok(())
    }

    pub async fn list_sensors(
        &self,
        actor: &Actor,
        device_id: &str,
    ) -> Result<Vec<SensorView>, ApiError> {
        let device = self
            .authorize(actor, device_id, Operation::ReadSensors)
            .await?;

        let sensors = self.sensors.find_by_device(&device.id).await?;

        let mut views = Vec::with_capacity(sensors.len());
        for sensor in sensors {
            let last_value = self.values.find_last(&sensor.device_id, &sensor.id).await?;
            views.push(SensorView { sensor, last_value });
        }

        Ok(views)
    }

    pub async fn create_sensor(
        &self,
        actor: &Actor,
        device_id: &str,
        item: NewSensor,
    ) -> Result<(), ApiError> {
        let device = self
            .authorize(actor, device_id, Operation::CreateSensor)
            .await?;

        let mut tx = self.storage.get_pool().begin().await?;
        self.sensors
            .create(
                &item.into_sensor(device.id.clone(), OffsetDateTime::now_utc()),
                &mut tx,
            )
            .await?;
        tx.commit().await?;

        tracing::debug!(device_id = %device.id, "sensor created");

        Ok(())
    }

    pub async fn get_sensor(
        &self,
        actor: &Actor,
        device_id: &str,
        sensor_id: &str,
    ) -> Result<SensorView, ApiError> {
        let device = self
            .authorize(actor, device_id, Operation::ReadSensor)
            .await?;

        let sensor = self
            .sensors
            .find(&device.id, sensor_id)
            .await?
            .ok_or(SensorError::SensorNotFound)?;

        let last_value = self.values.find_last(&device.id, &sensor.id).await?;

        Ok(SensorView { sensor, last_value })
    }

    /// Overwrites one whitelisted attribute; every other field keeps its
    /// value. The attribute value is opaque text.
    pub async fn update_sensor_attribute(
        &self,
        actor: &Actor,
        device_id: &str,
        sensor_id: &str,
        attribute: &str,
        value: String,
    ) -> Result<(), ApiError> {
        let device = self
            .authorize(actor, device_id, Operation::UpdateSensorAttribute)
            .await?;

        let attribute: SensorAttribute = attribute
            .parse()
            .map_err(|_| SensorError::InvalidAttribute)?;

        let mut tx = self.storage.get_pool().begin().await?;
        let updated = self
            .sensors
            .update_attribute(&device.id, sensor_id, attribute, &value, &mut tx)
            .await?;

        if updated == 0 {
            return Err(SensorError::SensorNotFound.into());
        }

        tx.commit().await?;

        Ok(())
    }

    pub async fn list_values(
        &self,
        actor: &Actor,
        device_id: &str,
        sensor_id: &str,
    ) -> Result<Vec<SensorValue>, ApiError> {
        let device = self
            .authorize(actor, device_id, Operation::ReadValues)
            .await?;

        let sensor = self
            .sensors
            .find(&device.id, sensor_id)
            .await?
            .ok_or(SensorError::SensorNotFound)?;

        let values = self.values.find_by_sensor(&device.id, &sensor.id).await?;

        Ok(values)
    }

    /// Ingests one value and returns the stored representation, including
    /// the server-assigned date_received.
    pub async fn push_value(
        &self,
        actor: &Actor,
        device_id: &str,
        sensor_id: &str,
        item: NewValue,
    ) -> Result<SensorValue, ApiError> {
        let device = self
            .authorize(actor, device_id, Operation::PushValue)
            .await?;

        let sensor = self
            .sensors
            .find(&device.id, sensor_id)
            .await?
            .ok_or(SensorError::SensorNotFound)?;

        let stored = self.values.append(&sensor, &item).await?;

        tracing::debug!(device_id = %device.id, sensor_id = %sensor.id, "value pushed");

        Ok(stored)
    }
}
