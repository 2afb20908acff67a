mod device;
mod sensor;
mod sensor_value;

pub use device::DeviceRepository;
pub use sensor::SensorRepository;
pub use sensor_value::SensorValueRepository;
