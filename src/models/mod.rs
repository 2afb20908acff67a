mod actor;
mod device;
mod sensor;
mod sensor_value;

pub use actor::{Actor, Role};
pub use device::{Device, DeviceTable, NewDevice, Visibility};
pub use sensor::{NewSensor, Sensor, SensorAttribute, SensorTable, SensorView};
pub use sensor_value::{NewValue, SensorValue, SensorValueTable};

pub trait Table {
    /// The name of the table
    fn name(&self) -> &'static str;

    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;

    /// The tables this table references
    fn dependencies(&self) -> Vec<&'static str>;
}
