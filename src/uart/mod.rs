pub mod decoder;
pub mod sensor;

pub use sensor::IndoorSensor;
