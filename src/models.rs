#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvironmentalReading {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
    pub altitude_pressure: f32,
    pub iaq: u16,
    pub iaq_accuracy: u8,
    pub gas: u32,
    pub altitude: i16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OutdoorReading {
    pub temperature: f32,
    pub humidity: f32,
    pub pressure: f32,
    pub battery_voltage: f32,
    pub battery_percentage: f32,
}
