/// Range classification for decoded indoor sensor fields
use crate::models::EnvironmentalReading;

// Trusted operating ranges of the indoor sensor module
pub const TEMPERATURE_MIN_C: f32 = -40.0;
pub const TEMPERATURE_MAX_C: f32 = 80.0;
pub const HUMIDITY_MIN_PCT: f32 = 0.0;
pub const HUMIDITY_MAX_PCT: f32 = 100.0;
pub const PRESSURE_MIN_HPA: f32 = 300.0;
pub const PRESSURE_MAX_HPA: f32 = 1250.0;
pub const IAQ_MAX: u16 = 500;

pub fn is_temperature_valid(temp: f32) -> bool {
    temp >= TEMPERATURE_MIN_C && temp <= TEMPERATURE_MAX_C
}

pub fn is_humidity_valid(humidity: f32) -> bool {
    humidity >= HUMIDITY_MIN_PCT && humidity <= HUMIDITY_MAX_PCT
}

pub fn is_pressure_valid(pressure: f32) -> bool {
    pressure >= PRESSURE_MIN_HPA && pressure <= PRESSURE_MAX_HPA
}

pub fn is_iaq_valid(iaq: u16) -> bool {
    iaq <= IAQ_MAX
}

/// A reading is only trusted when every classified field is in range.
/// One out-of-range field invalidates the whole reading; the fields
/// themselves stay inspectable.
pub fn is_reading_valid(reading: &EnvironmentalReading) -> bool {
    is_temperature_valid(reading.temperature)
        && is_humidity_valid(reading.humidity)
        && is_pressure_valid(reading.pressure)
        && is_iaq_valid(reading.iaq)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_range_reading() -> EnvironmentalReading {
        EnvironmentalReading {
            temperature: 22.5,
            humidity: 45.0,
            pressure: 1013.25,
            altitude_pressure: 1013.25,
            iaq: 25,
            iaq_accuracy: 3,
            gas: 50_000,
            altitude: 136,
        }
    }

    #[test]
    fn accepts_range_boundaries() {
        assert!(is_temperature_valid(-40.0));
        assert!(is_temperature_valid(80.0));
        assert!(is_humidity_valid(0.0));
        assert!(is_humidity_valid(100.0));
        assert!(is_pressure_valid(300.0));
        assert!(is_pressure_valid(1250.0));
        assert!(is_iaq_valid(0));
        assert!(is_iaq_valid(500));
    }

    #[test]
    fn rejects_values_past_boundaries() {
        assert!(!is_temperature_valid(-40.01));
        assert!(!is_temperature_valid(80.01));
        assert!(!is_humidity_valid(-0.01));
        assert!(!is_humidity_valid(100.01));
        assert!(!is_pressure_valid(299.99));
        assert!(!is_pressure_valid(1250.01));
        assert!(!is_iaq_valid(501));
    }

    #[test]
    fn whole_reading_validity_is_the_and_of_all_fields() {
        assert!(is_reading_valid(&in_range_reading()));

        let mut hot = in_range_reading();
        hot.temperature = 85.0;
        assert!(!is_reading_valid(&hot));

        let mut soaked = in_range_reading();
        soaked.humidity = 120.0;
        assert!(!is_reading_valid(&soaked));

        let mut vacuum = in_range_reading();
        vacuum.pressure = 120.0;
        assert!(!is_reading_valid(&vacuum));

        let mut smoggy = in_range_reading();
        smoggy.iaq = 1200;
        assert!(!is_reading_valid(&smoggy));
    }
}
