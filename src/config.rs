use std::env;

const DEFAULT_UART_DEVICE: &str = "/dev/ttyUSB0";
const DEFAULT_MANUFACTURER_ID: u16 = 0xFFFF;

#[derive(Debug, Clone)]
pub struct StationConfig {
    pub uart_device: String,
    pub altitude_correction_pa: i32,
    pub outdoor_mac: Option<String>,
    pub outdoor_manufacturer_id: u16,
}

impl StationConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let uart_device =
            env::var("UART_DEVICE").unwrap_or_else(|_| DEFAULT_UART_DEVICE.to_string());

        // Fixed correction added to the raw pressure, in Pa (depends on the
        // station's mounting altitude)
        let altitude_correction_pa = match env::var("ALT_CORRECTION") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| format!("Invalid ALT_CORRECTION value: '{}'", raw))?,
            Err(_) => 0,
        };

        let outdoor_mac = env::var("OUTDOOR_MAC")
            .ok()
            .map(|mac| mac.trim().to_uppercase())
            .filter(|mac| !mac.is_empty());

        let outdoor_manufacturer_id = match env::var("OUTDOOR_MANUFACTURER_ID") {
            Ok(raw) => parse_manufacturer_id(&raw)?,
            Err(_) => DEFAULT_MANUFACTURER_ID,
        };

        println!("Using UART device: {}", uart_device);
        match &outdoor_mac {
            Some(mac) => println!("Outdoor station MAC: {}", mac),
            None => println!("OUTDOOR_MAC not set, outdoor link disabled"),
        }

        Ok(StationConfig {
            uart_device,
            altitude_correction_pa,
            outdoor_mac,
            outdoor_manufacturer_id,
        })
    }
}

fn parse_manufacturer_id(raw: &str) -> Result<u16, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u16::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u16>()
    };
    parsed.map_err(|_| format!("Invalid OUTDOOR_MANUFACTURER_ID value: '{}'", trimmed).into())
}

#[cfg(test)]
mod tests {
    use super::parse_manufacturer_id;

    #[test]
    fn parses_hex_and_decimal_manufacturer_ids() {
        assert_eq!(parse_manufacturer_id("0x0499").unwrap(), 0x0499);
        assert_eq!(parse_manufacturer_id("0XFFFF").unwrap(), 0xFFFF);
        assert_eq!(parse_manufacturer_id("1177").unwrap(), 1177);
        assert_eq!(parse_manufacturer_id(" 42 ").unwrap(), 42);
        assert!(parse_manufacturer_id("banana").is_err());
        assert!(parse_manufacturer_id("0x10000").is_err());
    }
}
