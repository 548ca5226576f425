mod bluetooth;
mod config;
mod errors;
mod freshness;
mod models;
mod uart;
mod utils;
mod validity;

use log::{debug, error, info, warn};
use time::OffsetDateTime;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::time::{interval, sleep, Duration};

use bluetooth::scanner::poll_outdoor_station;
use bluetooth::OutdoorReceiver;
use config::StationConfig;
use uart::IndoorSensor;
use utils::format_datetime;

const REPORT_INTERVAL_SECS: u64 = 60;
const UART_READ_CHUNK: usize = 64;
const UART_RETRY_SECS: u64 = 5;

async fn main_loop(config: StationConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting weather station telemetry service");

    let mut indoor = IndoorSensor::new(config.altitude_correction_pa);
    let mut outdoor = OutdoorReceiver::new();

    let mut uart = tokio::fs::File::open(&config.uart_device).await?;
    info!("Reading sensor frames from {}", config.uart_device);

    // The scan task only ships opaque payload blocks; decoding stays with
    // the receiver owned by this loop.
    let (tx, mut rx) = mpsc::channel::<Vec<u8>>(8);
    match config.outdoor_mac.clone() {
        Some(mac) => {
            let manufacturer_id = config.outdoor_manufacturer_id;
            tokio::spawn(async move {
                poll_outdoor_station(mac, manufacturer_id, tx).await;
            });
        }
        None => warn!("No outdoor station configured, running indoor-only"),
    }

    let mut report = interval(Duration::from_secs(REPORT_INTERVAL_SECS));
    let mut buf = [0u8; UART_READ_CHUNK];

    loop {
        tokio::select! {
            read = uart.read(&mut buf) => match read {
                Ok(0) => {
                    // A live tty shouldn't hit EOF; back off instead of spinning
                    debug!("UART source returned no data");
                    sleep(Duration::from_secs(UART_RETRY_SECS)).await;
                }
                Ok(n) => {
                    indoor.feed(&buf[..n]);
                }
                Err(e) => {
                    error!("UART read failed: {}", e);
                    sleep(Duration::from_secs(UART_RETRY_SECS)).await;
                }
            },
            Some(block) = rx.recv() => {
                outdoor.submit(&block);
            }
            _ = report.tick() => {
                report_snapshots(&mut indoor, &mut outdoor);
            }
        }
    }
}

/// Log the current snapshots and mark them consumed.
fn report_snapshots(indoor: &mut IndoorSensor, outdoor: &mut OutdoorReceiver) {
    info!("Report at: {}", format_datetime(&OffsetDateTime::now_utc()));

    if indoor.has_new_data() {
        let reading = indoor.data().reading;
        info!("Indoor:");
        info!("  Temperature: {:.2}°C", reading.temperature);
        info!("  Humidity: {:.2}%", reading.humidity);
        info!(
            "  Pressure: {:.2} hPa (corrected {:.2} hPa)",
            reading.pressure, reading.altitude_pressure
        );
        info!("  IAQ: {} (accuracy {})", reading.iaq, reading.iaq_accuracy);
        info!("  Gas: {} Ohm, altitude {} m", reading.gas, reading.altitude);
        indoor.reset_data();
    } else {
        warn!("No fresh indoor reading this interval");
    }

    if outdoor.has_new_data() {
        let reading = outdoor.data().reading;
        info!("Outdoor:");
        info!("  Temperature: {:.2}°C", reading.temperature);
        info!("  Humidity: {:.2}%", reading.humidity);
        info!("  Pressure: {:.2} hPa", reading.pressure);
        info!(
            "  Battery: {:.2} V ({:.1}%)",
            reading.battery_voltage, reading.battery_percentage
        );
        outdoor.reset_data();
    } else {
        debug!("No fresh outdoor reading this interval");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match StationConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
