/// Bluetooth Low Energy discovery of the outdoor station
use futures_util::StreamExt;
use log::{debug, error, warn};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};

const SCAN_DURATION_SECS: u64 = 20; // How long to actively scan for the station
const SCAN_PAUSE_SECS: u64 = 10; // Idle time between scan windows

/// Scan once for the outdoor station and return its current payload block.
///
/// The payload travels as BLE manufacturer data, so the transport hands us
/// a complete, length-delimited block; all interpretation is left to the
/// receiving pipeline. Returns Ok(None) if the station was not seen during
/// the scan window.
///
/// # Arguments
/// * `outdoor_mac` - MAC address of the outdoor station (uppercase)
/// * `manufacturer_id` - Manufacturer data key the station advertises under
pub async fn scan_for_outdoor_payload(
    outdoor_mac: &str,
    manufacturer_id: u16,
) -> Result<Option<Vec<u8>>, bluer::Error> {
    // Initialize Bluetooth session
    let session = match bluer::Session::new().await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create Bluetooth session: {}", e);
            return Err(e);
        }
    };

    // Get the default Bluetooth adapter
    let adapter = match session.default_adapter().await {
        Ok(adapter) => adapter,
        Err(e) => {
            error!("Failed to get default Bluetooth adapter: {}", e);
            return Err(e);
        }
    };

    // Ensure Bluetooth adapter is powered on
    if let Err(e) = adapter.set_powered(true).await {
        error!("Failed to power on adapter: {}", e);
        return Err(e);
    }

    // Configure discovery filter for Low Energy devices only
    let filter = bluer::DiscoveryFilter {
        transport: bluer::DiscoveryTransport::Le, // Bluetooth Low Energy only
        duplicate_data: false,                    // Filter out duplicate advertisements
        ..Default::default()
    };

    // Apply the discovery filter (warn if it fails, but continue)
    if let Err(e) = adapter.set_discovery_filter(filter).await {
        warn!("Failed to set discovery filter: {}", e);
    }

    // Start device discovery in background
    let discovery_handle = {
        match adapter.discover_devices().await {
            Ok(discovery_stream) => tokio::spawn(async move {
                let mut stream = discovery_stream;
                while let Some(event) = stream.next().await {
                    debug!("Discovery event: {:?}", event);
                }
            }),
            Err(e) => {
                error!("Failed to start device discovery: {}", e);
                return Err(e);
            }
        }
    };

    // Let discovery run for the configured duration
    sleep(Duration::from_secs(SCAN_DURATION_SECS)).await;

    // Stop discovery
    discovery_handle.abort();

    // Get all discovered device addresses
    let devices = match adapter.device_addresses().await {
        Ok(devices) => devices,
        Err(e) => {
            error!("Failed to get device addresses: {}", e);
            return Err(e);
        }
    };

    // Look for the configured outdoor station among discovered devices
    for addr in devices {
        let device = match adapter.device(addr) {
            Ok(device) => device,
            Err(_) => continue,
        };

        let addr_str = device.address().to_string().to_uppercase();
        if addr_str != outdoor_mac {
            continue;
        }

        match device.manufacturer_data().await {
            Ok(Some(manufacturer_data)) => {
                if let Some(block) = manufacturer_data.get(&manufacturer_id) {
                    debug!(
                        "Received {} byte payload from outdoor station {}",
                        block.len(),
                        addr_str
                    );
                    return Ok(Some(block.clone()));
                }
                debug!("No payload under manufacturer id for {}", addr_str);
            }
            Ok(None) => {
                debug!("No manufacturer data for {}", addr_str);
            }
            Err(e) => {
                debug!("Failed to get manufacturer data for {}: {}", addr_str, e);
            }
        }
    }

    Ok(None)
}

/// Poll the outdoor station forever, forwarding payload blocks to the
/// decoding pipeline over the channel. Exits when the receiving side of
/// the channel is gone.
pub async fn poll_outdoor_station(
    outdoor_mac: String,
    manufacturer_id: u16,
    tx: mpsc::Sender<Vec<u8>>,
) {
    loop {
        let scan_result = scan_for_outdoor_payload(&outdoor_mac, manufacturer_id).await;
        match scan_result {
            Ok(Some(block)) => {
                if tx.send(block).await.is_err() {
                    return;
                }
            }
            Ok(None) => debug!("Outdoor station {} not seen this scan", outdoor_mac),
            Err(e) => error!("Outdoor scan failed: {}", e),
        }

        sleep(Duration::from_secs(SCAN_PAUSE_SECS)).await;
    }
}
