//! Bluetooth module

// Core
use core::{mem, sync::atomic::Ordering};

// Async
use embassy_futures::select::{select, Either};

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    raw, Config, Softdevice,
};

use crate::{
    system::time::TimeReference, BATTERY_LEVEL, BATTERY_LEVEL_CHANGED, BLUETOOTH_CONNECTED,
    TIME_SYNC,
};

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub cts: CurrentTimeService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; 10],
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: b"PineTime" as *const u8 as _,
            current_len: 8,
            max_len: 8,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Advertise until a phone connects, serve it until it disconnects, repeat.
#[embassy_executor::task(pool_size = 1)]
pub async fn advertise(sd: &'static Softdevice, server: Server) {
    let config = peripheral::Config::default();

    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {:?}", e);
                continue;
            }
        };

        defmt::info!("Phone connected");
        BLUETOOTH_CONNECTED.signal(true);

        publish_battery_level(&server, &conn, BATTERY_LEVEL.load(Ordering::Relaxed));

        let gatt = gatt_server::run(&conn, &server, |e| match e {
            ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
                match TimeReference::from_cts_bytes(&bytes) {
                    Some(reference) => TIME_SYNC.signal(reference),
                    None => defmt::warn!("Invalid current time: {:x}", bytes),
                }
            }
            _ => {}
        });

        let reason = match select(gatt, follow_battery_level(&server, &conn)).await {
            Either::First(reason) => reason,
            Either::Second(never) => never,
        };

        defmt::info!("Phone disconnected: {:?}", reason);
        BLUETOOTH_CONNECTED.signal(false);
    }
}

/// Publish every battery level change for as long as the connection lasts
async fn follow_battery_level(server: &Server, conn: &Connection) -> ! {
    loop {
        let level = BATTERY_LEVEL_CHANGED.wait().await;
        publish_battery_level(server, conn, level);
    }
}

/// Store the level in the characteristic and notify the phone if it subscribed
fn publish_battery_level(server: &Server, conn: &Connection, level: u8) {
    if server.bas.battery_level_set(&level).is_err() {
        defmt::warn!("Could not publish battery level");
    }
    if let Err(e) = server.bas.battery_level_notify(conn, &level) {
        defmt::debug!("Battery level not notified: {:?}", e);
    }
}

/// Run the SoftDevice event loop
#[embassy_executor::task(pool_size = 1)]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}
