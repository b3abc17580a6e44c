#![no_std]
#![no_main]

mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Core
use core::sync::atomic::{AtomicU8, Ordering};

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt, Priority},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, signal::Signal};
use embassy_time::{Duration, Ticker, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use peripherals::{
    backlight::Backlight, battery::BatteryStatus, display::Display, vibration::VibrationMotor,
};
use system::{
    bluetooth::{self, Server},
    config::{SystemConfig, WatchConfig},
    host::Host,
    time::{TimeManager, TimeReference},
};

// Watch face
use digital_face::{App, BatteryInfo, Event, Platform, TickTimer, TimeUnits};

// Communication channels
static BATTERY_STATUS: Signal<ThreadModeRawMutex, BatteryInfo> = Signal::new();
static BLUETOOTH_CONNECTED: Signal<ThreadModeRawMutex, bool> = Signal::new();
static NOTIFY: Signal<ThreadModeRawMutex, u8> = Signal::new();
static TIME_SYNC: Signal<ThreadModeRawMutex, TimeReference> = Signal::new();
static BATTERY_LEVEL_CHANGED: Signal<ThreadModeRawMutex, u8> = Signal::new();

/// Last battery percentage, published over BLE
static BATTERY_LEVEL: AtomicU8 = AtomicU8::new(0);

/// Kept alive for the lifetime of the firmware, dropping the pins turns it off
static BACKLIGHT: StaticCell<Backlight<'static>> = StaticCell::new();

/// Vibrate the signaled amount of times
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut motor: VibrationMotor<'static>) {
    loop {
        let count = NOTIFY.wait().await;
        defmt::debug!("Vibrating {} times", count);
        motor.pulse_times(Some(200), count).await;
    }
}

/// Fetch the battery status from the hardware.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: BatteryStatus<'static>) {
    loop {
        match battery.update().await {
            Ok(true) => {
                // Battery status changed
                let info = battery.info();
                BATTERY_LEVEL.store(info.percent, Ordering::Relaxed);
                BATTERY_LEVEL_CHANGED.signal(info.percent);
                BATTERY_STATUS.signal(info);
            }
            Ok(false) => {}
            Err(e) => defmt::warn!("Battery measurement failed: {}", e),
        }

        // Re-schedule the timer interrupt in 1s
        Timer::after(Duration::from_secs(1)).await;
    }
}

/// Run the watch face: feed it platform events and redraw when needed.
#[embassy_executor::task(pool_size = 1)]
async fn run_face(mut display: Display<'static, SPI2>, mut host: Host) {
    let mut app: App = match App::init(&host) {
        Ok(app) => app,
        Err(e) => {
            defmt::error!("Loading watch face failed: {}", defmt::Debug2Format(&e));
            return;
        }
    };
    defmt::info!("Watch face loaded");

    let mut minutes = TickTimer::new(TimeUnits::MINUTE);
    let mut tick = Ticker::every(Duration::from_secs(1));
    loop {
        if TIME_SYNC.signaled() {
            let reference = TIME_SYNC.wait().await;
            host.time.set_time(reference);
            defmt::info!("Time synchronised");
        }

        if BATTERY_STATUS.signaled() {
            let status = BATTERY_STATUS.wait().await;
            defmt::info!(
                "Battery status: {} ({})",
                status.percent,
                if status.charging {
                    "charging"
                } else {
                    "discharging"
                }
            );
            host.battery = status;
            dispatch(&mut app, Event::Battery(status), &host);
        }

        if BLUETOOTH_CONNECTED.signaled() {
            let connected = BLUETOOTH_CONNECTED.wait().await;
            host.connected = connected;
            dispatch(&mut app, Event::Bluetooth(connected), &host);
        }

        if let Some(event) = minutes.poll(host.local_time()) {
            dispatch(&mut app, event, &host);
        }

        match app.render(&mut display.face(), &mut host) {
            Ok(true) => defmt::debug!("Watch face redrawn"),
            Ok(false) => {}
            Err(e) => defmt::warn!("Drawing watch face failed: {}", defmt::Debug2Format(&e)),
        }

        // Re-schedule the timer interrupt in 1s
        tick.next().await;
    }
}

fn dispatch(app: &mut App, event: Event, host: &Host) {
    defmt::debug!("Event: {}", event);
    if let Err(e) = app.handle(event, host) {
        defmt::warn!("Handling {} failed: {}", event, defmt::Debug2Format(&e));
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    let watch = WatchConfig::new();
    defmt::info!("Watch configuration: {}", watch);

    // Priorities 0, 1 and 4 belong to the SoftDevice
    interrupt::SAADC.set_priority(Priority::P3);
    interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Backlight
    let backlight = BACKLIGHT.init(unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        0,
    )));

    // Initalize Battery
    let battery = unwrap!(BatteryStatus::init(Input::new(p.P0_12, Pull::None), saadc).await);
    let battery_info = battery.info();
    BATTERY_LEVEL.store(battery_info.percent, Ordering::Relaxed);

    // Initialize vibration motor
    let vibration = VibrationMotor::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));
    unwrap!(backlight.set(2));
    defmt::debug!("Backlight at level {}", backlight.get_brightness());

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::generate_config());
    let server = unwrap!(Server::new(sd));

    let host = Host {
        time: TimeManager::init(TimeReference::from_epoch(watch.utc_epoch, watch.utc_offset)),
        clock_24h_style: watch.clock_24h_style,
        battery: battery_info,
        connected: false,
    };

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth::softdevice_task(sd)));
    unwrap!(spawner.spawn(bluetooth::advertise(sd, server)));
    unwrap!(spawner.spawn(update_battery_status(battery)));
    unwrap!(spawner.spawn(notify(vibration)));
    unwrap!(spawner.spawn(run_face(display, host)));
}
