//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::Priority,
};

// Build time, timezone and clock style, generated by `build.rs`
include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// Watch settings fixed at build time
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct WatchConfig {
    /// Seconds since the Unix epoch when the firmware was built
    pub utc_epoch: i64,
    /// Offset of local time to UTC in seconds
    pub utc_offset: i32,
    /// User preference for 24 hour clocks
    pub clock_24h_style: bool,
}

impl WatchConfig {
    pub const fn new() -> Self {
        Self {
            utc_epoch: UTC_EPOCH,
            utc_offset: UTC_OFFSET,
            clock_24h_style: CLOCK_24H_STYLE,
        }
    }
}

pub struct SystemConfig {}

impl SystemConfig {
    /// Create new system configuration
    pub fn new() -> Config {
        // Generate default config, required because Config is set as
        // `non_exhaustive`
        let mut config = Config::default();

        // Set high-frequency and low-frequency clock sources to external
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Configure interrupt priorities to exclude 0 (default), 1, and 4,
        // which are reserved for the nrf SoftDevice
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }
}
