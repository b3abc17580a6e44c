//! Services provided by the device the face runs on

use chrono::NaiveDateTime;

/// Battery state as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryInfo {
    /// Battery percentage
    pub percent: u8,
    /// Charging state
    pub charging: bool,
}

/// Device services used by the watch face.
///
/// Every call is trusted to succeed. Values are passed through without
/// validation, so a percentage above 100 reaches the renderer unchanged.
pub trait Platform {
    /// Current local time
    fn local_time(&self) -> NaiveDateTime;

    /// User preference for 24 hour clocks
    fn clock_is_24h_style(&self) -> bool;

    /// Current battery state
    fn battery_peek(&self) -> BatteryInfo;

    /// Whether a phone is currently connected
    fn bluetooth_peek(&self) -> bool;

    /// Vibrate twice
    fn vibes_double_pulse(&mut self);
}
