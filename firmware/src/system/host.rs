//! Device services handed to the watch face

use chrono::NaiveDateTime;
use digital_face::{BatteryInfo, Platform};

use crate::{system::time::TimeManager, NOTIFY};

/// Latest readings of the watch hardware
pub struct Host {
    /// Wall clock
    pub time: TimeManager,
    /// User preference for 24 hour clocks
    pub clock_24h_style: bool,
    /// Last battery report
    pub battery: BatteryInfo,
    /// Phone connection state
    pub connected: bool,
}

impl Platform for Host {
    fn local_time(&self) -> NaiveDateTime {
        self.time.get_time()
    }

    fn clock_is_24h_style(&self) -> bool {
        self.clock_24h_style
    }

    fn battery_peek(&self) -> BatteryInfo {
        self.battery
    }

    fn bluetooth_peek(&self) -> bool {
        self.connected
    }

    fn vibes_double_pulse(&mut self) {
        NOTIFY.signal(2);
    }
}
