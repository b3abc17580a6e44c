//! Time keeping module for PineTime

use chrono::{Duration, NaiveDate, NaiveDateTime};
use embassy_time::Instant;

pub struct TimeReference {
    /// Local clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl TimeReference {
    /// Create new time reference from local time, valid now
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }

    /// Create new time reference from a UTC epoch, shifted to local time
    pub fn from_epoch(utc_epoch: i64, utc_offset: i32) -> Self {
        // The default date time is the Unix epoch
        let time = NaiveDateTime::default()
            + Duration::seconds(utc_epoch)
            + Duration::seconds(utc_offset as i64);

        Self {
            time,
            instant: Instant::from_ticks(0),
        }
    }

    /// Create new time reference from Current Time Service data.
    ///
    /// Returns `None` for dates or times that do not exist.
    pub fn from_cts_bytes(bytes: &[u8; 10]) -> Option<Self> {
        // Convert CTS bytes to NaiveDateTime
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // bytes[7] is the day of week
        let milli = bytes[8] as u32 * 1000 / 256; // Convert fractions_256 to milliseconds

        let time =
            NaiveDate::from_ymd_opt(year, month, day)?.and_hms_milli_opt(hour, min, sec, milli)?;

        Some(Self::from_datetime(time))
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Get current local time
    pub fn get_time(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        self.reference.time + Duration::microseconds(elapsed.as_micros() as i64)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }
}
