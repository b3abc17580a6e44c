//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use digital_face::BatteryInfo;
use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

pub struct BatteryStatus<'a> {
    /// Pin P0.12: High = battery, Low = charging
    pin_charge_indication: Input<'a, P0_12>,

    /// Saadc instance
    saadc: Saadc<'a, 1>,

    /// Charging state
    charging: bool,

    /// Battery voltage in millivolts
    voltage: u16,
}

impl<'a> BatteryStatus<'a> {
    /// Initialize battery status
    pub async fn init(
        pin_charge_indication: Input<'a, P0_12>,
        mut saadc: Saadc<'a, 1>,
    ) -> Result<Self, Error> {
        // Get initial charging state
        let charging = pin_charge_indication.is_low();

        // Get initial voltage
        let mut buf = [0; 1];
        saadc.sample(&mut buf).await;
        let voltage = Self::convert_adc_measurement(buf[0])?;

        Ok(Self {
            pin_charge_indication,
            saadc,
            charging,
            voltage,
        })
    }

    /// Return current state of the battery.
    ///
    /// This returns the stored value. To fetch current data, call `update()` first.
    pub fn info(&self) -> BatteryInfo {
        BatteryInfo {
            charging: self.charging,
            percent: self.percent(),
        }
    }

    /// Return the current battery charge in percent (0–100).
    ///
    /// This returns the stored value. To fetch current data, call `update()` first.
    pub fn percent(&self) -> u8 {
        let voltage = self.voltage;

        // Use fixed data points and linear interpolation in between
        // to estimate battery capacity.
        (match voltage {
            0..=3449 => 0,
            3450..=3699 => (voltage - 3450) / 5,
            3700..=4199 => 50 + (voltage - 3700) / 10,
            _ => 100,
        }) as u8
    }

    /// Update the current battery status by reading information from the
    /// hardware. Return whether or not the reported state changed.
    pub async fn update(&mut self) -> Result<bool, Error> {
        let before = self.info();

        // Check charging status
        self.charging = self.pin_charge_indication.is_low();

        // Check voltage
        let mut buf = [0; 1];
        self.saadc.sample(&mut buf).await;
        self.voltage = Self::convert_adc_measurement(buf[0])?;

        Ok(self.info() != before)
    }

    /// Convert an ADC measurement into a battery voltage in millivolts.
    fn convert_adc_measurement(raw_measurement: i16) -> Result<u16, Error> {
        match raw_measurement {
            0..=4095 => {
                // Use u32 during calculation to prevent overflow
                let adc_val = raw_measurement as u32;
                // Multiply by 2 * 1000 for mV and divide by (2 ^ 12 / 3.3V reference)
                Ok((adc_val * 2000 / 1241) as u16)
            }
            _ => Err(Error::InvalidMeasurement),
        }
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    InvalidMeasurement,
}
