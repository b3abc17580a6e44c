//! Host side doubles for the display and the platform

use core::convert::Infallible;

use chrono::{NaiveDate, NaiveDateTime};
use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::{
    platform::{BatteryInfo, Platform},
    ui::{FACE_H, FACE_W},
};

/// In-memory frame the size of the watch face
pub struct Framebuffer {
    pixels: Vec<Rgb565>,
}

impl Framebuffer {
    pub fn new(fill: Rgb565) -> Self {
        Self {
            pixels: vec![fill; (FACE_W * FACE_H) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb565 {
        self.pixels[(y * FACE_W + x) as usize]
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(FACE_W, FACE_H)
    }
}

impl DrawTarget for Framebuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 && (point.x as u32) < FACE_W && (point.y as u32) < FACE_H
            {
                self.pixels[(point.y as u32 * FACE_W + point.x as u32) as usize] = color;
            }
        }
        Ok(())
    }
}

/// Platform with fixed readings that counts vibrations
pub struct MockPlatform {
    pub time: NaiveDateTime,
    pub is_24h_style: bool,
    pub battery: BatteryInfo,
    pub connected: bool,
    pub double_pulses: usize,
}

impl MockPlatform {
    /// Wednesday, March 3rd 2021, 14:05
    pub fn new() -> Self {
        Self {
            time: NaiveDate::from_ymd_opt(2021, 3, 3)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            is_24h_style: false,
            battery: BatteryInfo {
                percent: 64,
                charging: false,
            },
            connected: true,
            double_pulses: 0,
        }
    }
}

impl Platform for MockPlatform {
    fn local_time(&self) -> NaiveDateTime {
        self.time
    }

    fn clock_is_24h_style(&self) -> bool {
        self.is_24h_style
    }

    fn battery_peek(&self) -> BatteryInfo {
        self.battery
    }

    fn bluetooth_peek(&self) -> bool {
        self.connected
    }

    fn vibes_double_pulse(&mut self) {
        self.double_pulses += 1;
    }
}
