//! Display control module for PineTime

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};

use digital_face::ui::{FACE_H, FACE_W};
use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use embedded_graphics::{draw_target::Translated, pixelcolor::Rgb565, prelude::*};
use mipidsi::{models::ST7789, Builder, Orientation};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

/// Top left corner of the watch face, centred on the panel
const FACE_ORIGIN: Point = Point::new(
    (LCD_W as i32 - FACE_W as i32) / 2,
    (LCD_H as i32 - FACE_H as i32) / 2,
);

/// Color around the watch face
const BACKGROUND_COLOR: Rgb565 = Rgb565::BLACK;

pub type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Display instance
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Configure display settings on boot
    pub fn init(
        spim: Spim<'a, SPI>,
        cs_pin: Output<'a, P0_25>,
        dc_pin: Output<'a, P0_18>,
        rst_pin: Output<'a, P0_26>,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc_pin, cs_pin))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst_pin))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd };
        display.clear(BACKGROUND_COLOR)?;
        Ok(display)
    }

    /// Clear the display
    pub fn clear(&mut self, color: Rgb565) -> Result<(), Error> {
        self.lcd.clear(color).map_err(|_| Error::Draw)
    }

    /// Draw target covering the watch face area
    pub fn face(&mut self) -> Translated<'_, Lcd<'a, SPI>> {
        self.lcd.translated(FACE_ORIGIN)
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Controller did not come up
    Init,
    /// Writing pixels failed
    Draw,
}
