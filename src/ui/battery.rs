//! Battery indicator

use core::fmt;

use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::Rectangle,
};

use super::layer::Label;

/// Battery percentage at which the bar reaches its full length
pub const BAR_FULL_PERCENT: f32 = 60.0;
/// Full length of the bar in pixels
pub const BAR_LENGTH: f32 = 20.0;

/// Lowest percentage shown with the normal color
pub const NORMAL_MIN_PERCENT: u8 = 21;
/// Percentage that triggers the vibration alert
pub const ALERT_PERCENT: u8 = 20;

/// Width of the bar in pixels.
///
/// Not clamped: above 60 % the bar grows past its nominal length.
pub fn bar_width(percent: u8) -> i32 {
    ((percent as f32 / BAR_FULL_PERCENT) * BAR_LENGTH) as i32
}

/// Whether the level is shown with the alert color
pub fn is_low(percent: u8) -> bool {
    percent < NORMAL_MIN_PERCENT
}

/// Whether drawing this level vibrates
pub fn needs_alert(percent: u8) -> bool {
    percent == ALERT_PERCENT
}

/// Write `percent` followed by a `%` sign
pub fn write_percent<const N: usize>(label: &mut Label<N>, percent: u8) -> fmt::Result {
    label.show(format_args!("{}", percent))?;
    label.push('%')
}

/// Custom drawn battery bar
#[derive(Debug, Clone)]
pub struct BatteryBar {
    frame: Rectangle,
    dirty: bool,
}

impl BatteryBar {
    pub fn new(frame: Rectangle) -> Self {
        Self { frame, dirty: false }
    }

    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Fill the frame black and draw the white bar from the left edge
    pub fn draw<D>(&mut self, target: &mut D, percent: u8) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        // Layer local coordinates, clipped to the frame
        let bounds = Rectangle::new(Point::zero(), self.frame.size);
        let mut translated = target.translated(self.frame.top_left);
        let mut layer = translated.clipped(&bounds);

        layer.fill_solid(&bounds, Rgb565::BLACK)?;

        let width = bar_width(percent);
        if width > 0 {
            let bar = Rectangle::new(Point::zero(), Size::new(width as u32, bounds.size.height));
            layer.fill_solid(&bar, Rgb565::WHITE)?;
        }

        self.dirty = false;
        Ok(())
    }
}
