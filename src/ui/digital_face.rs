//! Digital watchface
//!
//! Status row with battery percentage, battery bar and connection state,
//! large hour and minute digits with am/pm, and the weekday and date below
//! a divider.

use embedded_graphics::{
    pixelcolor::{Rgb565, RgbColor},
    prelude::*,
    primitives::Rectangle,
    text::Alignment,
};

use super::{
    battery::{self, BatteryBar},
    clock,
    layer::TextLayer,
    Error, Font, WatchFace, WatchFaceState, ALERT_COLOR, FACE_BOUNDS, NORMAL_COLOR,
    WINDOW_BACKGROUND,
};
use crate::platform::Platform;

const fn frame(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(Point::new(x, y), Size::new(w, h))
}

pub const BATTERY_FRAME: Rectangle = frame(42, 0, 40, 28);
pub const PERCENTAGE_FRAME: Rectangle = frame(0, 0, 40, 30);
pub const BLUETOOTH_FRAME: Rectangle = frame(65, 0, 90, 30);
pub const COVER_FRAME: Rectangle = frame(80, 15, 72, 30);
pub const HOUR_FRAME: Rectangle = frame(0, 15, 80, 87);
pub const MINUTE_FRAME: Rectangle = frame(80, 30, 72, 72);
pub const AMPM_FRAME: Rectangle = frame(45, 65, 145, 32);
pub const DATE_FRAME: Rectangle = frame(-8, 133, 144, 35);
pub const DAY_FRAME: Rectangle = frame(8, 100, 144, 35);
pub const DIVIDER_FRAME: Rectangle = frame(12, 133, 120, 2);

/// Up to three digits and the percent sign
const PERCENT_LEN: usize = 4;
/// "Disconnected"
const BLUETOOTH_LEN: usize = 12;
const HOUR_LEN: usize = 2;
const MINUTE_LEN: usize = 2;
const AMPM_LEN: usize = 4;
/// "September 30"
const DATE_LEN: usize = 12;
const DAY_LEN: usize = 12;

pub const CONNECTED: &str = "Connected";
pub const DISCONNECTED: &str = "Disconnected";

/// Digital watchface with battery and bluetooth indicators
#[derive(Debug, Clone)]
pub struct DigitalFace {
    pub battery_bar: BatteryBar,
    pub percentage: TextLayer<PERCENT_LEN>,
    pub bluetooth: TextLayer<BLUETOOTH_LEN>,
    pub cover: TextLayer<0>,
    pub hour: TextLayer<HOUR_LEN>,
    pub minute: TextLayer<MINUTE_LEN>,
    pub ampm: TextLayer<AMPM_LEN>,
    pub date: TextLayer<DATE_LEN>,
    pub day: TextLayer<DAY_LEN>,
    pub divider: TextLayer<0>,
}

impl DigitalFace {
    /// Create all layers with their styling and no text
    pub fn new() -> Self {
        let black = Some(Rgb565::BLACK);

        Self {
            battery_bar: BatteryBar::new(BATTERY_FRAME),
            percentage: TextLayer::new(PERCENTAGE_FRAME)
                .with_background(black)
                .with_font(Font::TopBanner12)
                .with_alignment(Alignment::Center),
            bluetooth: TextLayer::new(BLUETOOTH_FRAME)
                .with_background(black)
                .with_font(Font::TopBanner12)
                .with_alignment(Alignment::Center),
            cover: TextLayer::new(COVER_FRAME).with_background(black),
            hour: TextLayer::new(HOUR_FRAME)
                .with_background(black)
                .with_text_color(Rgb565::WHITE)
                .with_font(Font::Digital51)
                .with_alignment(Alignment::Right),
            minute: TextLayer::new(MINUTE_FRAME)
                .with_background(black)
                .with_text_color(Rgb565::RED)
                .with_font(Font::Digital35)
                .with_alignment(Alignment::Left),
            ampm: TextLayer::new(AMPM_FRAME)
                .with_background(black)
                .with_text_color(Rgb565::WHITE)
                .with_font(Font::DigitalText24)
                .with_alignment(Alignment::Center),
            date: TextLayer::new(DATE_FRAME)
                .with_background(None)
                .with_text_color(Rgb565::RED)
                .with_font(Font::DigitalText24)
                .with_alignment(Alignment::Right),
            day: TextLayer::new(DAY_FRAME)
                .with_background(None)
                .with_text_color(Rgb565::BLACK)
                .with_font(Font::DigitalText24)
                .with_alignment(Alignment::Left),
            divider: TextLayer::new(DIVIDER_FRAME)
                .with_background(black)
                .with_text_color(Rgb565::BLACK),
        }
    }

    /// Battery bar draw routine, also refreshes the percentage label
    fn draw_battery<D, P>(
        &mut self,
        target: &mut D,
        percent: u8,
        platform: &mut P,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        P: Platform,
    {
        self.battery_bar
            .draw(target, percent)
            .map_err(Error::Draw)?;

        battery::write_percent(self.percentage.label_mut(), percent)?;

        if battery::is_low(percent) {
            self.percentage.set_text_color(ALERT_COLOR);
            // Fires on every redraw while the level stays there
            if battery::needs_alert(percent) {
                platform.vibes_double_pulse();
            }
        } else {
            self.percentage.set_text_color(NORMAL_COLOR);
        }

        Ok(())
    }
}

impl Default for DigitalFace {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchFace for DigitalFace {
    fn load<P: Platform>(platform: &P) -> Result<Self, Error> {
        let mut face = Self::new();
        face.update_time(platform)?;
        face.update_bluetooth(platform.bluetooth_peek())?;
        Ok(face)
    }

    fn update_time<P: Platform>(&mut self, platform: &P) -> Result<(), Error> {
        let time = platform.local_time();
        let clock_is_24h_style = platform.clock_is_24h_style();

        clock::write_time(
            &time,
            clock_is_24h_style,
            self.hour.label_mut(),
            self.minute.label_mut(),
            self.ampm.label_mut(),
        )?;
        clock::write_day(&time, self.day.label_mut())?;
        clock::write_date(&time, self.date.label_mut())?;

        Ok(())
    }

    fn update_bluetooth(&mut self, connected: bool) -> Result<(), Error> {
        if connected {
            self.bluetooth.set_text_color(NORMAL_COLOR);
            self.bluetooth.set_text(CONNECTED)?;
        } else {
            self.bluetooth.set_text_color(ALERT_COLOR);
            self.bluetooth.set_text(DISCONNECTED)?;
        }
        Ok(())
    }

    fn mark_battery_dirty(&mut self) {
        self.battery_bar.mark_dirty();
    }

    fn is_dirty(&self) -> bool {
        self.battery_bar.is_dirty()
            || self.percentage.is_dirty()
            || self.bluetooth.is_dirty()
            || self.cover.is_dirty()
            || self.hour.is_dirty()
            || self.minute.is_dirty()
            || self.ampm.is_dirty()
            || self.date.is_dirty()
            || self.day.is_dirty()
            || self.divider.is_dirty()
    }

    fn draw<D, P>(
        &mut self,
        target: &mut D,
        state: &WatchFaceState,
        platform: &mut P,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        P: Platform,
    {
        target
            .fill_solid(&FACE_BOUNDS, WINDOW_BACKGROUND)
            .map_err(Error::Draw)?;

        // Back to front
        self.draw_battery(target, state.percent, platform)?;
        self.percentage.draw(target).map_err(Error::Draw)?;
        self.bluetooth.draw(target).map_err(Error::Draw)?;
        self.cover.draw(target).map_err(Error::Draw)?;
        self.hour.draw(target).map_err(Error::Draw)?;
        self.minute.draw(target).map_err(Error::Draw)?;
        self.ampm.draw(target).map_err(Error::Draw)?;
        self.date.draw(target).map_err(Error::Draw)?;
        self.day.draw(target).map_err(Error::Draw)?;
        self.divider.draw(target).map_err(Error::Draw)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Framebuffer, MockPlatform};

    fn draw(face: &mut DigitalFace, percent: u8, platform: &mut MockPlatform) -> Framebuffer {
        let mut fb = Framebuffer::new(Rgb565::BLUE);
        let state = WatchFaceState {
            percent,
            charging: false,
        };
        face.draw(&mut fb, &state, platform).unwrap();
        fb
    }

    #[test]
    fn load_fills_clock_and_bluetooth() {
        let platform = MockPlatform::new();
        let face = DigitalFace::load(&platform).unwrap();

        assert_eq!(face.hour.text(), "14");
        assert_eq!(face.minute.text(), "05");
        assert_eq!(face.ampm.text(), "");
        assert_eq!(face.day.text(), "Wednesday");
        assert_eq!(face.date.text(), "March 03");
        assert_eq!(face.bluetooth.text(), CONNECTED);
        assert_eq!(face.bluetooth.text_color(), NORMAL_COLOR);
        assert_eq!(face.percentage.text(), "");
        assert!(!face.battery_bar.is_dirty());
    }

    #[test]
    fn load_with_24h_preference() {
        let mut platform = MockPlatform::new();
        platform.is_24h_style = true;
        let face = DigitalFace::load(&platform).unwrap();

        assert_eq!(face.hour.text(), "02");
        assert_eq!(face.minute.text(), "05");
        assert_eq!(face.ampm.text(), "pm");
    }

    #[test]
    fn disconnected_label() {
        let mut platform = MockPlatform::new();
        platform.connected = false;
        let mut face = DigitalFace::load(&platform).unwrap();
        assert_eq!(face.bluetooth.text(), DISCONNECTED);
        assert_eq!(face.bluetooth.text_color(), ALERT_COLOR);

        face.update_bluetooth(true).unwrap();
        assert_eq!(face.bluetooth.text(), CONNECTED);
        assert_eq!(face.bluetooth.text_color(), NORMAL_COLOR);
    }

    #[test]
    fn draw_sets_percentage_label() {
        let mut platform = MockPlatform::new();
        let mut face = DigitalFace::load(&platform).unwrap();

        draw(&mut face, 64, &mut platform);
        assert_eq!(face.percentage.text(), "64%");
        assert_eq!(face.percentage.text_color(), NORMAL_COLOR);
        assert!(!face.is_dirty());

        draw(&mut face, 5, &mut platform);
        assert_eq!(face.percentage.text(), "5%");
        assert_eq!(face.percentage.text_color(), ALERT_COLOR);
        assert_eq!(platform.double_pulses, 0);
    }

    #[test]
    fn empty_battery_uses_alert_color() {
        let mut platform = MockPlatform::new();
        let mut face = DigitalFace::load(&platform).unwrap();

        draw(&mut face, 0, &mut platform);
        assert_eq!(face.percentage.text(), "0%");
        assert_eq!(face.percentage.text_color(), ALERT_COLOR);
    }

    #[test]
    fn twenty_percent_vibrates_on_every_draw() {
        let mut platform = MockPlatform::new();
        let mut face = DigitalFace::load(&platform).unwrap();

        draw(&mut face, 20, &mut platform);
        draw(&mut face, 20, &mut platform);
        assert_eq!(platform.double_pulses, 2);

        draw(&mut face, 21, &mut platform);
        assert_eq!(platform.double_pulses, 2);
    }

    #[test]
    fn layers_are_stacked_back_to_front() {
        let mut platform = MockPlatform::new();
        let mut face = DigitalFace::load(&platform).unwrap();
        let fb = draw(&mut face, 100, &mut platform);

        // Window background
        assert_eq!(fb.pixel(0, 167), WINDOW_BACKGROUND);
        // Bar pixels left of the bluetooth label, above the hour
        assert_eq!(fb.pixel(42, 10), Rgb565::WHITE);
        assert_eq!(fb.pixel(64, 10), Rgb565::WHITE);
        // Bluetooth label covers the rest of the bar
        assert_eq!(fb.pixel(65, 10), Rgb565::BLACK);
        // Hour layer covers the lower part
        assert_eq!(fb.pixel(42, 20), Rgb565::BLACK);
        // Divider
        assert_eq!(fb.pixel(12, 133), Rgb565::BLACK);
        assert_eq!(fb.pixel(131, 134), Rgb565::BLACK);
    }
}
