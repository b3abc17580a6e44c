//! UI definitions: face geometry, colors, fonts and the watch face interface

use core::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_6X10, FONT_6X12},
        MonoFont,
    },
    pixelcolor::{Rgb565, RgbColor},
    prelude::{DrawTarget, Point, Size},
    primitives::Rectangle,
};
use profont::{PROFONT_18_POINT, PROFONT_24_POINT};

use crate::platform::{BatteryInfo, Platform};

pub mod battery;
pub mod clock;
pub mod digital_face;
pub mod layer;
pub mod window;

pub use digital_face::DigitalFace;
pub use window::Window;

/// Width of the watch face frame
pub const FACE_W: u32 = 144;
/// Height of the watch face frame
pub const FACE_H: u32 = 168;

/// Area covered by the watch face
pub const FACE_BOUNDS: Rectangle = Rectangle::new(Point::zero(), Size::new(FACE_W, FACE_H));

/// Color of the window behind all layers
pub const WINDOW_BACKGROUND: Rgb565 = Rgb565::WHITE;

/// Color used for regular indicator states
pub const NORMAL_COLOR: Rgb565 = Rgb565::GREEN;
/// Color used for low battery and lost connection
pub const ALERT_COLOR: Rgb565 = Rgb565::RED;

/// Errors while updating or drawing the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E = Infallible> {
    /// Text did not fit into the layer buffer
    TextOverflow,
    /// The draw target failed
    Draw(E),
}

impl<E> From<core::fmt::Error> for Error<E> {
    fn from(_: core::fmt::Error) -> Self {
        Error::TextOverflow
    }
}

/// Fonts the layers can use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Built-in font of plain text layers
    System,
    /// Small banner font for the status row
    TopBanner12,
    /// Large digits for the hour
    Digital51,
    /// Medium digits for the minute
    Digital35,
    /// Text font for am/pm, day and date
    DigitalText24,
}

impl Font {
    /// Monospace font standing in for the resource
    pub fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            Font::System => &FONT_6X10,
            Font::TopBanner12 => &FONT_6X12,
            Font::Digital51 => &PROFONT_24_POINT,
            Font::Digital35 => &PROFONT_18_POINT,
            Font::DigitalText24 => &FONT_10X20,
        }
    }
}

/// State for the watch face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchFaceState {
    /// Last reported battery percentage
    pub percent: u8,
    /// Last reported charging state
    pub charging: bool,
}

impl WatchFaceState {
    /// Record a new battery report
    pub fn set_battery(&mut self, info: BatteryInfo) {
        self.percent = info.percent;
        self.charging = info.charging;
    }
}

pub trait WatchFace: Sized {
    /// Create the layers and fill them with their initial content
    fn load<P: Platform>(platform: &P) -> Result<Self, Error>;

    /// Refresh time dependent layers
    fn update_time<P: Platform>(&mut self, platform: &P) -> Result<(), Error>;

    /// Refresh the connection indicator
    fn update_bluetooth(&mut self, connected: bool) -> Result<(), Error>;

    /// Request a redraw of the battery indicator
    fn mark_battery_dirty(&mut self);

    /// Whether any layer waits to be drawn
    fn is_dirty(&self) -> bool;

    /// Draw all layers onto `target` and clear their dirty state
    fn draw<D, P>(
        &mut self,
        target: &mut D,
        state: &WatchFaceState,
        platform: &mut P,
    ) -> Result<(), Error<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        P: Platform;
}
