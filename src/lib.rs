//! Digital watch face
//!
//! Board-agnostic watch face logic:
//!
//! - Platform services the face relies on (clock, battery, connectivity, haptics)
//! - Tick, battery and bluetooth events and their subscriptions
//! - The window with its text layers and the custom battery bar
//! - Rendering onto any `embedded-graphics` draw target

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod app;
pub mod events;
pub mod platform;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use app::App;
pub use events::{Event, Service, TickTimer, TimeUnits};
pub use platform::{BatteryInfo, Platform};
