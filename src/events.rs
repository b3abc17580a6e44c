//! Events delivered to the watch face and the services emitting them

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::platform::BatteryInfo;

/// Set of calendar units, used both to subscribe to ticks and to report
/// which units changed since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const SECOND: Self = Self(1 << 0);
    pub const MINUTE: Self = Self(1 << 1);
    pub const HOUR: Self = Self(1 << 2);
    pub const DAY: Self = Self(1 << 3);
    pub const MONTH: Self = Self(1 << 4);
    pub const YEAR: Self = Self(1 << 5);

    /// No unit at all
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Raw bit representation
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether every unit of `other` is part of this set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Units that differ between two points in time
    pub fn changed_between(previous: &NaiveDateTime, now: &NaiveDateTime) -> Self {
        let mut changed = Self::empty();
        if previous.second() != now.second() {
            changed = changed | Self::SECOND;
        }
        if previous.minute() != now.minute() {
            changed = changed | Self::MINUTE;
        }
        if previous.hour() != now.hour() {
            changed = changed | Self::HOUR;
        }
        if previous.day() != now.day() {
            changed = changed | Self::DAY;
        }
        if previous.month() != now.month() {
            changed = changed | Self::MONTH;
        }
        if previous.year() != now.year() {
            changed = changed | Self::YEAR;
        }
        changed
    }

    /// Smallest unit in the set, as a bit mask
    fn finest(self) -> u8 {
        self.0 & self.0.wrapping_neg()
    }
}

impl core::ops::BitOr for TimeUnits {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Event delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Periodic clock tick
    Tick {
        /// Time of the tick
        time: NaiveDateTime,
        /// Units that changed since the previous tick
        units_changed: TimeUnits,
    },
    /// Battery state changed
    Battery(BatteryInfo),
    /// Phone connected (`true`) or disconnected (`false`)
    Bluetooth(bool),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Event::Tick {
                time,
                units_changed,
            } => defmt::write!(
                f,
                "Tick({}, {})",
                defmt::Debug2Format(time),
                units_changed
            ),
            Event::Battery(info) => defmt::write!(f, "Battery({})", info),
            Event::Bluetooth(connected) => defmt::write!(f, "Bluetooth({})", connected),
        }
    }
}

/// Event source the face can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Service {
    /// Clock ticks whenever one of the given units (or a coarser one) changes
    TickTimer(TimeUnits),
    BatteryState,
    BluetoothConnection,
}

/// Active subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Subscriptions {
    tick: Option<TimeUnits>,
    battery: bool,
    bluetooth: bool,
}

impl Subscriptions {
    /// Register for a service, replacing an earlier tick subscription
    pub fn subscribe(&mut self, service: Service) {
        match service {
            Service::TickTimer(units) => self.tick = Some(units),
            Service::BatteryState => self.battery = true,
            Service::BluetoothConnection => self.bluetooth = true,
        }
    }

    /// Drop every subscription
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether `event` should reach a handler
    pub fn accepts(&self, event: &Event) -> bool {
        match event {
            Event::Tick { units_changed, .. } => self
                .tick
                .is_some_and(|units| fires_for(units, *units_changed)),
            Event::Battery(_) => self.battery,
            Event::Bluetooth(_) => self.bluetooth,
        }
    }
}

/// A tick subscribed for `units` fires when that unit or any coarser one changed.
fn fires_for(units: TimeUnits, changed: TimeUnits) -> bool {
    !units.is_empty() && changed.bits() >= units.finest()
}

/// Turns a stream of clock readings into tick events.
///
/// The first reading only sets the reference, ticks are emitted from the
/// next change of a subscribed unit on.
#[derive(Debug, Clone)]
pub struct TickTimer {
    units: TimeUnits,
    last: Option<NaiveDateTime>,
}

impl TickTimer {
    /// Create a ticker for the given units
    pub fn new(units: TimeUnits) -> Self {
        Self { units, last: None }
    }

    /// Feed the current time, returns a tick if a subscribed unit changed
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<Event> {
        let previous = self.last.replace(now)?;
        let units_changed = TimeUnits::changed_between(&previous, &now);

        fires_for(self.units, units_changed).then_some(Event::Tick {
            time: now,
            units_changed,
        })
    }
}
