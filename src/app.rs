//! Watch face application: window lifecycle and event dispatch

use embedded_graphics::{pixelcolor::Rgb565, prelude::DrawTarget};

use crate::{
    events::{Event, Service, Subscriptions, TimeUnits},
    platform::{BatteryInfo, Platform},
    ui::{DigitalFace, Error, WatchFace, WatchFaceState, Window},
};

/// Application state, owned by whoever runs the event loop
#[derive(Debug)]
pub struct App<F = DigitalFace> {
    window: Window<F>,
    state: WatchFaceState,
    subscriptions: Subscriptions,
}

impl<F: WatchFace> App<F> {
    /// Create and show the window, then subscribe to tick, battery and
    /// bluetooth events.
    ///
    /// Loading renders the clock and the connection state. The battery level
    /// is seeded from the platform before the subscriptions are made and is
    /// drawn on the next render pass.
    pub fn init<P: Platform>(platform: &P) -> Result<Self, Error> {
        let mut window = Window::new();
        window.push(platform)?;

        let mut app = Self {
            window,
            state: WatchFaceState::default(),
            subscriptions: Subscriptions::default(),
        };

        app.on_battery(platform.battery_peek());

        app.subscriptions.subscribe(Service::BatteryState);
        app.subscriptions
            .subscribe(Service::TickTimer(TimeUnits::MINUTE));
        app.subscriptions.subscribe(Service::BluetoothConnection);

        Ok(app)
    }

    /// Release the window and its layers
    pub fn deinit(mut self) {
        self.subscriptions.clear();
        self.window.unload();
    }

    /// Dispatch an event to its handler, events without subscription are dropped
    pub fn handle<P: Platform>(&mut self, event: Event, platform: &P) -> Result<(), Error> {
        if !self.subscriptions.accepts(&event) {
            return Ok(());
        }

        match event {
            Event::Tick { .. } => self.on_tick(platform),
            Event::Battery(info) => {
                self.on_battery(info);
                Ok(())
            }
            Event::Bluetooth(connected) => self.on_bluetooth(connected),
        }
    }

    fn on_tick<P: Platform>(&mut self, platform: &P) -> Result<(), Error> {
        match self.window.face_mut() {
            Some(face) => face.update_time(platform),
            None => Ok(()),
        }
    }

    fn on_battery(&mut self, info: BatteryInfo) {
        self.state.set_battery(info);
        if let Some(face) = self.window.face_mut() {
            face.mark_battery_dirty();
        }
    }

    fn on_bluetooth(&mut self, connected: bool) -> Result<(), Error> {
        match self.window.face_mut() {
            Some(face) => face.update_bluetooth(connected),
            None => Ok(()),
        }
    }

    /// Whether a layer waits to be drawn
    pub fn needs_render(&self) -> bool {
        self.window.face().is_some_and(|face| face.is_dirty())
    }

    /// Redraw the window if anything changed, returns whether it drew
    pub fn render<D, P>(&mut self, target: &mut D, platform: &mut P) -> Result<bool, Error<D::Error>>
    where
        D: DrawTarget<Color = Rgb565>,
        P: Platform,
    {
        match self.window.face_mut() {
            Some(face) if face.is_dirty() => {
                face.draw(target, &self.state, platform)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Battery state shown by the face
    pub fn state(&self) -> &WatchFaceState {
        &self.state
    }

    /// Last reported battery percentage
    pub fn battery_level(&self) -> u8 {
        self.state.percent
    }

    /// Last reported charging state
    pub fn is_charging(&self) -> bool {
        self.state.charging
    }

    /// Window holding the face layers
    pub fn window(&self) -> &Window<F> {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Framebuffer, MockPlatform};
    use crate::ui::digital_face::{CONNECTED, DISCONNECTED};
    use chrono::NaiveDate;
    use embedded_graphics::pixelcolor::RgbColor;

    fn tick(platform: &MockPlatform) -> Event {
        Event::Tick {
            time: platform.time,
            units_changed: TimeUnits::MINUTE,
        }
    }

    fn face(app: &App) -> &DigitalFace {
        app.window().face().unwrap()
    }

    #[test]
    fn init_loads_window_and_seeds_battery() {
        let platform = MockPlatform::new();
        let app: App = App::init(&platform).unwrap();

        assert!(app.window().is_loaded());
        assert_eq!(app.battery_level(), 64);
        assert!(!app.is_charging());
        assert_eq!(face(&app).hour.text(), "14");
        assert_eq!(face(&app).bluetooth.text(), CONNECTED);
        assert!(face(&app).battery_bar.is_dirty());
        assert!(app.needs_render());
    }

    #[test]
    fn render_draws_once_per_change() {
        let mut platform = MockPlatform::new();
        let mut app: App = App::init(&platform).unwrap();
        let mut fb = Framebuffer::new(Rgb565::BLUE);

        assert_eq!(app.render(&mut fb, &mut platform), Ok(true));
        assert_eq!(face(&app).percentage.text(), "64%");
        assert!(!app.needs_render());
        assert_eq!(app.render(&mut fb, &mut platform), Ok(false));
    }

    #[test]
    fn battery_event_updates_level_and_charging() {
        let mut platform = MockPlatform::new();
        let mut app: App = App::init(&platform).unwrap();
        let mut fb = Framebuffer::new(Rgb565::BLUE);
        app.render(&mut fb, &mut platform).unwrap();

        let info = BatteryInfo {
            percent: 18,
            charging: true,
        };
        app.handle(Event::Battery(info), &platform).unwrap();
        assert_eq!(app.battery_level(), 18);
        assert!(app.is_charging());
        assert_eq!(
            app.state(),
            &WatchFaceState {
                percent: 18,
                charging: true,
            }
        );
        assert!(app.needs_render());

        app.render(&mut fb, &mut platform).unwrap();
        assert_eq!(face(&app).percentage.text(), "18%");
    }

    #[test]
    fn twenty_percent_alerts_on_each_render() {
        let mut platform = MockPlatform::new();
        platform.battery.percent = 20;
        let mut app: App = App::init(&platform).unwrap();
        let mut fb = Framebuffer::new(Rgb565::BLUE);

        app.render(&mut fb, &mut platform).unwrap();
        assert_eq!(platform.double_pulses, 1);

        // Same level reported again
        app.handle(Event::Battery(platform.battery), &platform)
            .unwrap();
        app.render(&mut fb, &mut platform).unwrap();
        assert_eq!(platform.double_pulses, 2);

        // A clock tick redraws the window as well
        platform.time = platform.time + chrono::Duration::minutes(1);
        app.handle(tick(&platform), &platform).unwrap();
        app.render(&mut fb, &mut platform).unwrap();
        assert_eq!(platform.double_pulses, 3);
    }

    #[test]
    fn tick_reads_platform_clock() {
        let mut platform = MockPlatform::new();
        let mut app: App = App::init(&platform).unwrap();

        platform.time = NaiveDate::from_ymd_opt(2021, 3, 4)
            .unwrap()
            .and_hms_opt(9, 41, 0)
            .unwrap();
        app.handle(tick(&platform), &platform).unwrap();

        assert_eq!(face(&app).hour.text(), "09");
        assert_eq!(face(&app).minute.text(), "41");
        assert_eq!(face(&app).day.text(), "Thursday");
        assert_eq!(face(&app).date.text(), "March 04");
    }

    #[test]
    fn bluetooth_events_toggle_label() {
        let platform = MockPlatform::new();
        let mut app: App = App::init(&platform).unwrap();

        app.handle(Event::Bluetooth(false), &platform).unwrap();
        assert_eq!(face(&app).bluetooth.text(), DISCONNECTED);
        app.handle(Event::Bluetooth(true), &platform).unwrap();
        assert_eq!(face(&app).bluetooth.text(), CONNECTED);
    }

    #[test]
    fn second_ticks_are_not_subscribed() {
        let mut platform = MockPlatform::new();
        let mut app: App = App::init(&platform).unwrap();

        platform.time = platform.time + chrono::Duration::seconds(1);
        platform.is_24h_style = true;
        let event = Event::Tick {
            time: platform.time,
            units_changed: TimeUnits::SECOND,
        };
        app.handle(event, &platform).unwrap();
        assert_eq!(face(&app).hour.text(), "14");
    }

    #[test]
    fn deinit_releases_window() {
        let platform = MockPlatform::new();
        let app: App = App::init(&platform).unwrap();
        app.deinit();
    }

    #[test]
    fn rendered_bar_matches_level() {
        let mut platform = MockPlatform::new();
        platform.battery.percent = 30;
        let mut app: App = App::init(&platform).unwrap();
        let mut fb = Framebuffer::new(Rgb565::BLUE);
        app.render(&mut fb, &mut platform).unwrap();

        assert_eq!(fb.pixel(51, 5), Rgb565::WHITE);
        assert_eq!(fb.pixel(52, 5), Rgb565::BLACK);
    }
}
