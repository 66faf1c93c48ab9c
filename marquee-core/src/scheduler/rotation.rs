//! Tick-driven screen scheduler

use marquee_display::Scene;

use crate::config::SignConfig;
use crate::data::{keys, DataStore};
use crate::input::ButtonEvent;
use crate::state::{Cue, ScreenId};
use crate::traits::{Screen, ScreenContext, ScreenError, ScreenTable};

/// Inputs sampled by the run loop for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickInput {
    /// Platform time in seconds
    pub now: u64,
    pub button_a: ButtonEvent,
    pub button_b: ButtonEvent,
}

impl TickInput {
    /// A tick with both buttons released
    pub const fn idle(now: u64) -> Self {
        Self {
            now,
            button_a: ButtonEvent::Released,
            button_b: ButtonEvent::Released,
        }
    }
}

/// What the run loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Keep ticking
    Continue,
    /// Long press on A: the sign has just stopped
    Halt,
    /// Already stopped; nothing was done
    Halted,
    /// Long press on B: reset the board after `delay_s`
    Reboot { delay_s: u64 },
}

/// Screen scheduler
///
/// Holds the current screen and the absolute time its countdown runs out.
/// A countdown is "up" only once `now` is strictly past the deadline.
#[derive(Debug, Clone)]
pub struct Scheduler {
    current: ScreenId,
    deadline: u64,
    halted: bool,
    config: SignConfig,
}

impl Scheduler {
    /// Create a scheduler on the clock with an already expired countdown
    pub fn new(config: SignConfig, now: u64) -> Self {
        Self {
            current: ScreenId::Clock,
            deadline: now,
            halted: false,
            config,
        }
    }

    /// Start the rotation on the clock with its full budget
    pub fn start(&mut self, now: u64) {
        self.halted = false;
        self.next_up(ScreenId::Clock, now);
    }

    /// Current screen
    pub fn current(&self) -> ScreenId {
        self.current
    }

    /// When the current countdown runs out
    pub fn deadline(&self) -> u64 {
        self.deadline
    }

    /// Whether a long press stopped the sign
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn config(&self) -> &SignConfig {
        &self.config
    }

    /// Whether the current countdown has run out
    pub fn is_time_up(&self, now: u64) -> bool {
        now > self.deadline
    }

    /// Make `screen` current for its configured budget
    pub fn next_up(&mut self, screen: ScreenId, now: u64) {
        let budget = self.config.budget(screen);
        if screen != self.current {
            debug!(
                "scheduler: {=str} -> {=str} for {=u64}s",
                self.current.name(),
                screen.name(),
                budget
            );
        }
        self.current = screen;
        self.deadline = now.saturating_add(budget);
    }

    /// Follow the transition table; false if the cue has no arc
    fn apply(&mut self, cue: Cue, now: u64) -> bool {
        match self.current.transition(cue, self.config.rotation_options()) {
            Some(next) => {
                self.next_up(next, now);
                true
            }
            None => false,
        }
    }

    /// Run one tick
    ///
    /// Screen errors propagate unchanged; the scheduler state is left as
    /// it was when the failing screen was called.
    pub fn tick(
        &mut self,
        input: &TickInput,
        screens: &mut ScreenTable<'_>,
        data: &mut DataStore,
        scene: &mut Scene,
    ) -> Result<TickOutcome, ScreenError> {
        if self.halted {
            return Ok(TickOutcome::Halted);
        }

        if input.button_a == ButtonEvent::LongPress {
            warn!("scheduler: halted by long press");
            self.halted = true;
            return Ok(TickOutcome::Halt);
        }

        if input.button_b == ButtonEvent::LongPress {
            let delay_s = self.config.buttons.reboot_delay_s;
            warn!("scheduler: reboot requested, {=u64}s", delay_s);
            return Ok(TickOutcome::Reboot { delay_s });
        }

        let now = input.now;
        let mut ctx = ScreenContext::new(data, scene, now);
        let reading = screens.clock.reading(&mut ctx);
        ctx.clock = Some(reading);

        // Held buttons re-show their screen every tick
        if input.button_a == ButtonEvent::Pressed {
            screens.ip_address.show(&mut ctx)?;
            self.apply(Cue::IpRequested, now);
            return Ok(TickOutcome::Continue);
        }

        if input.button_b == ButtonEvent::Pressed {
            screens.splash.show(&mut ctx)?;
            self.apply(Cue::SplashRequested, now);
            return Ok(TickOutcome::Continue);
        }

        if ctx.data.is_updated(keys::GREET) && screens.greet.show(&mut ctx)?.is_shown() {
            screens.greet.update(&mut ctx)?;
            self.apply(Cue::GreetArrived, now);
            return Ok(TickOutcome::Continue);
        }

        if ctx.data.is_updated(keys::MESSAGE) && screens.message.show(&mut ctx)?.is_shown() {
            screens.message.update(&mut ctx)?;
            self.apply(Cue::MessageArrived, now);
            return Ok(TickOutcome::Continue);
        }

        match self.current {
            ScreenId::Greet | ScreenId::Message | ScreenId::IpAddress | ScreenId::Splash => {
                if self.is_time_up(now) {
                    self.apply(Cue::Expired, now);
                } else {
                    match self.current {
                        ScreenId::Greet => screens.greet.update(&mut ctx)?,
                        ScreenId::Message => screens.message.update(&mut ctx)?,
                        ScreenId::IpAddress => screens.ip_address.update(&mut ctx)?,
                        _ => screens.splash.update(&mut ctx)?,
                    }
                }
            }

            ScreenId::Clock => {
                if self.is_time_up(now) {
                    self.apply(Cue::Expired, now);
                } else {
                    screens.clock.update(&mut ctx)?;
                }
            }

            ScreenId::Weather => {
                let cue = self.check_rotation(&mut ctx, &mut *screens.weather, keys::WEATHER)?;
                if let Some(cue) = cue {
                    self.apply(cue, now);
                }
            }

            ScreenId::Aqi => {
                let cue = self.check_rotation(&mut ctx, &mut *screens.aqi, keys::AQI)?;
                if let Some(cue) = cue {
                    self.apply(cue, now);
                }
            }

            ScreenId::Uvi => {
                if screens.clock.is_sundown(&mut ctx) {
                    self.apply(Cue::Sundown, now);
                } else if let Some(cue) =
                    self.check_rotation(&mut ctx, &mut *screens.uvi, keys::UV)?
                {
                    self.apply(cue, now);
                }
            }

            ScreenId::Pollen => {
                let cue = self.check_rotation(&mut ctx, &mut *screens.pollen, keys::POLLEN)?;
                if let Some(cue) = cue {
                    self.apply(cue, now);
                }
            }

            ScreenId::Trimet => screens.clock.update(&mut ctx)?,
        }

        Ok(TickOutcome::Continue)
    }

    /// Guard shared by the data screens in the rotation
    ///
    /// Checked in order, stopping at the first hit: countdown expired,
    /// data stale, screen has nothing to show. `None` means the screen
    /// rendered and stays current.
    fn check_rotation(
        &self,
        ctx: &mut ScreenContext<'_>,
        screen: &mut (dyn Screen + '_),
        key: &str,
    ) -> Result<Option<Cue>, ScreenError> {
        if self.is_time_up(ctx.now) {
            return Ok(Some(Cue::Expired));
        }
        if ctx
            .data
            .is_stale(key, ctx.now, self.config.rotation.stale_after_s)
        {
            return Ok(Some(Cue::Unavailable));
        }
        if !screen.show(ctx)?.is_shown() {
            return Ok(Some(Cue::Unavailable));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{ClockReading, ClockScreen, ShowOutcome};
    use marquee_display::Color;
    use serde_json::json;

    struct Fake {
        outcome: ShowOutcome,
        /// Key this screen acknowledges when shown
        consumes: Option<&'static str>,
        fail: bool,
        shows: u32,
        updates: u32,
    }

    impl Fake {
        fn new(outcome: ShowOutcome) -> Self {
            Self {
                outcome,
                consumes: None,
                fail: false,
                shows: 0,
                updates: 0,
            }
        }

        fn consuming(key: &'static str) -> Self {
            Self {
                consumes: Some(key),
                ..Self::new(ShowOutcome::Shown)
            }
        }
    }

    impl Screen for Fake {
        fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
            self.shows += 1;
            if self.fail {
                return Err(ScreenError::Format);
            }
            if let Some(key) = self.consumes {
                ctx.data.clear_updated(key);
            }
            Ok(self.outcome)
        }

        fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
            self.updates += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeClock {
        sundown: bool,
        updates: u32,
    }

    impl Screen for FakeClock {
        fn show(&mut self, _ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
            Ok(ShowOutcome::Shown)
        }

        fn update(&mut self, _ctx: &mut ScreenContext<'_>) -> Result<(), ScreenError> {
            self.updates += 1;
            Ok(())
        }
    }

    impl ClockScreen for FakeClock {
        fn reading(&mut self, ctx: &mut ScreenContext<'_>) -> ClockReading {
            ClockReading::from_local_seconds(ctx.now as i64, Color::GREEN)
        }

        fn is_sundown(&mut self, _ctx: &mut ScreenContext<'_>) -> bool {
            self.sundown
        }

        fn timezone_offset(&self) -> i64 {
            0
        }
    }

    struct Rig {
        scheduler: Scheduler,
        data: DataStore,
        scene: Scene,
        clock: FakeClock,
        ip: Fake,
        splash: Fake,
        greet: Fake,
        message: Fake,
        weather: Fake,
        aqi: Fake,
        uvi: Fake,
        pollen: Fake,
    }

    impl Rig {
        fn new(config: SignConfig) -> Self {
            let mut scheduler = Scheduler::new(config, 0);
            scheduler.start(0);
            Self {
                scheduler,
                data: DataStore::new(),
                scene: Scene::new(),
                clock: FakeClock::default(),
                ip: Fake::new(ShowOutcome::Shown),
                splash: Fake::new(ShowOutcome::Shown),
                greet: Fake::consuming(keys::GREET),
                message: Fake::consuming(keys::MESSAGE),
                weather: Fake::new(ShowOutcome::Shown),
                aqi: Fake::new(ShowOutcome::Shown),
                uvi: Fake::new(ShowOutcome::Shown),
                pollen: Fake::new(ShowOutcome::Shown),
            }
        }

        fn try_tick(&mut self, input: TickInput) -> Result<TickOutcome, ScreenError> {
            let mut screens = ScreenTable {
                clock: &mut self.clock,
                ip_address: &mut self.ip,
                splash: &mut self.splash,
                greet: &mut self.greet,
                message: &mut self.message,
                weather: &mut self.weather,
                aqi: &mut self.aqi,
                uvi: &mut self.uvi,
                pollen: &mut self.pollen,
            };
            self.scheduler
                .tick(&input, &mut screens, &mut self.data, &mut self.scene)
        }

        fn tick(&mut self, now: u64) -> TickOutcome {
            self.try_tick(TickInput::idle(now)).unwrap()
        }

        fn press(&mut self, now: u64, a: ButtonEvent, b: ButtonEvent) -> TickOutcome {
            self.try_tick(TickInput {
                now,
                button_a: a,
                button_b: b,
            })
            .unwrap()
        }

        /// Fresh data for every rotation screen
        fn feed_all(&mut self, now: u64) {
            for key in [keys::WEATHER, keys::AQI, keys::UV, keys::POLLEN] {
                self.data.set_item(key, json!({}), now);
            }
        }

        fn at(&self) -> (ScreenId, u64) {
            (self.scheduler.current(), self.scheduler.deadline())
        }
    }

    #[test]
    fn test_new_then_start() {
        let scheduler = Scheduler::new(SignConfig::default(), 100);
        assert_eq!(scheduler.current(), ScreenId::Clock);
        assert_eq!(scheduler.deadline(), 100);

        let rig = Rig::new(SignConfig::default());
        assert_eq!(rig.at(), (ScreenId::Clock, 20));
    }

    #[test]
    fn test_time_up_is_strict() {
        let rig = Rig::new(SignConfig::default());
        assert!(!rig.scheduler.is_time_up(20));
        assert!(rig.scheduler.is_time_up(21));
    }

    #[test]
    fn test_clock_expires_to_weather() {
        let mut rig = Rig::new(SignConfig::default());
        rig.tick(10);
        rig.tick(20);
        assert_eq!(rig.at(), (ScreenId::Clock, 20));
        assert_eq!(rig.clock.updates, 2);

        rig.tick(21);
        assert_eq!(rig.at(), (ScreenId::Weather, 31));
    }

    #[test]
    fn test_full_rotation_with_fresh_data() {
        let mut rig = Rig::new(SignConfig::default());
        rig.feed_all(0);

        rig.tick(21);
        assert_eq!(rig.at(), (ScreenId::Weather, 31));
        rig.tick(25);
        assert_eq!(rig.scheduler.current(), ScreenId::Weather);
        assert_eq!(rig.weather.shows, 1);

        rig.tick(32);
        assert_eq!(rig.at(), (ScreenId::Aqi, 42));
        rig.tick(43);
        assert_eq!(rig.at(), (ScreenId::Uvi, 63));
        rig.tick(50);
        assert_eq!(rig.uvi.shows, 1);
        rig.tick(64);
        assert_eq!(rig.at(), (ScreenId::Clock, 84));
        assert_eq!(rig.pollen.shows, 0);
    }

    #[test]
    fn test_stale_weather_moves_on() {
        let mut rig = Rig::new(SignConfig::default());
        rig.data.set_item(keys::WEATHER, json!({"temperature": 70}), 0);

        // Clock expires at 5000, well past the freshness window
        rig.scheduler.next_up(ScreenId::Clock, 4980);
        rig.tick(5001);
        assert_eq!(rig.scheduler.current(), ScreenId::Weather);

        rig.tick(5002);
        assert_eq!(rig.at(), (ScreenId::Aqi, 5012));
        assert_eq!(rig.weather.shows, 0);
    }

    #[test]
    fn test_restored_weather_from_synced_clock_moves_on() {
        let mut saved = DataStore::new();
        saved.set_item(keys::WEATHER, json!({"temperature": 70}), 1_700_000_000);
        let bytes = saved.record_json(keys::WEATHER).unwrap().unwrap();

        // Rebooted and not yet synced: the clock reads uptime
        let mut rig = Rig::new(SignConfig::default());
        rig.data.restore_record(keys::WEATHER, &bytes).unwrap();
        rig.tick(21);
        assert_eq!(rig.scheduler.current(), ScreenId::Weather);

        rig.tick(22);
        assert_eq!(rig.at(), (ScreenId::Aqi, 32));
        assert_eq!(rig.weather.shows, 0);
    }

    #[test]
    fn test_weather_without_data_moves_on() {
        let mut rig = Rig::new(SignConfig::default());
        rig.weather = Fake::new(ShowOutcome::NoData);
        rig.data.set_item(keys::WEATHER, json!({}), 20);

        rig.tick(21);
        rig.tick(22);
        assert_eq!(rig.at(), (ScreenId::Aqi, 32));
        assert_eq!(rig.weather.shows, 1);
    }

    #[test]
    fn test_sundown_skips_uv() {
        let mut rig = Rig::new(SignConfig::default());
        rig.feed_all(0);
        rig.clock.sundown = true;
        rig.scheduler.next_up(ScreenId::Uvi, 0);

        rig.tick(1);
        assert_eq!(rig.at(), (ScreenId::Clock, 21));
        assert_eq!(rig.uvi.shows, 0);
    }

    #[test]
    fn test_stale_uv_goes_to_clock() {
        let mut rig = Rig::new(SignConfig::default());
        rig.data.set_item(keys::UV, json!({"index": 4}), 0);
        rig.scheduler.next_up(ScreenId::Uvi, 4000);

        rig.tick(4001);
        assert_eq!(rig.at(), (ScreenId::Clock, 4021));
    }

    #[test]
    fn test_pollen_when_enabled() {
        let mut config = SignConfig::default();
        config.rotation.include_pollen = true;
        let mut rig = Rig::new(config);
        rig.feed_all(0);
        rig.scheduler.next_up(ScreenId::Uvi, 0);

        rig.tick(21);
        assert_eq!(rig.at(), (ScreenId::Pollen, 31));
        rig.tick(25);
        assert_eq!(rig.pollen.shows, 1);
        rig.tick(32);
        assert_eq!(rig.at(), (ScreenId::Clock, 52));
    }

    #[test]
    fn test_button_a_preempts_weather() {
        let mut rig = Rig::new(SignConfig::default());
        rig.feed_all(0);
        rig.tick(21);
        assert_eq!(rig.scheduler.current(), ScreenId::Weather);

        rig.press(22, ButtonEvent::Pressed, ButtonEvent::Released);
        assert_eq!(rig.at(), (ScreenId::IpAddress, 32));
        assert_eq!(rig.ip.shows, 1);

        // Held: shown again and the countdown restarts
        rig.press(25, ButtonEvent::Pressed, ButtonEvent::Released);
        assert_eq!(rig.at(), (ScreenId::IpAddress, 35));
        assert_eq!(rig.ip.shows, 2);
    }

    #[test]
    fn test_ip_and_splash_expire_to_clock() {
        let mut rig = Rig::new(SignConfig::default());
        rig.press(1, ButtonEvent::Released, ButtonEvent::Pressed);
        assert_eq!(rig.at(), (ScreenId::Splash, 11));

        rig.tick(5);
        assert_eq!(rig.splash.updates, 1);
        rig.tick(12);
        assert_eq!(rig.at(), (ScreenId::Clock, 32));

        rig.press(40, ButtonEvent::Pressed, ButtonEvent::Released);
        rig.tick(45);
        assert_eq!(rig.ip.updates, 1);
        rig.tick(51);
        assert_eq!(rig.at(), (ScreenId::Clock, 71));
    }

    #[test]
    fn test_greet_scenario() {
        let mut rig = Rig::new(SignConfig::default());
        rig.data
            .set_item(keys::GREET, json!({"person": "John R.", "door": "front"}), 5);

        rig.tick(5);
        assert_eq!(rig.at(), (ScreenId::Greet, 20));
        assert!(!rig.data.is_updated(keys::GREET));
        assert_eq!(rig.greet.updates, 1);

        for now in 6..=20 {
            rig.tick(now);
            assert_eq!(rig.scheduler.current(), ScreenId::Greet);
        }
        rig.tick(21);
        assert_eq!(rig.at(), (ScreenId::Clock, 41));
        assert_eq!(rig.greet.shows, 1);
    }

    #[test]
    fn test_greet_beats_message() {
        let mut rig = Rig::new(SignConfig::default());
        rig.data.set_item(keys::GREET, json!({"person": "Ada"}), 1);
        rig.data
            .set_item(keys::MESSAGE, json!({"text": "hi", "color": 255}), 1);

        rig.tick(2);
        assert_eq!(rig.scheduler.current(), ScreenId::Greet);

        // The message is still pending and takes over on the next tick
        rig.tick(3);
        assert_eq!(rig.at(), (ScreenId::Message, 18));
    }

    #[test]
    fn test_malformed_greet_does_not_interrupt() {
        let mut rig = Rig::new(SignConfig::default());
        rig.greet = Fake {
            outcome: ShowOutcome::Malformed,
            ..Fake::consuming(keys::GREET)
        };
        rig.data.set_item(keys::GREET, json!({"door": "front"}), 5);

        rig.tick(5);
        assert_eq!(rig.at(), (ScreenId::Clock, 20));
        assert_eq!(rig.clock.updates, 1);
        assert!(!rig.data.is_updated(keys::GREET));
    }

    #[test]
    fn test_long_press_a_halts_for_good() {
        let mut rig = Rig::new(SignConfig::default());
        assert_eq!(
            rig.press(1, ButtonEvent::LongPress, ButtonEvent::Released),
            TickOutcome::Halt
        );
        assert!(rig.scheduler.is_halted());

        rig.data.set_item(keys::GREET, json!({"person": "Ada"}), 2);
        assert_eq!(rig.tick(2), TickOutcome::Halted);
        assert_eq!(rig.greet.shows, 0);
        assert_eq!(rig.clock.updates, 0);
    }

    #[test]
    fn test_long_press_b_requests_reboot() {
        let mut rig = Rig::new(SignConfig::default());
        assert_eq!(
            rig.press(1, ButtonEvent::Released, ButtonEvent::LongPress),
            TickOutcome::Reboot { delay_s: 5 }
        );
        assert!(!rig.scheduler.is_halted());
    }

    #[test]
    fn test_screen_error_propagates() {
        let mut rig = Rig::new(SignConfig::default());
        rig.feed_all(0);
        rig.weather.fail = true;
        rig.tick(21);

        let result = rig.try_tick(TickInput::idle(22));
        assert_eq!(result, Err(ScreenError::Format));
        assert_eq!(rig.scheduler.current(), ScreenId::Weather);
    }

    #[test]
    fn test_trimet_falls_back_to_clock_drawing() {
        let mut rig = Rig::new(SignConfig::default());
        rig.scheduler.next_up(ScreenId::Trimet, 0);
        rig.tick(100);
        assert_eq!(rig.scheduler.current(), ScreenId::Trimet);
        assert_eq!(rig.clock.updates, 1);
    }
}
