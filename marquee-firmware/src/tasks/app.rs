//! Application task
//!
//! Owns the data store, the scheduler and every screen. Each tick it
//! applies pending writes, plays tones, samples the buttons, runs the
//! scheduler and publishes a frame when the scene changed.

use alloc::vec::Vec;
use defmt::*;
use embassy_time::{with_timeout, Duration, Ticker, Timer};
use portable_atomic::Ordering;

use marquee_core::config::SignConfig;
use marquee_core::data::{debug_enabled, keys, DataStore, NtpSettings};
use marquee_core::input::Button;
use marquee_core::scheduler::{Scheduler, TickInput, TickOutcome};
use marquee_core::supervisor::{check_memory, MemoryStatus, Supervisor, Verdict};
use marquee_core::traits::{ClockScreen, ScreenError, ScreenTable};
use marquee_display::{render, Color, Framebuffer, Scene, PANEL_HEIGHT, PANEL_WIDTH};
use marquee_hal::ButtonPin;
use marquee_hal_rp2040::buzzer::PwmBuzzer;
use marquee_hal_rp2040::gpio::ButtonInput;
use marquee_protocol::{Severity, Topic};
use marquee_screens::{
    Aqi, ClockFace, Greet, IpAddress, Message, Pollen, Splash, Tones, Uv, Weather,
};

use crate::assets::FirmwareAssets;
use crate::channels::{
    Inbound, Query, FRAME, FRAME_READY, INBOUND, MQTT_UP, NET_ADDRESS, NET_UP, NTP_SETTINGS,
    REPLY, SAVE_READY, UNSAVED,
};
use crate::clock;
use crate::syslog;

/// Tick period
const TICK_INTERVAL_MS: u64 = 50;

/// Ticks between heap checks (one minute)
const MEMORY_CHECK_TICKS: u32 = 1200;

/// Back-off after a failed tick
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Longest the WiFi image stays up at boot
const NETWORK_WAIT: Duration = Duration::from_secs(30);

/// Names that get the anonymous greeting, comma separated
const ANONYMOUS: &str = match option_env!("SIGN_ANONYMOUS") {
    Some(list) => list,
    None => "",
};

/// Hardware the app task drives directly
pub struct AppIo {
    pub button_a: ButtonInput<'static>,
    pub button_b: ButtonInput<'static>,
    pub buzzer: PwmBuzzer<'static>,
}

/// Every screen the scheduler can show
struct Screens {
    clock: ClockFace,
    ip_address: IpAddress,
    splash: Splash,
    greet: Greet,
    message: Message,
    weather: Weather,
    aqi: Aqi,
    uvi: Uv,
    pollen: Pollen,
}

impl Screens {
    fn new(config: &SignConfig) -> Self {
        Self {
            clock: ClockFace::new(),
            ip_address: IpAddress::new(),
            splash: Splash::new(&config.display.splash_asset),
            greet: Greet::with_anonymous(ANONYMOUS),
            message: Message::new(),
            weather: Weather::new(),
            aqi: Aqi::new(),
            uvi: Uv::new(),
            pollen: Pollen::new(),
        }
    }

    fn table(&mut self) -> ScreenTable<'_> {
        ScreenTable {
            clock: &mut self.clock,
            ip_address: &mut self.ip_address,
            splash: &mut self.splash,
            greet: &mut self.greet,
            message: &mut self.message,
            weather: &mut self.weather,
            aqi: &mut self.aqi,
            uvi: &mut self.uvi,
            pollen: &mut self.pollen,
        }
    }
}

/// Application state
struct App {
    config: &'static SignConfig,
    store: DataStore,
    scheduler: Scheduler,
    screens: Screens,
    tones: Tones,
    button_a: Button,
    button_b: Button,
    supervisor: Supervisor,
    scene: Scene,
    frame: Framebuffer,
}

impl App {
    fn new(config: &'static SignConfig, store: DataStore) -> Self {
        let scheduler = Scheduler::new(config.clone(), clock::now());
        let buttons = &config.buttons;
        Self {
            config,
            store,
            scheduler,
            screens: Screens::new(config),
            tones: Tones::new(),
            button_a: Button::new(buttons.debounce_ms, buttons.long_press_ms),
            button_b: Button::new(buttons.debounce_ms, buttons.long_press_ms),
            supervisor: Supervisor::new(),
            scene: Scene::new(),
            frame: Framebuffer::new(),
        }
    }

    /// Apply one message from the network tasks
    fn handle(&mut self, message: Inbound) {
        match message {
            Inbound::Store(topic, value) => {
                self.store.set_item(topic.key(), value, clock::now());
                if debug_enabled(&mut self.store) {
                    info!("Stored {}", topic.key());
                }
                syslog::emit(Severity::Info, format_args!("stored {}", topic.key()));
                if topic == Topic::Ntp {
                    let defaults = self.config.network.ntp_defaults();
                    let settings =
                        NtpSettings::from_value(self.store.get_item(keys::NTP), &defaults);
                    NTP_SETTINGS.signal(settings);
                }
            }
            Inbound::SetTime(epoch) => {
                info!("Clock set to {}", epoch);
                clock::set(epoch);
                syslog::emit(Severity::Notice, format_args!("clock set to {}", epoch));
            }
            Inbound::Query(query) => REPLY.signal(self.answer(query)),
        }
    }

    fn answer(&mut self, query: Query) -> Option<Vec<u8>> {
        match query {
            Query::Data => self.store.to_json().ok(),
            Query::Info => {
                let info = serde_json::json!({
                    "version": env!("CARGO_PKG_VERSION"),
                    "uptime": clock::uptime(),
                    "time": clock::now(),
                    "time_synced": clock::is_synced(),
                    "timezone_offset": self.screens.clock.timezone_offset(),
                    "free_heap": crate::free_heap(),
                    "records": self.store.len(),
                    "screen": self.scheduler.current().name(),
                    "halted": self.scheduler.is_halted(),
                    "tick_failures": self.supervisor.total_failures(),
                    "display": { "width": PANEL_WIDTH, "height": PANEL_HEIGHT },
                });
                serde_json::to_vec(&info).ok()
            }
        }
    }

    /// Sample inputs and run one scheduler tick
    fn tick(&mut self, io: &mut AppIo) -> Result<TickOutcome, ScreenError> {
        let now = clock::now();
        let now_ms = clock::now_ms();

        if self.tones.play(&mut self.store, now_ms) {
            debug!("Playing tones");
        }
        self.tones.update(now_ms, &mut io.buzzer);

        let input = TickInput {
            now,
            button_a: self.button_a.update(io.button_a.is_pressed(), now_ms),
            button_b: self.button_b.update(io.button_b.is_pressed(), now_ms),
        };

        let mut table = self.screens.table();
        self.scheduler
            .tick(&input, &mut table, &mut self.store, &mut self.scene)
    }

    /// Render and publish the scene if it changed
    fn present(&mut self) {
        if self.config.display.status_pixel {
            let status = if !NET_UP.load(Ordering::Relaxed) {
                Some(Color::RED)
            } else if self.config.network.mqtt_enabled() && !MQTT_UP.load(Ordering::Relaxed) {
                Some(Color::GREEN)
            } else {
                None
            };
            self.scene.set_status(status);
        }
        if !self.scene.is_dirty() {
            return;
        }
        if let Err(e) = render(&self.scene, &mut self.frame, &FirmwareAssets) {
            warn!("render: {:?}", e);
        }
        FRAME.lock(|shared| shared.borrow_mut().clone_from(&self.frame));
        FRAME_READY.signal(());
        self.scene.mark_clean();
    }

    /// Hand changed records to the persistence task
    fn save(&mut self) {
        let keys = self.store.take_unsaved();
        if keys.is_empty() {
            return;
        }
        for key in keys {
            let Some(topic) = Topic::from_key(&key) else {
                continue;
            };
            match self.store.record_json(&key) {
                Some(Ok(bytes)) => UNSAVED.lock(|unsaved| {
                    unsaved.borrow_mut()[topic.slot() as usize] = Some(bytes);
                }),
                Some(Err(e)) => warn!("record {}: {:?}", topic, e),
                None => {}
            }
        }
        SAVE_READY.signal(());
    }
}

/// Show the WiFi image until the network is up or the wait runs out
async fn wait_for_network(app: &mut App) {
    if let Err(e) = app.scene.add_image(&app.config.display.wifi_asset, 0, 0) {
        warn!("wifi image: {:?}", e);
    }
    app.present();

    let waited = with_timeout(NETWORK_WAIT, async {
        while !NET_UP.load(Ordering::Relaxed) {
            Timer::after_millis(100).await;
        }
    })
    .await;
    if waited.is_err() {
        warn!("Network not up after {}s, starting anyway", NETWORK_WAIT.as_secs());
    }
}

/// Application task
///
/// `online` is false when the firmware was built without WiFi credentials.
#[embassy_executor::task]
pub async fn app_task(
    config: &'static SignConfig,
    store: DataStore,
    mut io: AppIo,
    online: bool,
) -> ! {
    info!("App task started");

    let mut app = App::new(config, store);
    if online {
        wait_for_network(&mut app).await;
    }
    // Rotation starts on the clock once the boot image is done
    app.scheduler.start(clock::now());
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut ticks: u32 = 0;

    loop {
        ticker.next().await;
        ticks = ticks.wrapping_add(1);

        while let Ok(message) = INBOUND.try_receive() {
            app.handle(message);
        }
        if let Some(address) = NET_ADDRESS.try_take() {
            app.screens.ip_address.set_address(Some(address));
        }

        let result = app.tick(&mut io);
        match app.supervisor.record(&result) {
            Verdict::Healthy => {}
            Verdict::Retry => {
                warn!("Tick failed: {:?}", result);
                syslog::emit(Severity::Error, format_args!("tick failed: {:?}", result));
                Timer::after(RETRY_DELAY).await;
            }
            Verdict::Reset => {
                error!("Tick failed twice in a row: {:?}, resetting", result);
                syslog::emit(Severity::Critical, format_args!("tick failed twice, resetting"));
                Timer::after(RETRY_DELAY).await;
                cortex_m::peripheral::SCB::sys_reset();
            }
        }

        match result {
            Ok(TickOutcome::Halt) => {
                warn!("Halted by long press");
                app.scene.clear();
            }
            Ok(TickOutcome::Reboot { delay_s }) => {
                warn!("Rebooting in {}s", delay_s);
                app.scene.clear();
                app.present();
                Timer::after_secs(delay_s).await;
                cortex_m::peripheral::SCB::sys_reset();
            }
            _ => {}
        }

        app.present();
        app.save();

        if ticks % MEMORY_CHECK_TICKS == 0 {
            if let MemoryStatus::Low { free } =
                check_memory(crate::free_heap(), config.memory.low_water_bytes)
            {
                warn!("Low memory: {} bytes free", free);
            }
        }
    }
}
