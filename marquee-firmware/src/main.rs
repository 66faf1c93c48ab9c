//! Marquee - LED Matrix Smart Sign Firmware
//!
//! Main firmware binary for a Raspberry Pi Pico W driving a 64x32 HUB75
//! panel. Shows a rotating set of screens (clock, weather, air quality,
//! UV index) and accepts data pushed over HTTP.
//!
//! Board wiring:
//!
//! | signal            | GPIO        |
//! |-------------------|-------------|
//! | R1 G1 B1 R2 G2 B2 | 0-5         |
//! | A B C D           | 6-9         |
//! | CLK LAT OE        | 10, 11, 12  |
//! | button A, B       | 14, 15      |
//! | buzzer (PWM0 A)   | 16          |

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pwm::Pwm;
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use marquee_core::config::SignConfig;
use marquee_hal_rp2040::buzzer::PwmBuzzer;
use marquee_hal_rp2040::flash::FlashStorage;
use marquee_hal_rp2040::gpio::{ButtonInput, Line};
use marquee_hal_rp2040::hub75::{Hub75, Hub75Pins};

mod assets;
mod channels;
mod clock;
mod config;
mod syslog;
mod tasks;

use tasks::net::{Credentials, WifiPins};

// Heap allocator for JSON documents
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 96KB
const HEAP_SIZE: usize = 96 * 1024;

bind_interrupts!(pub struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

// Configuration lives for the program duration
static SIGN_CONFIG: StaticCell<SignConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Marquee firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Configuration and the saved records share one flash partition
    let mut storage = FlashStorage::new(p.FLASH, p.DMA_CH1);
    let config: &'static SignConfig = SIGN_CONFIG.init(config::load_config(&mut storage).await);
    let store = tasks::persist::restore(&mut storage).await;
    info!("Configuration loaded, {} records restored", store.len());

    // Panel
    let panel = Hub75::new(Hub75Pins {
        rgb: [
            Line::new(p.PIN_0),
            Line::new(p.PIN_1),
            Line::new(p.PIN_2),
            Line::new(p.PIN_3),
            Line::new(p.PIN_4),
            Line::new(p.PIN_5),
        ],
        addr: [
            Line::new(p.PIN_6),
            Line::new(p.PIN_7),
            Line::new(p.PIN_8),
            Line::new(p.PIN_9),
        ],
        clk: Line::new(p.PIN_10),
        lat: Line::new(p.PIN_11),
        oe: Line::new_high(p.PIN_12),
    });
    info!("HUB75 panel initialized");

    // Buttons and buzzer
    let io = tasks::AppIo {
        button_a: ButtonInput::new(p.PIN_14),
        button_b: ButtonInput::new(p.PIN_15),
        buzzer: PwmBuzzer::new(Pwm::new_output_a(
            p.PWM_SLICE0,
            p.PIN_16,
            Default::default(),
        )),
    };

    let credentials = Credentials::from_env();
    if credentials.is_some() && config.network.syslog_enabled() {
        syslog::enable();
    }
    spawner.spawn(unwrap!(tasks::display_task(panel)));
    spawner.spawn(unwrap!(tasks::persist_task(storage)));
    spawner.spawn(unwrap!(tasks::app_task(config, store, io, credentials.is_some())));

    // Network
    let pins = WifiPins {
        pwr: p.PIN_23,
        cs: p.PIN_25,
        pio: p.PIO0,
        dio: p.PIN_24,
        clk: p.PIN_29,
        dma: p.DMA_CH0,
    };
    match credentials {
        Some(credentials) => {
            let stack = tasks::net::start(spawner, pins, credentials).await;
            spawner.spawn(unwrap!(tasks::http_task(stack, config.network.http_port)));
            spawner.spawn(unwrap!(tasks::ntp_task(stack, config.network.ntp_defaults())));
            if config.network.mqtt_enabled() {
                spawner.spawn(unwrap!(tasks::mqtt_task(stack, &config.network)));
            }
            if config.network.syslog_enabled() {
                let server = config.network.syslog_server.clone();
                spawner.spawn(unwrap!(tasks::syslog_task(stack, server)));
            }
        }
        None => {
            warn!("No WIFI_SSID set at build time, running offline");
        }
    }

    info!("All tasks spawned, firmware running");
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Free heap in bytes
pub fn free_heap() -> usize {
    HEAP.free()
}
