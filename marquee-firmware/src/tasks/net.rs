//! WiFi bring-up
//!
//! Powers the CYW43439, starts the embassy-net stack with DHCP and keeps
//! the station joined to the configured network.

use cyw43::JoinOptions;
use cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER};
use defmt::*;
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::Pio;
use embassy_rp::Peri;
use embassy_time::Timer;
use portable_atomic::Ordering;
use static_cell::StaticCell;

use crate::channels::{LEASE, NET_ADDRESS, NET_UP};
use crate::Irqs;

/// Sockets: HTTP listener, NTP, MQTT, syslog, DNS, DHCP and one spare
const SOCKETS: usize = 7;

/// Network credentials, set at build time
pub struct Credentials {
    pub ssid: &'static str,
    pub password: &'static str,
}

impl Credentials {
    /// Credentials from `WIFI_SSID` / `WIFI_PASSWORD`, if an SSID was given
    pub fn from_env() -> Option<Self> {
        let ssid = option_env!("WIFI_SSID")?;
        if ssid.is_empty() {
            return None;
        }
        Some(Self {
            ssid,
            password: option_env!("WIFI_PASSWORD").unwrap_or(""),
        })
    }
}

/// WiFi co-processor pins
pub struct WifiPins {
    pub pwr: Peri<'static, PIN_23>,
    pub cs: Peri<'static, PIN_25>,
    pub pio: Peri<'static, PIO0>,
    pub dio: Peri<'static, PIN_24>,
    pub clk: Peri<'static, PIN_29>,
    pub dma: Peri<'static, DMA_CH0>,
}

/// Bring up the radio and network stack
///
/// Returns once the stack exists; joining and DHCP continue in
/// `join_task`. Callers wait on `Stack::wait_config_up`.
pub async fn start(spawner: Spawner, pins: WifiPins, credentials: Credentials) -> Stack<'static> {
    info!("WiFi initializing");

    let fw = cyw43_firmware::CYW43_43439A0;
    let clm = cyw43_firmware::CYW43_43439A0_CLM;

    let pwr = Output::new(pins.pwr, Level::Low);
    let cs = Output::new(pins.cs, Level::High);
    let mut pio = Pio::new(pins.pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        pins.dio,
        pins.clk,
        pins.dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(unwrap!(cyw43_task(runner)));

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let config = Config::dhcpv4(Default::default());
    let seed = 0x5d3a_91c4_e27b_0f68;

    static RESOURCES: StaticCell<StackResources<SOCKETS>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::<SOCKETS>::new()),
        seed,
    );
    spawner.spawn(unwrap!(net_task(runner)));
    spawner.spawn(unwrap!(join_task(control, stack, credentials)));

    stack
}

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}

/// Join the network, publish the lease, and rejoin if the link drops
#[embassy_executor::task]
async fn join_task(
    mut control: cyw43::Control<'static>,
    stack: Stack<'static>,
    credentials: Credentials,
) -> ! {
    loop {
        info!("Connecting to WiFi: {}", credentials.ssid);
        loop {
            match control
                .join(
                    credentials.ssid,
                    JoinOptions::new(credentials.password.as_bytes()),
                )
                .await
            {
                Ok(_) => break,
                Err(err) => {
                    info!("Join failed: {}", err.status);
                    Timer::after_secs(1).await;
                }
            }
        }

        info!("WiFi connected, waiting for DHCP");
        stack.wait_config_up().await;

        if let Some(config) = stack.config_v4() {
            info!("IP Address: {}", config.address);
            let octets = config.address.address().octets();
            LEASE.store(u32::from_be_bytes(octets), Ordering::Relaxed);
            NET_ADDRESS.signal(octets);
        }
        NET_UP.store(true, Ordering::Relaxed);

        stack.wait_link_down().await;
        warn!("WiFi link lost");
        NET_UP.store(false, Ordering::Relaxed);
    }
}
