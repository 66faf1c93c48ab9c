//! Syslog sender
//!
//! Drains queued lines to the configured server over UDP. The server
//! name is resolved again after any send failure.

use defmt::*;
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, Stack};
use embassy_time::{Duration, Timer};
use heapless::String;

use marquee_core::config::MAX_HOST_LEN;
use marquee_protocol::SYSLOG_PORT;

use crate::channels::SYSLOG;

/// Wait before resolving the server again
const RETRY_DELAY: Duration = Duration::from_secs(30);

/// Syslog task
#[embassy_executor::task]
pub async fn syslog_task(stack: Stack<'static>, server: String<MAX_HOST_LEN>) -> ! {
    info!("Syslog task started, server {}", server.as_str());

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0; 16];
    let mut tx_meta = [PacketMetadata::EMPTY; 4];
    let mut tx_buffer = [0; 512];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    if let Err(e) = socket.bind(0) {
        error!("Syslog socket bind failed: {:?}", e);
    }

    loop {
        stack.wait_config_up().await;
        let Some(address) = resolve(stack, server.as_str()).await else {
            warn!("Syslog server {} not found", server.as_str());
            Timer::after(RETRY_DELAY).await;
            continue;
        };

        loop {
            let line = SYSLOG.receive().await;
            if let Err(e) = socket.send_to(line.as_bytes(), (address, SYSLOG_PORT)).await {
                warn!("Syslog send failed: {:?}", e);
                break;
            }
        }
    }
}

async fn resolve(stack: Stack<'static>, server: &str) -> Option<IpAddress> {
    let addresses = stack.dns_query(server, DnsQueryType::A).await.ok()?;
    addresses.first().copied()
}
